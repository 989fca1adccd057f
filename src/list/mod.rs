//! Filter state + pagination state + a request executor, composed into
//! one "load a page of items matching filters" unit.

pub mod controller;
pub mod filter;

pub use controller::{Page, PaginatedListController};
pub use filter::{ListFilter, date_param};
