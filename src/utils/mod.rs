//! Shared utilities for the client core.
//!
//! - [`errors`]: the crate-wide failure taxonomy
//! - [`pagination`]: pagination state and its clamp/reset laws
//! - [`validation`]: helpers for flattening request-validation errors

pub mod errors;
pub mod pagination;
pub mod validation;
