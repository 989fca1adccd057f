//! # Satchel
//!
//! Client-side session and data-access core for the school-management
//! app. Screens are presentational and live elsewhere; this crate owns
//! the two things every screen leans on:
//!
//! - **Session lifecycle**: restoring a prior sign-in at startup,
//!   performing login, persisting and clearing credentials, and exposing
//!   the current identity and role.
//! - **Remote data access**: a generic request lifecycle wrapper with
//!   out-of-order response protection, and a pagination/filter controller
//!   built on top of it for every list-backed screen.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── backend/          # Backend collaborator trait + reqwest implementation
//! ├── config.rs         # Injected client configuration
//! ├── list/             # Generic paginated list controller + filter trait
//! ├── logging.rs        # Console tracing setup
//! ├── modules/          # Per-screen filter schemas and item shapes
//! │   ├── activities.rs
//! │   ├── fees.rs
//! │   ├── health.rs
//! │   ├── notes.rs
//! │   ├── posts.rs
//! │   └── students.rs
//! ├── request/          # Request lifecycle tracking with sequence guard
//! ├── session/          # Session state machine + persistent store
//! └── utils/            # Errors, pagination laws, validation helpers
//! ```
//!
//! ## Wiring
//!
//! ```ignore
//! use std::sync::Arc;
//! use satchel::{ClientConfig, HttpBackend, MemoryStore, Role, SessionManager};
//! use satchel::modules::fees::{FeeFilter, fee_list};
//!
//! let backend = Arc::new(HttpBackend::new(ClientConfig::from_env())?);
//! let store = Arc::new(MemoryStore::new());
//! let session = SessionManager::new(backend.clone(), store);
//! backend.bind_session(session.handle());
//!
//! session.initialize().await;
//! session.login("parent@example.school", "secret", Role::Parent).await?;
//!
//! let fees = fee_list(backend.clone(), 20);
//! fees.apply_filters(FeeFilter::for_student("s1")).await;
//! let page = fees.items();
//! ```
//!
//! ## Guarantees
//!
//! - **Last issued wins**: per executor, the result observed is always
//!   that of the most recently issued request, whatever order the network
//!   settles them in. Superseded results are discarded, never applied.
//! - **Stale-but-available**: the last good page stays visible through a
//!   failed refresh; the error is exposed alongside it. Nothing retries
//!   automatically.
//! - **Fail-safe session**: restore failures degrade to signed-out;
//!   logout clears memory even when disk cleanup fails; a 401/403 on any
//!   authenticated call invalidates the session exactly once.

pub mod backend;
pub mod config;
pub mod list;
pub mod logging;
pub mod modules;
pub mod request;
pub mod session;
pub mod utils;

pub use backend::{Backend, HttpBackend, ListEnvelope, ListQuery, LoginRequest, LoginResponse};
pub use config::ClientConfig;
pub use list::{ListFilter, Page, PaginatedListController};
pub use request::{RequestExecutor, RequestPhase, RequestState};
pub use session::{
    FileStore, Identity, IdentityPatch, KeyValueStore, MemoryStore, Role, SessionHandle,
    SessionManager, SessionSnapshot, SessionStatus,
};
pub use utils::errors::ApiError;
pub use utils::pagination::{PageInfo, PageSummary, PaginationState};
