//! Session lifecycle: restore, login, persistence, teardown.

pub mod manager;
pub mod model;
pub mod store;

pub use manager::{SessionHandle, SessionManager};
pub use model::{Identity, IdentityPatch, Role, SessionSnapshot, SessionStatus, UnknownRole};
pub use store::{
    FileStore, KeyValueStore, MemoryStore, SESSION_IDENTITY_KEY, SESSION_TOKEN_KEY,
};
