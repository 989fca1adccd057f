//! Backend collaborator: the remote HTTP JSON API, consumed through a
//! narrow trait so screens and tests can substitute their own.

pub mod http;
pub mod model;

use async_trait::async_trait;

use crate::utils::errors::ApiError;

pub use http::HttpBackend;
pub use model::{ListEnvelope, ListQuery, LoginRequest, LoginResponse};

/// The remote backend as this core consumes it: one authentication call
/// and one paginated list call. Everything else the API offers is out of
/// scope here.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /login` with email, password and role.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// `GET <resource>?page=<n>&limit=<size>&<filter keys>`, normalized
    /// into the list envelope shape.
    async fn fetch_list(&self, resource: &str, query: &ListQuery) -> Result<ListEnvelope, ApiError>;
}
