//! Wire types for the backend collaborator contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::session::model::{Identity, Role};
use crate::utils::errors::ApiError;
use crate::utils::pagination::PageInfo;

/// Login request body for `POST /login`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    pub role: Role,
}

/// User payload inside a successful login response. The role arrives as a
/// plain string and is mapped into [`Role`] when the identity is built.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl BackendUser {
    /// Maps the wire user into the internal identity shape. An unknown
    /// role value is a malformed response; nothing is partially applied.
    pub fn into_identity(self) -> Result<Identity, ApiError> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(|err| ApiError::MalformedResponse(err.to_string()))?;
        Ok(Identity {
            id: self.id,
            name: self.name,
            email: self.email,
            role,
        })
    }
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: BackendUser,
}

/// Failure body some endpoints return with a 2xx or 4xx status:
/// `{"success": false, "message": "..."}` (or `{"error": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FailureBody {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FailureBody {
    /// Backend-supplied failure reason, if any was given.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .filter(|msg| !msg.is_empty())
    }

    /// Whether the body explicitly flags the call as failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.success == Some(false)
    }
}

/// Query for one page of a list endpoint: page number, page size and the
/// flattened filter pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    /// Full query-string pairs, pagination first, filters in schema order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 2);
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

/// Normalized list response: items plus the pagination block.
///
/// Items stay as raw JSON values here; the list controller deserializes
/// them into the screen's item type. Business payloads are opaque to the
/// core.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope {
    pub items: Vec<Value>,
    pub pagination: PageInfo,
}

impl ListEnvelope {
    /// Normalizes a list response body into the envelope shape.
    ///
    /// Legacy endpoints return a bare array; those are wrapped as a single
    /// page. Anything else that does not match the envelope is a
    /// malformed response.
    pub fn from_body(body: Value) -> Result<Self, ApiError> {
        match body {
            Value::Array(items) => {
                let total_items = items.len() as u64;
                Ok(Self {
                    items,
                    pagination: PageInfo {
                        current_page: 1,
                        total_pages: 1,
                        total_items,
                    },
                })
            }
            body @ Value::Object(_) => {
                serde_json::from_value(body).map_err(ApiError::malformed)
            }
            other => Err(ApiError::MalformedResponse(format!(
                "expected a list envelope or array, got {other}"
            ))),
        }
    }
}
