//! HTTP/JSON implementation of the backend collaborator.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::backend::model::{FailureBody, ListEnvelope, ListQuery, LoginRequest, LoginResponse};
use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::session::manager::SessionHandle;
use crate::utils::errors::ApiError;

const GENERIC_REJECTION: &str = "Invalid email or password";

/// Backend collaborator over HTTP, speaking the JSON contract of the
/// school-management API: `POST /login` and
/// `GET <resource>?page=&limit=&<filter keys>`.
///
/// Once a session is bound with [`HttpBackend::bind_session`], every list
/// request carries `Authorization: Bearer <token>`, and a 401/403 answer
/// signals the session manager to invalidate (exactly once) instead of
/// being retried.
pub struct HttpBackend {
    http: reqwest::Client,
    config: ClientConfig,
    session: std::sync::Mutex<Option<SessionHandle>>,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ApiError::network)?;
        Ok(Self {
            http,
            config,
            session: std::sync::Mutex::new(None),
        })
    }

    /// Binds the session whose token authorizes list calls. The handle is
    /// weak; the backend never keeps the session manager alive.
    pub fn bind_session(&self, handle: SessionHandle) {
        *self
            .session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(handle);
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn session_handle(&self) -> Option<SessionHandle> {
        self.session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    async fn flag_session_expired(&self) {
        if let Some(handle) = self.session_handle() {
            handle.invalidate().await;
        } else {
            warn!("authorization rejected but no session is bound");
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[instrument(skip_all)]
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self
            .http
            .post(self.endpoint("login"))
            .json(request)
            .send()
            .await
            .map_err(ApiError::network)?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            // Some deployments answer 200 with an explicit failure body.
            let failure: FailureBody =
                serde_json::from_value(body.clone()).unwrap_or_default();
            if failure.is_failure() {
                return Err(ApiError::AuthRejected(
                    failure.reason().unwrap_or_else(|| GENERIC_REJECTION.to_string()),
                ));
            }
            return serde_json::from_value(body).map_err(ApiError::malformed);
        }

        if status.is_client_error() {
            let failure: FailureBody = serde_json::from_value(body).unwrap_or_default();
            return Err(ApiError::AuthRejected(
                failure.reason().unwrap_or_else(|| GENERIC_REJECTION.to_string()),
            ));
        }

        Err(ApiError::Network(format!(
            "login failed with status {status}"
        )))
    }

    #[instrument(skip(self, query), fields(resource = %resource, page = query.page))]
    async fn fetch_list(&self, resource: &str, query: &ListQuery) -> Result<ListEnvelope, ApiError> {
        let mut request = self
            .http
            .get(self.endpoint(resource))
            .query(&query.query_pairs());
        if let Some(token) = self.session_handle().and_then(|handle| handle.token()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(ApiError::network)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.flag_session_expired().await;
            return Err(ApiError::SessionExpired);
        }
        if !status.is_success() {
            return Err(ApiError::Network(format!(
                "{resource} request failed with status {status}"
            )));
        }

        let body: Value = response.json().await.map_err(ApiError::malformed)?;
        let envelope = ListEnvelope::from_body(body)?;
        debug!(
            items = envelope.items.len(),
            total = envelope.pagination.total_items,
            "fetched list page"
        );
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base_url: &str) -> HttpBackend {
        HttpBackend::new(ClientConfig::new(base_url)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let backend = backend("https://api.example.school/");
        assert_eq!(
            backend.endpoint("/fees"),
            "https://api.example.school/fees"
        );
        assert_eq!(
            backend.endpoint("students"),
            "https://api.example.school/students"
        );
    }
}
