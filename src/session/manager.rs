//! The authentication session state machine.
//!
//! [`SessionManager`] is the single authority for "who is signed in". It
//! restores a prior session at startup, performs login, persists and
//! clears credentials, and exposes the current identity to the rest of
//! the application through snapshots and a watch subscription.
//!
//! State machine:
//!
//! ```text
//! Uninitialized → Restoring → { Authenticated | Unauthenticated | RestoreFailed }
//! Unauthenticated/RestoreFailed → Authenticating → { Authenticated | Unauthenticated }
//! Authenticated → Unauthenticated   (logout or forced invalidation only)
//! ```
//!
//! There is no path from `Authenticated` to `Authenticating`; a caller
//! must log out first, and a concurrent login attempt is rejected rather
//! than queued.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use validator::Validate;

use crate::backend::model::LoginRequest;
use crate::backend::Backend;
use crate::session::model::{Identity, IdentityPatch, Role, SessionSnapshot, SessionStatus};
use crate::session::store::{KeyValueStore, SESSION_IDENTITY_KEY, SESSION_TOKEN_KEY};
use crate::utils::errors::ApiError;
use crate::utils::validation::format_validation_errors;

const GENERIC_LOGIN_FAILURE: &str = "Unable to sign in. Please try again.";
const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

struct SessionState {
    status: SessionStatus,
    identity: Option<Identity>,
    token: Option<String>,
    last_error: Option<String>,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            identity: self.identity.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

struct SessionInner {
    backend: Arc<dyn Backend>,
    store: Arc<dyn KeyValueStore>,
    state: Mutex<SessionState>,
    notify: watch::Sender<SessionSnapshot>,
}

impl SessionInner {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn publish(&self, state: &SessionState) {
        self.notify.send_replace(state.snapshot());
    }

    /// Forced transition out of `Authenticated` after a 401/403.
    /// Status-guarded, so a storm of expiry signals clears exactly once.
    async fn invalidate(&self) {
        {
            let mut state = self.lock();
            if state.status != SessionStatus::Authenticated {
                return;
            }
            state.status = SessionStatus::Unauthenticated;
            state.identity = None;
            state.token = None;
            state.last_error = Some(SESSION_EXPIRED_MESSAGE.to_string());
            self.publish(&state);
        }
        warn!("session invalidated after an authorization rejection");
        self.clear_stored_session().await;
    }

    /// Best-effort removal of the persisted session keys. Failures are
    /// logged and otherwise ignored; in-memory state is already settled
    /// by the time this runs.
    async fn clear_stored_session(&self) {
        for key in [SESSION_TOKEN_KEY, SESSION_IDENTITY_KEY] {
            if let Err(err) = self.store.remove(key).await {
                warn!(key, error = %err, "failed to clear stored session entry");
            }
        }
    }
}

/// Handle the backend collaborator holds to read the bearer token and to
/// signal session expiry, without keeping the manager alive.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Weak<SessionInner>,
}

impl SessionHandle {
    /// Current bearer token, present only while authenticated.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        let inner = self.inner.upgrade()?;
        let token = inner.lock().token.clone();
        token
    }

    /// Reports a 401/403 seen on an authenticated call. Idempotent.
    pub async fn invalidate(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.invalidate().await;
        }
    }
}

/// Single authority for the signed-in identity and session persistence.
///
/// Cheap to clone; all clones share one state machine.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn Backend>, store: Arc<dyn KeyValueStore>) -> Self {
        let initial = SessionState {
            status: SessionStatus::Uninitialized,
            identity: None,
            token: None,
            last_error: None,
        };
        let (notify, _) = watch::channel(initial.snapshot());
        Self {
            inner: Arc::new(SessionInner {
                backend,
                store,
                state: Mutex::new(initial),
                notify,
            }),
        }
    }

    /// Current state as observers see it.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().snapshot()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.inner.lock().status
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status().is_authenticated()
    }

    /// Current bearer token, present only while authenticated.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.lock().token.clone()
    }

    /// Subscribes to session changes. The receiver always holds the most
    /// recent snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.notify.subscribe()
    }

    /// Handle for the backend collaborator (bearer token + expiry signal).
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Drops the retained login/expiry error message.
    pub fn clear_error(&self) {
        let mut state = self.inner.lock();
        if state.last_error.take().is_some() {
            self.inner.publish(&state);
        }
    }

    /// Restores a prior session from the persistent store.
    ///
    /// Transitions `Uninitialized → Restoring` and then exactly once to
    /// `Authenticated` (both keys present and well-formed),
    /// `Unauthenticated` (nothing usable stored) or `RestoreFailed`
    /// (store read or parse failure, logged as a warning). Never errors;
    /// a repeated call is a logged no-op.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> SessionSnapshot {
        {
            let mut state = self.inner.lock();
            if state.status != SessionStatus::Uninitialized {
                warn!(status = ?state.status, "initialize called more than once; ignoring");
                return state.snapshot();
            }
            state.status = SessionStatus::Restoring;
            self.inner.publish(&state);
        }

        let token = self.inner.store.get(SESSION_TOKEN_KEY).await;
        let stored_identity = self.inner.store.get(SESSION_IDENTITY_KEY).await;

        let mut state = self.inner.lock();
        // Commit only if nothing else moved the machine while the store
        // reads were in flight.
        if state.status != SessionStatus::Restoring {
            warn!(status = ?state.status, "session changed during restore; keeping the newer state");
            return state.snapshot();
        }
        match (token, stored_identity) {
            (Ok(Some(token)), Ok(Some(raw))) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => {
                    debug!(user_id = %identity.id, "restored session from persistent store");
                    state.status = SessionStatus::Authenticated;
                    state.identity = Some(identity);
                    state.token = Some(token);
                }
                Err(err) => {
                    warn!(error = %err, "stored identity is corrupt; treating as signed out");
                    state.status = SessionStatus::RestoreFailed;
                }
            },
            (Ok(_), Ok(_)) => {
                state.status = SessionStatus::Unauthenticated;
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "failed to read persistent store; treating as signed out");
                state.status = SessionStatus::RestoreFailed;
            }
        }
        self.inner.publish(&state);
        state.snapshot()
    }

    /// Performs a login against the backend collaborator.
    ///
    /// Input is validated before any network call. Permitted only from
    /// `Unauthenticated` or `RestoreFailed`: an attempt while already
    /// authenticated, while another attempt is in flight, or before the
    /// restore has settled is a precondition violation and is rejected
    /// without a transition. On success the token and mapped identity are
    /// persisted both-or-neither: if the second write fails the first is
    /// rolled back and the login fails. On failure the status reverts to
    /// `Unauthenticated` and the message is retained for observers until
    /// [`SessionManager::clear_error`]. Either settlement is applied only
    /// while the status is still `Authenticating`; a `logout` issued
    /// mid-attempt wins, and a late success clears what it persisted.
    #[instrument(skip_all, fields(role = %role))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<SessionSnapshot, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        request
            .validate()
            .map_err(|errors| ApiError::Validation(format_validation_errors(&errors)))?;

        {
            let mut state = self.inner.lock();
            match state.status {
                SessionStatus::Unauthenticated | SessionStatus::RestoreFailed => {}
                SessionStatus::Authenticated => {
                    return Err(ApiError::Validation(
                        "already authenticated; log out before signing in again".to_string(),
                    ));
                }
                SessionStatus::Authenticating => {
                    return Err(ApiError::Validation(
                        "a login attempt is already in progress".to_string(),
                    ));
                }
                SessionStatus::Uninitialized | SessionStatus::Restoring => {
                    return Err(ApiError::Validation(
                        "session restore has not finished; wait for initialization".to_string(),
                    ));
                }
            }
            state.status = SessionStatus::Authenticating;
            state.last_error = None;
            self.inner.publish(&state);
        }

        match self.attempt_login(&request).await {
            Ok((identity, token)) => {
                let committed = {
                    let mut state = self.inner.lock();
                    if state.status == SessionStatus::Authenticating {
                        state.status = SessionStatus::Authenticated;
                        state.identity = Some(identity);
                        state.token = Some(token);
                        state.last_error = None;
                        self.inner.publish(&state);
                        Some(state.snapshot())
                    } else {
                        None
                    }
                };
                match committed {
                    Some(snapshot) => Ok(snapshot),
                    None => {
                        // A concurrent sign-out won; discard the fresh
                        // credentials instead of resurrecting the session.
                        warn!("login settled after a concurrent sign-out; discarding");
                        self.inner.clear_stored_session().await;
                        Err(ApiError::Validation(
                            "login was interrupted by a sign-out".to_string(),
                        ))
                    }
                }
            }
            Err(err) => {
                let mut state = self.inner.lock();
                if state.status == SessionStatus::Authenticating {
                    state.status = SessionStatus::Unauthenticated;
                    state.identity = None;
                    state.token = None;
                    state.last_error = Some(login_failure_message(&err));
                    self.inner.publish(&state);
                }
                Err(err)
            }
        }
    }

    /// Backend call plus the both-or-neither persistence step.
    async fn attempt_login(&self, request: &LoginRequest) -> Result<(Identity, String), ApiError> {
        let response = self.inner.backend.login(request).await?;
        let identity = response.user.into_identity()?;
        let serialized = serde_json::to_string(&identity).map_err(ApiError::storage)?;

        self.inner
            .store
            .set(SESSION_TOKEN_KEY, &response.access_token)
            .await?;
        if let Err(err) = self
            .inner
            .store
            .set(SESSION_IDENTITY_KEY, &serialized)
            .await
        {
            // Roll back the token write so the store never holds half a session.
            if let Err(rollback_err) = self.inner.store.remove(SESSION_TOKEN_KEY).await {
                warn!(error = %rollback_err, "failed to roll back token after identity write failure");
            }
            return Err(err);
        }

        Ok((identity, response.access_token))
    }

    /// Signs out. In-memory state is cleared unconditionally and first; a
    /// user never remains signed in in memory because disk cleanup
    /// failed. Store delete failures are only logged.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        {
            let mut state = self.inner.lock();
            state.status = SessionStatus::Unauthenticated;
            state.identity = None;
            state.token = None;
            state.last_error = None;
            self.inner.publish(&state);
        }
        self.inner.clear_stored_session().await;
        debug!("signed out");
    }

    /// Merges a partial patch into the current identity and persists the
    /// result. A no-op unless currently authenticated. The merged record
    /// is committed to memory only after the persistent write succeeds.
    #[instrument(skip(self, patch))]
    pub async fn update_identity(&self, patch: IdentityPatch) -> Result<SessionSnapshot, ApiError> {
        let merged = {
            let state = self.inner.lock();
            if state.status != SessionStatus::Authenticated {
                debug!("update_identity ignored while not authenticated");
                return Ok(state.snapshot());
            }
            let Some(mut identity) = state.identity.clone() else {
                return Ok(state.snapshot());
            };
            patch.apply(&mut identity);
            identity
        };

        let serialized = serde_json::to_string(&merged).map_err(ApiError::storage)?;
        self.inner
            .store
            .set(SESSION_IDENTITY_KEY, &serialized)
            .await?;

        let mut state = self.inner.lock();
        if state.status == SessionStatus::Authenticated {
            state.identity = Some(merged);
            self.inner.publish(&state);
        }
        Ok(state.snapshot())
    }

    /// Forced logout after a session-expiry signal. Idempotent.
    pub async fn invalidate(&self) {
        self.inner.invalidate().await;
    }
}

fn login_failure_message(error: &ApiError) -> String {
    match error {
        ApiError::AuthRejected(message) if !message.is_empty() => message.clone(),
        _ => GENERIC_LOGIN_FAILURE.to_string(),
    }
}
