//! Generic remote-call lifecycle tracking.
//!
//! [`RequestExecutor`] wraps exactly one kind of remote call with a
//! consistent idle/pending/succeeded/failed lifecycle and a monotonic
//! sequence guard: every issued call gets a fresh sequence number, and a
//! settlement is applied only if its number is still the highest issued.
//! Whatever the network completion order, the last call issued is the one
//! whose result is observed; superseded results are discarded silently.
//!
//! The previous successful payload is retained across later failures, so
//! a screen can keep showing the last good page while a refresh fails or
//! is in flight.

use std::sync::{Mutex, MutexGuard};

use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing::debug;

use crate::utils::errors::ApiError;

/// Lifecycle phase of the tracked call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Observable state of one executor.
#[derive(Debug, Clone)]
pub struct RequestState<T> {
    pub phase: RequestPhase,
    /// Last successfully fetched payload, retained across later failures.
    pub data: Option<T>,
    pub error: Option<ApiError>,
    /// Sequence number of the call this state reflects.
    pub request_seq: u64,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            phase: RequestPhase::Idle,
            data: None,
            error: None,
            request_seq: 0,
        }
    }
}

impl<T> RequestState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == RequestPhase::Pending
    }

    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// The asynchronous call an executor is bound to.
pub type ExecutorCall<I, T> =
    Box<dyn Fn(I) -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

struct Tracked<T> {
    latest_seq: u64,
    state: RequestState<T>,
}

/// Wraps one kind of remote call (input `I`, output `T`) with lifecycle
/// tracking and the out-of-order discard rule.
///
/// Instantiated once per call site; [`RequestExecutor::execute`] is the
/// only mutating entry point. There is no cancellation signal: a call
/// superseded before it settles is simply discarded when it does.
pub struct RequestExecutor<I, T> {
    call: ExecutorCall<I, T>,
    tracked: Mutex<Tracked<T>>,
    notify: watch::Sender<RequestState<T>>,
}

impl<I, T> RequestExecutor<I, T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(call: F) -> Self
    where
        F: Fn(I) -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync + 'static,
    {
        let state = RequestState::default();
        let (notify, _) = watch::channel(state.clone());
        Self {
            call: Box::new(call),
            tracked: Mutex::new(Tracked {
                latest_seq: 0,
                state,
            }),
            notify,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tracked<T>> {
        self.tracked
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Issues the bound call and settles its result into the state,
    /// unless a newer call was issued in the meantime.
    ///
    /// Entering: the phase becomes `Pending`, the previous error is
    /// cleared, the previous data is kept. Settling: applied only while
    /// this call is still the latest issued; a superseded settlement is
    /// discarded and the state of the newer call is returned instead.
    pub async fn execute(&self, input: I) -> RequestState<T> {
        let seq = {
            let mut tracked = self.lock();
            tracked.latest_seq += 1;
            tracked.state.phase = RequestPhase::Pending;
            tracked.state.error = None;
            tracked.state.request_seq = tracked.latest_seq;
            self.notify.send_replace(tracked.state.clone());
            tracked.latest_seq
        };

        let result = (self.call)(input).await;

        let mut tracked = self.lock();
        if seq != tracked.latest_seq {
            debug!(
                seq,
                latest = tracked.latest_seq,
                "discarding settlement of a superseded request"
            );
            return tracked.state.clone();
        }
        match result {
            Ok(data) => {
                tracked.state.phase = RequestPhase::Succeeded;
                tracked.state.data = Some(data);
                tracked.state.error = None;
            }
            Err(err) => {
                tracked.state.phase = RequestPhase::Failed;
                tracked.state.error = Some(err);
            }
        }
        tracked.state.request_seq = seq;
        self.notify.send_replace(tracked.state.clone());
        tracked.state.clone()
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> RequestState<T> {
        self.lock().state.clone()
    }

    /// Subscribes to state changes. The receiver always holds the most
    /// recent state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.notify.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn ok_executor() -> RequestExecutor<u32, u32> {
        RequestExecutor::new(|input: u32| async move { Ok(input * 2) }.boxed())
    }

    #[tokio::test]
    async fn test_successful_call_settles_data() {
        let executor = ok_executor();
        let state = executor.execute(21).await;
        assert_eq!(state.phase, RequestPhase::Succeeded);
        assert_eq!(state.data, Some(42));
        assert_eq!(state.error, None);
        assert_eq!(state.request_seq, 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_data() {
        let executor = RequestExecutor::new(|input: u32| {
            async move {
                if input == 0 {
                    Err(ApiError::Network("unreachable".to_string()))
                } else {
                    Ok(input)
                }
            }
            .boxed()
        });

        executor.execute(7).await;
        let state = executor.execute(0).await;
        assert_eq!(state.phase, RequestPhase::Failed);
        assert_eq!(state.data, Some(7));
        assert!(matches!(state.error, Some(ApiError::Network(_))));
    }

    #[tokio::test]
    async fn test_sequence_numbers_are_monotonic() {
        let executor = ok_executor();
        assert_eq!(executor.execute(1).await.request_seq, 1);
        assert_eq!(executor.execute(2).await.request_seq, 2);
        assert_eq!(executor.execute(3).await.request_seq, 3);
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let executor = ok_executor();
        let state = executor.state();
        assert_eq!(state.phase, RequestPhase::Idle);
        assert_eq!(state.data, None);
        assert_eq!(state.request_seq, 0);
    }
}
