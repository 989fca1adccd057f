//! The generic list controller every list-backed screen is built on.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::instrument;

use crate::backend::model::ListQuery;
use crate::backend::Backend;
use crate::list::filter::ListFilter;
use crate::request::{RequestExecutor, RequestState};
use crate::utils::errors::ApiError;
use crate::utils::pagination::{PageInfo, PageSummary, PaginationState};

/// One settled page of items plus its pagination block.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

struct ControllerState<F> {
    pagination: PaginationState,
    filters: F,
}

/// Coordinates page number, page size and filter criteria for one list
/// endpoint, re-issuing requests through an owned [`RequestExecutor`]
/// whenever any of them change.
///
/// Every mutation follows the same laws: a filter or page-size change
/// resets to page 1; a page change is clamped into the known range, so a
/// request for a page known not to exist is never issued; and a request
/// superseded by a newer one has its settlement discarded. Switching the
/// entity a list is scoped to (a different child, say) is expressed as a
/// filter change and behaves identically.
pub struct PaginatedListController<T, F>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
    F: ListFilter,
{
    executor: RequestExecutor<ListQuery, Page<T>>,
    state: Mutex<ControllerState<F>>,
    resource: String,
}

impl<T, F> PaginatedListController<T, F>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
    F: ListFilter,
{
    /// Creates a controller for `resource` with the empty filter, page 1
    /// and the given page size.
    pub fn new(backend: Arc<dyn Backend>, resource: impl Into<String>, page_size: u32) -> Self {
        let resource = resource.into();
        let executor = {
            let backend = Arc::clone(&backend);
            let resource = resource.clone();
            RequestExecutor::new(move |query: ListQuery| {
                let backend = Arc::clone(&backend);
                let resource = resource.clone();
                async move {
                    let envelope = backend.fetch_list(&resource, &query).await?;
                    let items = envelope
                        .items
                        .into_iter()
                        .map(|item| serde_json::from_value::<T>(item).map_err(ApiError::malformed))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Page {
                        items,
                        info: envelope.pagination,
                    })
                }
                .boxed()
            })
        };

        Self {
            executor,
            state: Mutex::new(ControllerState {
                pagination: PaginationState::new(page_size),
                filters: F::default(),
            }),
            resource,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState<F>> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Moves to the given page (clamped into the known range) and reloads.
    pub async fn set_page(&self, page: u32) -> RequestState<Page<T>> {
        {
            let mut state = self.lock();
            state.pagination.set_page(page);
        }
        self.reload().await
    }

    /// Changes the page size (clamped), resets to page 1 and reloads.
    pub async fn set_page_size(&self, page_size: u32) -> RequestState<Page<T>> {
        {
            let mut state = self.lock();
            state.pagination.set_page_size(page_size);
        }
        self.reload().await
    }

    /// Replaces the whole filter set, resets to page 1 and reloads.
    ///
    /// Replacement, not merge: constraints absent from `filters` are
    /// gone, so callers pass the full desired filter set.
    pub async fn apply_filters(&self, filters: F) -> RequestState<Page<T>> {
        {
            let mut state = self.lock();
            state.filters = filters;
            state.pagination.reset_page();
        }
        self.reload().await
    }

    /// Removes a single constraint by its wire key; if one was removed,
    /// resets to page 1 and reloads. An unknown or unset key changes
    /// nothing and issues no request.
    pub async fn clear_filter(&self, key: &str) -> RequestState<Page<T>> {
        let removed = {
            let mut state = self.lock();
            let removed = state.filters.clear(key);
            if removed {
                state.pagination.reset_page();
            }
            removed
        };
        if removed {
            self.reload().await
        } else {
            self.executor.state()
        }
    }

    /// Re-issues the current page/filter combination. Subject to the
    /// executor's discard rule: if a newer request is issued before this
    /// one settles, this settlement is dropped.
    #[instrument(skip(self), fields(resource = %self.resource))]
    pub async fn reload(&self) -> RequestState<Page<T>> {
        let query = {
            let state = self.lock();
            ListQuery {
                page: state.pagination.current_page(),
                limit: state.pagination.page_size(),
                filters: state
                    .filters
                    .query_pairs()
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value))
                    .collect(),
            }
        };

        let result = self.executor.execute(query).await;

        if let Some(page) = result.data.as_ref() {
            let mut state = self.lock();
            state.pagination.apply_totals(&page.info);
        }
        result
    }

    /// Items of the last good page, or empty if none has settled yet.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.executor
            .state()
            .data
            .map(|page| page.items)
            .unwrap_or_default()
    }

    /// Pagination summary for page-number UI.
    #[must_use]
    pub fn summary(&self) -> PageSummary {
        self.lock().pagination.summary()
    }

    /// Current filter set.
    #[must_use]
    pub fn filters(&self) -> F {
        self.lock().filters.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.executor.state().is_loading()
    }

    /// Message of the most recent failure, if the latest request failed.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.executor.state().error_message()
    }

    /// Subscribes to request-state changes for this list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestState<Page<T>>> {
        self.executor.subscribe()
    }

    /// The backend resource path this controller is bound to.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }
}
