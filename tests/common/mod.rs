#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use satchel::backend::model::BackendUser;
use satchel::backend::{Backend, ListEnvelope, ListQuery, LoginRequest, LoginResponse};
use satchel::session::store::{KeyValueStore, MemoryStore};
use satchel::utils::errors::ApiError;
use satchel::utils::pagination::PageInfo;
use serde_json::{Value, json};
use tokio::sync::watch;

type ListHandler = Box<dyn Fn(&str, &ListQuery) -> Result<ListEnvelope, ApiError> + Send + Sync>;

/// Scriptable backend collaborator for session and list tests.
pub struct MockBackend {
    login_result: Mutex<Option<Result<LoginResponse, ApiError>>>,
    login_calls: Mutex<u32>,
    login_gate: watch::Sender<bool>,
    list_handler: Mutex<Option<ListHandler>>,
    list_requests: Mutex<Vec<(String, ListQuery)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        let (login_gate, _) = watch::channel(true);
        Self {
            login_result: Mutex::new(None),
            login_calls: Mutex::new(0),
            login_gate,
            list_handler: Mutex::new(None),
            list_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_login_ok(token: &str, id: &str, name: &str, email: &str, role: &str) -> Self {
        let backend = Self::new();
        backend.set_login_result(Ok(LoginResponse {
            access_token: token.to_string(),
            user: BackendUser {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                role: role.to_string(),
            },
        }));
        backend
    }

    pub fn set_login_result(&self, result: Result<LoginResponse, ApiError>) {
        *self.login_result.lock().unwrap() = Some(result);
    }

    pub fn set_list_handler<F>(&self, handler: F)
    where
        F: Fn(&str, &ListQuery) -> Result<ListEnvelope, ApiError> + Send + Sync + 'static,
    {
        *self.list_handler.lock().unwrap() = Some(Box::new(handler));
    }

    /// Blocks subsequent `login` calls until [`MockBackend::release_logins`].
    pub fn hold_logins(&self) {
        self.login_gate.send_replace(false);
    }

    pub fn release_logins(&self) {
        self.login_gate.send_replace(true);
    }

    pub fn login_calls(&self) -> u32 {
        *self.login_calls.lock().unwrap()
    }

    pub fn list_requests(&self) -> Vec<(String, ListQuery)> {
        self.list_requests.lock().unwrap().clone()
    }

    pub fn last_list_request(&self) -> (String, ListQuery) {
        self.list_requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one list request was issued")
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        *self.login_calls.lock().unwrap() += 1;
        let mut gate = self.login_gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;
        self.login_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(ApiError::Network("no login response scripted".to_string())))
    }

    async fn fetch_list(&self, resource: &str, query: &ListQuery) -> Result<ListEnvelope, ApiError> {
        self.list_requests
            .lock()
            .unwrap()
            .push((resource.to_string(), query.clone()));
        let handler = self.list_handler.lock().unwrap();
        match handler.as_ref() {
            Some(handler) => handler(resource, query),
            None => Err(ApiError::Network("no list handler scripted".to_string())),
        }
    }
}

/// Builds one `limit`-sized page over `total_items` synthetic rows, the
/// way the backend would slice them.
fn sliced_page(query: &ListQuery, total_items: u64, row: impl Fn(u64) -> Value) -> ListEnvelope {
    let limit = u64::from(query.limit);
    let page = u64::from(query.page);
    let start = (page - 1) * limit;
    let end = (start + limit).min(total_items);
    let items: Vec<Value> = (start..end).map(row).collect();
    let total_pages = u32::try_from(total_items.div_ceil(limit.max(1))).unwrap_or(u32::MAX);
    ListEnvelope {
        items,
        pagination: PageInfo {
            current_page: query.page,
            total_pages,
            total_items,
        },
    }
}

pub fn fee_page(query: &ListQuery, total_items: u64) -> ListEnvelope {
    sliced_page(query, total_items, |n| {
        json!({"id": format!("f{n}"), "status": "pending"})
    })
}

pub fn student_page(query: &ListQuery, total_items: u64) -> ListEnvelope {
    sliced_page(query, total_items, |n| {
        json!({"id": format!("s{n}"), "name": format!("Student {n}"), "status": "active"})
    })
}

/// In-memory store whose `set` fails for one configured key. Exercises
/// the both-or-neither persistence path.
pub struct FailingStore {
    inner: MemoryStore,
    fail_set_key: Mutex<Option<String>>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_set_key: Mutex::new(None),
        }
    }

    pub fn fail_set_for(&self, key: &str) {
        *self.fail_set_key.lock().unwrap() = Some(key.to_string());
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        if self.fail_set_key.lock().unwrap().as_deref() == Some(key) {
            return Err(ApiError::Storage(format!("write of {key} refused")));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.inner.remove(key).await
    }
}

/// Store whose reads block until the test opens the gate. Holds the
/// session manager in `Restoring` for as long as a test needs.
pub struct GatedStore {
    inner: MemoryStore,
    open: watch::Sender<bool>,
}

impl GatedStore {
    pub fn new() -> Self {
        let (open, _) = watch::channel(false);
        Self {
            inner: MemoryStore::new(),
            open,
        }
    }

    pub fn open(&self) {
        self.open.send_replace(true);
    }
}

#[async_trait]
impl KeyValueStore for GatedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let mut gate = self.open.subscribe();
        let _ = gate.wait_for(|open| *open).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.inner.remove(key).await
    }
}
