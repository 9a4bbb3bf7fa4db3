//! Test doubles for the session and transport seams.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::net::api::{ApiClient, SessionAuthority};
use crate::net::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::net::types::{Identity, Role};
use crate::state::notices::NoticeKind;
use crate::state::session::{SessionCell, SessionEffects, SessionState, SessionStore};
use crate::util::storage::{SessionStorage, StorageError};

pub type SharedCell = Rc<RefCell<SessionState>>;
pub type TestSession = SessionStore<SharedCell, MemoryStorage, RecordingEffects>;
pub type TestClient = ApiClient<ScriptedTransport, TestSession>;

impl SessionCell for SharedCell {
    fn current(&self) -> SessionState {
        self.borrow().clone()
    }

    fn snapshot(&self) -> SessionState {
        self.borrow().clone()
    }

    fn modify(&self, f: impl FnOnce(&mut SessionState)) {
        f(&mut self.borrow_mut());
    }
}

/// In-memory `SessionStorage`; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<RefCell<bool>>,
}

impl MemoryStorage {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        let storage = Self::default();
        for (key, value) in entries {
            storage.entries.borrow_mut().insert((*key).to_owned(), (*value).to_owned());
        }
        storage
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.borrow_mut() = true;
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if *self.fail_writes.borrow() {
            return Err(StorageError::WriteFailed { key: key.to_owned() });
        }
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Records navigations and notices instead of performing them.
#[derive(Clone, Debug, Default)]
pub struct RecordingEffects {
    pub navigations: Rc<RefCell<Vec<String>>>,
    pub notices: Rc<RefCell<Vec<(NoticeKind, String, String)>>>,
}

impl RecordingEffects {
    pub fn last_navigation(&self) -> Option<String> {
        self.navigations.borrow().last().cloned()
    }

    pub fn notice_kinds(&self) -> Vec<NoticeKind> {
        self.notices.borrow().iter().map(|(kind, _, _)| *kind).collect()
    }
}

impl SessionEffects for RecordingEffects {
    fn navigate(&self, path: &str) {
        self.navigations.borrow_mut().push(path.to_owned());
    }

    fn notify(&self, kind: NoticeKind, title: &str, description: &str) {
        self.notices.borrow_mut().push((kind, title.to_owned(), description.to_owned()));
    }
}

/// Transport that replays queued responses and records every request.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTransport {
    responses: Rc<RefCell<VecDeque<Result<ApiResponse, TransportError>>>>,
    pub requests: Rc<RefCell<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub fn reply(&self, status: u16, body: serde_json::Value) -> &Self {
        self.responses.borrow_mut().push_back(Ok(ApiResponse {
            status,
            content_type: Some("application/json".to_owned()),
            body: serde_json::to_vec(&body).unwrap_or_default(),
        }));
        self
    }

    pub fn reply_raw(&self, response: ApiResponse) -> &Self {
        self.responses.borrow_mut().push_back(Ok(response));
        self
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.responses.borrow_mut().push_back(Err(TransportError(message.to_owned())));
        self
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests.borrow().last().cloned().expect("no request was sent")
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_owned())))
    }
}

/// Authority with a fixed token that counts invalidations.
#[derive(Clone, Debug, Default)]
pub struct FixedAuthority {
    pub token: Option<String>,
    pub invalidations: Rc<RefCell<u32>>,
}

impl SessionAuthority for FixedAuthority {
    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn session_invalidated(&self) {
        *self.invalidations.borrow_mut() += 1;
    }
}

pub fn test_session(storage: MemoryStorage) -> (TestSession, RecordingEffects) {
    let effects = RecordingEffects::default();
    let session = SessionStore::new(SharedCell::default(), storage, effects.clone());
    (session, effects)
}

pub fn test_client(session: &TestSession) -> (TestClient, ScriptedTransport) {
    let transport = ScriptedTransport::default();
    let client = ApiClient::new("http://api.test/api", transport.clone(), session.clone());
    (client, transport)
}

pub fn identity(role: Role) -> Identity {
    Identity { id: 1, display_name: "Ana".to_owned(), email: "a@x.com".to_owned(), role }
}

pub fn stored_identity(role: Role) -> String {
    serde_json::to_string(&identity(role)).unwrap_or_default()
}
