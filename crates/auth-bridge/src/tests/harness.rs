//! Test harness for the bridge core.
//!
//! Provides:
//! - MockAuthClient: a scripted client with call counters
//! - RecordingRouter: a host router that records navigations

use crate::HostRouter;
use async_trait::async_trait;
use auth_client_api::{
    AuthClient, AuthState, ClientError, ClientResult, ClientSubscription, RestoreOriginalUri,
    StateCallback, UserAgentCapability,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Scripted outcome for one `update_auth_state` call.
pub enum RefreshScript {
    /// Emit this state through the subscription, then resolve with it.
    Resolve(AuthState),
    /// Resolve with this state without emitting a notification first
    /// (a client that violates the synchronous-emission contract).
    ResolveSilently(AuthState),
    /// Reject with this message.
    Reject(String),
}

/// User-agent capability with a configurable version.
pub struct MockUserAgent {
    version: String,
    environments: Mutex<Vec<String>>,
}

impl UserAgentCapability for MockUserAgent {
    fn version(&self) -> String {
        self.version.clone()
    }

    fn add_environment(&self, tag: &str) {
        self.environments.lock().unwrap().push(tag.to_string());
    }
}

/// Scripted auth client.
///
/// State changes are emitted synchronously to subscribed callbacks, both
/// from `emit` and from a scripted `update_auth_state`, matching the
/// contract documented on `AuthClient`.
pub struct MockAuthClient {
    user_agent: Option<MockUserAgent>,
    state: Mutex<AuthState>,
    callbacks: Arc<Mutex<Vec<(u64, StateCallback)>>>,
    next_callback_id: AtomicU64,
    refresh_script: Mutex<VecDeque<RefreshScript>>,
    refresh_gate: Mutex<Option<Arc<Notify>>>,
    restore: Mutex<Option<RestoreOriginalUri>>,
    start_error: Mutex<Option<String>>,
    pub update_calls: AtomicUsize,
    pub start_calls: AtomicUsize,
}

impl MockAuthClient {
    /// Client reporting the given library version, initially unauthenticated.
    pub fn new(version: &str) -> Self {
        Self {
            user_agent: Some(MockUserAgent {
                version: version.to_string(),
                environments: Mutex::new(Vec::new()),
            }),
            state: Mutex::new(AuthState::unauthenticated()),
            callbacks: Arc::new(Mutex::new(Vec::new())),
            next_callback_id: AtomicU64::new(0),
            refresh_script: Mutex::new(VecDeque::new()),
            refresh_gate: Mutex::new(None),
            restore: Mutex::new(None),
            start_error: Mutex::new(None),
            update_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
        }
    }

    /// Pre-versioning client: no user-agent capability at all.
    pub fn without_user_agent() -> Self {
        let mut client = Self::new("unused");
        client.user_agent = None;
        client
    }

    /// Replace the current state without notifying subscribers.
    pub fn seed_state(&self, state: AuthState) {
        *self.state.lock().unwrap() = state;
    }

    /// Queue the outcome for the next `update_auth_state` call.
    pub fn push_refresh(&self, script: RefreshScript) {
        self.refresh_script.lock().unwrap().push_back(script);
    }

    /// Block every subsequent `update_auth_state` call until `gate` is
    /// notified, so a test can hold several rechecks in flight at once.
    pub fn gate_refreshes(&self, gate: Arc<Notify>) {
        *self.refresh_gate.lock().unwrap() = Some(gate);
    }

    /// Make `start` fail with the given message.
    pub fn fail_start(&self, message: &str) {
        *self.start_error.lock().unwrap() = Some(message.to_string());
    }

    /// Store state and notify subscribers synchronously, in order.
    pub fn emit(&self, state: AuthState) {
        *self.state.lock().unwrap() = state.clone();
        let callbacks: Vec<StateCallback> = self
            .callbacks
            .lock()
            .unwrap()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(&state);
        }
    }

    /// Environment tags recorded by the user-agent capability.
    pub fn environments(&self) -> Vec<String> {
        self.user_agent
            .as_ref()
            .map(|ua| ua.environments.lock().unwrap().clone())
            .unwrap_or_default()
    }

    /// Number of live state subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.callbacks.lock().unwrap().len()
    }

    /// Invoke the installed restore-original-URI handler, as the client
    /// would after a login redirect completes.
    pub fn invoke_restore(&self, uri: &str) {
        let handler = self.restore.lock().unwrap().clone();
        if let Some(handler) = handler {
            handler(uri);
        }
    }
}

#[async_trait]
impl AuthClient for MockAuthClient {
    fn user_agent(&self) -> Option<&dyn UserAgentCapability> {
        self.user_agent
            .as_ref()
            .map(|ua| ua as &dyn UserAgentCapability)
    }

    fn auth_state(&self) -> AuthState {
        self.state.lock().unwrap().clone()
    }

    fn subscribe(&self, callback: StateCallback) -> ClientSubscription {
        let id = self.next_callback_id.fetch_add(1, Ordering::SeqCst);
        self.callbacks.lock().unwrap().push((id, callback));
        let callbacks = Arc::clone(&self.callbacks);
        ClientSubscription::new(move || {
            callbacks
                .lock()
                .unwrap()
                .retain(|(callback_id, _)| *callback_id != id);
        })
    }

    async fn update_auth_state(&self) -> ClientResult<AuthState> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.refresh_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let script = self.refresh_script.lock().unwrap().pop_front();
        match script {
            Some(RefreshScript::Resolve(state)) => {
                self.emit(state.clone());
                Ok(state)
            }
            Some(RefreshScript::ResolveSilently(state)) => {
                *self.state.lock().unwrap() = state.clone();
                Ok(state)
            }
            Some(RefreshScript::Reject(message)) => Err(ClientError::Refresh(message)),
            // No script queued: the recheck confirms the current state.
            None => Ok(self.state.lock().unwrap().clone()),
        }
    }

    async fn start(&self) -> ClientResult<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        match self.start_error.lock().unwrap().clone() {
            Some(message) => Err(ClientError::Start(message)),
            None => Ok(()),
        }
    }

    fn has_restore_original_uri(&self) -> bool {
        self.restore.lock().unwrap().is_some()
    }

    fn set_restore_original_uri(&self, handler: RestoreOriginalUri) {
        *self.restore.lock().unwrap() = Some(handler);
    }
}

/// Host router that records every navigation.
pub struct RecordingRouter {
    navigations: Mutex<Vec<String>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self {
            navigations: Mutex::new(Vec::new()),
        }
    }

    /// Paths navigated to, in order.
    pub fn paths(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

impl HostRouter for RecordingRouter {
    fn navigate(&self, path: &str) {
        self.navigations.lock().unwrap().push(path.to_string());
    }
}
