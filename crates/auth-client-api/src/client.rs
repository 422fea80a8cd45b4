//! Capability surface consumed from the wrapped auth client.

use crate::{AuthState, ClientResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Callback invoked by the client on every auth state change.
pub type StateCallback = Arc<dyn Fn(&AuthState) + Send + Sync>;

/// Handler installed into the client's options bag to restore the
/// originally requested URI after a login redirect completes.
pub type RestoreOriginalUri = Arc<dyn Fn(&str) + Send + Sync>;

/// User-agent tracking capability reported by the wrapped client.
///
/// Clients predating this capability cannot report a library version and
/// are treated as categorically incompatible.
pub trait UserAgentCapability: Send + Sync {
    /// The client library's reported semantic version.
    fn version(&self) -> String;

    /// Append an environment tag to the client's outgoing user-agent string.
    fn add_environment(&self, tag: &str);
}

/// Handle for an active client state subscription.
///
/// Unsubscribes at most once: either explicitly via [`unsubscribe`] or on
/// drop, whichever comes first.
///
/// [`unsubscribe`]: ClientSubscription::unsubscribe
pub struct ClientSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ClientSubscription {
    /// Wrap an unsubscribe closure provided by the client.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Detach the callback from the client. Subsequent calls are no-ops.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ClientSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// The capability surface this integration consumes from the wrapped
/// auth client. Token acquisition, storage, and refresh stay inside the
/// client; the bridge only observes and forwards.
///
/// Implementations must invoke subscribed callbacks synchronously on every
/// state change, including the change produced by [`update_auth_state`]
/// before that future resolves.
///
/// [`update_auth_state`]: AuthClient::update_auth_state
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// The user-agent capability, if this client version ships one.
    fn user_agent(&self) -> Option<&dyn UserAgentCapability>;

    /// Last known authentication state.
    fn auth_state(&self) -> AuthState;

    /// Register a state-change callback with the client.
    fn subscribe(&self, callback: StateCallback) -> ClientSubscription;

    /// Force a freshness recheck (e.g. token expiry) and return the
    /// resulting state.
    async fn update_auth_state(&self) -> ClientResult<AuthState>;

    /// Start the client's background session management.
    async fn start(&self) -> ClientResult<()>;

    /// Whether a restore-original-URI handler is configured on the
    /// client's options bag.
    fn has_restore_original_uri(&self) -> bool;

    /// Install a restore-original-URI handler on the options bag.
    fn set_restore_original_uri(&self, handler: RestoreOriginalUri);
}
