//! Multicast bridge over the wrapped client's auth state.
//!
//! Subscribes once to the client's state-change notifications and
//! republishes them to any number of local subscribers, replaying the last
//! known state to each new subscriber so there is never a silent gap
//! before the first emission.

use crate::error::{BridgeError, BridgeResult, SubscriberError};
use auth_client_api::{AuthClient, AuthState, ClientSubscription};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, warn};

/// Bridge subscriber callback.
///
/// An `Err` is contained and logged; it never stops delivery to later
/// subscribers or detaches the bridge from the client.
pub type SubscriberFn = Arc<dyn Fn(&AuthState) -> Result<(), SubscriberError> + Send + Sync>;

struct BridgeInner {
    /// Last state observed from the client. Seeded at construction.
    current: AuthState,
    /// Active subscribers in registration order.
    subscribers: Vec<(u64, SubscriberFn)>,
    next_id: u64,
}

impl BridgeInner {
    /// Store `state` as current and deliver it to a snapshot of the
    /// subscriber list.
    ///
    /// Delivery iterates the snapshot outside the lock: a subscriber
    /// registered during a delivery pass only receives subsequent
    /// notifications, and callbacks are free to re-enter the bridge.
    fn deliver(inner: &Mutex<Self>, state: &AuthState) {
        let snapshot: Vec<(u64, SubscriberFn)> = {
            let mut guard = inner.lock().unwrap();
            guard.current = state.clone();
            guard.subscribers.clone()
        };
        for (id, subscriber) in snapshot {
            if let Err(err) = subscriber(state) {
                warn!(subscriber = id, error = %err, "auth state subscriber failed, continuing delivery");
            }
        }
    }
}

/// Republishes the wrapped client's auth state changes.
///
/// Only this bridge writes the current-state cell; every other component
/// is a read-only consumer.
pub struct AuthStateBridge {
    client: Arc<dyn AuthClient>,
    inner: Arc<Mutex<BridgeInner>>,
    /// Upstream client subscription; taken exactly once on close.
    upstream: Mutex<Option<ClientSubscription>>,
}

impl AuthStateBridge {
    /// Wrap a compatibility-checked client and subscribe to its state
    /// changes. The last-value cell is seeded from the client's current
    /// state so late subscribers never observe a gap.
    pub fn new(client: Arc<dyn AuthClient>) -> Self {
        let inner = Arc::new(Mutex::new(BridgeInner {
            current: client.auth_state(),
            subscribers: Vec::new(),
            next_id: 0,
        }));

        let relay = Arc::clone(&inner);
        let upstream = client.subscribe(Arc::new(move |state: &AuthState| {
            BridgeInner::deliver(&relay, state);
        }));

        Self {
            client,
            inner,
            upstream: Mutex::new(Some(upstream)),
        }
    }

    /// Last known authentication state.
    pub fn current(&self) -> AuthState {
        self.inner.lock().unwrap().current.clone()
    }

    /// Register a subscriber.
    ///
    /// The subscriber immediately receives the most recent state, then
    /// every subsequent notification in registration order. Dropping the
    /// returned handle unsubscribes.
    pub fn observe(&self, subscriber: SubscriberFn) -> StateSubscription {
        let (id, replay) = {
            let mut inner = self.inner.lock().unwrap();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Arc::clone(&subscriber)));
            (id, inner.current.clone())
        };

        // Replay outside the lock so the subscriber may re-enter the bridge.
        if let Err(err) = subscriber(&replay) {
            warn!(subscriber = id, error = %err, "auth state subscriber failed during replay");
        }

        StateSubscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Force the client to recompute state freshness and return the result.
    ///
    /// The client emits the resulting notification synchronously before
    /// its future resolves; if an implementation does not, the bridge
    /// applies the returned state itself, so `current()` is fresh by the
    /// time this returns either way.
    pub async fn refresh(&self) -> BridgeResult<AuthState> {
        let state = self
            .client
            .update_auth_state()
            .await
            .map_err(BridgeError::StateRefresh)?;

        let already_observed = { self.inner.lock().unwrap().current == state };
        if !already_observed {
            BridgeInner::deliver(&self.inner, &state);
        }
        Ok(state)
    }

    /// Detach from the client's notifications. Subsequent calls are no-ops;
    /// local subscribers are kept but receive nothing further.
    pub fn close(&self) {
        if let Some(mut subscription) = self.upstream.lock().unwrap().take() {
            subscription.unsubscribe();
            debug!("auth state bridge detached from client");
        }
    }
}

impl Drop for AuthStateBridge {
    fn drop(&mut self) {
        self.close();
    }
}

/// Handle for an active bridge subscription; unsubscribes on drop.
pub struct StateSubscription {
    inner: Weak<Mutex<BridgeInner>>,
    id: u64,
}

impl StateSubscription {
    /// Remove this subscriber from the bridge. Subsequent calls are no-ops.
    pub fn unsubscribe(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut guard = inner.lock().unwrap();
            guard.subscribers.retain(|(id, _)| *id != self.id);
        }
        self.inner = Weak::new();
    }
}

impl Drop for StateSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
