//! Route-activation guard over the auth state bridge.
//!
//! Every navigation attempt runs an explicit per-attempt state machine:
//!
//! ```text
//! ┌───────┐ AlreadyAuthenticated ┌─────────┐
//! │ Start │ ───────────────────► │ Decided │
//! └───┬───┘                      └─────────┘
//!     │ NeedsFreshness                ▲
//!     ▼                               │ Confirmed / Rejected / RefreshFailed
//! ┌───────────────────┐               │
//! │ CheckingFreshness │ ──────────────┘
//! └───────────────────┘
//! ```
//!
//! `CheckingFreshness` is the single suspension point: navigation is
//! blocked, not silently allowed, while the freshness recheck is pending.

use crate::bridge::AuthStateBridge;
use rust_fsm::*;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

// One machine instance per `can_activate` call; attempts never share
// mutable guard state.
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub attempt_machine(Start)

    Start => {
        AlreadyAuthenticated => Decided,
        NeedsFreshness => CheckingFreshness
    },
    CheckingFreshness => {
        Confirmed => Decided,
        Rejected => Decided,
        RefreshFailed => Decided
    }
}

// Re-export the generated types with clearer names
pub use attempt_machine::Input as AttemptInput;
pub use attempt_machine::State as AttemptState;
pub use attempt_machine::StateMachine as AttemptMachine;

// Every input fed below must be legal for the machine's current state; a
// rejected transition is a bug in `can_activate`, not a runtime condition.
fn advance(machine: &mut AttemptMachine, input: AttemptInput) {
    let accepted = machine.consume(&input);
    debug_assert!(accepted.is_ok(), "attempt machine rejected {input:?}");
}

/// Why a navigation attempt was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The refreshed state is still unauthenticated.
    Unauthenticated,
    /// The freshness recheck itself failed.
    RefreshFailed(String),
}

/// Outcome of a navigation attempt. Produced fresh per attempt, never
/// cached across attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The route transition may proceed.
    Allow,
    /// The route transition is blocked; a redirect has been triggered.
    Deny {
        /// Why the attempt was denied.
        reason: DenyReason,
    },
}

impl GuardDecision {
    /// True when the attempt resolved to `Allow`.
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Callback invoked when a navigation is denied; receives the originally
/// requested path.
pub type OnAuthRequired = Arc<dyn Fn(&str) + Send + Sync>;

/// Gates route activation on fresh authentication state.
///
/// Constructed per route activation by the service registry; attempts
/// read the shared [`AuthStateBridge`] but hold no mutable state of their
/// own, so a refresh triggered by one attempt benefits concurrent attempts
/// that subsequently read `current()`.
pub struct NavigationGuard {
    state: Arc<AuthStateBridge>,
    on_auth_required: OnAuthRequired,
    /// Shared cell recording the most recent denied path for later
    /// restoration after login.
    original_uri: Arc<Mutex<Option<String>>>,
}

impl NavigationGuard {
    /// Build a guard over the shared bridge.
    pub fn new(
        state: Arc<AuthStateBridge>,
        on_auth_required: OnAuthRequired,
        original_uri: Arc<Mutex<Option<String>>>,
    ) -> Self {
        Self {
            state,
            on_auth_required,
            original_uri,
        }
    }

    /// Decide whether a route transition to `requested_path` may proceed.
    ///
    /// An authenticated, error-free current state allows immediately
    /// without a freshness recheck. Anything else blocks on a recheck; a
    /// recheck failure is surfaced as a denial, never swallowed into an
    /// allow. A denied attempt records the requested path and invokes the
    /// auth-required redirect exactly once.
    pub async fn can_activate(&self, requested_path: &str) -> GuardDecision {
        let mut machine = AttemptMachine::new();

        let current = self.state.current();
        let decision = if current.is_authenticated && !current.has_error() {
            advance(&mut machine, AttemptInput::AlreadyAuthenticated);
            debug!(path = requested_path, "navigation allowed from current state");
            GuardDecision::Allow
        } else {
            advance(&mut machine, AttemptInput::NeedsFreshness);
            debug!(path = requested_path, "navigation blocked pending freshness check");

            match self.state.refresh().await {
                Ok(fresh) if fresh.is_authenticated => {
                    advance(&mut machine, AttemptInput::Confirmed);
                    GuardDecision::Allow
                }
                Ok(_) => {
                    advance(&mut machine, AttemptInput::Rejected);
                    GuardDecision::Deny {
                        reason: DenyReason::Unauthenticated,
                    }
                }
                Err(err) => {
                    warn!(path = requested_path, error = %err, "freshness check failed, denying navigation");
                    advance(&mut machine, AttemptInput::RefreshFailed);
                    GuardDecision::Deny {
                        reason: DenyReason::RefreshFailed(err.to_string()),
                    }
                }
            }
        };

        // Every attempt must have run the machine to its terminal state.
        debug_assert_eq!(*machine.state(), AttemptState::Decided);

        if let GuardDecision::Deny { .. } = decision {
            self.handle_denied(requested_path);
        }
        decision
    }

    /// Record the requested path and run the auth-required redirect.
    fn handle_denied(&self, requested_path: &str) {
        *self.original_uri.lock().unwrap() = Some(requested_path.to_string());
        (self.on_auth_required)(requested_path);
    }
}
