//! Bridges an external auth client into a host application's service
//! registry and router.
//!
//! This crate provides:
//! - Compatibility validation of the injected client before any use
//! - User-agent environment tagging for this integration
//! - A multicast bridge over the client's auth state with last-value replay
//! - A navigation guard gating route activation on fresh auth state
//! - A fail-fast bootstrap composing the above into a service registry
//!
//! The wrapped client's token acquisition, storage, and refresh machinery
//! stay external; this crate only validates, observes, and gates.

mod bootstrap;
mod bridge;
mod compat;
mod error;
mod guard;
mod user_agent;

#[cfg(test)]
mod tests;

pub use bootstrap::{bootstrap, AuthServices, HostRouter, ModuleConfig, DEFAULT_LOGIN_PATH};
pub use bridge::{AuthStateBridge, StateSubscription, SubscriberFn};
pub use compat::{check_client_compatibility, CompatibilityRecord, MIN_SUPPORTED_CLIENT_VERSION};
pub use error::{BridgeError, BridgeResult, SubscriberError};
pub use guard::attempt_machine;
pub use guard::{
    AttemptInput, AttemptMachine, AttemptState, DenyReason, GuardDecision, NavigationGuard,
    OnAuthRequired,
};
pub use user_agent::{tag_environment, INTEGRATION_NAME, INTEGRATION_VERSION};
