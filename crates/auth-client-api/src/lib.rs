//! Contract for the external auth client consumed by the bridge.
//!
//! This crate defines:
//! - The `AuthState` snapshot relayed from the client
//! - The `AuthClient` capability surface the bridge depends on
//! - The `UserAgentCapability` used for compatibility checks and tagging
//! - Subscription and error types shared with client implementations

mod client;
mod error;
mod state;

pub use client::{
    AuthClient, ClientSubscription, RestoreOriginalUri, StateCallback, UserAgentCapability,
};
pub use error::{ClientError, ClientResult};
pub use state::AuthState;
