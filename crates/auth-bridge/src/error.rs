//! Bridge error types.

use auth_client_api::ClientError;
use thiserror::Error;

/// Bridge error type.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The injected client failed the compatibility check, either because
    /// its user-agent capability is missing or its version is below the
    /// supported minimum.
    #[error(
        "passed in auth client is not compatible with this integration, \
         minimum supported client version is {minimum}"
    )]
    IncompatibleClient {
        /// Human-readable minimum supported version.
        minimum: String,
    },

    /// The client's freshness recheck failed.
    #[error("auth state refresh failed: {0}")]
    StateRefresh(#[source] ClientError),

    /// The client failed to start its background session management.
    #[error("auth client failed to start: {0}")]
    ClientStart(#[source] ClientError),
}

/// Result type alias using BridgeError.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failure raised inside a bridge subscriber callback.
///
/// Contained per subscriber: logged by the bridge, never aborts delivery
/// to other subscribers or the upstream client subscription.
#[derive(Error, Debug)]
#[error("subscriber failed: {0}")]
pub struct SubscriberError(pub String);
