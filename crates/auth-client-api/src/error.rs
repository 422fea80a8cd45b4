//! Error types reported by auth client implementations.

use thiserror::Error;

/// Failure reported by the wrapped auth client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The freshness recheck could not complete (e.g. network failure).
    #[error("state refresh failed: {0}")]
    Refresh(String),

    /// Background session management could not start.
    #[error("client start failed: {0}")]
    Start(String),

    /// Any other client-internal failure.
    #[error("client error: {0}")]
    Internal(String),
}

/// Result type alias using ClientError.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_error_display_carries_cause() {
        let err = ClientError::Refresh("connection reset".to_string());
        assert_eq!(err.to_string(), "state refresh failed: connection reset");
    }
}
