//! Authentication state snapshot.

use serde::{Deserialize, Serialize};

/// Snapshot of the wrapped client's authentication state.
///
/// Produced by the external client on every state change. The bridge never
/// mutates a snapshot, it only relays and inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// True when the client holds a valid session.
    pub is_authenticated: bool,
    /// Raw ID token, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Raw access token, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Error reported by the client while deriving this state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthState {
    /// State for a session with no valid credentials.
    pub fn unauthenticated() -> Self {
        Self {
            is_authenticated: false,
            id_token: None,
            access_token: None,
            error: None,
        }
    }

    /// State for a valid session holding the given tokens.
    pub fn authenticated(id_token: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            id_token: Some(id_token.into()),
            access_token: Some(access_token.into()),
            error: None,
        }
    }

    /// Attach an error reported by the client.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// True when the client flagged this state with an error.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::unauthenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_has_no_tokens() {
        let state = AuthState::unauthenticated();
        assert!(!state.is_authenticated);
        assert!(state.id_token.is_none());
        assert!(state.access_token.is_none());
        assert!(!state.has_error());
    }

    #[test]
    fn authenticated_carries_tokens() {
        let state = AuthState::authenticated("id-tok", "access-tok");
        assert!(state.is_authenticated);
        assert_eq!(state.id_token.as_deref(), Some("id-tok"));
        assert_eq!(state.access_token.as_deref(), Some("access-tok"));
    }

    #[test]
    fn with_error_sets_flag() {
        let state = AuthState::authenticated("id", "access").with_error("token review failed");
        assert!(state.has_error());
        assert_eq!(state.error.as_deref(), Some("token review failed"));
    }

    #[test]
    fn serializes_without_absent_fields() {
        let json = serde_json::to_string(&AuthState::unauthenticated()).unwrap();
        assert_eq!(json, r#"{"is_authenticated":false}"#);
    }
}
