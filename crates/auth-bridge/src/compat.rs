//! Compatibility validation for the injected auth client.
//!
//! Runs before anything else at bootstrap: an incompatible client must
//! never be started or observed, so downstream construction can assume a
//! validated handle.

use crate::error::{BridgeError, BridgeResult};
use auth_client_api::AuthClient;
use semver::Version;

/// Minimum client library version this integration supports.
pub const MIN_SUPPORTED_CLIENT_VERSION: &str = "5.3.1";

fn min_supported_version() -> Version {
    Version::new(5, 3, 1)
}

pub(crate) fn incompatible_client() -> BridgeError {
    BridgeError::IncompatibleClient {
        minimum: MIN_SUPPORTED_CLIENT_VERSION.to_string(),
    }
}

/// Outcome of a compatibility check. Computed once at bootstrap,
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityRecord {
    /// The minimum version this integration requires.
    pub required_min: Version,
    /// The version the client reported, when it could be read and parsed.
    pub actual: Option<Version>,
}

impl CompatibilityRecord {
    /// True when the client reported a parseable version meeting the
    /// minimum. Semantic precedence: major first, then minor, then patch.
    pub fn is_compatible(&self) -> bool {
        self.actual
            .as_ref()
            .is_some_and(|actual| *actual >= self.required_min)
    }
}

/// Validate the injected client's capability surface and reported version.
///
/// A client without the user-agent capability predates versioning and is
/// categorically incompatible regardless of anything else it exposes. A
/// capability that reports an unparsable version is treated the same way.
/// Pure validation: no side effects on the client.
pub fn check_client_compatibility(client: &dyn AuthClient) -> BridgeResult<CompatibilityRecord> {
    let actual = client
        .user_agent()
        .and_then(|user_agent| Version::parse(user_agent.version().trim()).ok());

    let record = CompatibilityRecord {
        required_min: min_supported_version(),
        actual,
    };
    if !record.is_compatible() {
        return Err(incompatible_client());
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::harness::MockAuthClient;

    #[test]
    fn minimum_version_constant_matches_comparison_value() {
        assert_eq!(
            Version::parse(MIN_SUPPORTED_CLIENT_VERSION).unwrap(),
            min_supported_version()
        );
    }

    #[test]
    fn accepts_versions_at_or_above_minimum() {
        for version in ["5.3.1", "5.3.2", "5.4.0", "6.0.0", "99.9.9", "999.9.9"] {
            let client = MockAuthClient::new(version);
            let record = check_client_compatibility(&client)
                .unwrap_or_else(|_| panic!("{version} should be compatible"));
            assert!(record.is_compatible());
            assert_eq!(record.actual, Some(Version::parse(version).unwrap()));
        }
    }

    #[test]
    fn rejects_versions_below_minimum() {
        for version in ["0.9.9", "4.9.9", "5.2.9", "5.3.0"] {
            let client = MockAuthClient::new(version);
            let err = check_client_compatibility(&client)
                .expect_err(&format!("{version} should be incompatible"));
            assert!(err.to_string().contains(MIN_SUPPORTED_CLIENT_VERSION));
        }
    }

    #[test]
    fn rejects_unparsable_version() {
        let client = MockAuthClient::new("not-a-version");
        assert!(check_client_compatibility(&client).is_err());
    }

    #[test]
    fn rejects_missing_user_agent_capability() {
        // Even a client that would otherwise be fine is incompatible
        // without the capability.
        let client = MockAuthClient::without_user_agent();
        let err = check_client_compatibility(&client).unwrap_err();
        assert!(err.to_string().contains(MIN_SUPPORTED_CLIENT_VERSION));
    }

    #[test]
    fn tolerates_whitespace_around_reported_version() {
        let client = MockAuthClient::new(" 7.1.0 ");
        assert!(check_client_compatibility(&client).is_ok());
    }
}
