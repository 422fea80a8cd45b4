//! User-agent environment tagging.
//!
//! Appends this integration's identity to the wrapped client's outgoing
//! user-agent string so upstream services can attribute traffic.

use crate::compat::incompatible_client;
use crate::error::BridgeResult;
use auth_client_api::AuthClient;

/// This integration's name, as reported in the client's user-agent string.
pub const INTEGRATION_NAME: &str = env!("CARGO_PKG_NAME");

/// This integration's version.
pub const INTEGRATION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Append a single `<name>/<version>` token to the client's user-agent.
///
/// Runs only after a successful compatibility check, so the capability is
/// guaranteed present; a missing capability here is still reported as an
/// error rather than a panic. Invoking this once per client handle is the
/// caller's responsibility (bootstrap guarantees it).
pub fn tag_environment(client: &dyn AuthClient, name: &str, version: &str) -> BridgeResult<()> {
    let user_agent = client.user_agent().ok_or_else(incompatible_client)?;
    user_agent.add_environment(&format!("{name}/{version}"));
    Ok(())
}
