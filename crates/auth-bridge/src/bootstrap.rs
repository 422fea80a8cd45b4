//! Fail-fast composition of the integration.
//!
//! Bootstrap order: compatibility check, user-agent tagging, default
//! restore handler, bridge construction, client start. Each step depends
//! on the prior succeeding; a failure at any point leaves no partially
//! initialized services behind.

use crate::bridge::AuthStateBridge;
use crate::compat::{check_client_compatibility, CompatibilityRecord};
use crate::error::{BridgeError, BridgeResult};
use crate::guard::{NavigationGuard, OnAuthRequired};
use crate::user_agent::{tag_environment, INTEGRATION_NAME, INTEGRATION_VERSION};
use auth_client_api::{AuthClient, RestoreOriginalUri};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Seam to the host application's router, used by the default redirect
/// and restore behaviors.
pub trait HostRouter: Send + Sync {
    /// Navigate the host application to `path`.
    fn navigate(&self, path: &str);
}

/// Login entry point used by the default denied-navigation redirect.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// One-time integration configuration. Defaults are filled at bootstrap
/// for the optional fields.
pub struct ModuleConfig {
    /// The wrapped auth client.
    pub client: Arc<dyn AuthClient>,
    /// The host application's router.
    pub router: Arc<dyn HostRouter>,
    /// Override for restoring the originally requested URI after login.
    /// Default: navigate the host router back to the recorded path.
    pub restore_original_uri: Option<RestoreOriginalUri>,
    /// Override for the denied-navigation redirect.
    /// Default: navigate the host router to `login_path`.
    pub on_auth_required: Option<OnAuthRequired>,
    /// Login entry point for the default redirect.
    pub login_path: String,
}

impl ModuleConfig {
    /// Configuration with default redirect behaviors.
    pub fn new(client: Arc<dyn AuthClient>, router: Arc<dyn HostRouter>) -> Self {
        Self {
            client,
            router,
            restore_original_uri: None,
            on_auth_required: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

/// Services produced by a successful [`bootstrap`].
///
/// An explicit constructor-composition registry: every resolvable service
/// is a typed field, built in fail-fast order. Guards are built fresh per
/// route activation via [`guard`].
///
/// [`guard`]: AuthServices::guard
pub struct AuthServices {
    client: Arc<dyn AuthClient>,
    router: Arc<dyn HostRouter>,
    state: Arc<AuthStateBridge>,
    compatibility: CompatibilityRecord,
    on_auth_required: OnAuthRequired,
    /// Path recorded by the most recent denied navigation, restored by
    /// the restore-original-URI handler after login.
    original_uri: Arc<Mutex<Option<String>>>,
}

// Most fields are trait objects or closures, so derive is unavailable.
impl fmt::Debug for AuthServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthServices")
            .field("compatibility", &self.compatibility)
            .field("original_uri", &self.original_uri)
            .finish_non_exhaustive()
    }
}

impl AuthServices {
    /// The wrapped client handle.
    pub fn client(&self) -> &Arc<dyn AuthClient> {
        &self.client
    }

    /// The host router the integration was configured with.
    pub fn router(&self) -> &Arc<dyn HostRouter> {
        &self.router
    }

    /// The shared auth state bridge.
    pub fn state(&self) -> &Arc<AuthStateBridge> {
        &self.state
    }

    /// The compatibility record computed at bootstrap.
    pub fn compatibility(&self) -> &CompatibilityRecord {
        &self.compatibility
    }

    /// Build a guard for one route activation.
    pub fn guard(&self) -> NavigationGuard {
        NavigationGuard::new(
            Arc::clone(&self.state),
            Arc::clone(&self.on_auth_required),
            Arc::clone(&self.original_uri),
        )
    }

    /// Path recorded by the most recent denied navigation, if any.
    pub fn original_uri(&self) -> Option<String> {
        self.original_uri.lock().unwrap().clone()
    }
}

/// Compose and start the integration.
///
/// This is the single `start` site: run once per client handle per
/// application instance. An incompatible client aborts before anything is
/// constructed or started; a start failure tears the bridge back down
/// before returning.
pub async fn bootstrap(config: ModuleConfig) -> BridgeResult<AuthServices> {
    let ModuleConfig {
        client,
        router,
        restore_original_uri,
        on_auth_required,
        login_path,
    } = config;

    let compatibility = check_client_compatibility(client.as_ref())?;
    debug!(?compatibility, "auth client passed compatibility check");

    tag_environment(client.as_ref(), INTEGRATION_NAME, INTEGRATION_VERSION)?;

    match restore_original_uri {
        Some(handler) => client.set_restore_original_uri(handler),
        None if !client.has_restore_original_uri() => {
            let router = Arc::clone(&router);
            client.set_restore_original_uri(Arc::new(move |uri: &str| router.navigate(uri)));
        }
        None => {}
    }

    let state = Arc::new(AuthStateBridge::new(Arc::clone(&client)));

    client.start().await.map_err(BridgeError::ClientStart)?;
    info!(
        name = INTEGRATION_NAME,
        version = INTEGRATION_VERSION,
        "auth integration started"
    );

    let on_auth_required = on_auth_required.unwrap_or_else(|| {
        let router = Arc::clone(&router);
        Arc::new(move |_requested: &str| router.navigate(&login_path))
    });

    Ok(AuthServices {
        client,
        router,
        state,
        compatibility,
        on_auth_required,
        original_uri: Arc::new(Mutex::new(None)),
    })
}
