//! # Typed gateway configuration over a key/value store.
//!
//! [`Config`] is the page/worker shared configuration: the gateway list, the
//! delegated-routing list, the auto-reload flag and the debug filter string.
//! [`get_config`] and [`set_config`] move it in and out of a [`ConfigStore`].
//!
//! ## Defaults
//! When nothing has been persisted (or a stored list is empty), exactly one
//! well-known gateway and one well-known router are returned:
//! [`DEFAULT_GATEWAY`] and [`DEFAULT_ROUTER`], with `auto_reload = false` and
//! an empty debug filter.
//!
//! ## Failure policy
//! Reads never fail the caller: storage or decode problems are logged and the
//! defaults are returned, so the worker always has a usable config. Writes
//! propagate their error — a page that could not persist settings must know.

mod store;

pub use store::{ConfigStore, MemoryStore};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ConfigError;

/// Gateway used when none has been configured.
pub const DEFAULT_GATEWAY: &str = "https://trustless-gateway.link";

/// Delegated router used when none has been configured.
pub const DEFAULT_ROUTER: &str = "https://delegated-ipfs.dev";

/// Well-known store keys for the config fields.
pub mod keys {
    /// Gateway URL list.
    pub const GATEWAYS: &str = "gateways";
    /// Delegated-routing URL list.
    pub const ROUTERS: &str = "routers";
    /// Whether the page reloads itself once the worker is ready.
    pub const AUTO_RELOAD: &str = "autoReload";
    /// Debug filter string.
    pub const DEBUG: &str = "debug";
}

/// Page/worker shared configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Trustless gateway URLs to fetch content from.
    pub gateways: Vec<String>,
    /// Delegated routing endpoints.
    pub routers: Vec<String>,
    /// Reload the page automatically once the worker takes over.
    pub auto_reload: bool,
    /// Debug filter string (empty = logging off).
    pub debug: String,
}

impl Default for Config {
    /// One default gateway, one default router, auto-reload off, debug off.
    fn default() -> Self {
        Self {
            gateways: vec![DEFAULT_GATEWAY.to_string()],
            routers: vec![DEFAULT_ROUTER.to_string()],
            auto_reload: false,
            debug: String::new(),
        }
    }
}

/// Loads the config from the store, falling back to defaults field by field.
///
/// Always returns a usable config: a missing key, an **empty** gateway/router
/// list, or any storage/decode error yields that field's default (errors are
/// logged via `tracing`, never propagated).
pub async fn get_config(store: &dyn ConfigStore) -> Config {
    let defaults = Config::default();

    if let Err(e) = store.open().await {
        warn!(error = %e, "config store failed to open; using defaults");
        return defaults;
    }

    let gateways = read_list(store, keys::GATEWAYS).await;
    let routers = read_list(store, keys::ROUTERS).await;
    let auto_reload = read_field::<bool>(store, keys::AUTO_RELOAD).await.unwrap_or(false);
    let debug = read_field::<String>(store, keys::DEBUG).await.unwrap_or_default();

    if let Err(e) = store.close().await {
        warn!(error = %e, "config store failed to close");
    }

    Config {
        gateways: gateways.unwrap_or(defaults.gateways),
        routers: routers.unwrap_or(defaults.routers),
        auto_reload,
        debug,
    }
}

/// Persists every config field to the store.
pub async fn set_config(store: &dyn ConfigStore, config: &Config) -> Result<(), ConfigError> {
    store.open().await?;
    store
        .put(keys::GATEWAYS, Value::from(config.gateways.clone()))
        .await?;
    store
        .put(keys::ROUTERS, Value::from(config.routers.clone()))
        .await?;
    store
        .put(keys::AUTO_RELOAD, Value::from(config.auto_reload))
        .await?;
    store
        .put(keys::DEBUG, Value::from(config.debug.clone()))
        .await?;
    store.close().await
}

/// Reads a URL list; `None` when missing, empty or undecodable.
async fn read_list(store: &dyn ConfigStore, key: &'static str) -> Option<Vec<String>> {
    let list = read_field::<Vec<String>>(store, key).await?;
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

/// Reads and decodes one field; `None` on absence or any error (logged).
async fn read_field<T: serde::de::DeserializeOwned>(
    store: &dyn ConfigStore,
    key: &'static str,
) -> Option<T> {
    match store.get(key).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(key, error = %e, "stored config value is undecodable; using default");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "config read failed; using default");
            None
        }
    }
}
