//! # Config store contract and the in-memory reference backend.
//!
//! [`ConfigStore`] is the seam between the typed config layer and whatever
//! key/value persistence the host provides (an embedded origin-scoped database
//! in the browser deployment). The contract is deliberately small: open, get, put,
//! close, all fallible.
//!
//! [`MemoryStore`] is the process-local implementation used by tests and by
//! embedders that do not need persistence across reloads.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::ConfigError;

/// Contract for config key/value persistence.
///
/// Values are opaque JSON; the typed layer in [`crate::config`] owns encoding
/// and decoding. Implementations must tolerate `open`/`close` being called
/// around every batch of operations; callers open and close per read/write cycle.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Prepares the store for a batch of reads/writes.
    async fn open(&self) -> Result<(), ConfigError>;

    /// Reads one key; `None` when never written.
    async fn get(&self, key: &str) -> Result<Option<Value>, ConfigError>;

    /// Writes one key, replacing any previous value.
    async fn put(&self, key: &str, value: Value) -> Result<(), ConfigError>;

    /// Releases the store after a batch of reads/writes.
    async fn close(&self) -> Result<(), ConfigError>;
}

/// In-memory config store.
///
/// `open`/`close` are no-ops; data lives for the life of the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn open(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), ConfigError> {
        self.inner.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn close(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}
