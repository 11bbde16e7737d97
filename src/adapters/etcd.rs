// SPDX-License-Identifier: MIT OR Apache-2.0

//! etcd key-value store adapter.
//!
//! Every `get` and `put` is a round trip to the cluster. Nothing is cached, so a value
//! changed by another client is visible to the very next lookup.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};
use crate::ports::KeyValueStore;
use etcd_client::Client;
use std::fmt;
use tokio::runtime::Runtime;

const STORE_NAME: &str = "etcd";

/// Maps a configuration key to its etcd path.
///
/// Dots become slashes and the optional prefix is prepended, so with prefix `myapp/`
/// the key `database.host` lives at `myapp/database/host`.
fn etcd_path(prefix: Option<&str>, key: &ConfigKey) -> String {
    let path = key.as_str().replace('.', "/");
    match prefix {
        Some(prefix) => format!("{}{}", prefix, path),
        None => path,
    }
}

/// Key-value store backed by an etcd cluster.
///
/// The store owns a tokio runtime and blocks on the async `etcd-client` calls, so its
/// methods must not be called from inside another tokio runtime.
///
/// # Examples
///
/// ```rust,no_run
/// use coffee_config::adapters::EtcdStore;
/// use coffee_config::domain::{ConfigKey, ConfigKeyResolver};
///
/// # fn main() -> coffee_config::domain::Result<()> {
/// let store = EtcdStore::connect(&["localhost:2379"], Some("myapp/"))?;
/// let resolver = ConfigKeyResolver::new(store);
/// let host = resolver.resolve(&ConfigKey::from("database.host"))?;
/// # Ok(())
/// # }
/// ```
pub struct EtcdStore {
    /// etcd client; cloned per request
    client: Client,
    /// Key prefix for namespacing
    prefix: Option<String>,
    /// Runtime driving the async client
    runtime: Runtime,
}

impl EtcdStore {
    /// Connects to the given etcd endpoints.
    ///
    /// # Arguments
    ///
    /// * `endpoints` - etcd endpoints (e.g., `["localhost:2379"]`)
    /// * `prefix` - Optional path prefix for namespacing (e.g., `"myapp/"`)
    pub fn connect<S: AsRef<str>>(endpoints: &[S], prefix: Option<&str>) -> Result<Self> {
        let endpoints: Vec<String> = endpoints.iter().map(|s| s.as_ref().to_string()).collect();

        let runtime = Runtime::new()
            .map_err(|e| ConfigError::store(STORE_NAME, "Failed to create tokio runtime", e))?;

        let client = runtime
            .block_on(Client::connect(&endpoints, None))
            .map_err(|e| {
                ConfigError::store(STORE_NAME, format!("Failed to connect to etcd: {}", e), e)
            })?;

        tracing::debug!(endpoints = ?endpoints, prefix = ?prefix, "connected to etcd");

        Ok(Self {
            client,
            prefix: prefix.map(|s| s.to_string()),
            runtime,
        })
    }

    /// Returns the configured prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Deletes `key`, returning `true` if it existed.
    pub fn delete(&self, key: &ConfigKey) -> Result<bool> {
        let path = etcd_path(self.prefix(), key);
        let mut client = self.client.clone();
        let response = self
            .runtime
            .block_on(async move { client.delete(path, None).await })
            .map_err(|e| {
                ConfigError::store(STORE_NAME, format!("Failed to delete key '{}': {}", key, e), e)
            })?;
        Ok(response.deleted() > 0)
    }
}

impl fmt::Debug for EtcdStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EtcdStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl KeyValueStore for EtcdStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        let path = etcd_path(self.prefix(), key);
        let mut client = self.client.clone();
        let response = self
            .runtime
            .block_on(async move { client.get(path, None).await })
            .map_err(|e| {
                ConfigError::store(STORE_NAME, format!("Failed to get key '{}': {}", key, e), e)
            })?;

        response
            .kvs()
            .first()
            .map(|kv| {
                kv.value_str().map(ConfigValue::from).map_err(|e| {
                    ConfigError::store(
                        STORE_NAME,
                        format!("Value for key '{}' is not valid UTF-8", key),
                        e,
                    )
                })
            })
            .transpose()
    }

    fn put(&self, key: &ConfigKey, value: ConfigValue) -> Result<()> {
        let path = etcd_path(self.prefix(), key);
        let value = String::from(value);
        let mut client = self.client.clone();
        self.runtime
            .block_on(async move { client.put(path, value, None).await })
            .map_err(|e| {
                ConfigError::store(STORE_NAME, format!("Failed to put key '{}': {}", key, e), e)
            })?;
        Ok(())
    }
}
