// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis key-value store adapter.
//!
//! Like the etcd adapter, every `get` and `put` is a live round trip with no caching.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};
use crate::ports::KeyValueStore;
pub use crate::settings::RedisStorageMode;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::fmt;
use tokio::runtime::Runtime;

const STORE_NAME: &str = "redis";

/// Key-value store backed by Redis.
///
/// In `StringKeys` mode the namespace is prepended to each key; in `Hash` mode it
/// names the hash and keys are its fields. The store owns a tokio runtime and blocks
/// on the async client, so it must not be used from inside another tokio runtime.
///
/// # Examples
///
/// ```rust,no_run
/// use coffee_config::adapters::{RedisStore, RedisStorageMode};
///
/// # fn main() -> coffee_config::domain::Result<()> {
/// let store = RedisStore::connect("redis://localhost:6379", "myapp:", RedisStorageMode::StringKeys)?;
/// let store = RedisStore::connect("redis://localhost:6379", "myapp:config", RedisStorageMode::Hash)?;
/// # Ok(())
/// # }
/// ```
pub struct RedisStore {
    /// Shared multiplexed connection; cloned per request
    connection: MultiplexedConnection,
    /// Key prefix or hash key name
    namespace: String,
    /// Storage mode (string keys or hash)
    storage_mode: RedisStorageMode,
    /// Runtime driving the async client
    runtime: Runtime,
}

impl RedisStore {
    /// Rejects namespaces containing Redis glob characters.
    fn validate_namespace(namespace: &str) -> Result<()> {
        if namespace.contains(['*', '?', '[', ']', '\\']) {
            return Err(ConfigError::InvalidArgument {
                message: "Redis namespace contains invalid characters (* ? [ ] \\)".to_string(),
            });
        }
        Ok(())
    }

    /// Connects to Redis at `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., `"redis://localhost:6379"`)
    /// * `namespace` - Key prefix (for `StringKeys`) or hash key name (for `Hash`)
    /// * `storage_mode` - Whether to use string keys or hash storage
    pub fn connect(url: &str, namespace: &str, storage_mode: RedisStorageMode) -> Result<Self> {
        Self::validate_namespace(namespace)?;

        let client = Client::open(url).map_err(|e| {
            ConfigError::store(STORE_NAME, format!("Failed to create Redis client: {}", e), e)
        })?;

        let runtime = Runtime::new()
            .map_err(|e| ConfigError::store(STORE_NAME, "Failed to create tokio runtime", e))?;

        let connection = runtime
            .block_on(client.get_multiplexed_async_connection())
            .map_err(|e| {
                ConfigError::store(STORE_NAME, format!("Failed to connect to Redis: {}", e), e)
            })?;

        tracing::debug!(namespace, mode = ?storage_mode, "connected to redis");

        Ok(Self {
            connection,
            namespace: namespace.to_string(),
            storage_mode,
            runtime,
        })
    }

    /// Returns the storage mode.
    pub fn storage_mode(&self) -> RedisStorageMode {
        self.storage_mode
    }

    /// Returns the namespace (prefix or hash name).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Deletes `key`, returning `true` if it existed.
    pub fn delete(&self, key: &ConfigKey) -> Result<bool> {
        let mut conn = self.connection.clone();
        let removed: i64 = match self.storage_mode {
            RedisStorageMode::StringKeys => {
                let redis_key = self.string_key(key);
                self.runtime
                    .block_on(async move { conn.del::<_, i64>(redis_key).await })
            }
            RedisStorageMode::Hash => {
                let hash = self.namespace.clone();
                let field = key.as_str().to_string();
                self.runtime
                    .block_on(async move { conn.hdel::<_, _, i64>(hash, field).await })
            }
        }
        .map_err(|e| {
            ConfigError::store(STORE_NAME, format!("Failed to delete key '{}': {}", key, e), e)
        })?;
        Ok(removed > 0)
    }

    fn string_key(&self, key: &ConfigKey) -> String {
        format!("{}{}", self.namespace, key)
    }
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("namespace", &self.namespace)
            .field("storage_mode", &self.storage_mode)
            .finish_non_exhaustive()
    }
}

impl KeyValueStore for RedisStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = match self.storage_mode {
            RedisStorageMode::StringKeys => {
                let redis_key = self.string_key(key);
                self.runtime
                    .block_on(async move { conn.get::<_, Option<String>>(redis_key).await })
            }
            RedisStorageMode::Hash => {
                let hash = self.namespace.clone();
                let field = key.as_str().to_string();
                self.runtime
                    .block_on(async move { conn.hget::<_, _, Option<String>>(hash, field).await })
            }
        }
        .map_err(|e| {
            ConfigError::store(STORE_NAME, format!("Failed to get key '{}': {}", key, e), e)
        })?;

        Ok(value.map(ConfigValue::from))
    }

    fn put(&self, key: &ConfigKey, value: ConfigValue) -> Result<()> {
        let mut conn = self.connection.clone();
        let value = String::from(value);
        let result: redis::RedisResult<()> = match self.storage_mode {
            RedisStorageMode::StringKeys => {
                let redis_key = self.string_key(key);
                self.runtime
                    .block_on(async move { conn.set::<_, _, ()>(redis_key, value).await })
            }
            RedisStorageMode::Hash => {
                let hash = self.namespace.clone();
                let field = key.as_str().to_string();
                self.runtime
                    .block_on(async move { conn.hset::<_, _, _, ()>(hash, field, value).await })
            }
        };
        result.map_err(|e| {
            ConfigError::store(STORE_NAME, format!("Failed to put key '{}': {}", key, e), e)
        })
    }
}
