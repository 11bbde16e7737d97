// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory key-value store.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};
use crate::ports::{ConfigParser, KeyValueStore};
use std::collections::HashMap;
use std::sync::RwLock;

const STORE_NAME: &str = "memory";

/// A thread-safe, process-local store backed by a `HashMap`.
///
/// Useful as a default backend, for tests, and for seeding values parsed from a
/// file without touching the file again.
///
/// # Examples
///
/// ```rust
/// use coffee_config::adapters::InMemoryStore;
/// use coffee_config::ports::KeyValueStore;
///
/// let store = InMemoryStore::from_pairs([("app.name", "coffee")]);
/// assert_eq!(store.get_str("app.name").unwrap().unwrap().as_str(), "coffee");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given values.
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    /// Creates a store from an iterator of key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_values(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Creates a store from file content using the given parser.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "yaml")]
    /// # {
    /// use coffee_config::adapters::{InMemoryStore, YamlParser};
    /// use coffee_config::ports::KeyValueStore;
    ///
    /// let store = InMemoryStore::from_parser_content(
    ///     &YamlParser::new(),
    ///     "db:\n  url: \"{db.primary}\"\n  primary: postgres://db-1\n",
    /// ).unwrap();
    /// assert_eq!(store.get_str("db.url").unwrap().unwrap().as_str(), "{db.primary}");
    /// # }
    /// ```
    pub fn from_parser_content<P: ConfigParser>(parser: &P, content: &str) -> Result<Self> {
        Ok(Self::with_values(parser.parse(content)?))
    }

    /// Returns the number of stored keys. A poisoned lock still reports the map it
    /// guards.
    pub fn len(&self) -> usize {
        self.values
            .read()
            .map(|v| v.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes `key`, returning its previous raw value.
    pub fn remove(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        Ok(values.remove(key.as_str()).map(ConfigValue::from))
    }
}

fn poisoned() -> ConfigError {
    ConfigError::StoreError {
        store_name: STORE_NAME.to_string(),
        message: "store lock poisoned".to_string(),
        source: None,
    }
}

impl KeyValueStore for InMemoryStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        let values = self.values.read().map_err(|_| poisoned())?;
        Ok(values.get(key.as_str()).map(|v| ConfigValue::from(v.as_str())))
    }

    fn put(&self, key: &ConfigKey, value: ConfigValue) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.insert(key.as_str().to_string(), value.into());
        Ok(())
    }
}
