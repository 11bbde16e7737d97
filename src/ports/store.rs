// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store trait definition.
//!
//! This module defines the `KeyValueStore` trait, the port through which the resolver
//! reads and writes raw configuration entries. Any backend (memory, files, etcd, Redis)
//! is plugged in by implementing this trait.

use crate::domain::{ConfigKey, ConfigValue, Result};
use std::sync::Arc;

/// A string key-value backend.
///
/// Stores return raw values: an indirection marker such as `{other.key}` is handed
/// back exactly as it was stored. Interpreting markers is the resolver's job.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. The resolver shares one store between
/// concurrent callers and does no locking of its own, so a store that keeps mutable
/// state must synchronise it internally.
///
/// # Errors
///
/// Backend failures should be reported as `ConfigError::StoreError`. The resolver
/// propagates them to its caller unchanged.
///
/// # Examples
///
/// ```rust
/// use coffee_config::ports::KeyValueStore;
/// use coffee_config::domain::{ConfigKey, ConfigValue, Result};
///
/// struct Fixed;
///
/// impl KeyValueStore for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
///         Ok((key.as_str() == "app.name").then(|| ConfigValue::from("coffee")))
///     }
///
///     fn put(&self, _key: &ConfigKey, _value: ConfigValue) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// assert_eq!(Fixed.get_str("app.name").unwrap().unwrap().as_str(), "coffee");
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Returns a short name for this store, used in logs and error messages.
    fn name(&self) -> &str;

    /// Fetches the raw value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key does not exist.
    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &ConfigKey, value: ConfigValue) -> Result<()>;

    /// Fetches the raw value for a key given as a string slice.
    fn get_str(&self, key: &str) -> Result<Option<ConfigValue>> {
        self.get(&ConfigKey::from(key))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        (**self).get(key)
    }

    fn put(&self, key: &ConfigKey, value: ConfigValue) -> Result<()> {
        (**self).put(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        (**self).get(key)
    }

    fn put(&self, key: &ConfigKey, value: ConfigValue) -> Result<()> {
        (**self).put(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        (**self).get(key)
    }

    fn put(&self, key: &ConfigKey, value: ConfigValue) -> Result<()> {
        (**self).put(key, value)
    }
}
