// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration service trait definition.
//!
//! This module defines the `ConfigurationService` trait, the application-facing
//! interface for reading and writing configuration. Reads follow indirections.

use crate::domain::{ConfigKey, ConfigValue, Result};

/// The main configuration service trait.
///
/// Unlike the resolver, which reports a missing value as `Ok(None)`, `get` treats
/// a missing value as an error so callers can use `?` on required settings.
///
/// # Examples
///
/// ```rust
/// use coffee_config::domain::{ConfigError, ConfigKey, ConfigValue, ConfigurationService, Result};
///
/// struct Fixed;
///
/// impl ConfigurationService for Fixed {
///     fn get(&self, key: &ConfigKey) -> Result<ConfigValue> {
///         Err(ConfigError::ConfigKeyNotFound { key: key.to_string() })
///     }
///
///     fn put(&self, _key: &ConfigKey, _value: ConfigValue) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let value = Fixed.get_or_default(&ConfigKey::from("server.port"), "8080");
/// assert_eq!(value.as_str(), "8080");
/// assert!(!Fixed.has(&ConfigKey::from("server.port")));
/// ```
pub trait ConfigurationService {
    /// Retrieves the resolved value for `key`.
    ///
    /// # Errors
    ///
    /// * `ConfigError::ConfigKeyNotFound` if the chain ends without a value
    /// * `ConfigError::CircularReference` if the chain loops
    /// * `ConfigError::InvalidArgument` if `key` is blank
    /// * any store error
    fn get(&self, key: &ConfigKey) -> Result<ConfigValue>;

    /// Writes `value` under `key`. Indirection markers are stored verbatim.
    fn put(&self, key: &ConfigKey, value: ConfigValue) -> Result<()>;

    /// Retrieves the resolved value, or `default` if resolution fails for any reason.
    fn get_or_default(&self, key: &ConfigKey, default: &str) -> ConfigValue {
        self.get(key).unwrap_or_else(|_| ConfigValue::from(default))
    }

    /// Returns `true` if `key` resolves to a value.
    fn has(&self, key: &ConfigKey) -> bool {
        self.get(key).is_ok()
    }

    /// Retrieves the resolved value for a key given as a string slice.
    fn get_str(&self, key: &str) -> Result<ConfigValue> {
        self.get(&ConfigKey::from(key))
    }
}
