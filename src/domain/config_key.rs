// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype for type-safe key handling.
//!
//! This module provides the `ConfigKey` type, which is a newtype wrapper around `String`
//! that keeps configuration keys apart from the values they resolve to.

use crate::domain::errors::{ConfigError, Result};
use std::fmt;

/// A type-safe wrapper for configuration keys.
///
/// Any string can be wrapped, but only non-blank keys are accepted by the resolver.
/// Use [`ConfigKey::ensure_not_blank`] to check a key up front.
///
/// # Examples
///
/// ```
/// use coffee_config::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::from("database.host");
/// assert_eq!(key.as_str(), "database.host");
/// assert!(!key.is_blank());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` if the key is empty or consists only of whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use coffee_config::domain::config_key::ConfigKey;
    ///
    /// assert!(ConfigKey::from("").is_blank());
    /// assert!(ConfigKey::from(" \t").is_blank());
    /// assert!(!ConfigKey::from(" a ").is_blank());
    /// ```
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Fails with `ConfigError::InvalidArgument` if the key is blank.
    pub fn ensure_not_blank(&self) -> Result<()> {
        if self.is_blank() {
            return Err(ConfigError::blank_key());
        }
        Ok(())
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
