// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type with indirection detection and typed conversions.
//!
//! A stored value wrapped in a single pair of curly braces, such as `{database.host}`,
//! is an *indirection*: it names another key whose value should be used instead.

use crate::domain::config_key::ConfigKey;
use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const INDIRECTION_OPEN: char = '{';
const INDIRECTION_CLOSE: char = '}';

/// A type-safe wrapper for configuration values.
///
/// Values are stored as strings. Typed accessors take the key the value came from so
/// conversion errors can name it.
///
/// # Examples
///
/// ```
/// use coffee_config::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::from("42");
/// assert_eq!(value.as_i64("server.port").unwrap(), 42);
/// assert!(value.indirection().is_none());
///
/// let pointer = ConfigValue::from("{server.port}");
/// assert_eq!(pointer.indirection().unwrap().as_str(), "server.port");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue(String);

impl ConfigValue {
    /// Creates a new `ConfigValue` from a `String`.
    pub fn new(value: String) -> Self {
        ConfigValue(value)
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the value into a `String`.
    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    /// Returns the key this value points at, if it is an indirection marker.
    ///
    /// A marker is at least two characters long, starts with `{` and ends with `}`.
    /// Exactly one brace is stripped from each end and nothing is trimmed, so
    /// `"{{X}}"` points at the key `"{X}"` and `"{}"` points at the empty key.
    ///
    /// # Examples
    ///
    /// ```
    /// use coffee_config::domain::config_value::ConfigValue;
    ///
    /// assert_eq!(ConfigValue::from("{{X}}").indirection().unwrap().as_str(), "{X}");
    /// assert_eq!(ConfigValue::from("{ a }").indirection().unwrap().as_str(), " a ");
    /// assert!(ConfigValue::from("{").indirection().is_none());
    /// assert!(ConfigValue::from("}").indirection().is_none());
    /// assert!(ConfigValue::from("x{a}").indirection().is_none());
    /// ```
    pub fn indirection(&self) -> Option<ConfigKey> {
        let s = self.0.as_str();
        if s.len() < 2 || !s.starts_with(INDIRECTION_OPEN) || !s.ends_with(INDIRECTION_CLOSE) {
            return None;
        }
        Some(ConfigKey::from(&s[1..s.len() - 1]))
    }

    /// Returns `true` if this value is an indirection marker.
    pub fn is_indirection(&self) -> bool {
        self.indirection().is_some()
    }

    /// Converts the value to a boolean.
    ///
    /// Recognizes the following values (case-insensitive):
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off"
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self.0.to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => self
                .0
                .parse::<bool>()
                .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
        }
    }

    /// Converts the value to an `i64`.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        self.0
            .parse::<i64>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to a `u64`.
    pub fn as_u64(&self, key: &str) -> Result<u64> {
        self.0
            .parse::<u64>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to an `f64`.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        self.0
            .parse::<f64>()
            .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e))
    }

    /// Parses the value into any type that implements `FromStr`.
    ///
    /// # Examples
    ///
    /// ```
    /// use coffee_config::domain::config_value::ConfigValue;
    /// use std::net::IpAddr;
    ///
    /// let value = ConfigValue::from("127.0.0.1");
    /// let ip: IpAddr = value.parse("server.bind").unwrap();
    /// assert_eq!(ip.to_string(), "127.0.0.1");
    /// ```
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.0
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue(s.to_string())
    }
}

impl From<ConfigValue> for String {
    fn from(value: ConfigValue) -> Self {
        value.0
    }
}

impl AsRef<str> for ConfigValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
