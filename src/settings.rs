// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend selection settings.
//!
//! Settings decide which store the configuration service talks to. They are read from
//! a YAML file and then overridden by `COFFEE_*` environment variables:
//!
//! | Variable                 | Setting            |
//! |--------------------------|--------------------|
//! | `COFFEE_BACKEND`         | `backend`          |
//! | `COFFEE_YAML_PATH`       | `yaml_path`        |
//! | `COFFEE_ETCD_ENDPOINTS`  | `etcd.endpoints` (comma separated) |
//! | `COFFEE_ETCD_PREFIX`     | `etcd.prefix`      |
//! | `COFFEE_REDIS_URL`       | `redis.url`        |
//! | `COFFEE_REDIS_NAMESPACE` | `redis.namespace`  |
//! | `COFFEE_REDIS_MODE`      | `redis.mode`       |

use crate::domain::{ConfigError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Prefix shared by all environment overrides.
pub const ENV_PREFIX: &str = "COFFEE_";

/// File name looked up in the OS configuration directory.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.yaml";

/// Which key-value store backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map; nothing is persisted.
    #[default]
    Memory,
    /// A flat YAML file on disk.
    Yaml,
    /// An etcd cluster.
    Etcd,
    /// A Redis server.
    Redis,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "yaml" => Ok(StoreBackend::Yaml),
            "etcd" => Ok(StoreBackend::Etcd),
            "redis" => Ok(StoreBackend::Redis),
            other => Err(ConfigError::ParseError {
                message: format!("Unknown store backend: {}", other),
                source: None,
            }),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Yaml => "yaml",
            StoreBackend::Etcd => "etcd",
            StoreBackend::Redis => "redis",
        };
        f.write_str(name)
    }
}

/// Storage mode for Redis configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedisStorageMode {
    /// Store each configuration key as a separate Redis key with a prefix.
    /// Example: prefix:database.host, prefix:database.port
    #[default]
    StringKeys,
    /// Store all configuration as fields of a single Redis hash.
    /// Example: HGET config_hash database.host
    Hash,
}

impl FromStr for RedisStorageMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string_keys" | "string-keys" | "strings" => Ok(RedisStorageMode::StringKeys),
            "hash" => Ok(RedisStorageMode::Hash),
            other => Err(ConfigError::ParseError {
                message: format!("Unknown Redis storage mode: {}", other),
                source: None,
            }),
        }
    }
}

/// Connection settings for the etcd backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EtcdSettings {
    /// Cluster endpoints.
    pub endpoints: Vec<String>,
    /// Optional path prefix, e.g. `myapp/`.
    pub prefix: Option<String>,
}

impl Default for EtcdSettings {
    fn default() -> Self {
        Self {
            endpoints: vec!["localhost:2379".to_string()],
            prefix: None,
        }
    }
}

/// Connection settings for the Redis backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    /// Connection URL.
    pub url: String,
    /// Key prefix (string keys) or hash name (hash mode).
    pub namespace: String,
    /// How keys are laid out.
    pub mode: RedisStorageMode,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            namespace: String::new(),
            mode: RedisStorageMode::StringKeys,
        }
    }
}

/// Settings selecting and configuring the key-value store.
///
/// # Examples
///
/// ```rust
/// use coffee_config::settings::{StoreBackend, StoreSettings};
///
/// let settings = StoreSettings::default()
///     .with_env_overrides([("COFFEE_BACKEND".to_string(), "etcd".to_string())])
///     .unwrap();
/// assert_eq!(settings.backend, StoreBackend::Etcd);
/// assert_eq!(settings.etcd.endpoints, vec!["localhost:2379".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// The selected backend.
    pub backend: StoreBackend,
    /// Path of the YAML file for the `yaml` backend.
    pub yaml_path: Option<PathBuf>,
    /// etcd connection settings.
    pub etcd: EtcdSettings,
    /// Redis connection settings.
    pub redis: RedisSettings,
}

impl StoreSettings {
    /// Parses settings from YAML text. Missing fields take their defaults.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Invalid settings: {}", e),
            source: Some(Box::new(e)),
        })
    }

    /// Reads settings from a YAML file.
    #[cfg(feature = "yaml")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Reads `settings.yaml` from the OS configuration directory, or returns the
    /// defaults if it does not exist.
    #[cfg(feature = "yaml")]
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        let Some(dirs) = directories::ProjectDirs::from(qualifier, "", app_name) else {
            tracing::debug!("no project directories; using default settings");
            return Ok(Self::default());
        };
        let path = dirs.config_dir().join(DEFAULT_SETTINGS_FILE);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading settings");
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Applies `COFFEE_*` overrides from the process environment.
    pub fn with_process_env(self) -> Result<Self> {
        self.with_env_overrides(std::env::vars())
    }

    /// Applies `COFFEE_*` overrides from the given variables. Unrelated variables are
    /// ignored.
    pub fn with_env_overrides<I>(mut self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(setting) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match setting {
                "BACKEND" => self.backend = value.parse()?,
                "YAML_PATH" => self.yaml_path = Some(PathBuf::from(value)),
                "ETCD_ENDPOINTS" => {
                    self.etcd.endpoints = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "ETCD_PREFIX" => self.etcd.prefix = Some(value),
                "REDIS_URL" => self.redis.url = value,
                "REDIS_NAMESPACE" => self.redis.namespace = value,
                "REDIS_MODE" => self.redis.mode = value.parse()?,
                _ => tracing::trace!(variable = %name, "ignoring unknown override"),
            }
        }
        Ok(self)
    }

    /// Checks that the selected backend has what it needs to connect.
    pub fn validate(&self) -> Result<()> {
        match self.backend {
            StoreBackend::Yaml if self.yaml_path.is_none() => Err(ConfigError::InvalidArgument {
                message: "the yaml backend requires yaml_path".to_string(),
            }),
            StoreBackend::Etcd if self.etcd.endpoints.is_empty() => {
                Err(ConfigError::InvalidArgument {
                    message: "the etcd backend requires at least one endpoint".to_string(),
                })
            }
            StoreBackend::Redis if self.redis.url.trim().is_empty() => {
                Err(ConfigError::InvalidArgument {
                    message: "the redis backend requires a url".to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = StoreSettings::default();
        assert_eq!(settings.backend, StoreBackend::Memory);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("ETCD".parse::<StoreBackend>().unwrap(), StoreBackend::Etcd);
        assert_eq!(" yaml ".parse::<StoreBackend>().unwrap(), StoreBackend::Yaml);
        assert!(matches!(
            "consul".parse::<StoreBackend>(),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_backend_display_round_trips() {
        for backend in [
            StoreBackend::Memory,
            StoreBackend::Yaml,
            StoreBackend::Etcd,
            StoreBackend::Redis,
        ] {
            assert_eq!(backend.to_string().parse::<StoreBackend>().unwrap(), backend);
        }
    }

    #[test]
    fn test_env_overrides() {
        let settings = StoreSettings::default()
            .with_env_overrides(vars(&[
                ("COFFEE_BACKEND", "redis"),
                ("COFFEE_REDIS_URL", "redis://cache:6379"),
                ("COFFEE_REDIS_NAMESPACE", "app:config"),
                ("COFFEE_REDIS_MODE", "hash"),
                ("COFFEE_ETCD_ENDPOINTS", "a:2379, b:2379,,"),
                ("COFFEE_ETCD_PREFIX", "app/"),
                ("PATH", "/usr/bin"),
                ("COFFEE_UNKNOWN", "x"),
            ]))
            .unwrap();
        assert_eq!(settings.backend, StoreBackend::Redis);
        assert_eq!(settings.redis.url, "redis://cache:6379");
        assert_eq!(settings.redis.namespace, "app:config");
        assert_eq!(settings.redis.mode, RedisStorageMode::Hash);
        assert_eq!(settings.etcd.endpoints, vec!["a:2379", "b:2379"]);
        assert_eq!(settings.etcd.prefix.as_deref(), Some("app/"));
    }

    #[test]
    fn test_env_override_invalid_backend() {
        let result = StoreSettings::default().with_env_overrides(vars(&[("COFFEE_BACKEND", "zk")]));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_validate_requires_backend_details() {
        let settings = StoreSettings {
            backend: StoreBackend::Yaml,
            ..StoreSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidArgument { .. })
        ));

        let mut settings = StoreSettings {
            backend: StoreBackend::Etcd,
            ..StoreSettings::default()
        };
        settings.etcd.endpoints.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    #[cfg(feature = "yaml")]
    fn test_from_yaml_str() {
        let settings = StoreSettings::from_yaml_str(
            "backend: etcd\netcd:\n  endpoints: [\"e1:2379\"]\n  prefix: svc/\n",
        )
        .unwrap();
        assert_eq!(settings.backend, StoreBackend::Etcd);
        assert_eq!(settings.etcd.endpoints, vec!["e1:2379"]);
        assert_eq!(settings.etcd.prefix.as_deref(), Some("svc/"));
        assert_eq!(settings.redis, RedisSettings::default());
    }

    #[test]
    #[cfg(feature = "yaml")]
    fn test_default_location_without_file_uses_defaults() {
        let settings =
            StoreSettings::from_default_location("coffee-config-no-such-app", "org.invalid")
                .unwrap();
        assert_eq!(settings, StoreSettings::default());
    }

    #[test]
    #[cfg(feature = "yaml")]
    fn test_from_yaml_str_rejects_bad_mode() {
        let result = StoreSettings::from_yaml_str("redis:\n  mode: list\n");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    #[cfg(feature = "yaml")]
    fn test_env_overrides_file_values() {
        let settings = StoreSettings::from_yaml_str("backend: yaml\nyaml_path: /a.yaml\n")
            .unwrap()
            .with_env_overrides(vars(&[("COFFEE_YAML_PATH", "/b.yaml")]))
            .unwrap();
        assert_eq!(settings.yaml_path, Some(PathBuf::from("/b.yaml")));
    }
}
