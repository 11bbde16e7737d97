// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file key-value store.
//!
//! This module provides a store that keeps a flattened YAML document in memory and
//! writes it back to disk on every `put`.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};
use crate::ports::{ConfigParser, KeyValueStore};
use directories::ProjectDirs;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Maximum allowed file size for YAML files (10MB)
const MAX_YAML_FILE_SIZE: u64 = 10 * 1024 * 1024;

const STORE_NAME: &str = "yaml";

/// YAML parser implementation.
///
/// This parser converts YAML documents into flat key-value maps using dot notation
/// for nested structures.
///
/// # Examples
///
/// ```rust
/// use coffee_config::adapters::YamlParser;
/// use coffee_config::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "database:\n  host: \"{defaults.host}\"\n  port: 5432";
/// let result = parser.parse(yaml_content).unwrap();
/// assert_eq!(result.get("database.host"), Some(&"{defaults.host}".to_string()));
/// assert_eq!(result.get("database.port"), Some(&"5432".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Flattens a YAML value into a flat map with dot notation keys.
    fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, result: &mut HashMap<String, String>) {
        match value {
            serde_yaml::Value::Mapping(map) => {
                for (key, val) in map {
                    let key_str = match key {
                        serde_yaml::Value::String(s) => s.clone(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        _ => continue,
                    };
                    let new_prefix = if prefix.is_empty() {
                        key_str
                    } else {
                        format!("{}.{}", prefix, key_str)
                    };
                    Self::flatten_yaml(val, &new_prefix, result);
                }
            }
            serde_yaml::Value::Sequence(seq) => {
                for (i, val) in seq.iter().enumerate() {
                    let new_prefix = format!("{}.{}", prefix, i);
                    Self::flatten_yaml(val, &new_prefix, result);
                }
            }
            serde_yaml::Value::String(s) => {
                result.insert(prefix.to_string(), s.clone());
            }
            serde_yaml::Value::Number(n) => {
                result.insert(prefix.to_string(), n.to_string());
            }
            serde_yaml::Value::Bool(b) => {
                result.insert(prefix.to_string(), b.to_string());
            }
            serde_yaml::Value::Null => {
                result.insert(prefix.to_string(), String::new());
            }
            serde_yaml::Value::Tagged(tagged) => {
                Self::flatten_yaml(&tagged.value, prefix, result);
            }
        }
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        let mut result = HashMap::new();
        Self::flatten_yaml(&value, "", &mut result);
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

fn file_error(message: String, e: std::io::Error) -> ConfigError {
    ConfigError::store(STORE_NAME, message, e)
}

/// Key-value store backed by a YAML file.
///
/// Nested documents are flattened on load, so `db: { url: x }` is stored under the
/// key `db.url`. Writes update the in-memory map and then rewrite the file as a flat,
/// key-sorted mapping. Reads never touch the disk; call [`YamlFileStore::reload`] to
/// pick up external edits.
///
/// # Examples
///
/// ```rust,no_run
/// use coffee_config::adapters::YamlFileStore;
///
/// let store = YamlFileStore::from_file("/etc/myapp/values.yaml").unwrap();
/// let store = YamlFileStore::from_default_location("myapp", "com.example").unwrap();
/// ```
#[derive(Debug)]
pub struct YamlFileStore {
    /// Canonical path to the YAML file
    file_path: PathBuf,
    /// Flattened values
    values: RwLock<HashMap<String, String>>,
    /// YAML parser
    parser: YamlParser,
}

impl YamlFileStore {
    /// Opens a store over an existing YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref();
        let canonical_path = file_path.canonicalize().map_err(|e| {
            file_error(
                format!("Invalid or inaccessible path: {}", display_name(file_path)),
                e,
            )
        })?;

        let parser = YamlParser::new();
        let values = Self::read_values(&parser, &canonical_path)?;

        Ok(Self {
            file_path: canonical_path,
            values: RwLock::new(values),
            parser,
        })
    }

    /// Opens `values.yaml` in the OS-appropriate configuration directory.
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, "values.yaml")
    }

    /// Opens a custom file name in the OS-appropriate configuration directory.
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::StoreError {
                store_name: STORE_NAME.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Self::from_file(proj_dirs.config_dir().join(filename))
    }

    /// Returns the path to the backing file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Re-reads the backing file, replacing all in-memory values.
    pub fn reload(&self) -> Result<()> {
        let fresh = Self::read_values(&self.parser, &self.file_path)?;
        let mut values = self.values.write().map_err(|_| poisoned())?;
        *values = fresh;
        tracing::debug!(path = %self.file_path.display(), keys = values.len(), "reloaded YAML store");
        Ok(())
    }

    fn read_values(parser: &YamlParser, path: &Path) -> Result<HashMap<String, String>> {
        let metadata = fs::metadata(path).map_err(|e| {
            file_error(
                format!("Failed to read file metadata: {}", display_name(path)),
                e,
            )
        })?;

        if metadata.len() > MAX_YAML_FILE_SIZE {
            return Err(ConfigError::StoreError {
                store_name: STORE_NAME.to_string(),
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_YAML_FILE_SIZE
                ),
                source: None,
            });
        }

        let content = fs::read_to_string(path).map_err(|e| {
            file_error(
                format!("Failed to read configuration file: {}", display_name(path)),
                e,
            )
        })?;

        parser.parse(&content)
    }

    fn write_values(&self, values: &HashMap<String, String>) -> Result<()> {
        let sorted: BTreeMap<&str, &str> = values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let content = serde_yaml::to_string(&sorted).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to serialize YAML: {}", e),
            source: Some(Box::new(e)),
        })?;
        fs::write(&self.file_path, content).map_err(|e| {
            file_error(
                format!(
                    "Failed to write configuration file: {}",
                    display_name(&self.file_path)
                ),
                e,
            )
        })
    }
}

fn poisoned() -> ConfigError {
    ConfigError::StoreError {
        store_name: STORE_NAME.to_string(),
        message: "store lock poisoned".to_string(),
        source: None,
    }
}

impl KeyValueStore for YamlFileStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        let values = self.values.read().map_err(|_| poisoned())?;
        Ok(values.get(key.as_str()).map(|v| ConfigValue::from(v.as_str())))
    }

    fn put(&self, key: &ConfigKey, value: ConfigValue) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        let previous = values.insert(key.as_str().to_string(), value.into());
        if let Err(e) = self.write_values(&values) {
            // Keep memory and disk in agreement.
            match previous {
                Some(old) => values.insert(key.as_str().to_string(), old),
                None => values.remove(key.as_str()),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_store_name_matches_backend() {
        let file = yaml_file("k: v\n");
        let store = YamlFileStore::from_file(file.path()).unwrap();
        assert_eq!(
            store.name(),
            crate::settings::StoreBackend::Yaml.to_string()
        );
    }

    #[test]
    fn test_yaml_parser_nested() {
        let result = YamlParser::new()
            .parse("database:\n  host: localhost\n  port: 5432\n")
            .unwrap();
        assert_eq!(result.get("database.host"), Some(&"localhost".to_string()));
        assert_eq!(result.get("database.port"), Some(&"5432".to_string()));
    }

    #[test]
    fn test_yaml_parser_array_and_null() {
        let result = YamlParser::new()
            .parse("hosts:\n  - a\n  - \"{b}\"\nempty: ~\n")
            .unwrap();
        assert_eq!(result.get("hosts.0"), Some(&"a".to_string()));
        assert_eq!(result.get("hosts.1"), Some(&"{b}".to_string()));
        assert_eq!(result.get("empty"), Some(&String::new()));
    }

    #[test]
    fn test_yaml_parser_invalid() {
        let result = YamlParser::new().parse("key: [unclosed");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_store_from_file() {
        let file = yaml_file("app:\n  name: coffee\n  alias: \"{app.name}\"\n");
        let store = YamlFileStore::from_file(file.path()).unwrap();
        assert_eq!(store.get_str("app.name").unwrap().unwrap().as_str(), "coffee");
        assert_eq!(
            store.get_str("app.alias").unwrap().unwrap().as_str(),
            "{app.name}"
        );
        assert!(store.get_str("app.missing").unwrap().is_none());
    }

    #[test]
    fn test_yaml_store_put_persists() {
        let file = yaml_file("app:\n  name: coffee\n");
        let store = YamlFileStore::from_file(file.path()).unwrap();
        store
            .put(&ConfigKey::from("app.alias"), ConfigValue::from("{app.name}"))
            .unwrap();

        let reopened = YamlFileStore::from_file(file.path()).unwrap();
        assert_eq!(
            reopened.get_str("app.alias").unwrap().unwrap().as_str(),
            "{app.name}"
        );
        assert_eq!(
            reopened.get_str("app.name").unwrap().unwrap().as_str(),
            "coffee"
        );
    }

    #[test]
    fn test_yaml_store_reload() {
        let file = yaml_file("key: one\n");
        let store = YamlFileStore::from_file(file.path()).unwrap();

        std::fs::write(file.path(), "key: two\n").unwrap();
        store.reload().unwrap();

        assert_eq!(store.get_str("key").unwrap().unwrap().as_str(), "two");
    }

    #[test]
    fn test_yaml_store_nonexistent_file() {
        let result = YamlFileStore::from_file("/nonexistent/values.yaml");
        assert!(matches!(result, Err(ConfigError::StoreError { .. })));
    }

    #[test]
    fn test_yaml_store_file_path_is_canonical() {
        let file = yaml_file("a: b\n");
        let store = YamlFileStore::from_file(file.path()).unwrap();
        assert_eq!(store.file_path(), file.path().canonicalize().unwrap());
    }
}
