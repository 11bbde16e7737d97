// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default configuration service implementation.
//!
//! This module provides the default implementation of the `ConfigurationService`
//! trait: a thin front over a [`ConfigKeyResolver`] whose store is chosen at build
//! time.

use crate::adapters::InMemoryStore;
use crate::domain::{
    ConfigError, ConfigKey, ConfigKeyResolver, ConfigValue, ConfigurationService, Resolution,
    Result,
};
use crate::ports::KeyValueStore;
use crate::settings::{EtcdSettings, RedisSettings, StoreBackend, StoreSettings};
use std::collections::HashMap;
use std::path::Path;

/// Default implementation of the configuration service.
///
/// Reads resolve indirections through the underlying store; writes go straight
/// through. The service keeps no cache, so every `get` sees the store's current
/// contents.
///
/// # Examples
///
/// ```rust
/// use coffee_config::prelude::*;
/// use std::collections::HashMap;
///
/// # fn main() -> Result<()> {
/// let mut values = HashMap::new();
/// values.insert("db.url".to_string(), "{db.primary}".to_string());
/// values.insert("db.primary".to_string(), "postgres://db-1".to_string());
///
/// let service = DefaultConfigService::builder().with_values(values).build()?;
/// assert_eq!(service.get_str("db.url")?.as_str(), "postgres://db-1");
/// # Ok(())
/// # }
/// ```
pub struct DefaultConfigService {
    resolver: ConfigKeyResolver<Box<dyn KeyValueStore>>,
}

impl DefaultConfigService {
    /// Creates a service over the given store.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            resolver: ConfigKeyResolver::new(store),
        }
    }

    /// Creates a new configuration service builder.
    pub fn builder() -> ConfigurationServiceBuilder {
        ConfigurationServiceBuilder::new()
    }

    /// Creates a service from settings, connecting to the selected backend.
    pub fn from_settings(settings: &StoreSettings) -> Result<Self> {
        Self::builder().with_settings(settings)?.build()
    }

    /// Creates a service from the default settings file plus `COFFEE_*` environment
    /// overrides.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use coffee_config::service::DefaultConfigService;
    ///
    /// # fn main() -> coffee_config::domain::Result<()> {
    /// let service = DefaultConfigService::with_defaults("myapp", "com.example")?;
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "yaml")]
    pub fn with_defaults(app_name: &str, qualifier: &str) -> Result<Self> {
        let settings = StoreSettings::from_default_location(app_name, qualifier)?.with_process_env()?;
        Self::from_settings(&settings)
    }

    /// Returns the name of the underlying store.
    pub fn store_name(&self) -> &str {
        self.resolver.store().name()
    }

    /// Returns the resolver backing this service.
    pub fn resolver(&self) -> &ConfigKeyResolver<Box<dyn KeyValueStore>> {
        &self.resolver
    }

    /// Resolves `key` and reports every key looked up along the way.
    pub fn resolve_chain(&self, key: &ConfigKey) -> Result<Resolution> {
        self.resolver.resolve_chain(key)
    }
}

impl Default for DefaultConfigService {
    fn default() -> Self {
        Self::new(Box::new(InMemoryStore::new()))
    }
}

impl ConfigurationService for DefaultConfigService {
    fn get(&self, key: &ConfigKey) -> Result<ConfigValue> {
        self.resolver.resolve_required(key)
    }

    fn put(&self, key: &ConfigKey, value: ConfigValue) -> Result<()> {
        self.resolver.write(key, value)
    }
}

#[cfg(not(all(feature = "yaml", feature = "etcd", feature = "redis")))]
fn feature_disabled(backend: StoreBackend) -> ConfigError {
    ConfigError::InvalidArgument {
        message: format!(
            "the {} backend is not available; rebuild with the `{}` feature",
            backend, backend
        ),
    }
}

#[cfg(feature = "yaml")]
fn open_yaml(path: &Path) -> Result<Box<dyn KeyValueStore>> {
    Ok(Box::new(crate::adapters::YamlFileStore::from_file(path)?))
}

#[cfg(not(feature = "yaml"))]
fn open_yaml(_path: &Path) -> Result<Box<dyn KeyValueStore>> {
    Err(feature_disabled(StoreBackend::Yaml))
}

#[cfg(feature = "etcd")]
fn open_etcd(settings: &EtcdSettings) -> Result<Box<dyn KeyValueStore>> {
    Ok(Box::new(crate::adapters::EtcdStore::connect(
        &settings.endpoints,
        settings.prefix.as_deref(),
    )?))
}

#[cfg(not(feature = "etcd"))]
fn open_etcd(_settings: &EtcdSettings) -> Result<Box<dyn KeyValueStore>> {
    Err(feature_disabled(StoreBackend::Etcd))
}

#[cfg(feature = "redis")]
fn open_redis(settings: &RedisSettings) -> Result<Box<dyn KeyValueStore>> {
    Ok(Box::new(crate::adapters::RedisStore::connect(
        &settings.url,
        &settings.namespace,
        settings.mode,
    )?))
}

#[cfg(not(feature = "redis"))]
fn open_redis(_settings: &RedisSettings) -> Result<Box<dyn KeyValueStore>> {
    Err(feature_disabled(StoreBackend::Redis))
}

/// Opens the store selected by `settings`.
pub fn open_store(settings: &StoreSettings) -> Result<Box<dyn KeyValueStore>> {
    settings.validate()?;
    tracing::debug!(backend = %settings.backend, "opening configuration store");
    match settings.backend {
        StoreBackend::Memory => Ok(Box::new(InMemoryStore::new())),
        StoreBackend::Yaml => {
            let path = settings
                .yaml_path
                .as_deref()
                .ok_or_else(|| ConfigError::InvalidArgument {
                    message: "the yaml backend requires yaml_path".to_string(),
                })?;
            open_yaml(path)
        }
        StoreBackend::Etcd => open_etcd(&settings.etcd),
        StoreBackend::Redis => open_redis(&settings.redis),
    }
}

/// Builder for constructing a `DefaultConfigService`.
///
/// Without a store the built service uses an empty in-memory store.
///
/// # Examples
///
/// ```rust
/// use coffee_config::adapters::InMemoryStore;
/// use coffee_config::service::ConfigurationServiceBuilder;
///
/// # fn main() -> coffee_config::domain::Result<()> {
/// let service = ConfigurationServiceBuilder::new()
///     .with_store(Box::new(InMemoryStore::new()))
///     .build()?;
/// assert_eq!(service.store_name(), "memory");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigurationServiceBuilder {
    store: Option<Box<dyn KeyValueStore>>,
}

impl ConfigurationServiceBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the given store. A later call replaces it.
    pub fn with_store(mut self, store: Box<dyn KeyValueStore>) -> Self {
        if let Some(previous) = &self.store {
            tracing::debug!(replaced = previous.name(), "replacing configuration store");
        }
        self.store = Some(store);
        self
    }

    /// Uses an in-memory store seeded with `values`.
    pub fn with_values(self, values: HashMap<String, String>) -> Self {
        self.with_store(Box::new(InMemoryStore::with_values(values)))
    }

    /// Uses a YAML file store.
    #[cfg(feature = "yaml")]
    pub fn with_yaml_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let store = crate::adapters::YamlFileStore::from_file(path)?;
        Ok(self.with_store(Box::new(store)))
    }

    /// Uses an etcd store.
    #[cfg(feature = "etcd")]
    pub fn with_etcd<S: AsRef<str>>(self, endpoints: &[S], prefix: Option<&str>) -> Result<Self> {
        let store = crate::adapters::EtcdStore::connect(endpoints, prefix)?;
        Ok(self.with_store(Box::new(store)))
    }

    /// Uses a Redis store.
    #[cfg(feature = "redis")]
    pub fn with_redis(
        self,
        url: &str,
        namespace: &str,
        mode: crate::settings::RedisStorageMode,
    ) -> Result<Self> {
        let store = crate::adapters::RedisStore::connect(url, namespace, mode)?;
        Ok(self.with_store(Box::new(store)))
    }

    /// Uses the store selected by `settings`.
    pub fn with_settings(self, settings: &StoreSettings) -> Result<Self> {
        Ok(self.with_store(open_store(settings)?))
    }

    /// Builds the configuration service.
    pub fn build(self) -> Result<DefaultConfigService> {
        let store = self
            .store
            .unwrap_or_else(|| Box::new(InMemoryStore::new()));
        Ok(DefaultConfigService::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(pairs: &[(&str, &str)]) -> DefaultConfigService {
        let values = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DefaultConfigService::builder()
            .with_values(values)
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_service_is_empty_memory() {
        let service = DefaultConfigService::default();
        assert_eq!(service.store_name(), "memory");
        assert!(!service.has(&ConfigKey::from("anything")));
    }

    #[test]
    fn test_get_follows_indirection() {
        let service = service(&[("a", "{b}"), ("b", "value")]);
        assert_eq!(service.get_str("a").unwrap().as_str(), "value");
    }

    #[test]
    fn test_get_missing_key() {
        let service = service(&[("a", "{b}")]);
        let err = service.get_str("a").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigKeyNotFound { ref key } if key == "b"));
    }

    #[test]
    fn test_get_cycle() {
        let service = service(&[("a", "{b}"), ("b", "{a}")]);
        assert!(matches!(
            service.get_str("a"),
            Err(ConfigError::CircularReference { .. })
        ));
        assert_eq!(
            service.get_or_default(&ConfigKey::from("a"), "fallback").as_str(),
            "fallback"
        );
    }

    #[test]
    fn test_put_then_get() {
        let service = DefaultConfigService::default();
        service
            .put(&ConfigKey::from("target"), ConfigValue::from("42"))
            .unwrap();
        service
            .put(&ConfigKey::from("alias"), ConfigValue::from("{target}"))
            .unwrap();
        assert_eq!(
            service
                .resolver()
                .store()
                .get_str("alias")
                .unwrap()
                .unwrap()
                .as_str(),
            "{target}"
        );
        assert_eq!(
            service.get_str("alias").unwrap().as_i64("alias").unwrap(),
            42
        );
    }

    #[test]
    fn test_put_blank_key() {
        let service = DefaultConfigService::default();
        let err = service
            .put(&ConfigKey::from(""), ConfigValue::from("v"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument { .. }));
    }

    #[test]
    fn test_resolve_chain_through_service() {
        let service = service(&[("a", "{b}"), ("b", "{c}"), ("c", "v")]);
        let resolution = service.resolve_chain(&ConfigKey::from("a")).unwrap();
        assert_eq!(resolution.hops(), 2);
    }

    #[test]
    fn test_builder_last_store_wins() {
        let service = ConfigurationServiceBuilder::new()
            .with_values(HashMap::from([("k".to_string(), "first".to_string())]))
            .with_values(HashMap::from([("k".to_string(), "second".to_string())]))
            .build()
            .unwrap();
        assert_eq!(service.get_str("k").unwrap().as_str(), "second");
    }

    #[test]
    fn test_open_store_memory() {
        let store = open_store(&StoreSettings::default()).unwrap();
        assert_eq!(store.name(), "memory");
    }

    #[test]
    fn test_open_store_yaml_without_path() {
        let settings = StoreSettings {
            backend: StoreBackend::Yaml,
            ..StoreSettings::default()
        };
        assert!(matches!(
            open_store(&settings),
            Err(ConfigError::InvalidArgument { .. })
        ));
    }

    #[test]
    #[cfg(not(feature = "etcd"))]
    fn test_open_store_etcd_feature_disabled() {
        let settings = StoreSettings {
            backend: StoreBackend::Etcd,
            ..StoreSettings::default()
        };
        let err = open_store(&settings).err().unwrap();
        assert!(err.to_string().contains("`etcd` feature"));
    }
}
