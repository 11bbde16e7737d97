// SPDX-License-Identifier: MIT OR Apache-2.0

//! Indirection-following key resolution.
//!
//! A value stored as `{other.key}` redirects a lookup to `other.key`. The resolver
//! follows these redirects one hop at a time until it reaches a plain value, and
//! fails as soon as a hop would revisit a key seen earlier in the same call.
//!
//! There is no hop limit: the visited set is the only termination guard, so an
//! acyclic chain of any length resolves. Each call starts with a fresh visited set
//! and nothing is cached between calls, so a changed store value is seen by the
//! very next call.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};
use crate::ports::KeyValueStore;
use std::collections::HashSet;

/// The outcome of a resolution, including the keys that were looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The final, non-indirection value. `None` if the last key had no value.
    pub value: Option<ConfigValue>,
    /// Every key looked up, in order. The first entry is the requested key.
    pub chain: Vec<ConfigKey>,
}

impl Resolution {
    /// Returns the key whose value ended the chain.
    pub fn final_key(&self) -> Option<&ConfigKey> {
        self.chain.last()
    }

    /// Returns the number of indirections that were followed.
    pub fn hops(&self) -> usize {
        self.chain.len().saturating_sub(1)
    }
}

/// Resolves configuration keys against a [`KeyValueStore`], following indirections.
///
/// The resolver holds nothing but its store. It is `Sync` whenever the store is,
/// and concurrent `resolve` calls never share state.
///
/// # Examples
///
/// ```
/// use coffee_config::adapters::InMemoryStore;
/// use coffee_config::domain::{ConfigError, ConfigKey, ConfigKeyResolver};
///
/// let store = InMemoryStore::from_pairs([
///     ("db.url", "{db.primary}"),
///     ("db.primary", "postgres://db-1"),
///     ("loop", "{loop}"),
/// ]);
/// let resolver = ConfigKeyResolver::new(store);
///
/// let url = resolver.resolve(&ConfigKey::from("db.url")).unwrap();
/// assert_eq!(url.unwrap().as_str(), "postgres://db-1");
///
/// let err = resolver.resolve(&ConfigKey::from("loop")).unwrap_err();
/// assert!(matches!(err, ConfigError::CircularReference { .. }));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigKeyResolver<S> {
    store: S,
}

impl<S: KeyValueStore> ConfigKeyResolver<S> {
    /// Creates a resolver over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the resolver and returns the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Resolves `key` to its final value.
    ///
    /// Returns `Ok(None)` when the chain ends at a key with no value.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidArgument` if `key` is blank. The store is not contacted.
    /// * `ConfigError::CircularReference` if an indirection points back at a key
    ///   already visited in this call. The repeated key is not looked up.
    /// * Any error returned by the store, unchanged.
    pub fn resolve(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        self.resolve_chain(key).map(|resolution| resolution.value)
    }

    /// Resolves `key` and fails with `ConfigError::ConfigKeyNotFound` if the chain ends
    /// without a value. The error names the last key looked up.
    pub fn resolve_required(&self, key: &ConfigKey) -> Result<ConfigValue> {
        let resolution = self.resolve_chain(key)?;
        match resolution.value {
            Some(value) => Ok(value),
            None => Err(ConfigError::ConfigKeyNotFound {
                key: resolution
                    .final_key()
                    .unwrap_or(key)
                    .as_str()
                    .to_string(),
            }),
        }
    }

    /// Resolves `key` and reports every key looked up along the way.
    pub fn resolve_chain(&self, key: &ConfigKey) -> Result<Resolution> {
        key.ensure_not_blank()?;

        let mut visited: HashSet<ConfigKey> = HashSet::new();
        visited.insert(key.clone());
        let mut chain = vec![key.clone()];
        let mut current = key.clone();

        loop {
            tracing::trace!(store = self.store.name(), key = %current, "looking up key");
            let value = self.store.get(&current)?;

            let Some(next) = value.as_ref().and_then(ConfigValue::indirection) else {
                tracing::debug!(
                    key = %key,
                    hops = chain.len() - 1,
                    found = value.is_some(),
                    "resolved configuration key"
                );
                return Ok(Resolution { value, chain });
            };

            if visited.contains(&next) {
                tracing::warn!(
                    key = %key,
                    repeated = %next,
                    "circular reference in configuration keys"
                );
                return Err(ConfigError::CircularReference {
                    key: next.into_string(),
                    chain: chain.into_iter().map(String::from).collect(),
                });
            }

            tracing::trace!(from = %current, to = %next, "following indirection");
            visited.insert(next.clone());
            chain.push(next.clone());
            current = next;
        }
    }

    /// Writes `value` under `key` without interpreting it.
    ///
    /// An indirection marker is stored verbatim and only followed on a later read.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidArgument` if `key` is blank. The store is not contacted.
    /// * Any error returned by the store, unchanged.
    pub fn write(&self, key: &ConfigKey, value: ConfigValue) -> Result<()> {
        key.ensure_not_blank()?;
        tracing::debug!(store = self.store.name(), key = %key, "writing configuration key");
        self.store.put(key, value)
    }
}
