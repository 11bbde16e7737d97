// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key resolution over pluggable key-value stores.
//!
//! A configuration value written as `{other.key}` is an indirection: reading the key
//! that holds it yields whatever `other.key` resolves to. Chains of indirections are
//! followed until a plain value or an absent key is reached, and a chain that revisits
//! a key is reported as a circular reference instead of looping forever.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and the resolver (`ConfigKey`, `ConfigValue`,
//!   `ConfigKeyResolver`, errors)
//! - **Ports**: Trait definitions for the outside world (`KeyValueStore`, `ConfigParser`)
//! - **Adapters**: Store implementations (in-memory, YAML file, etcd, Redis)
//! - **Service**: The configuration service that fronts a resolver
//!
//! # Feature Flags
//!
//! - `yaml`: Enable the YAML file store and YAML settings (default)
//! - `cli`: Build the `coffee-config` command-line tool (default)
//! - `etcd`: Enable the etcd store
//! - `redis`: Enable the Redis store
//! - `remote`: Enable all remote stores (etcd + redis)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use coffee_config::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let store = InMemoryStore::from_pairs([
//!     ("service.endpoint", "{service.endpoint.blue}"),
//!     ("service.endpoint.blue", "https://blue.internal"),
//! ]);
//! let resolver = ConfigKeyResolver::new(store);
//!
//! let endpoint = resolver.resolve(&ConfigKey::from("service.endpoint"))?;
//! assert_eq!(endpoint.unwrap().as_str(), "https://blue.internal");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod settings;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigKey, ConfigKeyResolver, ConfigValue, ConfigurationService,
        Resolution, Result,
    };
    pub use crate::ports::{ConfigParser, KeyValueStore};
    pub use crate::service::{ConfigurationServiceBuilder, DefaultConfigService};
    pub use crate::settings::{StoreBackend, StoreSettings};

    pub use crate::adapters::InMemoryStore;
    // Re-export adapters based on feature flags
    #[cfg(feature = "etcd")]
    pub use crate::adapters::EtcdStore;
    #[cfg(feature = "redis")]
    pub use crate::adapters::{RedisStorageMode, RedisStore};
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{YamlFileStore, YamlParser};
}
