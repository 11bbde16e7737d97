// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing key-value store implementations.
//!
//! Each adapter implements the `KeyValueStore` port for a specific backend. The
//! in-memory store is always available; the others are behind feature flags.

#[cfg(feature = "etcd")]
pub mod etcd;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
#[cfg(feature = "yaml")]
pub mod yaml_file;

// Re-export adapters based on feature flags
#[cfg(feature = "etcd")]
pub use etcd::EtcdStore;
pub use memory::InMemoryStore;
#[cfg(feature = "redis")]
pub use redis::{RedisStorageMode, RedisStore};
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlFileStore, YamlParser};
