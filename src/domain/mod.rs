// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the key and value types, the error taxonomy, and the
//! indirection-following resolver. The resolver only knows the store through the
//! `KeyValueStore` port.

pub mod config_key;
pub mod config_value;
pub mod errors;
pub mod resolver;
pub mod service;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_value::ConfigValue;
pub use errors::{ConfigError, Result};
pub use resolver::{ConfigKeyResolver, Resolution};
pub use service::ConfigurationService;
