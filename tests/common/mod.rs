// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helper utilities shared by the integration tests.

use coffee_config::domain::{ConfigKey, ConfigValue, Result};
use coffee_config::ports::KeyValueStore;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Cached result of Docker availability check.
#[allow(dead_code)]
static DOCKER_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Checks if Docker is available on the system.
///
/// This check is cached after the first call.
#[allow(dead_code)]
pub fn is_docker_available() -> bool {
    *DOCKER_AVAILABLE.get_or_init(|| {
        std::process::Command::new("docker")
            .args(["ps"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

/// Prints a warning message that a test is skipped due to Docker being unavailable.
#[allow(dead_code)]
pub fn print_docker_unavailable_warning(test_name: &str) {
    eprintln!("\nSKIPPED: {} - Docker is not available", test_name);
    eprintln!("   To run this test, ensure Docker is installed and running.\n");
}

/// Store that counts every lookup, for asserting on hop counts.
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingStore {
    values: Mutex<HashMap<String, String>>,
    lookups: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl CountingStore {
    pub fn with_pairs(pairs: &[(&str, &str)]) -> Self {
        let store = Self::default();
        {
            let mut values = store.values.lock().unwrap();
            for (k, v) in pairs {
                values.insert(k.to_string(), v.to_string());
            }
        }
        store
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }

    pub fn reset(&self) {
        self.lookups.lock().unwrap().clear();
    }
}

impl KeyValueStore for CountingStore {
    fn name(&self) -> &str {
        "counting"
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        self.lookups.lock().unwrap().push(key.as_str().to_string());
        Ok(self
            .values
            .lock()
            .unwrap()
            .get(key.as_str())
            .cloned()
            .map(ConfigValue::from))
    }

    fn put(&self, key: &ConfigKey, value: ConfigValue) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.as_str().to_string(), value.into());
        Ok(())
    }
}
