// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parser port for seeding stores from configuration files.

use crate::domain::Result;
use std::collections::HashMap;

/// Parses file content into the flat key/value pairs a store holds.
///
/// Nested structures are flattened with dot notation, so
///
/// ```yaml
/// database:
///   host: "{defaults.host}"
/// ```
///
/// becomes the single entry `database.host -> "{defaults.host}"`. Parsers never
/// interpret indirection markers; that only happens when a key is resolved.
///
/// # Examples
///
/// ```rust
/// use coffee_config::ports::ConfigParser;
/// use coffee_config::domain::Result;
/// use std::collections::HashMap;
///
/// struct LineParser;
///
/// impl ConfigParser for LineParser {
///     fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
///         Ok(content
///             .lines()
///             .filter_map(|l| l.split_once('='))
///             .map(|(k, v)| (k.to_string(), v.to_string()))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["properties"]
///     }
/// }
///
/// let map = LineParser.parse("a={b}\nb=1").unwrap();
/// assert_eq!(map.get("a"), Some(&"{b}".to_string()));
/// ```
pub trait ConfigParser {
    /// Parses configuration content into a flat key-value map.
    fn parse(&self, content: &str) -> Result<HashMap<String, String>>;

    /// Returns the file extensions (without the leading dot) this parser handles.
    fn supported_extensions(&self) -> &[&str];

    /// Returns `true` if `path` has one of the supported extensions.
    fn supports_path(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.supported_extensions()
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}
