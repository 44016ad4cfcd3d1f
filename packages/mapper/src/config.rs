//! Configuration constants and validation functions for the mapper.
//!
//! Centralized limits that bound the work a single transform may do:
//! - Source size, node count and nesting depth (markup bombs)
//! - Mapping recursion depth (runaway nested configurations)
//! - Configuration file size
//!
//! The engine itself has no timeouts; these limits are what keeps a single
//! invocation linear in a bounded input.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{MapperError, Result};

/// Maximum source document size in bytes (16 MB).
pub const MAX_SOURCE_SIZE: usize = 16 * 1024 * 1024;

/// Maximum number of nodes the markup parser may allocate.
pub const MAX_SOURCE_NODES: u32 = 2_000_000;

/// Maximum element nesting depth of a source document.
///
/// The source tree is converted and traversed recursively, so this also
/// bounds stack usage.
pub const MAX_SOURCE_DEPTH: usize = 256;

/// Maximum nesting depth of mapping entries (object/array children).
pub const MAX_MAPPING_DEPTH: usize = 32;

/// Maximum configuration file size in bytes (4 MB).
pub const MAX_CONFIG_SIZE: u64 = 4 * 1024 * 1024;

/// File extensions recognised as configuration files, in lookup order.
pub const CONFIG_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Configuration name pattern: starts alphanumeric, then word chars, '-' or '.'.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CONFIG_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid regex"));

/// Validate a configuration name before it is used to build a file path.
///
/// # Examples
/// ```
/// use xml_mapper::config::validate_config_name;
///
/// assert!(validate_config_name("library-books").is_ok());
/// assert!(validate_config_name("../secrets").is_err());
/// ```
pub fn validate_config_name(name: &str) -> Result<()> {
    if CONFIG_NAME_PATTERN.is_match(name) && !name.contains("..") {
        Ok(())
    } else {
        Err(MapperError::InvalidConfigName(name.to_string()))
    }
}
