//! File-based configuration storage with an explicit in-memory cache.
//!
//! Configurations live in a directory as `<name>.json`, `<name>.yaml` or
//! `<name>.yml`. Names are validated before any path is built from them.

use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::{validate_config_name, CONFIG_EXTENSIONS, MAX_CONFIG_SIZE};
use crate::error::{MapperError, Result};
use crate::mapping::Configuration;

/// Parse a configuration from JSON text.
pub fn parse_config_json(text: &str) -> Result<Configuration> {
    Ok(serde_json::from_str(text)?)
}

/// Parse a configuration from YAML text.
pub fn parse_config_yaml(text: &str) -> Result<Configuration> {
    Ok(serde_yaml_ng::from_str(text)?)
}

/// Load a configuration file, choosing the format by extension.
///
/// # Errors
/// Returns an error when the file is missing, too large, has an unknown
/// extension or does not parse.
pub fn load_config_file(path: &Path) -> Result<Configuration> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !CONFIG_EXTENSIONS.contains(&extension.as_str()) {
        return Err(MapperError::UnsupportedConfigFormat(
            path.display().to_string(),
        ));
    }

    let size = fs::metadata(path)?.len();
    if size > MAX_CONFIG_SIZE {
        return Err(MapperError::ConfigTooLarge {
            size,
            max: MAX_CONFIG_SIZE,
        });
    }

    let text = fs::read_to_string(path)?;
    let config = if extension == "json" {
        parse_config_json(&text)?
    } else {
        parse_config_yaml(&text)?
    };

    tracing::debug!(
        path = %path.display(),
        mappings = config.mappings.len(),
        "Loaded configuration"
    );
    Ok(config)
}

/// Cache of loaded configurations keyed by name.
///
/// The cache is an ordinary value: whoever needs one creates it and passes
/// it along. Lookups hand out shared [`Arc`]s so readers never copy a
/// configuration.
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: RwLock<HashMap<String, Arc<Configuration>>>,
}

impl ConfigCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached configuration.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Configuration>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Cache a configuration, replacing any previous entry.
    pub fn insert(&self, name: impl Into<String>, config: Configuration) -> Arc<Configuration> {
        let config = Arc::new(config);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), Arc::clone(&config));
        config
    }

    /// Drop a cached configuration.
    pub fn remove(&self, name: &str) -> Option<Arc<Configuration>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Cached names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Directory of named configurations.
#[derive(Debug)]
pub struct ConfigStore {
    root: PathBuf,
    cache: ConfigCache,
}

impl ConfigStore {
    /// Create a store over a directory with an empty cache.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_cache(root, ConfigCache::new())
    }

    /// Create a store over a directory with an existing cache.
    #[must_use]
    pub fn with_cache(root: impl Into<PathBuf>, cache: ConfigCache) -> Self {
        Self {
            root: root.into(),
            cache,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn cache(&self) -> &ConfigCache {
        &self.cache
    }

    /// Load a configuration by name, from the cache when possible.
    ///
    /// # Errors
    /// Returns an error for invalid names, unknown configurations and files
    /// that fail to load.
    pub fn load(&self, name: &str) -> Result<Arc<Configuration>> {
        validate_config_name(name)?;

        if let Some(config) = self.cache.get(name) {
            tracing::debug!(name, "Configuration served from cache");
            return Ok(config);
        }

        let path = self
            .find_file(name)
            .ok_or_else(|| MapperError::ConfigNotFound(name.to_string()))?;
        let config = load_config_file(&path)?;
        Ok(self.cache.insert(name, config))
    }

    /// Save a configuration as pretty JSON and refresh the cache.
    ///
    /// Files with the same name in other formats are removed so the saved
    /// version is the one that loads.
    ///
    /// # Returns
    /// Path of the written file
    pub fn save(&self, name: &str, config: &Configuration) -> Result<PathBuf> {
        validate_config_name(name)?;
        fs::create_dir_all(&self.root)?;

        let output_file = self.root.join(format!("{name}.json"));
        let temp_file = self.root.join(format!(".{name}.json.tmp"));
        let content = serde_json::to_string_pretty(config)?;

        // Write to temp file first, then sync and rename for atomicity
        {
            let mut file = File::create(&temp_file)?;
            file.write_all(content.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }

        #[cfg(target_os = "windows")]
        if output_file.exists() {
            fs::remove_file(&output_file)?;
        }

        fs::rename(&temp_file, &output_file)?;

        for extension in CONFIG_EXTENSIONS.iter().filter(|ext| **ext != "json") {
            let stale = self.root.join(format!("{name}.{extension}"));
            if stale.is_file() {
                fs::remove_file(&stale)?;
            }
        }

        self.cache.insert(name, config.clone());
        tracing::info!(name, path = %output_file.display(), "Saved configuration");
        Ok(output_file)
    }

    /// Delete a configuration from disk and cache.
    ///
    /// # Returns
    /// `true` when a file was removed
    pub fn delete(&self, name: &str) -> Result<bool> {
        validate_config_name(name)?;
        self.cache.remove(name);

        let mut removed = false;
        for extension in CONFIG_EXTENSIONS {
            let path = self.root.join(format!("{name}.{extension}"));
            if path.is_file() {
                fs::remove_file(&path)?;
                removed = true;
            }
        }
        Ok(removed)
    }

    /// Check whether a configuration exists on disk.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        validate_config_name(name).is_ok() && self.find_file(name).is_some()
    }

    /// Names of the configurations on disk, sorted.
    ///
    /// A missing directory is an empty store.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = BTreeSet::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
                continue;
            };
            if !CONFIG_EXTENSIONS.contains(&extension.to_lowercase().as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if validate_config_name(stem).is_ok() {
                    names.insert(stem.to_string());
                }
            }
        }
        Ok(names.into_iter().collect())
    }

    fn find_file(&self, name: &str) -> Option<PathBuf> {
        CONFIG_EXTENSIONS
            .iter()
            .map(|extension| self.root.join(format!("{name}.{extension}")))
            .find(|path| path.is_file())
    }
}
