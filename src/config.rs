// src/config.rs

//! Resolver configuration
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! command-line flags:
//!
//! ```toml
//! root = "/src/haikuports"
//! recipe_extension = "recipe"
//! sorted_enumeration = true
//! directory_fallback = false
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default extension of recipe files
pub const DEFAULT_RECIPE_EXTENSION: &str = "recipe";

/// Settings shared by the index builder and the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Root of the recipe tree (category directories live directly below it)
    pub root: PathBuf,

    /// Extension (without the dot) of recipe files in package directories
    pub recipe_extension: String,

    /// Walk directories in file-name order so duplicate providers resolve
    /// the same way on every run
    pub sorted_enumeration: bool,

    /// Look names missing from the index up by package directory instead
    pub directory_fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            recipe_extension: DEFAULT_RECIPE_EXTENSION.to_string(),
            sorted_enumeration: true,
            directory_fallback: false,
        }
    }
}

impl ResolverConfig {
    /// Default configuration rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.recipe_extension.is_empty() {
            return Err(Error::ConfigError(
                "recipe_extension cannot be empty".to_string(),
            ));
        }
        if self.recipe_extension.starts_with('.') {
            return Err(Error::ConfigError(format!(
                "recipe_extension should not start with a dot: {}",
                self.recipe_extension
            )));
        }
        Ok(())
    }

    /// Whether `path` has the configured recipe extension
    pub fn is_recipe_file(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == self.recipe_extension.as_str())
    }
}
