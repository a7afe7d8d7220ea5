//! Provider definition loading from TOML files.
//!
//! This module handles loading provider definitions from a directory such as
//! this crate's `provider-definitions/`.

use crate::{
    definition::ProviderSpec,
    error::{ProviderError, Result},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vinlens_core::ProviderId;

/// Shipped definitions, relative to the workspace root.
const WORKSPACE_DEFINITIONS_DIR: &str = "crates/vinlens-provider/provider-definitions";

/// Loader for provider definitions from TOML files.
pub struct ProviderLoader {
    /// Base directory containing provider definitions
    definitions_dir: PathBuf,
}

impl ProviderLoader {
    /// Create a new loader with the given definitions directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Result<Self> {
        let definitions_dir = definitions_dir.into();

        if !definitions_dir.is_dir() {
            return Err(ProviderError::DirectoryNotFound {
                path: definitions_dir.display().to_string(),
            });
        }

        Ok(Self { definitions_dir })
    }

    /// Create a loader using the default definitions directory.
    ///
    /// Looks for the shipped `provider-definitions/` below the workspace root.
    ///
    /// # Errors
    /// Returns error if the default directory doesn't exist.
    pub fn with_default_dir() -> Result<Self> {
        let mut current_dir = std::env::current_dir()?;

        loop {
            let cargo_toml = current_dir.join("Cargo.toml");
            if let Ok(contents) = std::fs::read_to_string(&cargo_toml) {
                if contents.contains("[workspace]") {
                    return Self::new(current_dir.join(WORKSPACE_DEFINITIONS_DIR));
                }
            }

            if let Some(parent) = current_dir.parent() {
                current_dir = parent.to_path_buf();
            } else {
                break;
            }
        }

        // Fallback: try relative path
        Self::new(PathBuf::from("provider-definitions"))
    }

    /// Directory this loader reads from.
    #[must_use]
    pub fn definitions_dir(&self) -> &Path {
        &self.definitions_dir
    }

    /// Load a single provider definition by ID.
    ///
    /// # Errors
    /// Returns error if the definition file doesn't exist, can't be read, or is invalid.
    pub fn load(&self, provider_id: &ProviderId) -> Result<ProviderSpec> {
        let filename = format!("{}.toml", provider_id.as_str());

        let Some(path) = Self::find_file(&self.definitions_dir, &filename)? else {
            return Err(ProviderError::NotFound {
                provider_id: provider_id.to_string(),
            });
        };

        let definition = Self::load_from_path(&path)?;
        definition.validate()?;

        debug!(
            provider_id = %provider_id,
            name = %definition.display_name(),
            "loaded provider definition"
        );

        Ok(definition)
    }

    /// Load all provider definitions from the definitions directory.
    ///
    /// Files are visited in path order so the resulting catalog order is
    /// stable. Invalid definitions are logged as warnings and skipped.
    ///
    /// # Errors
    /// Returns error if the directory can't be read.
    pub fn load_all(&self) -> Result<Vec<ProviderSpec>> {
        let mut definitions = Vec::new();

        Self::walk_and_load_recursive(&self.definitions_dir, &mut definitions)?;

        info!(
            count = definitions.len(),
            dir = %self.definitions_dir.display(),
            "loaded provider definitions"
        );

        Ok(definitions)
    }

    /// Parse a provider definition from TOML text.
    ///
    /// `origin` is only used for error messages.
    pub fn parse_str(origin: &str, contents: &str) -> Result<ProviderSpec> {
        toml::from_str(contents).map_err(|e| ProviderError::ParseError {
            path: origin.to_string(),
            source: e,
        })
    }

    fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();
        Ok(paths)
    }

    fn walk_and_load_recursive(dir: &Path, definitions: &mut Vec<ProviderSpec>) -> Result<()> {
        for path in Self::sorted_entries(dir)? {
            if path.is_dir() {
                Self::walk_and_load_recursive(&path, definitions)?;
                continue;
            }

            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                continue;
            }

            match Self::load_from_path(&path) {
                Ok(definition) => {
                    if let Err(e) = definition.validate() {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "skipping invalid provider definition"
                        );
                        continue;
                    }
                    definitions.push(definition);
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to load provider definition"
                    );
                }
            }
        }

        Ok(())
    }

    /// Recursively search for a file by name.
    fn find_file(dir: &Path, filename: &str) -> Result<Option<PathBuf>> {
        for path in Self::sorted_entries(dir)? {
            if path.is_dir() {
                if let Some(found) = Self::find_file(&path, filename)? {
                    return Ok(Some(found));
                }
            } else if path.file_name().and_then(|s| s.to_str()) == Some(filename) {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    fn load_from_path(path: &Path) -> Result<ProviderSpec> {
        let contents = std::fs::read_to_string(path).map_err(|e| ProviderError::LoadError {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        Self::parse_str(&path.display().to_string(), &contents)
    }
}
