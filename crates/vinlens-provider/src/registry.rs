//! Immutable provider catalog.

use crate::{
    definition::ProviderSpec,
    error::{ProviderError, Result},
    loader::ProviderLoader,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Definitions compiled into the binary: `(origin, toml)`.
const BUILTIN_DEFINITIONS: &[(&str, &str)] = &[(
    "builtin:vindecoderz",
    include_str!("../provider-definitions/vindecoderz.toml"),
)];

/// Fixed, ordered catalog of provider definitions.
///
/// The registry is built once at startup and never mutated afterwards.
/// Cloning is cheap: the definitions are shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Arc<[ProviderSpec]>,
}

impl ProviderRegistry {
    /// Build a registry from definitions, keeping their order.
    ///
    /// # Errors
    /// Returns error if any definition is invalid or two share a name.
    pub fn new(providers: Vec<ProviderSpec>) -> Result<Self> {
        let mut seen = HashSet::new();

        for provider in &providers {
            provider.validate()?;

            if !seen.insert(provider.name().to_string()) {
                return Err(ProviderError::DuplicateProvider {
                    provider_id: provider.name().to_string(),
                });
            }
        }

        debug!(count = providers.len(), "built provider registry");

        Ok(Self {
            providers: providers.into(),
        })
    }

    /// Registry holding the definitions shipped with the crate.
    ///
    /// # Errors
    /// Returns error if a built-in definition fails to parse or validate.
    pub fn builtin() -> Result<Self> {
        let providers = BUILTIN_DEFINITIONS
            .iter()
            .map(|(origin, contents)| ProviderLoader::parse_str(origin, contents))
            .collect::<Result<Vec<_>>>()?;

        Self::new(providers)
    }

    /// Create a registry from every valid definition the loader finds.
    ///
    /// # Errors
    /// Returns error if loading fails or two definitions share a name.
    pub fn load_from(loader: &ProviderLoader) -> Result<Self> {
        let registry = Self::new(loader.load_all()?)?;

        info!(
            count = registry.len(),
            dir = %loader.definitions_dir().display(),
            "provider registry ready"
        );

        Ok(registry)
    }

    /// All providers, in declaration order.
    #[must_use]
    pub fn list_providers(&self) -> &[ProviderSpec] {
        &self.providers
    }

    /// Get a provider definition by name.
    ///
    /// # Errors
    /// Returns error if the provider is not found.
    pub fn get(&self, name: &str) -> Result<&ProviderSpec> {
        self.providers
            .iter()
            .find(|provider| provider.name() == name)
            .ok_or_else(|| ProviderError::NotFound {
                provider_id: name.to_string(),
            })
    }

    /// Select providers by name, returned in registry order.
    ///
    /// Repeated names are collapsed. An empty selection yields an empty list.
    ///
    /// # Errors
    /// Returns error for the first name that is not registered.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<ProviderSpec>> {
        for name in names {
            self.get(name.as_ref())?;
        }

        Ok(self
            .providers
            .iter()
            .filter(|provider| names.iter().any(|name| name.as_ref() == provider.name()))
            .cloned()
            .collect())
    }

    /// Names of all registered providers, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(ProviderSpec::name).collect()
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry holds no providers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
