use std::sync::Arc;

use legkor_core::{LegkorError, ObservationStore, WeatherSource};

/// Facade over one weather source and one observation store.
pub struct Legkor {
    pub(crate) source: Arc<dyn WeatherSource>,
    pub(crate) store: Arc<dyn ObservationStore>,
}

impl std::fmt::Debug for Legkor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Legkor").finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Legkor`] facade.
pub struct LegkorBuilder {
    source: Option<Arc<dyn WeatherSource>>,
    store: Option<Arc<dyn ObservationStore>>,
}

impl Default for LegkorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LegkorBuilder {
    /// Create an empty builder; a source and a store must both be provided.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            source: None,
            store: None,
        }
    }

    /// Register the weather source connector.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn WeatherSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Register the persistence collaborator.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ObservationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Assemble the facade.
    ///
    /// # Errors
    /// Returns `LegkorError::InvalidArg` when the source or the store is
    /// missing.
    pub fn build(self) -> Result<Legkor, LegkorError> {
        let source = self
            .source
            .ok_or_else(|| LegkorError::InvalidArg("a weather source is required".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| LegkorError::InvalidArg("an observation store is required".to_string()))?;
        Ok(Legkor { source, store })
    }
}

impl Legkor {
    /// Start building a facade.
    #[must_use]
    pub const fn builder() -> LegkorBuilder {
        LegkorBuilder::new()
    }
}
