use std::sync::Arc;

use async_trait::async_trait;

use platey_core::{CatalogBinding, SourceSpec};

use crate::loader::{load_catalog, LoadedCatalog};
use crate::sources::{
    DelimitedFileSource, PlainTextSource, RecordSource, SheetCsvSource, SourceError,
};

/// Capability the dispatcher loads catalogs through. Every load is fresh:
/// two searches against a source that changed in between may see
/// different snapshots, which is accepted for this domain — no
/// cross-query consistency is promised.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn load(&self, category: &str) -> Result<LoadedCatalog, SourceError>;
}

/// Category name → record source, built once from the configured
/// bindings. Binding order is preserved for listings.
pub struct SourceRegistry {
    sources: Vec<(String, Arc<dyn RecordSource>)>,
}

impl SourceRegistry {
    pub fn from_bindings(bindings: &[CatalogBinding]) -> Self {
        let sources = bindings
            .iter()
            .map(|binding| {
                let source: Arc<dyn RecordSource> = match &binding.source {
                    SourceSpec::Text { path } => {
                        Arc::new(PlainTextSource::new(&binding.name, path))
                    }
                    SourceSpec::Delimited { path, delimiter } => {
                        Arc::new(DelimitedFileSource::new(&binding.name, path, *delimiter))
                    }
                    SourceSpec::Sheet { url } => Arc::new(SheetCsvSource::new(&binding.name, url)),
                };
                (binding.name.clone(), source)
            })
            .collect();

        Self { sources }
    }

    pub fn get(&self, category: &str) -> Option<&Arc<dyn RecordSource>> {
        self.sources.iter().find(|(name, _)| name == category).map(|(_, source)| source)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl CatalogProvider for SourceRegistry {
    async fn load(&self, category: &str) -> Result<LoadedCatalog, SourceError> {
        let Some(source) = self.get(category) else {
            return Err(SourceError::unavailable(category, "no source bound to this category"));
        };

        load_catalog(source.as_ref(), category).await
    }
}
