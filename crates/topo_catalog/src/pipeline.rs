//! Template pipeline: fetch, normalize, export.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::CatalogResult;
use crate::exporter;
use crate::normalizer::{self, NormalizedCatalog};
use crate::source::TemplateSource;

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct CatalogSummary {
    /// Records returned by the source
    pub fetched: usize,
    /// Templates written after normalization
    pub written: usize,
    pub output: PathBuf,
}

pub struct CatalogPipeline<S: TemplateSource> {
    source: S,
}

impl<S: TemplateSource> CatalogPipeline<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and normalize without writing anything.
    pub async fn collect(&self) -> CatalogResult<(usize, NormalizedCatalog)> {
        let records = self.source.fetch().await?;
        let catalog = normalizer::normalize(&records);
        Ok((records.len(), catalog))
    }

    /// Fetch, normalize and write the catalog to `output`.
    pub async fn run(&self, output: impl AsRef<Path>) -> CatalogResult<CatalogSummary> {
        let output = output.as_ref();
        info!("Fetching templates from {}", self.source.location());

        let (fetched, catalog) = self.collect().await?;
        exporter::write_catalog(&catalog, output)?;

        Ok(CatalogSummary {
            fetched,
            written: catalog.len(),
            output: output.to_path_buf(),
        })
    }
}
