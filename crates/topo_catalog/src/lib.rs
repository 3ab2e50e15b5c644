//! # topo_catalog
//!
//! Device template catalog handling for topo.
//!
//! A GNS3 server lists its node templates at `/v2/templates`. The records are
//! heterogeneous: built-in nodes, QEMU virtual machines, Docker containers and
//! more. This crate fetches that list and normalizes it into a name-keyed JSON
//! document holding only the built-in and QEMU templates, each in a fixed
//! per-kind shape.
//!
//! ## Example
//!
//! ```rust,no_run
//! use topo_catalog::{CatalogPipeline, HttpTemplateSource, ServerEndpoint};
//!
//! # async fn example() -> topo_catalog::CatalogResult<()> {
//! let endpoint: ServerEndpoint = "127.0.0.1,3080".parse()?;
//! let pipeline = CatalogPipeline::new(HttpTemplateSource::new(endpoint));
//! let summary = pipeline.run("gns3_templates.json").await?;
//! println!("{} of {} templates kept", summary.written, summary.fetched);
//! # Ok(())
//! # }
//! ```

pub mod endpoint;
pub mod error;
pub mod exporter;
pub mod mock;
pub mod normalizer;
pub mod pipeline;
pub mod record;
pub mod source;

pub use endpoint::{ServerEndpoint, TEMPLATES_PATH};
pub use error::{CatalogError, CatalogResult};
pub use exporter::{to_pretty_json, write_catalog};
pub use mock::MockTemplateSource;
pub use normalizer::{
    classify, normalize, BuiltinTemplate, FieldDefault, FieldRule, NormalizedCatalog,
    NormalizedTemplate, QemuTemplate, TemplateKind, QEMU_PROPERTIES,
};
pub use pipeline::{CatalogPipeline, CatalogSummary};
pub use record::TemplateRecord;
pub use source::{parse_catalog_body, HttpTemplateSource, TemplateSource};
