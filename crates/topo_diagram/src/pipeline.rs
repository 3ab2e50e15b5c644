//! Device name pipeline: descriptors in, name file out.

use std::fs;
use std::path::Path;

use tracing::info;

use topo_package::{VsdxPackage, MASTER_DESCRIPTOR, PAGE_DESCRIPTOR};

use crate::error::{DiagramError, DiagramResult};
use crate::exporter;
use crate::resolver::{DeviceSet, ReferenceResolver};

/// Resolves device names from an extracted or opened container.
pub struct DevicePipeline {
    resolver: ReferenceResolver,
}

impl DevicePipeline {
    pub fn new(resolver: ReferenceResolver) -> Self {
        Self { resolver }
    }

    /// Pipeline over Visio descriptors with default filtering.
    pub fn visio() -> DiagramResult<Self> {
        Ok(Self::new(ReferenceResolver::visio()?))
    }

    /// Resolve from descriptors under an extraction root.
    pub fn resolve_extracted(&self, root: impl AsRef<Path>) -> DiagramResult<DeviceSet> {
        let root = root.as_ref();
        let page_path = root.join(PAGE_DESCRIPTOR);
        let master_path = root.join(MASTER_DESCRIPTOR);

        let page = read_descriptor(&page_path)?;
        let masters = read_descriptor(&master_path)?;
        self.resolver
            .resolve_documents(&page, &page_path, &masters, &master_path)
    }

    /// Resolve straight from an opened container, without extracting it.
    pub fn resolve_package(&self, package: &mut VsdxPackage) -> DiagramResult<DeviceSet> {
        let page = package.read_text(PAGE_DESCRIPTOR)?;
        let masters = package.read_text(MASTER_DESCRIPTOR)?;
        self.resolver.resolve_documents(
            &page,
            &package.path().join(PAGE_DESCRIPTOR),
            &masters,
            &package.path().join(MASTER_DESCRIPTOR),
        )
    }

    /// Resolve from an extraction root and write the name file.
    ///
    /// Nothing is written unless both descriptors resolve.
    pub fn run(&self, root: impl AsRef<Path>, output: impl AsRef<Path>) -> DiagramResult<DeviceSet> {
        let devices = self.resolve_extracted(root)?;
        exporter::write_names(&devices, &output)?;
        info!(
            "Wrote {} device names to {:?}",
            devices.len(),
            output.as_ref()
        );
        Ok(devices)
    }
}

fn read_descriptor(path: &Path) -> DiagramResult<String> {
    let bytes = fs::read(path).map_err(|source| DiagramError::MissingDescriptor {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| DiagramError::malformed(path, e))
}
