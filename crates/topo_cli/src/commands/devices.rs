//! Devices command - Resolve device names from a diagram.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use topo_diagram::DevicePipeline;
use topo_package::{uploads, PackageError, VsdxPackage};

use crate::config::{DiagramSettings, TopoConfig};

#[derive(Args)]
pub struct DevicesArgs {
    /// Container to read instead of picking one from the upload directory
    #[arg(short, long, conflicts_with = "uploads")]
    package: Option<PathBuf>,

    /// Upload directory to pick the newest container from
    #[arg(long)]
    uploads: Option<PathBuf>,

    /// Extraction root
    #[arg(long)]
    extract_dir: Option<PathBuf>,

    /// Device name output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep older containers in the upload directory
    #[arg(long)]
    keep_old: bool,
}

pub async fn execute(args: DevicesArgs, config: &TopoConfig) -> Result<()> {
    let mut settings = config.diagram.clone();
    if let Some(dir) = args.uploads {
        settings.uploads_dir = dir;
    }
    if let Some(dir) = args.extract_dir {
        settings.extract_dir = dir;
    }
    if let Some(output) = args.output {
        settings.names_output = output;
    }

    let count = resolve_devices(args.package.as_deref(), &settings, !args.keep_old)?;
    println!(
        "✅ {} device names saved to {}",
        count,
        settings.names_output.display()
    );
    Ok(())
}

/// Select, extract and resolve a container; returns the number of names written.
pub fn resolve_devices(package: Option<&Path>, settings: &DiagramSettings, prune: bool) -> Result<usize> {
    let package_path = match package {
        Some(path) => path.to_path_buf(),
        None => select_upload(settings, prune)?,
    };

    let mut package = VsdxPackage::open(&package_path)
        .with_context(|| format!("Failed to open package {}", package_path.display()))?;
    package
        .extract_to(&settings.extract_dir)
        .with_context(|| format!("Failed to extract package {}", package_path.display()))?;

    let pipeline = DevicePipeline::visio()?;
    let devices = pipeline
        .run(&settings.extract_dir, &settings.names_output)
        .context("Failed to resolve device names")?;

    Ok(devices.len())
}

fn select_upload(settings: &DiagramSettings, prune: bool) -> Result<PathBuf> {
    let selection = uploads::latest_package(&settings.uploads_dir)?
        .ok_or_else(|| PackageError::NoPackage(settings.uploads_dir.clone()))?;

    if prune {
        let removed = uploads::prune(&selection.older);
        info!("Removed {} older packages", removed);
    }
    uploads::record_selection(&settings.selection_record, &selection.latest)?;

    Ok(selection.latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;
    use topo_diagram::VISIO_NAMESPACE;
    use topo_package::{MASTER_DESCRIPTOR, PAGE_DESCRIPTOR};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_package(path: &Path) {
        let page = format!(
            r#"<PageContents xmlns="{}"><Shapes><Shape ID="12" Master="3"/><Shape ID="5" Master="9"/></Shapes></PageContents>"#,
            VISIO_NAMESPACE
        );
        let masters = format!(
            r#"<Masters xmlns="{}"><Master ID="3" Name="Core Switch"/><Master ID="9" Name="Rack Frame"/></Masters>"#,
            VISIO_NAMESPACE
        );

        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for (name, content) in [(PAGE_DESCRIPTOR, page), (MASTER_DESCRIPTOR, masters)] {
            writer.start_file(name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn settings(root: &Path) -> DiagramSettings {
        DiagramSettings {
            uploads_dir: root.join("uploads"),
            extract_dir: root.join("extracted_vsdx"),
            names_output: root.join("machine_names.txt"),
            selection_record: root.join("vsdx_path.txt"),
        }
    }

    #[test]
    fn test_resolve_from_uploads() {
        let temp = tempdir().unwrap();
        let settings = settings(temp.path());
        fs::create_dir_all(&settings.uploads_dir).unwrap();

        let old = settings.uploads_dir.join("old.vsdx");
        File::create(&old)
            .unwrap()
            .set_modified(std::time::SystemTime::UNIX_EPOCH)
            .unwrap();
        let latest = settings.uploads_dir.join("lab.vsdx");
        write_package(&latest);

        let count = resolve_devices(None, &settings, true).unwrap();

        assert_eq!(count, 1);
        assert_eq!(fs::read_to_string(&settings.names_output).unwrap(), "CoreSwitch12\n");
        assert_eq!(
            fs::read_to_string(&settings.selection_record).unwrap(),
            latest.to_string_lossy()
        );
        assert!(!old.exists());
    }

    #[test]
    fn test_empty_uploads_is_package_error() {
        let temp = tempdir().unwrap();
        let err = resolve_devices(None, &settings(temp.path()), true).unwrap_err();
        assert!(err.is::<PackageError>());
        assert!(!temp.path().join("machine_names.txt").exists());
    }
}
