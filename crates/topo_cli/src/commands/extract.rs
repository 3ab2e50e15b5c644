//! Extract command - Unpack a diagram container.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use topo_package::VsdxPackage;

use crate::config::TopoConfig;

#[derive(Args)]
pub struct ExtractArgs {
    /// Container to extract
    #[arg(short, long)]
    package: PathBuf,

    /// Extraction root (defaults to the configured extract_dir)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

pub async fn execute(args: ExtractArgs, config: &TopoConfig) -> Result<()> {
    let root = args.out.unwrap_or_else(|| config.diagram.extract_dir.clone());
    info!("Extracting {:?} to {:?}", args.package, root);

    let mut package = VsdxPackage::open(&args.package)
        .with_context(|| format!("Failed to open package {}", args.package.display()))?;
    let written = package
        .extract_to(&root)
        .with_context(|| format!("Failed to extract package {}", args.package.display()))?;

    println!("✅ Extracted {} files to {}", written, root.display());
    Ok(())
}
