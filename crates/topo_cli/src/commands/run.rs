//! Run command - Device pipeline, then template pipeline.

use anyhow::Result;
use clap::Args;
use tracing::error;

use topo_catalog::ServerEndpoint;

use crate::commands::{devices, templates};
use crate::config::TopoConfig;

#[derive(Args)]
pub struct RunArgs {
    /// Template server as <host>,<port> (overrides the catalog settings)
    #[arg(short, long, env = "TOPO_SERVER")]
    server: Option<ServerEndpoint>,

    /// Skip the device name pipeline
    #[arg(long)]
    skip_devices: bool,

    /// Skip the template pipeline
    #[arg(long)]
    skip_templates: bool,

    /// Keep older containers in the upload directory
    #[arg(long)]
    keep_old: bool,
}

/// Both pipelines run even if the first fails; the first failure is returned.
pub async fn execute(args: RunArgs, config: &TopoConfig) -> Result<()> {
    let mut failures = Vec::new();

    if !args.skip_devices {
        println!("📋 Resolving device names...");
        match devices::resolve_devices(None, &config.diagram, !args.keep_old) {
            Ok(count) => println!(
                "   ✅ {} device names saved to {}",
                count,
                config.diagram.names_output.display()
            ),
            Err(e) => {
                error!("Device pipeline failed: {:#}", e);
                failures.push(e);
            }
        }
    }

    if !args.skip_templates {
        println!("📦 Building template catalog...");
        let result = match templates::select_endpoint(args.server.clone(), &config.catalog) {
            Ok(endpoint) => templates::fetch_templates(endpoint, &config.catalog).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(summary) => println!(
                "   ✅ {} of {} templates saved to {}",
                summary.written,
                summary.fetched,
                summary.output.display()
            ),
            Err(e) => {
                error!("Template pipeline failed: {:#}", e);
                failures.push(e);
            }
        }
    }

    match failures.into_iter().next() {
        Some(first) => Err(first),
        None => Ok(()),
    }
}
