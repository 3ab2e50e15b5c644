//! CLI command definitions.
//!
//! Each subcommand runs one stage or pipeline of the diagram-to-GNS3 flow.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod devices;
pub mod extract;
pub mod run;
pub mod templates;

/// topo - Visio diagram to GNS3 topology preparation
#[derive(Parser)]
#[command(name = "topo")]
#[command(version, about = "topo - Visio diagram to GNS3 topology preparation")]
#[command(long_about = r#"
topo turns a Visio network diagram and a GNS3 server's template catalog into
the two input files a GNS3 topology builder needs.

WORKFLOWS:
  extract    → Unpack a .vsdx container
  devices    → Resolve device names from a diagram (machine_names.txt)
  templates  → Normalize the server's template catalog (gns3_templates.json)
  run        → devices, then templates

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or configuration
  3 - Package error
  4 - Diagram descriptor error
  5 - Template catalog error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file (defaults to ./topo.toml when present)
    #[arg(short, long, global = true, env = "TOPO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a diagram container
    Extract(extract::ExtractArgs),

    /// Resolve device names from a diagram
    Devices(devices::DevicesArgs),

    /// Fetch and normalize the template catalog
    Templates(templates::TemplatesArgs),

    /// Run the device and template pipelines
    Run(run::RunArgs),
}
