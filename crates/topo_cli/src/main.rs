//! topo CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Package error
//! - 4: Diagram descriptor error
//! - 5: Template catalog error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use topo_catalog::CatalogError;
use topo_diagram::DiagramError;
use topo_package::PackageError;

mod commands;
mod config;

use commands::{Cli, Commands};
use config::{ConfigError, TopoConfig};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_CONFIG: u8 = 2;
    pub const PACKAGE_ERROR: u8 = 3;
    pub const DIAGRAM_ERROR: u8 = 4;
    pub const CATALOG_ERROR: u8 = 5;
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match TopoConfig::load(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Extract(args) => commands::extract::execute(args, &config).await,
            Commands::Devices(args) => commands::devices::execute(args, &config).await,
            Commands::Templates(args) => commands::templates::execute(args, &config).await,
            Commands::Run(args) => commands::run::execute(args, &config).await,
        },
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    // RUST_LOG replaces the defaults entirely. "topo" also matches the topo_* crates.
    let directives = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.is_empty() => directives,
        _ => format!("topo={},warn", level),
    };
    let filter = EnvFilter::builder().parse_lossy(directives);

    // Logging may already be initialized; keep going either way.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}

/// Map the typed error behind a failure to its exit code.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.is::<ConfigError>() {
            return ExitCodes::INVALID_CONFIG;
        }
        if cause.is::<PackageError>() {
            return ExitCodes::PACKAGE_ERROR;
        }
        if let Some(diagram) = cause.downcast_ref::<DiagramError>() {
            return match diagram {
                DiagramError::Package(_) => ExitCodes::PACKAGE_ERROR,
                _ => ExitCodes::DIAGRAM_ERROR,
            };
        }
        if let Some(catalog) = cause.downcast_ref::<CatalogError>() {
            return match catalog {
                CatalogError::InvalidEndpoint(_) | CatalogError::ServerConfig { .. } => {
                    ExitCodes::INVALID_CONFIG
                }
                _ => ExitCodes::CATALOG_ERROR,
            };
        }
    }
    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_categorize_through_context() {
        let err = Err::<(), _>(PackageError::NoPackage(PathBuf::from("uploads")))
            .context("Failed to select package")
            .unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::PACKAGE_ERROR);

        let err = anyhow::Error::new(DiagramError::MalformedDescriptor {
            path: PathBuf::from("page1.xml"),
            message: "unexpected end of document".to_string(),
        });
        assert_eq!(categorize_error(&err), ExitCodes::DIAGRAM_ERROR);

        let err = anyhow::Error::new(CatalogError::InvalidEndpoint("nowhere".to_string()));
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_CONFIG);

        let err = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }
}
