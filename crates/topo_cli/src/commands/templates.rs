//! Templates command - Fetch and normalize the template catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use topo_catalog::{CatalogPipeline, CatalogSummary, HttpTemplateSource, ServerEndpoint};

use crate::config::{CatalogSettings, TopoConfig};

#[derive(Args)]
pub struct TemplatesArgs {
    /// Template server as <host>,<port>
    #[arg(short, long, env = "TOPO_SERVER")]
    server: Option<ServerEndpoint>,

    /// GNS3 server config to read host and port from
    #[arg(long, conflicts_with = "server")]
    server_config: Option<PathBuf>,

    /// Normalized catalog output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Server details output file
    #[arg(long)]
    details: Option<PathBuf>,
}

pub async fn execute(args: TemplatesArgs, config: &TopoConfig) -> Result<()> {
    let mut settings = config.catalog.clone();
    if let Some(path) = args.server_config {
        settings.server_config = Some(path);
    }
    if let Some(output) = args.output {
        settings.templates_output = output;
    }
    if let Some(details) = args.details {
        settings.server_details = details;
    }

    let endpoint = select_endpoint(args.server, &settings)?;
    let summary = fetch_templates(endpoint, &settings).await?;
    println!(
        "✅ {} of {} templates saved to {}",
        summary.written,
        summary.fetched,
        summary.output.display()
    );
    Ok(())
}

/// An explicit `--server` (or `TOPO_SERVER`) wins over the settings.
pub fn select_endpoint(server: Option<ServerEndpoint>, settings: &CatalogSettings) -> Result<ServerEndpoint> {
    match server {
        Some(endpoint) => Ok(endpoint),
        None => resolve_endpoint(settings),
    }
}

/// Endpoint from the settings: a server config file wins over host/port.
pub fn resolve_endpoint(settings: &CatalogSettings) -> Result<ServerEndpoint> {
    if let Some(path) = &settings.server_config {
        return ServerEndpoint::from_server_config(path)
            .with_context(|| format!("Failed to read server config {}", path.display()));
    }

    match (&settings.host, settings.port) {
        (Some(host), Some(port)) => Ok(ServerEndpoint::new(host.clone(), port)),
        _ => anyhow::bail!(
            "No template server configured: pass --server <host>,<port>, --server-config, \
             or set catalog.host and catalog.port"
        ),
    }
}

/// Record the server details, then run the template pipeline.
pub async fn fetch_templates(endpoint: ServerEndpoint, settings: &CatalogSettings) -> Result<CatalogSummary> {
    endpoint.write_details(&settings.server_details)?;

    let url = endpoint.templates_url();
    let pipeline = CatalogPipeline::new(HttpTemplateSource::new(endpoint));
    let summary = pipeline
        .run(&settings.templates_output)
        .await
        .with_context(|| format!("Failed to build the template catalog from {}", url))?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_endpoint_from_settings() {
        let settings = CatalogSettings {
            host: Some("10.1.1.1".to_string()),
            port: Some(3080),
            ..CatalogSettings::default()
        };
        assert_eq!(resolve_endpoint(&settings).unwrap(), ServerEndpoint::new("10.1.1.1", 3080));
    }

    #[test]
    fn test_server_config_wins() {
        let temp = tempdir().unwrap();
        let conf = temp.path().join("gns3_server.conf");
        fs::write(&conf, "[Server]\nhost = 127.0.0.1\nport = 3081\n").unwrap();

        let settings = CatalogSettings {
            host: Some("10.1.1.1".to_string()),
            port: Some(3080),
            server_config: Some(conf),
            ..CatalogSettings::default()
        };
        assert_eq!(resolve_endpoint(&settings).unwrap(), ServerEndpoint::new("127.0.0.1", 3081));
    }

    #[test]
    fn test_explicit_server_wins() {
        let settings = CatalogSettings {
            host: Some("10.1.1.1".to_string()),
            port: Some(3080),
            ..CatalogSettings::default()
        };
        let explicit = ServerEndpoint::new("192.168.0.2", 3081);
        assert_eq!(select_endpoint(Some(explicit.clone()), &settings).unwrap(), explicit);
        assert_eq!(select_endpoint(None, &settings).unwrap(), ServerEndpoint::new("10.1.1.1", 3080));
    }

    #[test]
    fn test_missing_endpoint() {
        let settings = CatalogSettings {
            host: Some("10.1.1.1".to_string()),
            ..CatalogSettings::default()
        };
        assert!(resolve_endpoint(&settings).is_err());
    }
}
