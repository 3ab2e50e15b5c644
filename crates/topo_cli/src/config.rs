//! `topo.toml` configuration.
//!
//! Every value has a default, so a missing file is not an error. Command-line
//! flags override what is loaded here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "topo.toml";

/// Errors loading the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TopoConfig {
    pub diagram: DiagramSettings,
    pub catalog: CatalogSettings,
}

/// Device name pipeline settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramSettings {
    /// Directory uploaded containers land in
    pub uploads_dir: PathBuf,
    /// Extraction root for the selected container
    pub extract_dir: PathBuf,
    /// Device name output file
    pub names_output: PathBuf,
    /// File recording which container was processed
    pub selection_record: PathBuf,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from("uploads"),
            extract_dir: PathBuf::from("extracted_vsdx"),
            names_output: PathBuf::from("machine_names.txt"),
            selection_record: PathBuf::from("vsdx_path.txt"),
        }
    }
}

/// Template pipeline settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// GNS3 server config to read host and port from
    pub server_config: Option<PathBuf>,
    pub templates_output: PathBuf,
    pub server_details: PathBuf,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            server_config: None,
            templates_output: PathBuf::from("gns3_templates.json"),
            server_details: PathBuf::from("gns3_server_details.txt"),
        }
    }
}

impl TopoConfig {
    /// Load `path`, or `topo.toml` from the working directory if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            debug!("No config file, using defaults");
            return Ok(Self::default());
        }

        debug!("Loading config from {:?}", path);
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(TopoConfig::parse("").unwrap(), TopoConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = TopoConfig::parse(
            r#"
[diagram]
uploads_dir = "/srv/visio/uploads"

[catalog]
host = "192.168.56.1"
port = 3080
"#,
        )
        .unwrap();

        assert_eq!(config.diagram.uploads_dir, PathBuf::from("/srv/visio/uploads"));
        assert_eq!(config.diagram.extract_dir, PathBuf::from("extracted_vsdx"));
        assert_eq!(config.catalog.host.as_deref(), Some("192.168.56.1"));
        assert_eq!(config.catalog.port, Some(3080));
        assert_eq!(config.catalog.templates_output, PathBuf::from("gns3_templates.json"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(TopoConfig::parse("[catalog]\nhots = \"x\"\n").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = tempdir().unwrap();
        let err = TopoConfig::load(Some(temp.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("topo.toml");
        fs::write(&path, "[diagram]\nnames_output = \"out/names.txt\"\n").unwrap();

        let config = TopoConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.diagram.names_output, PathBuf::from("out/names.txt"));
    }
}
