//! Template server endpoint.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};

/// Path of the template listing on a GNS3 server.
pub const TEMPLATES_PATH: &str = "/v2/templates";

static HOST_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"host\s*=\s*([\d.]+)").expect("host pattern is valid"));
static PORT_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"port\s*=\s*(\d+)").expect("port pattern is valid"));

/// Host and port of a template server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    pub host: String,
    pub port: u16,
}

impl ServerEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Read `host = ...` and `port = ...` from a GNS3 server config file.
    pub fn from_server_config(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        debug!("Reading server config from {:?}", path);

        let config_error = |reason: String| CatalogError::ServerConfig {
            path: path.to_path_buf(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;

        let host = HOST_ENTRY
            .captures(&content)
            .and_then(|c| c.get(1))
            .ok_or_else(|| config_error("no host entry".to_string()))?
            .as_str();
        let port = PORT_ENTRY
            .captures(&content)
            .and_then(|c| c.get(1))
            .ok_or_else(|| config_error("no port entry".to_string()))?
            .as_str()
            .parse::<u16>()
            .map_err(|e| config_error(format!("invalid port: {}", e)))?;

        let endpoint = Self::new(host, port);
        info!("Found template server: {}", endpoint);
        Ok(endpoint)
    }

    pub fn templates_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, TEMPLATES_PATH)
    }

    /// Write `<host>\n<port>\n`, replacing any previous file.
    pub fn write_details(&self, path: impl AsRef<Path>) -> CatalogResult<()> {
        let path = path.as_ref();
        fs::write(path, format!("{}\n{}\n", self.host, self.port)).map_err(|source| {
            CatalogError::WriteFailure {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!("Server details saved to {:?}", path);
        Ok(())
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for ServerEndpoint {
    type Err = CatalogError;

    /// Parse `<host>,<port>` or `<host>:<port>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CatalogError::InvalidEndpoint(s.to_string());
        let (host, port) = s
            .split_once(',')
            .or_else(|| s.rsplit_once(':'))
            .ok_or_else(invalid)?;

        let host = host.trim();
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.trim().parse::<u16>().map_err(|_| invalid())?;

        Ok(Self::new(host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_endpoint() {
        assert_eq!(
            "192.168.1.20,3080".parse::<ServerEndpoint>().unwrap(),
            ServerEndpoint::new("192.168.1.20", 3080)
        );
        assert_eq!(
            "localhost:3080".parse::<ServerEndpoint>().unwrap(),
            ServerEndpoint::new("localhost", 3080)
        );
        assert!("localhost".parse::<ServerEndpoint>().is_err());
        assert!(",3080".parse::<ServerEndpoint>().is_err());
        assert!("host,99999".parse::<ServerEndpoint>().is_err());
    }

    #[test]
    fn test_templates_url() {
        let endpoint = ServerEndpoint::new("10.0.0.5", 3080);
        assert_eq!(endpoint.templates_url(), "http://10.0.0.5:3080/v2/templates");
    }

    #[test]
    fn test_from_server_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("gns3_server.conf");
        fs::write(&path, "[Server]\nhost = 172.16.0.9\nport = 3080\nauth = False\n").unwrap();

        let endpoint = ServerEndpoint::from_server_config(&path).unwrap();
        assert_eq!(endpoint, ServerEndpoint::new("172.16.0.9", 3080));

        fs::write(&path, "[Server]\nport = 3080\n").unwrap();
        let err = ServerEndpoint::from_server_config(&path).unwrap_err();
        assert!(matches!(err, CatalogError::ServerConfig { .. }));
    }

    #[test]
    fn test_entry_patterns() {
        assert_eq!(&HOST_ENTRY.captures("host=192.168.1.20").unwrap()[1], "192.168.1.20");
        assert_eq!(&PORT_ENTRY.captures("port   =  3080").unwrap()[1], "3080");
        assert!(!HOST_ENTRY.is_match("host = localhost"));
    }

    #[test]
    fn test_server_config_read_twice() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("gns3_server.conf");
        fs::write(&path, "host = 10.9.8.7\nport = 8000\n").unwrap();

        let first = ServerEndpoint::from_server_config(&path).unwrap();
        let second = ServerEndpoint::from_server_config(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, ServerEndpoint::new("10.9.8.7", 8000));
    }

    #[test]
    fn test_write_details() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("gns3_server_details.txt");
        ServerEndpoint::new("127.0.0.1", 3080).write_details(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "127.0.0.1\n3080\n");
    }
}
