//! Template catalog sources.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::endpoint::ServerEndpoint;
use crate::error::{CatalogError, CatalogResult};

/// Anything that can hand back the raw template records.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Human-readable location, used in logs.
    fn location(&self) -> String;

    /// Fetch every record in one request.
    async fn fetch(&self) -> CatalogResult<Vec<Value>>;
}

/// Fetches `/v2/templates` from a GNS3 server over plain HTTP.
///
/// One request per call, no retries, transport-default timeouts.
pub struct HttpTemplateSource {
    endpoint: ServerEndpoint,
    client: reqwest::Client,
}

impl HttpTemplateSource {
    pub fn new(endpoint: ServerEndpoint) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured client (proxy settings, custom timeouts).
    pub fn with_client(endpoint: ServerEndpoint, client: reqwest::Client) -> Self {
        Self { endpoint, client }
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl TemplateSource for HttpTemplateSource {
    fn location(&self) -> String {
        self.endpoint.templates_url()
    }

    async fn fetch(&self) -> CatalogResult<Vec<Value>> {
        let url = self.endpoint.templates_url();
        debug!("GET {}", url);

        let unreachable = |source| CatalogError::EndpointUnreachable {
            url: url.clone(),
            source,
        };
        let response = self.client.get(&url).send().await.map_err(unreachable)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::InvalidResponse {
                url,
                reason: format!("HTTP status {}", status),
            });
        }

        let body = response.text().await.map_err(unreachable)?;

        let records = parse_catalog_body(&url, &body)?;
        info!("Fetched {} templates from {}", records.len(), url);
        Ok(records)
    }
}

/// Parse a response body that must be a JSON array.
pub fn parse_catalog_body(url: &str, body: &str) -> CatalogResult<Vec<Value>> {
    let invalid = |reason: String| CatalogError::InvalidResponse {
        url: url.to_string(),
        reason,
    };

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(other) => Err(invalid(format!("expected a JSON array, got {}", json_type(&other)))),
        Err(e) => Err(invalid(format!("body is not JSON: {}", e))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://127.0.0.1:3080/v2/templates";

    #[test]
    fn test_parse_array() {
        let records = parse_catalog_body(URL, r#"[{"name": "R1"}, {"name": "R2"}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_rejects_object_and_garbage() {
        let err = parse_catalog_body(URL, r#"{"message": "unauthorized"}"#).unwrap_err();
        assert!(err.to_string().contains("an object"));
        assert!(err.to_string().contains(URL));

        let err = parse_catalog_body(URL, "<html>502</html>").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidResponse { .. }));
    }
}
