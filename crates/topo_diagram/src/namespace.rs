//! Namespace-qualified element names.
//!
//! Descriptor elements are matched on the (namespace URI, local name) pair.
//! Prefixes used in code (`visio:Shape`) are resolved through an explicit
//! [`NamespaceTable`], never through whatever prefix the document happens to
//! declare.

use std::collections::HashMap;

use crate::error::{DiagramError, DiagramResult};

/// Namespace of Visio 2013+ page and master parts.
pub const VISIO_NAMESPACE: &str = "http://schemas.microsoft.com/office/visio/2012/main";

/// Prefix → namespace URI table.
#[derive(Debug, Clone, Default)]
pub struct NamespaceTable {
    prefixes: HashMap<String, String>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the `visio` prefix bound.
    pub fn visio() -> Self {
        Self::new().with("visio", VISIO_NAMESPACE)
    }

    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), uri.into());
        self
    }

    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Expand `prefix:local` into a namespace/local-name pair.
    pub fn expand(&self, qualified: &str) -> DiagramResult<ExpandedName> {
        let (prefix, local) = qualified
            .split_once(':')
            .ok_or_else(|| DiagramError::UnknownPrefix(qualified.to_string()))?;
        let uri = self
            .uri(prefix)
            .ok_or_else(|| DiagramError::UnknownPrefix(qualified.to_string()))?;

        Ok(ExpandedName {
            namespace: uri.to_string(),
            local: local.to_string(),
        })
    }
}

/// An element name bound to its namespace URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedName {
    pub namespace: String,
    pub local: String,
}

impl ExpandedName {
    pub fn matches(&self, namespace: &[u8], local: &[u8]) -> bool {
        self.namespace.as_bytes() == namespace && self.local.as_bytes() == local
    }
}
