//! In-memory template source for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CatalogError, CatalogResult};
use crate::source::TemplateSource;

const MOCK_LOCATION: &str = "mock://templates";

/// Serves canned records, or fails with a canned reason.
pub struct MockTemplateSource {
    response: Result<Vec<Value>, String>,
    calls: AtomicUsize,
}

impl MockTemplateSource {
    pub fn with_records(records: Vec<Value>) -> Self {
        Self {
            response: Ok(records),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every fetch fails with `InvalidResponse`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            response: Err(reason.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TemplateSource for MockTemplateSource {
    fn location(&self) -> String {
        MOCK_LOCATION.to_string()
    }

    async fn fetch(&self) -> CatalogResult<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(records) => Ok(records.clone()),
            Err(reason) => Err(CatalogError::InvalidResponse {
                url: MOCK_LOCATION.to_string(),
                reason: reason.clone(),
            }),
        }
    }
}
