pub mod command;
pub mod http;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::{SearchBackend, SearchConfig};
use crate::search::record::SearchRecord;

pub use command::CommandSearch;
pub use http::HttpSearch;

/// Status the widget treats as a successful lookup
pub const STATUS_OK: u16 = 200;

/// A completed lookup: the status reported by the backend and the records
/// that decoded cleanly, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub status: u16,
    pub records: Vec<SearchRecord>,
    /// Records dropped because a required field was missing or malformed
    pub skipped: usize,
}

impl SearchResponse {
    pub fn ok(records: Vec<SearchRecord>) -> Self {
        Self {
            status: STATUS_OK,
            records,
            skipped: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Failures raised before a status could be obtained.
/// Payloads are strings so the error can travel inside UI messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("search timed out after {0}ms")]
    Timeout(u64),

    #[error("failed to decode search response: {0}")]
    Decode(String),

    #[error("failed to spawn search command {command:?}: {reason}")]
    Spawn { command: String, reason: String },

    #[error("search backend is not configured: {0}")]
    NotConfigured(String),
}

pub type SearchFuture = Pin<Box<dyn Future<Output = Result<SearchResponse, SearchError>> + Send>>;

/// The remote lookup the widget depends on (extensibility point)
pub trait SearchService: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Look up `query`. Implementations must not block the caller; the
    /// returned future may take arbitrarily long to resolve.
    fn search(&self, query: &str) -> SearchFuture;
}

/// Build the backend selected in the configuration.
pub fn from_config(config: &SearchConfig) -> Result<Arc<dyn SearchService>, SearchError> {
    match config.backend {
        SearchBackend::Http => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                SearchError::NotConfigured("search.endpoint is required for the http backend".into())
            })?;
            Ok(Arc::new(HttpSearch::new(
                endpoint,
                config.query_param.clone(),
                config.timeout(),
            )?))
        }
        SearchBackend::Command => {
            if config.command.is_empty() {
                return Err(SearchError::NotConfigured(
                    "search.command is required for the command backend".into(),
                ));
            }
            Ok(Arc::new(CommandSearch::new(
                config.command.clone(),
                config.input.clone(),
                config.timeout(),
            )))
        }
    }
}
