use std::time::Duration;

use serde_json::Value;

use crate::search::record::decode_records;
use crate::service::{SearchError, SearchFuture, SearchResponse, SearchService, STATUS_OK};

/// Queries a forum search endpoint over HTTP: `GET {endpoint}?{param}={query}`.
/// The body is either a JSON array of records or an object with a `data` array.
pub struct HttpSearch {
    client: reqwest::Client,
    endpoint: String,
    query_param: String,
    timeout: Duration,
}

impl HttpSearch {
    pub fn new(
        endpoint: String,
        query_param: String,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            query_param,
            timeout,
        })
    }
}

impl SearchService for HttpSearch {
    fn name(&self) -> &str {
        "http"
    }

    fn search(&self, query: &str) -> SearchFuture {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let param = self.query_param.clone();
        let query = query.to_string();
        let timeout_ms = self.timeout.as_millis() as u64;

        Box::pin(async move {
            let map_err = |e: reqwest::Error| {
                if e.is_timeout() {
                    SearchError::Timeout(timeout_ms)
                } else {
                    SearchError::Transport(e.to_string())
                }
            };

            let response = client
                .get(&endpoint)
                .query(&[(param.as_str(), query.as_str())])
                .send()
                .await
                .map_err(map_err)?;

            let status = response.status().as_u16();
            if status != STATUS_OK {
                return Ok(SearchResponse {
                    status,
                    records: Vec::new(),
                    skipped: 0,
                });
            }

            let body: Value = response.json().await.map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout(timeout_ms)
                } else {
                    SearchError::Decode(e.to_string())
                }
            })?;
            let (records, skipped) = decode_records(record_values(body)?);
            tracing::debug!(
                "HTTP search '{}': {} records, {} skipped",
                query,
                records.len(),
                skipped
            );
            Ok(SearchResponse {
                status,
                records,
                skipped,
            })
        })
    }
}

fn record_values(body: Value) -> Result<Vec<Value>, SearchError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(SearchError::Decode("expected a `data` array".into())),
        },
        _ => Err(SearchError::Decode("expected a JSON array of records".into())),
    }
}
