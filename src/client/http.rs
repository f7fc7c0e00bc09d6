//! HTTP implementation of the search client seam.
//!
//! Speaks the standard search-service REST surface over `reqwest`:
//! `POST {index}/_search?scroll=...`, `POST _search/scroll`, and
//! `DELETE _search/scroll`. Transport faults surface as request errors,
//! non-2xx answers as structured response errors; there is no retry or
//! backoff here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::error::{RequestError, ResponseError, Result};
use crate::search::{Page, SearchParams};

use super::SearchApi;

/// Scroll continuation and invalidation endpoint.
const SCROLL_PATH: &str = "_search/scroll";

/// HTTP search client.
pub struct HttpSearchClient {
    /// Underlying HTTP client; pooling and TLS live in here.
    http: reqwest::Client,

    /// Server base URL, normalized to end with a slash.
    base_url: Url,
}

impl HttpSearchClient {
    /// Create a client from connection configuration.
    ///
    /// # Arguments
    /// * `config` - Connection settings (base URL, per-request timeout)
    ///
    /// # Returns
    /// * `Result<Self>` - New client or a request error for a bad URL
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Self::with_http(http, &config.base_url)
    }

    /// Create a client around an existing `reqwest` client.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| RequestError::InvalidUrl(format!("{base_url}: {e}")))?;

        // Url::join drops the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { http, base_url })
    }

    /// Endpoint for the initial search, scoped to an index when given.
    fn search_url(&self, index: Option<&str>) -> Result<Url> {
        let path = match index {
            Some(index) => format!("{index}/_search"),
            None => "_search".to_string(),
        };

        self.join(&path)
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RequestError::InvalidUrl(format!("{path}: {e}")).into())
    }

    /// Decode a page out of a response, or surface the error body.
    async fn read_page(response: Response) -> Result<Page> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Page>().await?);
        }

        Err(Self::response_error(status, response).await.into())
    }

    async fn response_error(status: StatusCode, response: Response) -> ResponseError {
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        ResponseError::new(status.as_u16(), &body)
    }
}

#[async_trait]
impl SearchApi for HttpSearchClient {
    async fn search(&self, params: &SearchParams) -> Result<Page> {
        let mut url = self.search_url(params.index.as_deref())?;

        {
            let mut query = url.query_pairs_mut();
            if let Some(scroll) = &params.scroll {
                query.append_pair("scroll", scroll);
            }
            if let Some(size) = params.size {
                query.append_pair("size", &size.to_string());
            }
            for (name, value) in &params.options {
                query.append_pair(name, &query_value(value));
            }
        }

        debug!("Executing search request against '{}'", url);

        let response = self.http.post(url).json(&params.body).send().await?;
        Self::read_page(response).await
    }

    async fn scroll(&self, scroll_id: &str, keep_alive: Option<&str>) -> Result<Page> {
        let url = self.join(SCROLL_PATH)?;

        let mut body = json!({ "scroll_id": scroll_id });
        if let Some(keep_alive) = keep_alive {
            body["scroll"] = Value::String(keep_alive.to_string());
        }

        debug!("Advancing scroll context");

        let response = self.http.post(url).json(&body).send().await?;
        Self::read_page(response).await
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<()> {
        let url = self.join(SCROLL_PATH)?;
        let body = json!({ "scroll_id": [scroll_id] });

        debug!("Clearing scroll context");

        let response = self.http.delete(url).json(&body).send().await?;
        let status = response.status();
        if clear_scroll_succeeded(status) {
            return Ok(());
        }

        Err(Self::response_error(status, response).await.into())
    }
}

/// The invalidation call tolerates an already-unknown handle: the context
/// expires server-side on its own schedule, so "not found" is success.
fn clear_scroll_succeeded(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::NOT_FOUND
}

/// Render an option value as a query-string value.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
