//! Request and response payload types.
//!
//! The pieces this crate inspects or routes are modeled as named, typed
//! fields; everything else is carried verbatim in open JSON maps so the
//! caller's payloads pass through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters for the initial search request.
///
/// The query `body` is opaque to this crate and is sent unmodified. Options
/// the crate does not recognize go into `options` and are forwarded as query
/// parameters verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Index (or comma-separated indices) to search. `None` searches all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// Scroll keep-alive window for the initial request, e.g. `"1m"`.
    ///
    /// Without it the server will not open a scroll context and no handle
    /// will be available to advance with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<String>,

    /// Page size per fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Query body, passed through verbatim.
    #[serde(default)]
    pub body: Value,

    /// Any further request options, forwarded verbatim.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl SearchParams {
    /// Create search parameters around a query body.
    ///
    /// # Arguments
    /// * `body` - Query body, sent to the server unmodified
    ///
    /// # Returns
    /// * `Self` - New parameters with no index, scroll window, or size set
    pub fn new(body: Value) -> Self {
        Self {
            index: None,
            scroll: None,
            size: None,
            body,
            options: Map::new(),
        }
    }

    /// Set the index to search.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Set the scroll keep-alive window, e.g. `"1m"`.
    pub fn scroll(mut self, keep_alive: impl Into<String>) -> Self {
        self.scroll = Some(keep_alive.into());
        self
    }

    /// Set the page size per fetch.
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Attach an arbitrary request option, forwarded verbatim.
    pub fn option(mut self, name: impl Into<String>, value: Value) -> Self {
        self.options.insert(name.into(), value);
        self
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}

/// One batch of search results plus the handle for retrieving the next batch.
///
/// The scroll handle and the hits envelope are both modeled with explicit
/// presence: a page missing either field deserializes to `None` rather than
/// an assumed empty value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Server-issued token naming the open scroll context, if any.
    #[serde(
        rename = "_scroll_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub scroll_id: Option<String>,

    /// The hits envelope, absent on malformed or non-search responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hits: Option<Hits>,

    /// Remainder of the response (`took`, `timed_out`, `_shards`, ...),
    /// preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    /// Matched records on this page, empty when the hits envelope is absent.
    pub fn hits(&self) -> &[Hit] {
        self.hits.as_ref().map_or(&[], |h| h.hits.as_slice())
    }

    /// Number of hits on this page.
    pub fn hit_count(&self) -> usize {
        self.hits().len()
    }

    /// Whether this page carries at least one hit.
    ///
    /// An empty hits list (the normal terminal page) and a missing hits
    /// field both count as no content.
    pub fn has_hits(&self) -> bool {
        !self.hits().is_empty()
    }
}

/// The hits envelope of a search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hits {
    /// Total match count. Opaque: a bare number on older servers, an
    /// object with `value`/`relation` on newer ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,

    /// The matched records of this page.
    #[serde(default)]
    pub hits: Vec<Hit>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Hits {
    /// Best-effort numeric total across server generations.
    pub fn total_hits(&self) -> Option<u64> {
        match self.total.as_ref()? {
            Value::Number(n) => n.as_u64(),
            Value::Object(obj) => obj.get("value").and_then(Value::as_u64),
            _ => None,
        }
    }
}

/// One matched result record within a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// The stored document, opaque to this crate.
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
