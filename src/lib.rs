//! Scroll-based result iteration for Elasticsearch-compatible search services.
//!
//! This library wraps a search client's scroll API behind a forward-only,
//! single-pass iteration surface: one initial search request, then scroll
//! requests in a loop until the server returns an empty page, with the
//! server-side scroll context released when iteration ends.
//!
//! # Modules
//!
//! - `client`: The search client seam and the HTTP implementation
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `logging`: Tracing subscriber setup
//! - `scroll`: The scroll cursor and page stream
//! - `search`: Request and response payload types
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use escroll::{Config, HttpSearchClient, ScrollCursor, SearchParams};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = Arc::new(HttpSearchClient::new(&config.connection)?);
//!
//!     let params = SearchParams::new(json!({ "query": { "match_all": {} } }))
//!         .index("tweets")
//!         .scroll("1m");
//!
//!     let mut cursor = ScrollCursor::new(client, params);
//!     cursor.restart().await?;
//!     while cursor.has_current() {
//!         if let Some(page) = cursor.current() {
//!             println!("page {}: {} hits", cursor.page_index(), page.hit_count());
//!         }
//!         cursor.advance().await?;
//!     }
//!     cursor.release().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod scroll;
pub mod search;

// Re-export commonly used types
pub use client::{HttpSearchClient, SearchApi};
pub use config::Config;
pub use error::{EscrollError, Result};
pub use scroll::ScrollCursor;
pub use search::{Hit, Hits, Page, SearchParams};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
