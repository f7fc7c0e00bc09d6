//! The search client seam.
//!
//! The scroll cursor talks to the search service through the [`SearchApi`]
//! trait: one initial search, scroll continuations, and scroll invalidation.
//! The trait is the full collaborator contract — everything below it
//! (connection pooling, TLS, serialization) belongs to the implementation.

pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::search::{Page, SearchParams};

pub use http::HttpSearchClient;

/// Remote search capability consumed by the scroll cursor.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Execute the initial search request.
    ///
    /// When `params` carry a scroll window the returned page includes a
    /// scroll handle for retrieving the next batch.
    async fn search(&self, params: &SearchParams) -> Result<Page>;

    /// Advance an open scroll context.
    ///
    /// Returns the next page and a (possibly new) handle. `keep_alive`
    /// extends the context's window for the duration of the request.
    async fn scroll(&self, scroll_id: &str, keep_alive: Option<&str>) -> Result<Page>;

    /// Invalidate a scroll context.
    ///
    /// An unknown or already-expired handle is success, not an error: the
    /// context may have been reclaimed server-side at any time.
    async fn clear_scroll(&self, scroll_id: &str) -> Result<()>;
}
