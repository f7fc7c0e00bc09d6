//! The scroll cursor.
//!
//! A stateful cursor over the sequence of result pages of one search. The
//! cursor owns the server-side scroll context its handle names: release
//! happens at most once per handle, deterministically through [`release`]
//! or [`for_each_page`], with a best-effort fallback on drop.
//!
//! [`release`]: ScrollCursor::release
//! [`for_each_page`]: ScrollCursor::for_each_page

pub mod stream;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::SearchApi;
use crate::error::{CursorError, Result};
use crate::search::{Page, SearchParams};

/// Forward-only cursor over scrolled search results.
///
/// Holds the live scroll handle between fetches, the way the server-side
/// iteration context expects: the handle stored here always mirrors the
/// most recent response, and a stale handle is never reused.
pub struct ScrollCursor {
    /// Search client capability.
    client: Arc<dyn SearchApi>,

    /// Original query parameters, sent unmodified on every (re)start.
    params: SearchParams,

    /// Scroll keep-alive window sent with every scroll request.
    keep_alive: Option<String>,

    /// Handle of the open scroll context, if any.
    scroll_id: Option<String>,

    /// Most recently fetched page. Replaced on every fetch; no history.
    page: Option<Page>,

    /// Zero-based page counter, observational only.
    page_no: usize,
}

impl ScrollCursor {
    /// Create a cursor over a search.
    ///
    /// If `params` carry a scroll keep-alive it becomes the default window
    /// for subsequent scroll requests; otherwise set one through
    /// [`set_keep_alive`](Self::set_keep_alive) before iterating, or the
    /// server will refuse to open a scroll context.
    ///
    /// # Arguments
    /// * `client` - Search client capability
    /// * `params` - Query parameters, passed unmodified on the first request
    ///
    /// # Returns
    /// * `Self` - New cursor in the not-started state
    pub fn new(client: Arc<dyn SearchApi>, params: SearchParams) -> Self {
        let keep_alive = params.scroll.clone();

        Self {
            client,
            params,
            keep_alive,
            scroll_id: None,
            page: None,
            page_no: 0,
        }
    }

    /// Override the scroll keep-alive window sent with every subsequent
    /// scroll request. Returns `&mut Self` for chained configuration.
    pub fn set_keep_alive(&mut self, keep_alive: impl Into<String>) -> &mut Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }

    /// (Re)start the iteration at the first page.
    ///
    /// Releases any held scroll handle first, so the cursor never keeps
    /// more than one server-side context alive, then resets the counter
    /// and issues the initial search with the stored parameters.
    /// Remote failures propagate unmodified.
    pub async fn restart(&mut self) -> Result<()> {
        self.release().await?;
        self.page_no = 0;

        debug!("Starting scroll iteration");

        let page = self.client.search(&self.params).await?;
        self.scroll_id = page.scroll_id.clone();
        self.page = Some(page);

        Ok(())
    }

    /// Fetch the next page of the open scroll context.
    ///
    /// Replaces the stored page and handle with whatever the response
    /// carries and increments the page counter. Remote failures propagate
    /// unmodified.
    ///
    /// # Errors
    /// * [`CursorError::NotStarted`] - no page was ever fetched; call
    ///   [`restart`](Self::restart) first
    /// * [`CursorError::MissingHandle`] - the most recent page carried no
    ///   scroll handle to continue from
    pub async fn advance(&mut self) -> Result<()> {
        let Some(scroll_id) = self.scroll_id.as_deref() else {
            let err = if self.page.is_none() {
                CursorError::NotStarted
            } else {
                CursorError::MissingHandle
            };
            return Err(err.into());
        };

        let page = self
            .client
            .scroll(scroll_id, self.keep_alive.as_deref())
            .await?;

        self.scroll_id = page.scroll_id.clone();
        self.page = Some(page);
        self.page_no += 1;

        debug!("Advanced to page {}", self.page_no);

        Ok(())
    }

    /// Whether the stored page carries at least one hit.
    ///
    /// This is the sole termination test: an empty hits list signals the
    /// end of the sequence. A page with no hits field at all (nothing
    /// fetched yet, or a malformed response) also yields false.
    pub fn has_current(&self) -> bool {
        self.page.as_ref().is_some_and(Page::has_hits)
    }

    /// The most recently fetched page, unchanged.
    pub fn current(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    /// Zero-based index of the current page.
    pub fn page_index(&self) -> usize {
        self.page_no
    }

    /// Handle of the open scroll context, if any.
    pub fn scroll_id(&self) -> Option<&str> {
        self.scroll_id.as_deref()
    }

    /// Release the server-side scroll context, if one is held.
    ///
    /// The handle is taken out of the cursor before the invalidation call,
    /// so it is invalidated at most once and never reused afterwards.
    /// Safe to call with no handle held; calling twice is a no-op the
    /// second time.
    pub async fn release(&mut self) -> Result<()> {
        if let Some(scroll_id) = self.scroll_id.take() {
            debug!("Releasing scroll context");
            self.client.clear_scroll(&scroll_id).await?;
        }

        Ok(())
    }

    /// Scoped iteration with guaranteed release.
    ///
    /// Restarts the cursor, passes every non-empty page to `visit`, and
    /// releases the scroll context when the sequence is exhausted — or
    /// when a fetch or the callback fails. The first error wins; a release
    /// error after successful iteration propagates as well.
    pub async fn for_each_page<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(&Page) -> Result<()>,
    {
        let outcome = self.visit_pages(&mut visit).await;
        let released = self.release().await;

        outcome.and(released)
    }

    async fn visit_pages<F>(&mut self, visit: &mut F) -> Result<()>
    where
        F: FnMut(&Page) -> Result<()>,
    {
        self.restart().await?;

        while self.has_current() {
            if let Some(page) = self.page.as_ref() {
                visit(page)?;
            }
            self.advance().await?;
        }

        Ok(())
    }
}

/// Fallback cleanup: invalidate a still-held handle without blocking drop.
///
/// Errors cannot reach the caller here, so they are logged and swallowed.
/// Outside a runtime the context is left to expire through its server-side
/// keep-alive.
impl Drop for ScrollCursor {
    fn drop(&mut self) {
        let Some(scroll_id) = self.scroll_id.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let client = Arc::clone(&self.client);
                handle.spawn(async move {
                    if let Err(err) = client.clear_scroll(&scroll_id).await {
                        warn!("Failed to clear scroll context on drop: {err}");
                    }
                });
            }
            Err(_) => {
                warn!("Scroll context dropped outside a runtime; waiting on server-side expiry");
            }
        }
    }
}

/// Manual Debug implementation since the client capability doesn't implement Debug
impl fmt::Debug for ScrollCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollCursor")
            .field("keep_alive", &self.keep_alive)
            .field("scroll_id", &self.scroll_id)
            .field("page_no", &self.page_no)
            .field("client", &"<SearchApi>")
            .finish()
    }
}
