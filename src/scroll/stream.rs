//! Stream adapter over the scroll cursor.

use futures::Stream;
use futures::stream;

use crate::error::Result;
use crate::search::Page;

use super::ScrollCursor;

impl ScrollCursor {
    /// Consume the cursor, yielding every non-empty page in order.
    ///
    /// The iteration is started (or restarted) on the first poll, and the
    /// scroll context is released when the server returns an empty page.
    /// A failed fetch ends the stream with its error; the context is then
    /// cleaned up by the cursor's drop fallback.
    pub fn into_pages(self) -> impl Stream<Item = Result<Page>> + Send {
        stream::try_unfold((self, false), |(mut cursor, started)| async move {
            if started {
                cursor.advance().await?;
            } else {
                cursor.restart().await?;
            }

            let page = match cursor.current() {
                Some(page) if page.has_hits() => page.clone(),
                _ => {
                    cursor.release().await?;
                    return Ok(None);
                }
            };

            Ok(Some((page, (cursor, true))))
        })
    }
}
