use super::*;

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::json;

use crate::error::{EscrollError, RequestError};

/// Scripted stand-in for the remote search service: hands out queued pages
/// and records every call it receives.
struct MockApi {
    pages: Mutex<VecDeque<Page>>,
    search_calls: Mutex<Vec<SearchParams>>,
    scroll_calls: Mutex<Vec<(String, Option<String>)>>,
    cleared: Mutex<Vec<String>>,
    fail_requests: bool,
}

impl MockApi {
    fn new(pages: Vec<Page>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            search_calls: Mutex::new(Vec::new()),
            scroll_calls: Mutex::new(Vec::new()),
            cleared: Mutex::new(Vec::new()),
            fail_requests: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail_requests: true,
            ..Self::new(Vec::new())
        }
    }

    fn next_page(&self) -> Result<Page> {
        if self.fail_requests {
            return Err(RequestError::Transport("connection refused".to_string()).into());
        }

        Ok(self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .expect("no page queued for this request"))
    }

    fn cleared(&self) -> Vec<String> {
        self.cleared.lock().unwrap().clone()
    }

    fn scroll_calls(&self) -> Vec<(String, Option<String>)> {
        self.scroll_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchApi for MockApi {
    async fn search(&self, params: &SearchParams) -> Result<Page> {
        self.search_calls.lock().unwrap().push(params.clone());
        self.next_page()
    }

    async fn scroll(&self, scroll_id: &str, keep_alive: Option<&str>) -> Result<Page> {
        self.scroll_calls
            .lock()
            .unwrap()
            .push((scroll_id.to_string(), keep_alive.map(str::to_string)));
        self.next_page()
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<()> {
        // Unknown handles are success by contract, so the mock never fails here.
        self.cleared.lock().unwrap().push(scroll_id.to_string());
        Ok(())
    }
}

fn page(hit_count: usize, scroll_id: Option<&str>) -> Page {
    let hits: Vec<_> = (0..hit_count)
        .map(|i| json!({ "_index": "tweets", "_id": i.to_string(), "_source": { "n": i } }))
        .collect();

    let mut body = json!({ "hits": { "total": hit_count, "hits": hits } });
    if let Some(id) = scroll_id {
        body["_scroll_id"] = json!(id);
    }

    serde_json::from_value(body).unwrap()
}

fn params() -> SearchParams {
    SearchParams::new(json!({ "query": "x" })).scroll("1m")
}

async fn wait_for_clear(api: &MockApi, scroll_id: &str) {
    for _ in 0..100 {
        if api.cleared().iter().any(|id| id == scroll_id) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("scroll handle '{scroll_id}' was never cleared");
}

#[tokio::test]
async fn test_scroll_scenario() {
    let api = Arc::new(MockApi::new(vec![
        page(3, Some("H1")),
        page(2, Some("H2")),
        page(0, Some("H3")),
    ]));
    let mut cursor = ScrollCursor::new(api.clone(), params());

    cursor.restart().await.unwrap();
    assert_eq!(cursor.page_index(), 0);
    assert_eq!(cursor.scroll_id(), Some("H1"));
    assert!(cursor.has_current());
    assert_eq!(cursor.current().unwrap().hit_count(), 3);

    cursor.advance().await.unwrap();
    assert_eq!(cursor.page_index(), 1);
    assert_eq!(cursor.scroll_id(), Some("H2"));
    assert!(cursor.has_current());

    cursor.advance().await.unwrap();
    assert_eq!(cursor.page_index(), 2);
    assert_eq!(cursor.scroll_id(), Some("H3"));
    assert!(!cursor.has_current());

    // discarding the cursor invalidates the last-seen handle
    drop(cursor);
    wait_for_clear(&api, "H3").await;
}

#[tokio::test]
async fn test_restart_resets_page_counter() {
    let api = Arc::new(MockApi::new(vec![
        page(2, Some("H1")),
        page(2, Some("H2")),
        page(1, Some("H4")),
    ]));
    let mut cursor = ScrollCursor::new(api.clone(), params());

    cursor.restart().await.unwrap();
    cursor.advance().await.unwrap();
    assert_eq!(cursor.page_index(), 1);

    cursor.restart().await.unwrap();
    assert_eq!(cursor.page_index(), 0);
    assert_eq!(cursor.scroll_id(), Some("H4"));

    // restarting released the previously held context first
    assert_eq!(api.cleared(), vec!["H2".to_string()]);
}

#[tokio::test]
async fn test_advance_replaces_handle_with_latest() {
    let api = Arc::new(MockApi::new(vec![page(1, Some("H1")), page(1, None)]));
    let mut cursor = ScrollCursor::new(api.clone(), params());

    cursor.restart().await.unwrap();
    cursor.advance().await.unwrap();

    // the in-memory handle mirrors the latest response, even when absent
    assert_eq!(cursor.scroll_id(), None);

    let err = cursor.advance().await.unwrap_err();
    assert!(matches!(
        err,
        EscrollError::Cursor(CursorError::MissingHandle)
    ));
}

#[tokio::test]
async fn test_advance_before_restart_fails_fast() {
    let api = Arc::new(MockApi::new(vec![]));
    let mut cursor = ScrollCursor::new(api, SearchParams::new(json!({ "query": "x" })));

    let err = cursor.advance().await.unwrap_err();
    assert!(matches!(err, EscrollError::Cursor(CursorError::NotStarted)));
}

#[tokio::test]
async fn test_has_current_truth_table() {
    let api = Arc::new(MockApi::new(vec![page(1, Some("H1")), page(0, Some("H2"))]));
    let mut cursor = ScrollCursor::new(api, params());

    // nothing fetched yet
    assert!(!cursor.has_current());

    cursor.restart().await.unwrap();
    assert!(cursor.has_current());

    cursor.advance().await.unwrap();
    assert!(!cursor.has_current());
}

#[test]
fn test_release_is_idempotent() {
    tokio_test::block_on(async {
        let api = Arc::new(MockApi::new(vec![page(1, Some("H1"))]));
        let mut cursor = ScrollCursor::new(api.clone(), params());

        cursor.restart().await.unwrap();
        cursor.release().await.unwrap();
        cursor.release().await.unwrap();

        assert_eq!(api.cleared(), vec!["H1".to_string()]);
        assert_eq!(cursor.scroll_id(), None);
    });
}

#[tokio::test]
async fn test_release_without_handle_is_noop() {
    let api = Arc::new(MockApi::new(vec![]));
    let mut cursor = ScrollCursor::new(api.clone(), params());

    cursor.release().await.unwrap();
    assert!(api.cleared().is_empty());
}

#[tokio::test]
async fn test_keep_alive_seeded_from_params_and_overridable() {
    let api = Arc::new(MockApi::new(vec![
        page(1, Some("H1")),
        page(1, Some("H2")),
        page(1, Some("H3")),
    ]));
    let mut cursor = ScrollCursor::new(api.clone(), params());

    cursor.restart().await.unwrap();
    cursor.advance().await.unwrap();

    cursor.set_keep_alive("5m");
    cursor.advance().await.unwrap();

    let calls = api.scroll_calls();
    assert_eq!(calls[0], ("H1".to_string(), Some("1m".to_string())));
    assert_eq!(calls[1], ("H2".to_string(), Some("5m".to_string())));
}

#[tokio::test]
async fn test_search_params_sent_unmodified() {
    let api = Arc::new(MockApi::new(vec![page(0, None)]));
    let params = SearchParams::new(json!({ "query": "x" }))
        .scroll("1m")
        .option("routing", json!("user1"));
    let mut cursor = ScrollCursor::new(api.clone(), params);

    cursor.restart().await.unwrap();

    let calls = api.search_calls.lock().unwrap();
    let sent = &calls[0];
    assert_eq!(sent.body, json!({ "query": "x" }));
    assert_eq!(sent.scroll.as_deref(), Some("1m"));
    assert_eq!(sent.options.get("routing"), Some(&json!("user1")));
}

#[tokio::test]
async fn test_remote_failure_propagates_unmodified() {
    let api = Arc::new(MockApi::failing());
    let mut cursor = ScrollCursor::new(api, params());

    let err = cursor.restart().await.unwrap_err();
    assert!(matches!(
        err,
        EscrollError::Request(RequestError::Transport(_))
    ));
}

#[tokio::test]
async fn test_for_each_page_visits_and_releases() {
    let api = Arc::new(MockApi::new(vec![
        page(3, Some("H1")),
        page(2, Some("H2")),
        page(0, Some("H3")),
    ]));
    let mut cursor = ScrollCursor::new(api.clone(), params());

    let mut seen = Vec::new();
    cursor
        .for_each_page(|page| {
            seen.push(page.hit_count());
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(seen, vec![3, 2]);
    assert_eq!(api.cleared(), vec!["H3".to_string()]);
}

#[tokio::test]
async fn test_for_each_page_releases_on_callback_error() {
    let api = Arc::new(MockApi::new(vec![page(3, Some("H1"))]));
    let mut cursor = ScrollCursor::new(api.clone(), params());

    let err = cursor
        .for_each_page(|_| Err(RequestError::Transport("boom".to_string()).into()))
        .await
        .unwrap_err();

    assert!(matches!(err, EscrollError::Request(_)));
    assert_eq!(api.cleared(), vec!["H1".to_string()]);
}

#[tokio::test]
async fn test_into_pages_stream() {
    let api = Arc::new(MockApi::new(vec![
        page(3, Some("H1")),
        page(2, Some("H2")),
        page(0, Some("H3")),
    ]));
    let cursor = ScrollCursor::new(api.clone(), params());

    let pages: Vec<Page> = cursor.into_pages().try_collect().await.unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].hit_count(), 3);
    assert_eq!(pages[1].hit_count(), 2);
    assert_eq!(api.cleared(), vec!["H3".to_string()]);
}

#[test]
fn test_drop_outside_runtime_does_not_panic() {
    let api = Arc::new(MockApi::new(vec![]));
    let mut cursor = ScrollCursor::new(api, params());
    cursor.scroll_id = Some("H9".to_string());

    // no runtime to spawn the cleanup on; the handle is left to expire
    drop(cursor);
}

#[test]
fn test_cursor_debug_masks_client() {
    let api = Arc::new(MockApi::new(vec![]));
    let cursor = ScrollCursor::new(api, params());

    let rendered = format!("{cursor:?}");
    assert!(rendered.contains("<SearchApi>"));
    assert!(rendered.contains("page_no"));
}
