//! Search guard tests against an in-memory catalog

use async_trait::async_trait;
use cadence_catalog_client::{
    Catalog, CatalogError, Result, SearchOutcome, SearchPage, SearchSession,
};
use cadence_core::Song;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Catalog whose search responses are released by the test
#[derive(Default)]
struct GatedCatalog {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<SearchPage>>>>,
    calls: Mutex<Vec<String>>,
    searches: AtomicUsize,
}

impl GatedCatalog {
    fn gate(&self, query: &str) -> oneshot::Sender<Result<SearchPage>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }
}

#[async_trait]
impl Catalog for GatedCatalog {
    async fn search_songs(&self, query: &str, _page: u32) -> Result<SearchPage> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(query.to_string());
        let gate = self.gates.lock().unwrap().remove(query);
        match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| Ok(SearchPage::default())),
            None => Ok(page_of(&[query])),
        }
    }

    async fn song_details(&self, id: &str) -> Result<Vec<Song>> {
        Ok(vec![Song::new(id, id)])
    }

    async fn recommendations(&self, _id: &str) -> Result<Vec<Song>> {
        Ok(Vec::new())
    }
}

fn page_of(ids: &[&str]) -> SearchPage {
    SearchPage {
        results: ids.iter().map(|id| Song::new(*id, *id)).collect(),
        total: ids.len() as u64,
        start: 0,
    }
}

#[tokio::test]
async fn query_is_trimmed_before_search() {
    let session = SearchSession::new(GatedCatalog::default());

    let outcome = session.search("  daft punk \n", 1).await.unwrap();

    assert_eq!(*session.catalog().calls.lock().unwrap(), vec!["daft punk"]);
    match outcome {
        SearchOutcome::Fresh { query, page } => {
            assert_eq!(query, "daft punk");
            assert_eq!(page.results[0].id, "daft punk");
        }
        SearchOutcome::Stale => panic!("single search cannot be stale"),
    }
}

#[tokio::test]
async fn empty_query_short_circuits() {
    let session = SearchSession::new(GatedCatalog::default());

    let outcome = session.search("   ", 1).await.unwrap();

    assert_eq!(session.catalog().searches.load(Ordering::SeqCst), 0);
    assert_eq!(outcome.into_page(), Some(SearchPage::default()));
}

#[tokio::test]
async fn slow_older_response_is_stale() {
    let session = SearchSession::new(GatedCatalog::default());
    let release_old = session.catalog().gate("old");
    let release_new = session.catalog().gate("new");

    let old = session.search("old", 1);
    let new = session.search("new", 1);
    let responder = async {
        // Newer query answers first, older one arrives late
        release_new.send(Ok(page_of(&["n1"]))).unwrap();
        tokio::task::yield_now().await;
        release_old.send(Ok(page_of(&["o1"]))).unwrap();
    };

    let (old, new, ()) = tokio::join!(old, new, responder);

    assert!(old.unwrap().is_stale());
    let page = new.unwrap().into_page().unwrap();
    assert_eq!(page.results[0].id, "n1");
}

#[tokio::test]
async fn stale_error_is_not_surfaced() {
    let session = SearchSession::new(GatedCatalog::default());
    let release_old = session.catalog().gate("old");

    let old = session.search("old", 1);
    let newer = async {
        // Let the first search reach the catalog before starting the next
        tokio::task::yield_now().await;
        let outcome = session.search("new", 1).await;
        release_old
            .send(Err(CatalogError::Network {
                status: Some(500),
                message: "boom".into(),
            }))
            .unwrap();
        outcome
    };

    let (old, newer) = tokio::join!(old, newer);

    assert!(old.unwrap().is_stale());
    assert!(!newer.unwrap().is_stale());
}

#[tokio::test]
async fn clear_invalidates_search_in_flight() {
    let session = SearchSession::new(GatedCatalog::default());
    let release = session.catalog().gate("pending");

    let search = session.search("pending", 1);
    let clearer = async {
        tokio::task::yield_now().await;
        session.clear();
        release.send(Ok(page_of(&["p1"]))).unwrap();
    };

    let (outcome, ()) = tokio::join!(search, clearer);

    assert!(outcome.unwrap().is_stale());
}

#[tokio::test]
async fn latest_error_is_returned() {
    let session = SearchSession::new(GatedCatalog::default());
    let release = session.catalog().gate("broken");
    release
        .send(Err(CatalogError::Network {
            status: None,
            message: "offline".into(),
        }))
        .unwrap();

    let err = session.search("broken", 1).await.unwrap_err();
    assert!(err.is_network());
}
