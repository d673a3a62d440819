mod common;

use std::sync::Arc;
use std::time::Duration;

use content_api::{ContentApiError, ContentClient, Session};
use feedscroll::domain::{FeedPhase, FeedQuery};
use feedscroll::errors::FeedError;
use feedscroll::services::{FeedLoader, FetchService, LoadOutcome, Sentinel, SkipReason};
use feedscroll::sources::SourceRegistry;

use common::{listing_body, TestServer};

fn fetcher(server: &TestServer, session: Option<&Session>) -> Arc<FetchService> {
    let client = ContentClient::new(&server.url, session, Duration::from_secs(5)).unwrap();
    Arc::new(FetchService::new(client, SourceRegistry::new()))
}

#[tokio::test]
async fn test_twenty_posts_load_in_three_requests() {
    let server = TestServer::paged(20);
    let loader = FeedLoader::new(fetcher(&server, None), FeedQuery::home(), 9);
    let mut sentinel = Sentinel::new(loader.clone());

    loader.load_initial().await.unwrap();
    while let Some(outcome) = sentinel.observe(true).await.unwrap() {
        assert!(matches!(outcome, LoadOutcome::Loaded { .. }));
    }

    let state = loader.state();
    assert_eq!(state.items.len(), 20);
    assert_eq!(state.current_page, 3);
    assert!(!state.has_more);
    assert_eq!(state.phase(), FeedPhase::Exhausted);

    let requests = server.requests();
    let pages: Vec<String> = requests.iter().filter_map(|r| r.param("page")).collect();
    assert_eq!(pages, vec!["1", "2", "3"]);
    assert!(requests.iter().all(|r| r.path() == "/posts"));
    assert!(requests.iter().all(|r| r.param("limit").as_deref() == Some("9")));
}

#[tokio::test]
async fn test_first_page_server_error_stops_feed() {
    let server = TestServer::start(|_| (500, r#"{"message": "database unavailable"}"#.to_string()));
    let loader = FeedLoader::new(fetcher(&server, None), FeedQuery::home(), 9);

    let err = loader.load_initial().await.unwrap_err();
    assert!(matches!(
        err,
        FeedError::Api(ContentApiError::Status { status: 500, .. })
    ));

    let state = loader.state();
    assert!(state.items.is_empty());
    assert_eq!(state.current_page, 0);
    assert_eq!(
        state.error.as_deref(),
        Some("Server responded with 500: database unavailable")
    );

    let mut sentinel = Sentinel::new(loader.clone());
    assert_eq!(sentinel.observe(true).await.unwrap(), None);
    assert_eq!(
        loader.load_more().await.unwrap(),
        LoadOutcome::Skipped(SkipReason::NotStarted)
    );
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_tag_feed_with_nested_envelope() {
    let server = TestServer::start(|request| {
        let body = serde_json::json!({
            "success": true,
            "data": {
                "data": [{"id": "a1", "title": "Tagged"}],
                "current_page": 1,
                "per_page": 9,
                "total": 1,
                "last_page": 1
            }
        });
        assert_eq!(request.param("per_page").as_deref(), Some("9"));
        (200, body.to_string())
    });
    let loader = FeedLoader::new(fetcher(&server, None), FeedQuery::tag("Async Rust"), 9);

    assert_eq!(
        loader.load_initial().await.unwrap(),
        LoadOutcome::Loaded { page: 1, added: 1 }
    );

    let state = loader.state();
    assert_eq!(state.items[0].heading, "Tagged");
    assert_eq!(state.phase(), FeedPhase::Exhausted);
    assert_eq!(server.requests()[0].path(), "/tags/async-rust/posts");
}

#[tokio::test]
async fn test_search_and_session_are_sent() {
    let server = TestServer::paged(3);
    let session = Session::new("t0k3n");
    let loader = FeedLoader::new(
        fetcher(&server, Some(&session)),
        FeedQuery::author("42").with_search("pin"),
        9,
    );

    loader.load_initial().await.unwrap();

    let request = &server.requests()[0];
    assert_eq!(request.path(), "/users/42/posts");
    assert_eq!(request.param("search").as_deref(), Some("pin"));
    assert_eq!(request.header("authorization").as_deref(), Some("bearer t0k3n"));
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let server = TestServer::start(|_| (200, "<html>maintenance</html>".to_string()));
    let loader = FeedLoader::new(fetcher(&server, None), FeedQuery::home(), 9);

    let err = loader.load_initial().await.unwrap_err();
    assert!(matches!(err, FeedError::Api(ContentApiError::Decode(_))));
    assert!(loader.state().error.unwrap().starts_with("Malformed response body"));
}

#[tokio::test]
async fn test_failed_second_page_keeps_items_and_retries() {
    let failures = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&failures);
    let server = TestServer::start(move |request| {
        let page2 = request.param("page").as_deref() == Some("2");
        if page2 && counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
            return (500, "{}".to_string());
        }
        (200, listing_body(20, request))
    });
    let loader = FeedLoader::new(fetcher(&server, None), FeedQuery::home(), 9);

    loader.load_initial().await.unwrap();
    assert!(loader.load_more().await.is_err());
    assert_eq!(loader.state().items.len(), 9);
    assert_eq!(loader.state().current_page, 1);

    assert_eq!(
        loader.retry().await.unwrap(),
        LoadOutcome::Loaded { page: 2, added: 9 }
    );

    let pages: Vec<String> = server
        .requests()
        .iter()
        .filter_map(|r| r.param("page"))
        .collect();
    assert_eq!(pages, vec!["1", "2", "2"]);
}

#[tokio::test]
async fn test_loosely_shaped_posts_still_load() {
    let server = TestServer::start(|_| {
        let body = serde_json::json!({
            "data": [
                {"id": 1, "title": "Laravel post", "date": "2024-05-02", "created_at": "2024-04-30T09:00:00Z"},
                {"id": 2, "heading": null, "author": "Ana", "images": null, "tags": null}
            ],
            "meta": {"current_page": 1, "per_page": 9, "total": 2, "last_page": 1}
        });
        (200, body.to_string())
    });
    let loader = FeedLoader::new(fetcher(&server, None), FeedQuery::home(), 9);

    assert_eq!(
        loader.load_initial().await.unwrap(),
        LoadOutcome::Loaded { page: 1, added: 2 }
    );

    let state = loader.state();
    assert!(state.error.is_none());
    assert_eq!(state.items[0].published_at(), Some("2024-05-02"));
    assert_eq!(state.items[1].author.as_ref().unwrap().name, "Ana");
}
