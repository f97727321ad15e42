//! Term catalog tests against a wiremock backend.

mod common;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use neuro_query::TermCatalog;
use neuro_query::catalog::CatalogRender;

use common::mock_client;

async fn serve_terms(server: &MockServer, terms: Vec<String>, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/terms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "terms": terms })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn numbered_terms(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("term{i:02}")).collect()
}

#[tokio::test]
async fn test_load_fetches_once() {
    let server = MockServer::start().await;
    serve_terms(&server, numbered_terms(3), 1).await;
    let client = mock_client(&server);

    let mut catalog = TermCatalog::new();
    catalog.load(client.as_ref()).await;
    catalog.load(client.as_ref()).await;

    assert!(!catalog.is_loading());
    assert_eq!(catalog.terms().len(), 3);
}

#[tokio::test]
async fn test_search_returns_to_first_page() {
    let server = MockServer::start().await;
    serve_terms(&server, numbered_terms(45), 1).await;

    let mut catalog = TermCatalog::new();
    catalog.load(mock_client(&server).as_ref()).await;

    let page = catalog.page();
    assert_eq!((page.page, page.total_pages, page.items.len()), (1, 2, 30));
    assert_eq!(page.summary("terms"), "Total 45 terms | Page 1 / 2\nShowing 1 - 30 terms");

    catalog.next_page();
    let page = catalog.page();
    assert_eq!(page.page, 2);
    assert_eq!(page.summary("terms"), "Total 45 terms | Page 2 / 2\nShowing 31 - 45 terms");

    catalog.set_search("TERM4");
    let page = catalog.page();
    assert_eq!(page.page, 1);
    assert_eq!(page.total, 6);
    assert_eq!(page.items[0].as_str(), "term40");
}

#[tokio::test]
async fn test_load_failure_is_shown_and_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/terms"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    serve_terms(&server, numbered_terms(2), 1).await;
    let client = mock_client(&server);

    let mut catalog = TermCatalog::new();
    catalog.load(client.as_ref()).await;
    assert_eq!(catalog.error(), Some("Failed to fetch terms: HTTP 500"));
    assert_eq!(
        catalog.render_state(),
        CatalogRender::Failed("Failed to fetch terms: HTTP 500".into())
    );
    assert!(catalog.terms().is_empty());

    catalog.load(client.as_ref()).await;
    assert_eq!(catalog.error(), None);
    assert!(matches!(catalog.render_state(), CatalogRender::Listing(page) if page.total == 2));
}

#[tokio::test]
async fn test_malformed_vocabulary_reports_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/terms"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut catalog = TermCatalog::new();
    catalog.load(mock_client(&server).as_ref()).await;

    assert!(catalog.error().unwrap().starts_with("Failed to fetch terms: "));
}

#[tokio::test]
async fn test_unmatched_search_is_empty_state() {
    let server = MockServer::start().await;
    serve_terms(&server, vec!["aphasia".into(), "stroke".into()], 1).await;

    let mut catalog = TermCatalog::new();
    catalog.load(mock_client(&server).as_ref()).await;
    catalog.set_search("zzz");

    assert_eq!(catalog.render_state(), CatalogRender::Empty);
    assert!(catalog.select(0).is_none());

    catalog.clear_search();
    assert_eq!(catalog.filtered().len(), 2);
}
