//! Integration tests for the scrape engine
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch → extract → paginate cycle end-to-end.

use webscrape::config::{
    parse_config_json, parse_config_toml, ExtractionConfig, DEFAULT_USER_AGENT,
};
use webscrape::output::{RecordSink, SqliteSink};
use webscrape::{Crawler, FieldValue, ScrapeError, ScrapeResult, TransportError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a listing page with the given product names and next link
fn listing_page(products: &[&str], next: Option<&str>) -> String {
    let items: String = products
        .iter()
        .map(|name| {
            format!(
                r#"<div class="product">
                    <h3 class="name">{name}</h3>
                    <a class="detail" href="/products/{name}">details</a>
                    <img src="/img/{name}.png">
                </div>"#
            )
        })
        .collect();

    let next = next
        .map(|href| format!(r#"<nav><a class="next" href="{href}">Next</a></nav>"#))
        .unwrap_or_default();

    format!(
        r#"<html><head><title>Products</title></head><body>{items}{next}</body></html>"#
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn product_config(start_url: String, max_pages: u32) -> ExtractionConfig {
    ExtractionConfig::new(
        start_url,
        [
            ("container", "div.product"),
            ("name", "h3.name"),
            ("detail", "a.detail::href"),
        ],
    )
    .with_pagination("a.next", None, max_pages)
}

fn names(result: &ScrapeResult) -> Vec<String> {
    result
        .data
        .iter()
        .map(|record| {
            record
                .get("name")
                .and_then(FieldValue::as_single)
                .expect("every product has a name")
                .to_string()
        })
        .collect()
}

#[tokio::test]
async fn test_paginated_scrape_collects_all_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .respond_with(html(listing_page(&["gamma"], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(html(listing_page(&["alpha", "beta"], Some("?page=2"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let start_url = format!("{}/products", mock_server.uri());
    let crawler = Crawler::new().expect("Failed to build crawler");
    let result = crawler
        .scrape(&product_config(start_url.clone(), 5))
        .await
        .expect("Scrape failed");

    assert_eq!(names(&result), vec!["alpha", "beta", "gamma"]);
    assert_eq!(result.pages_visited, 2);
    assert_eq!(result.source_url, start_url);
    assert_eq!(
        result.data[0].get("detail"),
        Some(&FieldValue::Single("/products/alpha".to_string()))
    );
}

#[tokio::test]
async fn test_single_page_config_fetches_once() {
    let mock_server = MockServer::start().await;

    // The page advertises a next link, but no pagination rule is configured
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(listing_page(&["alpha"], Some("/page/2"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(html(listing_page(&["beta"], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = ExtractionConfig::new(
        format!("{}/", mock_server.uri()),
        [("container", "div.product"), ("name", "h3.name")],
    );
    let result = Crawler::new()
        .expect("Failed to build crawler")
        .scrape(&config)
        .await
        .expect("Scrape failed");

    assert_eq!(names(&result), vec!["alpha"]);
}

#[tokio::test]
async fn test_page_cap_limits_fetches() {
    let mock_server = MockServer::start().await;

    for page in 1..=5 {
        let product = format!("item{page}");
        let next = format!("/p/{}", page + 1);
        Mock::given(method("GET"))
            .and(path(format!("/p/{page}")))
            .respond_with(html(listing_page(&[product.as_str()], Some(next.as_str()))))
            .expect(if page <= 2 { 1 } else { 0 })
            .mount(&mock_server)
            .await;
    }

    let result = Crawler::new()
        .expect("Failed to build crawler")
        .scrape(&product_config(format!("{}/p/1", mock_server.uri()), 2))
        .await
        .expect("Scrape failed");

    assert_eq!(names(&result), vec!["item1", "item2"]);
}

#[tokio::test]
async fn test_relative_next_link_uses_current_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(html(listing_page(&["first"], Some("../b"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(listing_page(&["second"], Some("c"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    // "c" relative to /b is /c; relative to the start URL it would be /a/c
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html(listing_page(&["third"], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = Crawler::new()
        .expect("Failed to build crawler")
        .scrape(&product_config(format!("{}/a/", mock_server.uri()), 10))
        .await
        .expect("Scrape failed");

    assert_eq!(names(&result), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_server_error_on_second_page_fails_whole_scrape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(listing_page(&["alpha"], Some("/page/2"))))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = Crawler::new()
        .expect("Failed to build crawler")
        .scrape(&product_config(format!("{}/", mock_server.uri()), 3))
        .await
        .expect_err("Scrape should fail");

    match err {
        ScrapeError::Transport(TransportError::Status { url, status }) => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/page/2"), "unexpected url {url}");
        }
        other => panic!("Expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_start_page_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = Crawler::new()
        .expect("Failed to build crawler")
        .scrape(&product_config(format!("{}/missing", mock_server.uri()), 1))
        .await
        .expect_err("Scrape should fail");

    assert!(matches!(
        err,
        ScrapeError::Transport(TransportError::Status { status: 404, .. })
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_default_user_agent_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(html("<h1>hello</h1>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ExtractionConfig::new(format!("{}/", mock_server.uri()), [("title", "h1")]);
    let result = Crawler::new()
        .expect("Failed to build crawler")
        .scrape(&config)
        .await
        .expect("Scrape failed");

    assert_eq!(
        result.data[0].get("title"),
        Some(&FieldValue::Single("hello".to_string()))
    );
}

#[tokio::test]
async fn test_custom_headers_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "CatalogBot/2.0"))
        .and(header("x-api-key", "secret"))
        .respond_with(html("<h1>hello</h1>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ExtractionConfig::new(format!("{}/", mock_server.uri()), [("title", "h1")])
        .with_header("User-Agent", "CatalogBot/2.0")
        .with_header("X-Api-Key", "secret");

    Crawler::new()
        .expect("Failed to build crawler")
        .scrape(&config)
        .await
        .expect("Scrape failed");
}

#[tokio::test]
async fn test_empty_header_map_sends_default_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(html("<h1>hello</h1>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let json = format!(
        r#"{{"url": "{}/", "selectors": {{"title": "h1"}}, "headers": {{}}}}"#,
        mock_server.uri()
    );
    let config = parse_config_json(&json).expect("Config should be valid");

    Crawler::new()
        .expect("Failed to build crawler")
        .scrape(&config)
        .await
        .expect("Scrape failed");
}

#[tokio::test]
async fn test_self_link_is_followed_until_page_cap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(html(listing_page(&["same"], Some("/loop"))))
        .expect(3)
        .mount(&mock_server)
        .await;

    let result = Crawler::new()
        .expect("Failed to build crawler")
        .scrape(&product_config(format!("{}/loop", mock_server.uri()), 3))
        .await
        .expect("Scrape failed");

    assert_eq!(result.pages_visited, 3);
    assert_eq!(names(&result), vec!["same", "same", "same"]);
}

#[tokio::test]
async fn test_attribute_fields_and_missing_values() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body>
                <a href="/one">One</a>
                <a>No href</a>
                <img src="/only.png">
            </body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    let config = ExtractionConfig::new(
        format!("{}/", mock_server.uri()),
        [
            ("links", "a::href"),
            ("image", "img::src"),
            ("table", "table"),
        ],
    );
    let result = Crawler::new()
        .expect("Failed to build crawler")
        .scrape(&config)
        .await
        .expect("Scrape failed");

    let record = &result.data[0];
    assert_eq!(
        record.get("links"),
        Some(&FieldValue::Multiple(vec!["/one".to_string(), String::new()]))
    );
    assert_eq!(
        record.get("image"),
        Some(&FieldValue::Single("/only.png".to_string()))
    );
    assert_eq!(record.get("table"), Some(&FieldValue::Absent));
}

#[tokio::test]
async fn test_toml_config_end_to_end_with_sqlite_sink() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(listing_page(&["alpha", "beta"], None)))
        .mount(&mock_server)
        .await;

    let toml = format!(
        r#"
url = "{}/"
max-pages = 3

[selectors]
container = "div.product"
name = "h3.name"
image = "img::src"

[pagination]
selector = "a.next"
"#,
        mock_server.uri()
    );
    let config = parse_config_toml(&toml).expect("Config should be valid");

    let crawler = Crawler::new().expect("Failed to build crawler");
    let first = crawler.scrape(&config).await.expect("Scrape failed");
    let second = crawler.scrape(&config).await.expect("Scrape failed");

    // Same page, same config: byte-identical records
    assert_eq!(
        serde_json::to_string(&first.data).unwrap(),
        serde_json::to_string(&second.data).unwrap()
    );

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut sink = SqliteSink::new(&dir.path().join("records.db")).expect("Failed to open DB");
    sink.store(&first, "cfg").expect("Store failed");
    sink.store(&second, "cfg").expect("Store failed");

    assert_eq!(sink.count_records().expect("Count failed"), 2);
    assert_eq!(
        sink.load_records(&first.source_url, "cfg").expect("Load failed"),
        first.data
    );
}

#[tokio::test]
async fn test_invalid_config_never_touches_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<h1>hello</h1>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = ExtractionConfig::new(format!("{}/", mock_server.uri()), [("title", "h1")]);
    config.max_pages = 0;

    let err = Crawler::new()
        .expect("Failed to build crawler")
        .scrape(&config)
        .await
        .expect_err("Config should be rejected");

    assert!(matches!(err, ScrapeError::Config(_)));
}

#[tokio::test]
async fn test_scrape_free_function_with_page_overview() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><title> Overview </title></head><body>
                <h1>Main</h1>
                <p>Only paragraph</p>
                <a href="/x">x</a>
            </body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ExtractionConfig::page_overview(format!("{}/", mock_server.uri()));
    let result = webscrape::scrape(&config).await.expect("Scrape failed");

    assert_eq!(result.len(), 1);
    let record = &result.data[0];
    assert_eq!(
        record.get("title"),
        Some(&FieldValue::Single("Overview".to_string()))
    );
    assert_eq!(
        record.get("headings"),
        Some(&FieldValue::Single("Main".to_string()))
    );
    assert_eq!(
        record.get("links"),
        Some(&FieldValue::Single("/x".to_string()))
    );
    assert_eq!(record.get("images"), Some(&FieldValue::Absent));
}
