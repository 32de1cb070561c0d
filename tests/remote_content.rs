//! Integration tests against a mock json-server style backend.
//!
//! The posts endpoint and article bodies are both served by wiremock, and
//! requests go through the same client, gateway and print path the binary
//! uses.

use sassblog::app::build_http_client;
use sassblog::content::{BodyLoader, BodySource, ContentGateway, HttpGateway, PageQuery};
use sassblog::navigation::Location;
use sassblog::print::{render_location, PrintError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn posts() -> serde_json::Value {
    json!([
        {"id": 1, "name": "variables", "title": "Variables", "description": "Store values", "category": "learn"},
        {"id": 2, "name": "nesting", "title": "Nesting", "description": "Nest selectors", "category": "learn"},
        {"id": 3, "name": "syntax", "title": "Syntax", "description": "Two syntaxes", "category": "doc"}
    ])
}

async fn setup(server: &MockServer) -> (HttpGateway, BodyLoader) {
    let client = build_http_client(TIMEOUT).unwrap();
    let gateway = HttpGateway::new(client.clone(), &server.uri(), TIMEOUT).unwrap();
    let bodies = BodyLoader::new(
        client,
        BodySource::parse(&format!("{}/assets/blog", server.uri())).unwrap(),
        "md",
        TIMEOUT,
    );
    (gateway, bodies)
}

#[tokio::test]
async fn test_listing_page_from_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("_page", "2"))
        .and(query_param("_per_page", "1"))
        .and(query_param("category", "learn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "first": 1, "prev": 1, "next": null, "last": 2, "pages": 2, "items": 2,
            "data": [posts()[1].clone()]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (gateway, bodies) = setup(&server).await;
    let out = render_location(&gateway, &bodies, &Location::parse("blog/learn?page=2"), 1)
        .await
        .unwrap();

    assert!(out.contains("- Nesting [blog/learn/nesting]"));
    assert!(out.contains("page 2/2, 2 articles"));
}

#[tokio::test]
async fn test_article_body_from_remote_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/blog/doc/syntax.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string("## Syntax\n\nSCSS and `.sass`"))
        .mount(&server)
        .await;

    let (gateway, bodies) = setup(&server).await;
    let out = render_location(&gateway, &bodies, &Location::parse("blog/doc/syntax"), 4)
        .await
        .unwrap();

    assert!(out.starts_with("<article data-theme=\"light\">"));
    assert!(out.contains("<h2>Syntax</h2>"));
    assert!(out.contains("<code>.sass</code>"));
}

#[tokio::test]
async fn test_missing_remote_body_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/blog/learn/variables.md"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (gateway, bodies) = setup(&server).await;
    let err = render_location(&gateway, &bodies, &Location::parse("blog/learn/variables"), 4)
        .await
        .unwrap_err();
    assert!(matches!(err, PrintError::NotFound(_)));
}

#[tokio::test]
async fn test_endpoint_failure_surfaces_as_gateway_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (gateway, _) = setup(&server).await;
    let err = gateway
        .fetch_page(&PageQuery::new(1, 4, None))
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.to_string(), "HTTP error: status 503");
}
