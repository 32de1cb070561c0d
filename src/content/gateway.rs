//! Data access gateway.
//!
//! [`ContentGateway`] is the seam between the views and the backing article
//! source. Two implementations:
//!
//! - [`LocalGateway`] pages an in-memory repository (the bundled catalog by
//!   default) with the pagination engine.
//! - [`HttpGateway`] queries a json-server style REST endpoint
//!   (`GET /posts`, `GET /posts?_page=N&_per_page=M&category=C`).
//!
//! Neither caches nor retries: every call re-queries the source and a failure
//! is handed straight back to the caller.

use super::transport::{self, TransportFailure};
use super::types::{Article, PageEnvelope, PageQuery, PaginationResult};
use crate::pagination;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Upper bound for a listing response body.
const MAX_RESPONSE_SIZE: usize = 2 * 1024 * 1024; // 2MB

/// Errors surfaced by a [`ContentGateway`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Endpoint answered with a non-2xx status
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    /// Body was not the expected JSON shape
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid endpoint URL: {0}")]
    InvalidBaseUrl(String),
    /// Page or page size below 1
    #[error("Invalid {field}: {value} (must be at least 1)")]
    Validation { field: &'static str, value: usize },
}

impl GatewayError {
    /// True for failures reaching or reading the backing source, as opposed
    /// to malformed pagination input.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Validation { .. } | Self::InvalidBaseUrl(_))
    }
}

impl From<TransportFailure> for GatewayError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Network(e) => Self::Network(e),
            TransportFailure::Timeout(d) => Self::Timeout(d.as_secs()),
            TransportFailure::HttpStatus(s) => Self::HttpStatus(s),
            TransportFailure::TooLarge(limit) => Self::ResponseTooLarge(limit),
            TransportFailure::InvalidUtf8 => Self::InvalidUtf8,
        }
    }
}

/// Reject zero page numbers and page sizes before touching the source.
pub fn validate_query(query: &PageQuery) -> Result<(), GatewayError> {
    if query.page == 0 {
        return Err(GatewayError::Validation {
            field: "page",
            value: query.page,
        });
    }
    if query.per_page == 0 {
        return Err(GatewayError::Validation {
            field: "page size",
            value: query.per_page,
        });
    }
    Ok(())
}

/// Queries against the article source.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Every known article, unpaginated.
    async fn fetch_all(&self) -> Result<Vec<Article>, GatewayError>;

    /// One page of articles, optionally filtered by category.
    async fn fetch_page(&self, query: &PageQuery) -> Result<PaginationResult, GatewayError>;
}

// ============================================================================
// Local (in-memory) gateway
// ============================================================================

/// Gateway over an in-memory article list.
#[derive(Debug, Clone)]
pub struct LocalGateway {
    articles: Arc<Vec<Article>>,
}

impl LocalGateway {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles: Arc::new(articles),
        }
    }

    /// Gateway over the bundled catalog.
    pub fn bundled() -> Self {
        Self::new(super::catalog::articles())
    }
}

#[async_trait]
impl ContentGateway for LocalGateway {
    async fn fetch_all(&self) -> Result<Vec<Article>, GatewayError> {
        Ok(self.articles.as_ref().clone())
    }

    async fn fetch_page(&self, query: &PageQuery) -> Result<PaginationResult, GatewayError> {
        validate_query(query)?;

        let result = match &query.category {
            Some(category) => {
                let filtered: Vec<Article> = self
                    .articles
                    .iter()
                    .filter(|a| a.in_category(category.as_str()))
                    .cloned()
                    .collect();
                pagination::paginate(&filtered, query.page, query.per_page)
            }
            None => pagination::paginate(&self.articles, query.page, query.per_page),
        };

        tracing::debug!(
            page = query.page,
            per_page = query.per_page,
            category = ?query.category.as_ref().map(|c| c.as_str()),
            items = result.total_items,
            returned = result.articles.len(),
            "Local page query"
        );
        Ok(result)
    }
}

// ============================================================================
// HTTP gateway
// ============================================================================

/// Gateway over a json-server style REST endpoint.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl HttpGateway {
    /// Build a gateway rooted at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let base =
            Url::parse(base_url).map_err(|e| GatewayError::InvalidBaseUrl(e.to_string()))?;
        match base.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(GatewayError::InvalidBaseUrl(format!(
                    "unsupported scheme '{}'",
                    scheme
                )))
            }
        }
        if base.cannot_be_a_base() {
            return Err(GatewayError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base,
            timeout,
        })
    }

    /// `{base}/posts`, keeping any path prefix on the base.
    pub fn posts_url(&self) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("posts");
        }
        url
    }

    /// `{base}/posts?_page=N&_per_page=M[&category=C]`
    pub fn page_url(&self, query: &PageQuery) -> Url {
        let mut url = self.posts_url();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("_page", &query.page.to_string());
            pairs.append_pair("_per_page", &query.per_page.to_string());
            if let Some(category) = &query.category {
                pairs.append_pair("category", category.as_str());
            }
        }
        url
    }

    async fn get_text(&self, url: Url) -> Result<String, GatewayError> {
        tracing::debug!(url = %url, "Gateway request");
        let response = transport::get(self.client.get(url), self.timeout).await?;
        Ok(transport::read_limited_text(response, MAX_RESPONSE_SIZE).await?)
    }
}

#[async_trait]
impl ContentGateway for HttpGateway {
    async fn fetch_all(&self) -> Result<Vec<Article>, GatewayError> {
        let body = self.get_text(self.posts_url()).await?;
        let articles: Vec<Article> = serde_json::from_str(&body)?;
        tracing::debug!(count = articles.len(), "Fetched all articles");
        Ok(articles)
    }

    async fn fetch_page(&self, query: &PageQuery) -> Result<PaginationResult, GatewayError> {
        validate_query(query)?;
        let body = self.get_text(self.page_url(query)).await?;
        let envelope: PageEnvelope = serde_json::from_str(&body)?;
        let mut result = envelope.into_result(query);
        if result.total_items == 0 {
            result.current_page = pagination::DEFAULT_PAGE;
        }
        Ok(result)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Category;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn http_gateway(uri: &str) -> HttpGateway {
        HttpGateway::new(reqwest::Client::new(), uri, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_local_fetch_all_returns_catalog() {
        let gateway = LocalGateway::bundled();
        let all = gateway.fetch_all().await.unwrap();
        assert_eq!(all.len(), 9);
    }

    #[tokio::test]
    async fn test_local_fetch_page_filters_by_category() {
        let gateway = LocalGateway::bundled();
        let query = PageQuery::new(1, 4, Some(Category::new("doc")));
        let page = gateway.fetch_page(&query).await.unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.pages, 1);
        assert!(page.articles.iter().all(|a| a.in_category("doc")));
    }

    #[tokio::test]
    async fn test_local_unknown_category_is_empty_not_error() {
        let gateway = LocalGateway::bundled();
        let query = PageQuery::new(1, 4, Some(Category::new("recipes")));
        let page = gateway.fetch_page(&query).await.unwrap();
        assert_eq!(page.total_items, 0);
        assert_eq!(page.current_page, 1);
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_local_zero_page_is_validation_error() {
        let gateway = LocalGateway::bundled();
        let err = gateway
            .fetch_page(&PageQuery::new(0, 4, None))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation { field: "page", .. }));
        assert!(!err.is_transport());

        let err = gateway
            .fetch_page(&PageQuery::new(1, 0, None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Validation {
                field: "page size",
                ..
            }
        ));
    }

    #[test]
    fn test_page_url_keeps_base_path() {
        let gateway = http_gateway("http://127.0.0.1:3000/api");
        let url = gateway.page_url(&PageQuery::new(2, 4, Some(Category::new("learn"))));
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:3000/api/posts?_page=2&_per_page=4&category=learn"
        );

        let gateway = http_gateway("http://127.0.0.1:3000/");
        assert_eq!(gateway.posts_url().as_str(), "http://127.0.0.1:3000/posts");
    }

    #[test]
    fn test_rejects_non_http_base() {
        let result = HttpGateway::new(
            reqwest::Client::new(),
            "ftp://example.com",
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(GatewayError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn test_http_fetch_all() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"id":1,"name":"variables","title":"Variables","description":"d","category":"learn"}]"#,
            ))
            .mount(&server)
            .await;

        let all = http_gateway(&server.uri()).fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(&*all[0].slug(), "variables");
    }

    #[tokio::test]
    async fn test_http_fetch_page_sends_json_server_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("_page", "3"))
            .and(query_param("_per_page", "4"))
            .and(query_param("category", "learn"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":[{"id":9,"title":"Operators","description":"","category":"learn"}],
                    "items":9,"pages":3,"first":1,"last":3,"next":null,"prev":2}"#,
            ))
            .mount(&server)
            .await;

        let query = PageQuery::new(3, 4, Some(Category::new("learn")));
        let page = http_gateway(&server.uri()).fetch_page(&query).await.unwrap();
        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_items, 9);
        assert_eq!(page.articles.len(), 1);
        assert_eq!(page.next, None);
    }

    #[tokio::test]
    async fn test_http_500_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = http_gateway(&server.uri()).fetch_all().await.unwrap_err();
        assert!(matches!(err, GatewayError::HttpStatus(500)));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_http_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = http_gateway(&server.uri())
            .fetch_page(&PageQuery::new(1, 4, None))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_http_validation_happens_before_request() {
        // No mock mounted: a request would 404, validation must short-circuit
        let server = MockServer::start().await;
        let err = http_gateway(&server.uri())
            .fetch_page(&PageQuery::new(0, 4, None))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_http_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let gateway =
            HttpGateway::new(reqwest::Client::new(), &server.uri(), Duration::from_millis(50))
                .unwrap();
        let err = gateway.fetch_all().await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout(_)));
    }
}
