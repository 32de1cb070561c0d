use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Article
// ============================================================================

/// Article identifier as served by the backing endpoint.
///
/// The bundled catalog uses slugs (`"variables"`) while json-server style
/// endpoints hand out numeric ids, so both shapes deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ArticleId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for ArticleId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// A single content record.
///
/// Immutable once loaded. String fields use `Arc<str>` so views can hold
/// cheap clones of the same record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    /// Display name / slug used in locations and body addresses.
    /// Falls back to the textual id when the endpoint omits it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Arc<str>>,
    pub title: Arc<str>,
    #[serde(default = "empty_arc")]
    pub description: Arc<str>,
    pub category: Arc<str>,
}

fn empty_arc() -> Arc<str> {
    Arc::from("")
}

impl Article {
    /// Slug used in `blog/:cat/:name` locations.
    pub fn slug(&self) -> Arc<str> {
        match &self.name {
            Some(name) => Arc::clone(name),
            None => Arc::from(self.id.to_string()),
        }
    }

    pub fn in_category(&self, category: &str) -> bool {
        &*self.category == category
    }
}

// ============================================================================
// Category
// ============================================================================

/// Filter tag partitioning articles into named groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(Arc<str>);

impl Category {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Page Query / Result
// ============================================================================

/// Parameters for a paginated gateway query.
///
/// `category = None` means no filter. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: usize,
    pub per_page: usize,
    pub category: Option<Category>,
}

impl PageQuery {
    pub fn new(page: usize, per_page: usize, category: Option<Category>) -> Self {
        Self {
            page,
            per_page,
            category,
        }
    }
}

/// Bounded slice of articles plus page/total metadata.
///
/// Derived and ephemeral: recomputed on every query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationResult {
    pub current_page: usize,
    pub per_page: usize,
    /// Total number of articles matching the filter (not just this page).
    pub total_items: usize,
    pub pages: usize,
    pub first: usize,
    pub last: usize,
    pub next: Option<usize>,
    pub prev: Option<usize>,
    pub articles: Vec<Article>,
}

impl PaginationResult {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Wire shape of a json-server `_page`/`_per_page` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageEnvelope {
    pub data: Vec<Article>,
    pub items: usize,
    pub pages: usize,
    #[serde(default)]
    pub first: Option<usize>,
    #[serde(default)]
    pub last: Option<usize>,
    #[serde(default)]
    pub next: Option<usize>,
    #[serde(default)]
    pub prev: Option<usize>,
}

impl PageEnvelope {
    /// Attach the request parameters the envelope does not echo back.
    pub fn into_result(self, query: &PageQuery) -> PaginationResult {
        let pages = self.pages;
        PaginationResult {
            current_page: query.page,
            per_page: query.per_page,
            total_items: self.items,
            pages,
            first: self.first.unwrap_or(1),
            last: self.last.unwrap_or(pages.max(1)),
            next: self.next,
            prev: self.prev,
            articles: self.data,
        }
    }
}
