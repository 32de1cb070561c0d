//! Route-parameter reactor.
//!
//! Turns each observed [`Location`] into the view state it implies and the
//! fetch that should populate it. Path changes are examined before query
//! changes: a different path re-derives category and article identity, while
//! a query-only change (page, theme) keeps identity and only recomputes the
//! page.

use super::location::{Location, PAGE_PARAM, THEME_PARAM};
use super::route::Route;
use crate::content::{Category, PageQuery};
use crate::pagination::parse_requested_page;
use crate::theme::ThemeVariant;
use std::sync::Arc;

/// What changed relative to the previously observed location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// First observation, or the path changed.
    Identity,
    /// Same path, different `page`.
    PageOnly,
    /// Same path and page; some other query parameter changed.
    QueryOnly,
}

/// View state derived from a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub route: Route,
    pub category: Option<Category>,
    pub article: Option<Arc<str>>,
    pub page: usize,
    pub theme: ThemeVariant,
}

/// Data needed to populate the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    Listing(PageQuery),
    Article { category: Category, name: Arc<str> },
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub kind: ChangeKind,
    pub state: ViewState,
    pub fetch: FetchPlan,
}

/// Stateful observer of location changes.
#[derive(Debug)]
pub struct RouteReactor {
    page_size: usize,
    last: Option<Location>,
    state: Option<ViewState>,
}

impl RouteReactor {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            last: None,
            state: None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Most recently derived view state.
    pub fn state(&self) -> Option<&ViewState> {
        self.state.as_ref()
    }

    /// React to `location`. Returns `None` when it equals the last one seen.
    pub fn react(&mut self, location: &Location) -> Option<Reaction> {
        let kind = match &self.last {
            Some(last) if last == location => return None,
            Some(last) if last.same_path(location) => {
                if last.query(PAGE_PARAM) != location.query(PAGE_PARAM) {
                    ChangeKind::PageOnly
                } else {
                    ChangeKind::QueryOnly
                }
            }
            _ => ChangeKind::Identity,
        };

        let (route, category, article) = match (kind, &self.state) {
            (ChangeKind::Identity, _) | (_, None) => {
                let route = Route::resolve(location);
                let category = route.category().cloned();
                let article = route.article_name().cloned();
                (route, category, article)
            }
            (_, Some(prev)) => (prev.route.clone(), prev.category.clone(), prev.article.clone()),
        };

        let page = parse_requested_page(location.query(PAGE_PARAM));
        let theme = ThemeVariant::from_query(location.query(THEME_PARAM));

        let fetch = match &route {
            Route::Root | Route::Blog | Route::Category { .. } => {
                FetchPlan::Listing(PageQuery::new(page, self.page_size, category.clone()))
            }
            Route::Article { category, name } => FetchPlan::Article {
                category: category.clone(),
                name: name.clone(),
            },
            Route::NotFound { .. } => FetchPlan::None,
        };

        tracing::debug!(
            location = %location,
            kind = ?kind,
            page,
            category = ?category.as_ref().map(Category::as_str),
            "Route reaction"
        );

        let state = ViewState {
            route,
            category,
            article,
            page,
            theme,
        };
        self.last = Some(location.clone());
        self.state = Some(state.clone());

        Some(Reaction { kind, state, fetch })
    }
}
