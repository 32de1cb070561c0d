use crate::content::{
    catalog, Article, ArticleId, BodyError, BodyLoader, Category, ContentGateway, GatewayError,
    PaginationResult,
};
use crate::keybindings::KeybindingRegistry;
use crate::navigation::{ChangeKind, FetchPlan, Navigator, Reaction, Route};
use crate::theme::DisplayModeStore;
use crate::ui::reader::render_markdown;
use crate::util::strip_control_chars;
use anyhow::Result;
use ratatui::style::Style;
use ratatui::text::Line;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use unicode_width::UnicodeWidthStr;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// Background task names, as reported in `AppEvent::TaskPanicked`.
pub const ARTICLES_LOAD_TASK: &str = "articles_load";
pub const PAGE_LOAD_TASK: &str = "page_load";
pub const BODY_LOAD_TASK: &str = "body_load";

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Redirect policy: at most 3 hops, loops rejected.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Shared client for the posts endpoint and remote article bodies.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

// ============================================================================
// View and Focus Enums
// ============================================================================

/// Which surface occupies the main panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Listing,
    Detail,
    NotFound,
}

/// Which panel has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Nav,
    Main,
}

/// One row of the navigation panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    All,
    Category(Category),
    Article(Article),
}

// ============================================================================
// Content and Event Types
// ============================================================================

/// Article body state for the reader.
#[derive(Debug, Clone)]
pub enum ContentState {
    Idle,
    Loading {
        slug: Arc<str>,
    },
    Loaded {
        slug: Arc<str>,
        markdown: String,
        rendered_lines: Vec<Line<'static>>,
    },
    Failed {
        slug: Arc<str>,
        error: String,
    },
}

/// Events from background tasks.
pub enum AppEvent {
    /// Every article, for the navigation panel.
    ArticlesLoaded(Result<Vec<Article>, GatewayError>),
    /// One listing page. Dropped unless `generation` is current.
    PageLoaded {
        generation: u64,
        result: Result<PaginationResult, GatewayError>,
    },
    /// One article body. Dropped unless `generation` is current.
    BodyLoaded {
        generation: u64,
        article: Article,
        result: Result<String, BodyError>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

/// Location path of an article, for the not-found view.
pub fn article_path(category: &str, name: &str) -> String {
    crate::navigation::Location::new(Route::article_segments(category, name)).path()
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub gateway: Arc<dyn ContentGateway>,
    pub bodies: BodyLoader,
    pub navigator: Navigator,
    pub display: DisplayModeStore,
    pub reactor: crate::navigation::RouteReactor,
    pub keybindings: KeybindingRegistry,

    // Navigation panel
    pub articles: Arc<Vec<Article>>,
    pub articles_loaded: bool,
    pub nav_items: Vec<NavItem>,
    pub selected_nav: usize,

    // Main panel
    pub view: View,
    pub focus: Focus,
    pub route: Route,
    /// Last fetch issued, replayed by reload.
    pub fetch: FetchPlan,
    pub not_found_path: String,

    // Listing
    pub listing: Option<PaginationResult>,
    pub listing_loading: bool,
    pub selected_listing: usize,

    // Reader
    pub content_state: ContentState,
    /// Article whose body is shown.
    pub reader_article: Option<Article>,
    /// Article whose body is being fetched.
    pub pending_article: Option<Article>,
    pub scroll_offset: usize,
    pub reader_visible_lines: usize,
    pub reader_viewport_width: usize,
    pub spinner_frame: usize,

    /// Generation counters: bumped per request, results for older
    /// generations are discarded.
    pub page_generation: u64,
    pub page_handle: Option<tokio::task::JoinHandle<()>>,
    pub body_generation: u64,
    pub body_handle: Option<tokio::task::JoinHandle<()>>,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub show_help: bool,
    pub help_scroll_offset: usize,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        gateway: Arc<dyn ContentGateway>,
        bodies: BodyLoader,
        navigator: Navigator,
        page_size: usize,
    ) -> Self {
        let display = DisplayModeStore::from_location(&navigator.current());
        let mut app = Self {
            gateway,
            bodies,
            navigator,
            display,
            reactor: crate::navigation::RouteReactor::new(page_size),
            keybindings: KeybindingRegistry::new(),
            articles: Arc::new(Vec::new()),
            articles_loaded: false,
            nav_items: Vec::new(),
            selected_nav: 0,
            view: View::Listing,
            focus: Focus::Main,
            route: Route::Blog,
            fetch: FetchPlan::None,
            not_found_path: String::new(),
            listing: None,
            listing_loading: false,
            selected_listing: 0,
            content_state: ContentState::Idle,
            reader_article: None,
            pending_article: None,
            scroll_offset: 0,
            reader_visible_lines: 0,
            reader_viewport_width: 0,
            spinner_frame: 0,
            page_generation: 0,
            page_handle: None,
            body_generation: 0,
            body_handle: None,
            status_message: None,
            show_help: false,
            help_scroll_offset: 0,
            needs_redraw: true,
        };
        app.rebuild_nav_items();
        app
    }

    /// Resolve a semantic role name to its `Style` in the current mode.
    pub fn style(&self, role: &str) -> Style {
        self.display.style(role)
    }

    // ------------------------------------------------------------------------
    // Navigation panel
    // ------------------------------------------------------------------------

    /// Replace the article set shown in the navigation panel.
    pub fn set_articles(&mut self, articles: Vec<Article>) {
        self.articles = Arc::new(articles);
        self.articles_loaded = true;
        self.rebuild_nav_items();
        self.sync_nav_selection();

        // An article route for an unknown slug becomes not-found now that
        // the set is known.
        if let Route::Article { category, name } = &self.route {
            if self.find_article(category, name).is_none() {
                let path = article_path(category.as_str(), name);
                self.show_not_found(path);
            }
        }
    }

    /// `All`, then each category (catalog order first, then others in order
    /// of first appearance) followed by its articles.
    pub fn rebuild_nav_items(&mut self) {
        let mut categories: Vec<Category> = catalog::categories();
        for article in self.articles.iter() {
            if !categories.iter().any(|c| c.as_str() == &*article.category) {
                categories.push(Category::new(&article.category));
            }
        }

        let mut items = Vec::with_capacity(1 + categories.len() + self.articles.len());
        items.push(NavItem::All);
        for category in categories {
            let members: Vec<NavItem> = self
                .articles
                .iter()
                .filter(|a| a.in_category(category.as_str()))
                .cloned()
                .map(NavItem::Article)
                .collect();
            items.push(NavItem::Category(category));
            items.extend(members);
        }
        self.nav_items = items;
        self.selected_nav = self.selected_nav.min(self.nav_items.len().saturating_sub(1));
    }

    /// Point the nav selection at the item matching the current route.
    pub fn sync_nav_selection(&mut self) {
        let target = self.nav_items.iter().position(|item| match (item, &self.route) {
            (NavItem::Article(a), Route::Article { category, name }) => {
                a.in_category(category.as_str()) && &*a.slug() == &**name
            }
            (NavItem::Category(c), Route::Category { category }) => c == category,
            (NavItem::All, Route::Blog) => true,
            _ => false,
        });
        if let Some(index) = target {
            self.selected_nav = index;
        }
    }

    pub fn selected_nav_item(&self) -> Option<&NavItem> {
        self.nav_items.get(self.selected_nav)
    }

    pub fn find_article(&self, category: &Category, name: &str) -> Option<&Article> {
        self.articles
            .iter()
            .find(|a| a.in_category(category.as_str()) && &*a.slug() == name)
    }

    /// Article for an article route. Before the article set arrives a
    /// stand-in built from the path is used; afterwards unknown slugs are
    /// `None`.
    pub fn resolve_article(&self, category: &Category, name: &str) -> Option<Article> {
        if let Some(article) = self.find_article(category, name) {
            return Some(article.clone());
        }
        if self.articles_loaded {
            return None;
        }
        Some(Article {
            id: ArticleId::from(name),
            name: Some(Arc::from(name)),
            title: Arc::from(name),
            description: Arc::from(""),
            category: Arc::from(category.as_str()),
        })
    }

    // ------------------------------------------------------------------------
    // Route reactions
    // ------------------------------------------------------------------------

    /// Update view state from a reactor emission. The caller performs the
    /// fetch in `reaction.fetch`.
    pub fn apply_reaction(&mut self, reaction: &Reaction) {
        if self.display.apply(reaction.state.theme) {
            self.rerender_body();
        }

        if reaction.kind == ChangeKind::Identity {
            self.route = reaction.state.route.clone();
            self.selected_listing = 0;
            self.view = match &self.route {
                Route::Root | Route::Blog | Route::Category { .. } => View::Listing,
                Route::Article { .. } => View::Detail,
                Route::NotFound { path } => {
                    self.not_found_path = path.clone();
                    View::NotFound
                }
            };
            if self.view != View::Detail {
                self.cancel_body_load();
            }
            self.sync_nav_selection();
        } else if reaction.kind == ChangeKind::PageOnly {
            self.selected_listing = 0;
        }
        self.fetch = reaction.fetch.clone();
    }

    pub fn show_not_found(&mut self, path: String) {
        tracing::debug!(path = %path, "Showing not-found view");
        self.cancel_body_load();
        self.not_found_path = path;
        self.view = View::NotFound;
    }

    // ------------------------------------------------------------------------
    // Listing pages
    // ------------------------------------------------------------------------

    /// Abort any in-flight page request and return the new generation.
    pub fn begin_page_load(&mut self) -> u64 {
        if let Some(handle) = self.page_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous page load task");
        }
        self.page_generation = self.page_generation.wrapping_add(1);
        self.listing_loading = true;
        self.page_generation
    }

    /// Apply a page result. Returns false when it was stale.
    pub fn finish_page_load(
        &mut self,
        generation: u64,
        result: Result<PaginationResult, GatewayError>,
    ) -> bool {
        if generation != self.page_generation {
            tracing::debug!(
                generation,
                current = self.page_generation,
                "Discarding stale page result"
            );
            return false;
        }
        self.page_handle = None;
        self.listing_loading = false;

        match result {
            Ok(page) => {
                tracing::debug!(
                    page = page.current_page,
                    items = page.articles.len(),
                    total = page.total_items,
                    "Page loaded"
                );
                self.selected_listing = self
                    .selected_listing
                    .min(page.articles.len().saturating_sub(1));
                self.listing = Some(page);
            }
            Err(e) => {
                tracing::warn!(error = %e, transport = e.is_transport(), "Page load failed");
                self.set_status(format!("Failed to load page: {}", e));
            }
        }
        true
    }

    pub fn selected_listing_article(&self) -> Option<&Article> {
        self.listing
            .as_ref()
            .and_then(|page| page.articles.get(self.selected_listing))
    }

    // ------------------------------------------------------------------------
    // Article bodies
    // ------------------------------------------------------------------------

    /// Abort any in-flight body request and return the new generation.
    ///
    /// A body already on screen stays there until the new one arrives.
    pub fn begin_body_load(&mut self, article: &Article) -> u64 {
        if let Some(handle) = self.body_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous body load task");
        }
        self.body_generation = self.body_generation.wrapping_add(1);
        self.pending_article = Some(article.clone());
        if !matches!(self.content_state, ContentState::Loaded { .. }) {
            self.content_state = ContentState::Loading {
                slug: article.slug(),
            };
            self.reader_article = Some(article.clone());
        }
        self.body_generation
    }

    /// Apply a body result. Returns false when it was stale.
    pub fn finish_body_load(
        &mut self,
        generation: u64,
        article: Article,
        result: Result<String, BodyError>,
    ) -> bool {
        if generation != self.body_generation {
            tracing::debug!(
                generation,
                current = self.body_generation,
                "Discarding stale body result"
            );
            return false;
        }
        self.body_handle = None;
        self.pending_article = None;

        match result {
            Ok(markdown) => {
                let markdown = strip_control_chars(&markdown).into_owned();
                let rendered_lines = render_markdown(&markdown, self.display.palette());
                self.content_state = ContentState::Loaded {
                    slug: article.slug(),
                    markdown,
                    rendered_lines,
                };
                self.reader_article = Some(article);
                self.scroll_offset = 0;
            }
            Err(BodyError::NotFound(address)) => {
                tracing::warn!(address = %address, "Article body not found");
                self.show_not_found(article_path(&article.category, &article.slug()));
            }
            Err(e) => {
                tracing::warn!(slug = %article.slug(), error = %e, "Body load failed");
                if matches!(self.content_state, ContentState::Loaded { .. }) {
                    self.set_status(format!("Failed to load article: {}", e));
                } else {
                    self.content_state = ContentState::Failed {
                        slug: article.slug(),
                        error: e.to_string(),
                    };
                    self.reader_article = Some(article);
                }
            }
        }
        true
    }

    fn cancel_body_load(&mut self) {
        if let Some(handle) = self.body_handle.take() {
            handle.abort();
        }
        // Outstanding results become stale.
        self.body_generation = self.body_generation.wrapping_add(1);
        self.pending_article = None;
    }

    /// Reset the loading state owned by a background task that panicked.
    pub fn abandon_task(&mut self, task: &str) {
        match task {
            PAGE_LOAD_TASK => {
                self.page_handle = None;
                self.listing_loading = false;
            }
            BODY_LOAD_TASK => {
                self.body_handle = None;
                if let Some(article) = self.pending_article.take() {
                    if matches!(self.content_state, ContentState::Loading { .. }) {
                        self.content_state = ContentState::Failed {
                            slug: article.slug(),
                            error: "Article load was interrupted".to_string(),
                        };
                    }
                }
            }
            _ => {}
        }
    }

    /// Re-render the loaded body with the current palette.
    fn rerender_body(&mut self) {
        if let ContentState::Loaded {
            markdown,
            rendered_lines,
            ..
        } = &mut self.content_state
        {
            *rendered_lines = render_markdown(markdown, self.display.palette());
        }
    }

    // ------------------------------------------------------------------------
    // Selection and scrolling
    // ------------------------------------------------------------------------

    /// Navigate up in current list
    pub fn nav_up(&mut self) {
        match self.focus {
            Focus::Nav => self.selected_nav = self.selected_nav.saturating_sub(1),
            Focus::Main => self.selected_listing = self.selected_listing.saturating_sub(1),
        }
    }

    /// Navigate down in current list
    pub fn nav_down(&mut self) {
        match self.focus {
            Focus::Nav => {
                let max_index = self.nav_items.len().saturating_sub(1);
                self.selected_nav = self.selected_nav.saturating_add(1).min(max_index);
            }
            Focus::Main => {
                let len = self.listing.as_ref().map_or(0, |p| p.articles.len());
                let max_index = len.saturating_sub(1);
                self.selected_listing = self.selected_listing.saturating_add(1).min(max_index);
            }
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Keep the scroll offset within the content.
    pub fn clamp_scroll(&mut self, content_lines: usize, visible_lines: usize) {
        let max_scroll = content_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    /// Display lines in the reader, including the header and wrapping.
    pub fn reader_content_lines(&self) -> usize {
        const HEADER_LINES: usize = 3; // Title, category, blank line
        let width = self.reader_viewport_width.max(1);
        let body = match &self.content_state {
            ContentState::Loaded { rendered_lines, .. } => rendered_lines
                .iter()
                .map(|line| {
                    let w: usize = line.spans.iter().map(|s| s.content.width()).sum();
                    w.max(1).div_ceil(width)
                })
                .sum(),
            ContentState::Failed { error, .. } => 2 + error.width().max(1).div_ceil(width),
            _ => 1,
        };
        HEADER_LINES + body
    }

    pub fn clamp_reader_scroll(&mut self) {
        let content_lines = self.reader_content_lines();
        self.clamp_scroll(content_lines, self.reader_visible_lines);
    }

    // ------------------------------------------------------------------------
    // Status line
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BodySource, LocalGateway, PageQuery};
    use crate::navigation::{Location, RouteReactor};
    use crate::pagination::paginate;
    use crate::theme::ThemeVariant;
    use pretty_assertions::assert_eq;
    use tokio::time;

    fn test_app(location: &str) -> App {
        let bodies = BodyLoader::new(
            reqwest::Client::new(),
            BodySource::parse("content").unwrap(),
            "md",
            Duration::from_secs(1),
        );
        App::new(
            Arc::new(LocalGateway::bundled()),
            bodies,
            Navigator::new(Location::parse(location)),
            4,
        )
    }

    fn react(app: &mut App, reactor: &mut RouteReactor, location: &str) -> Reaction {
        let reaction = reactor.react(&Location::parse(location)).unwrap();
        app.apply_reaction(&reaction);
        reaction
    }

    fn learn_page(page: usize) -> PaginationResult {
        let learn: Vec<Article> = catalog::articles()
            .into_iter()
            .filter(|a| a.in_category("learn"))
            .collect();
        paginate(&learn, page, 4)
    }

    #[test]
    fn test_initial_mode_from_location() {
        let app = test_app("blog?theme=dark");
        assert_eq!(app.display.current(), ThemeVariant::Dark);
    }

    #[test]
    fn test_nav_items_grouped_by_category() {
        let mut app = test_app("blog");
        app.set_articles(catalog::articles());

        assert_eq!(app.nav_items[0], NavItem::All);
        assert_eq!(app.nav_items[1], NavItem::Category(Category::new("learn")));
        let doc_index = app
            .nav_items
            .iter()
            .position(|i| *i == NavItem::Category(Category::new("doc")))
            .unwrap();
        // 1 (All) + 1 (learn header) + 7 learn articles
        assert_eq!(doc_index, 9);
        assert_eq!(app.nav_items.len(), 1 + 2 + 9);
    }

    #[test]
    fn test_reaction_sets_view() {
        let mut app = test_app("blog");
        let mut reactor = RouteReactor::new(4);

        react(&mut app, &mut reactor, "blog/learn");
        assert_eq!(app.view, View::Listing);

        react(&mut app, &mut reactor, "blog/learn/variables");
        assert_eq!(app.view, View::Detail);

        react(&mut app, &mut reactor, "nowhere");
        assert_eq!(app.view, View::NotFound);
        assert_eq!(app.not_found_path, "nowhere");
    }

    #[test]
    fn test_theme_reaction_swaps_palette() {
        let mut app = test_app("blog");
        let mut reactor = RouteReactor::new(4);
        react(&mut app, &mut reactor, "blog");
        react(&mut app, &mut reactor, "blog?theme=dark");
        assert_eq!(app.display.current(), ThemeVariant::Dark);
        assert_eq!(app.style("status_bar"), ThemeVariant::Dark.palette().status_bar);
    }

    #[test]
    fn test_stale_page_result_discarded() {
        let mut app = test_app("blog/learn");
        let first = app.begin_page_load();
        let second = app.begin_page_load();

        assert!(!app.finish_page_load(first, Ok(learn_page(1))));
        assert!(app.listing.is_none());
        assert!(app.listing_loading);

        assert!(app.finish_page_load(second, Ok(learn_page(2))));
        assert_eq!(app.listing.as_ref().unwrap().current_page, 2);
        assert!(!app.listing_loading);
    }

    fn article(slug: &str) -> Article {
        catalog::articles()
            .into_iter()
            .find(|a| &*a.slug() == slug)
            .unwrap()
    }

    #[test]
    fn test_stale_body_result_discarded() {
        let mut app = test_app("blog/learn/mixins");
        let mixins = article("mixins");
        let nesting = article("nesting");
        let first = app.begin_body_load(&mixins);
        let second = app.begin_body_load(&nesting);

        assert!(!app.finish_body_load(first, mixins, Ok("# Mixins".to_string())));
        assert!(matches!(
            &app.content_state,
            ContentState::Loading { slug } if &**slug == "nesting"
        ));
        assert!(app.pending_article.is_some());

        assert!(app.finish_body_load(second, nesting, Ok("# Nesting".to_string())));
        assert!(matches!(
            &app.content_state,
            ContentState::Loaded { slug, .. } if &**slug == "nesting"
        ));
        assert!(app.pending_article.is_none());
    }

    #[test]
    fn test_abandoned_page_task_stops_loading() {
        let mut app = test_app("blog/learn");
        app.begin_page_load();
        assert!(app.listing_loading);

        app.abandon_task(PAGE_LOAD_TASK);
        assert!(!app.listing_loading);
        assert!(app.page_handle.is_none());
    }

    #[test]
    fn test_abandoned_body_task_fails_loading_article() {
        let mut app = test_app("blog/learn/mixins");
        app.begin_body_load(&article("mixins"));

        app.abandon_task(BODY_LOAD_TASK);
        assert!(app.pending_article.is_none());
        assert!(matches!(
            &app.content_state,
            ContentState::Failed { slug, .. } if &**slug == "mixins"
        ));
    }

    #[test]
    fn test_abandoned_body_task_keeps_loaded_article() {
        let mut app = test_app("blog/learn/mixins");
        let mixins = article("mixins");
        let generation = app.begin_body_load(&mixins);
        app.finish_body_load(generation, mixins, Ok("# Mixins".to_string()));

        app.begin_body_load(&article("nesting"));
        app.abandon_task(BODY_LOAD_TASK);
        assert!(app.pending_article.is_none());
        assert!(matches!(
            &app.content_state,
            ContentState::Loaded { slug, .. } if &**slug == "mixins"
        ));
    }

    #[test]
    fn test_failed_page_keeps_previous_listing() {
        let mut app = test_app("blog/learn");
        let generation = app.begin_page_load();
        app.finish_page_load(generation, Ok(learn_page(1)));

        let generation = app.begin_page_load();
        app.finish_page_load(
            generation,
            Err(GatewayError::Validation {
                field: "page",
                value: 0,
            }),
        );

        assert_eq!(app.listing.as_ref().unwrap().articles.len(), 4);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_body_load_renders_and_keeps_previous_on_failure() {
        let mut app = test_app("blog/learn/variables");
        let variables = catalog::articles()
            .into_iter()
            .find(|a| &*a.slug() == "variables")
            .unwrap();
        let nesting = catalog::articles()
            .into_iter()
            .find(|a| &*a.slug() == "nesting")
            .unwrap();

        let generation = app.begin_body_load(&variables);
        assert!(matches!(app.content_state, ContentState::Loading { .. }));
        app.finish_body_load(generation, variables.clone(), Ok("# Variables".to_string()));
        assert!(matches!(app.content_state, ContentState::Loaded { .. }));

        let generation = app.begin_body_load(&nesting);
        app.finish_body_load(generation, nesting, Err(BodyError::Timeout(20)));

        assert!(matches!(app.content_state, ContentState::Loaded { .. }));
        assert_eq!(app.reader_article.as_ref().map(|a| a.slug()), Some(variables.slug()));
    }

    #[test]
    fn test_body_not_found_shows_not_found_view() {
        let mut app = test_app("blog/doc/missing");
        let article = app.resolve_article(&Category::new("doc"), "missing").unwrap();
        let generation = app.begin_body_load(&article);
        app.finish_body_load(
            generation,
            article,
            Err(BodyError::NotFound("content/doc/missing.md".to_string())),
        );
        assert_eq!(app.view, View::NotFound);
        assert_eq!(app.not_found_path, "blog/doc/missing");
    }

    #[test]
    fn test_unknown_slug_not_found_once_articles_loaded() {
        let mut app = test_app("blog");
        let mut reactor = RouteReactor::new(4);
        react(&mut app, &mut reactor, "blog/doc/nope");
        assert_eq!(app.view, View::Detail);
        assert!(app.resolve_article(&Category::new("doc"), "nope").is_some());

        app.set_articles(catalog::articles());
        assert_eq!(app.view, View::NotFound);
        assert!(app.resolve_article(&Category::new("doc"), "nope").is_none());
    }

    #[test]
    fn test_nav_selection_follows_route() {
        let mut app = test_app("blog");
        let mut reactor = RouteReactor::new(4);
        app.set_articles(catalog::articles());

        react(&mut app, &mut reactor, "blog/doc");
        assert_eq!(
            app.selected_nav_item(),
            Some(&NavItem::Category(Category::new("doc")))
        );
    }

    #[test]
    fn test_listing_selection_bounds() {
        let mut app = test_app("blog/learn?page=2");
        let generation = app.begin_page_load();
        app.finish_page_load(generation, Ok(learn_page(2)));
        app.focus = Focus::Main;
        for _ in 0..5 {
            app.nav_down();
        }
        assert_eq!(app.selected_listing, 2);
        assert_eq!(
            app.selected_listing_article().map(|a| a.slug()),
            Some(Arc::from("operators"))
        );
    }

    #[test]
    fn test_fetch_plan_recorded_for_reload() {
        let mut app = test_app("blog");
        let mut reactor = RouteReactor::new(4);
        react(&mut app, &mut reactor, "blog/doc?page=2");
        assert_eq!(
            app.fetch,
            FetchPlan::Listing(PageQuery::new(2, 4, Some(Category::new("doc"))))
        );
    }

    #[test]
    fn test_scroll_up_at_zero() {
        let mut app = test_app("blog");
        app.scroll_up(1);
        assert_eq!(app.scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app("blog");
        time::pause();
        app.set_status("Test message");
        assert!(!app.clear_expired_status());
        time::advance(Duration::from_secs(3)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
