use super::location::{Location, QueryHandling, PAGE_PARAM};
use super::route::{Route, BLOG_SEGMENT};
use tokio::sync::watch;

/// A change requested by a view. Views never write the location directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Listing of one category (all when `None`), starting at page 1.
    OpenListing { category: Option<String> },
    /// One article. The current `page` is kept so `Back` returns to it.
    OpenArticle { category: String, name: String },
    GoToPage(usize),
    /// Leave an article for its category listing, keeping `page` and
    /// `theme`. A no-op outside article routes.
    CloseArticle,
    Back,
}

/// Maximum number of locations kept for `back`.
const MAX_HISTORY: usize = 64;

/// Owner of the current navigable location.
///
/// The location is published through a `watch` cell: views call
/// [`Navigator::subscribe`] and observe changes on the receiver. Dropping the
/// receiver is the unsubscribe. Only the navigator writes the cell.
pub struct Navigator {
    tx: watch::Sender<Location>,
    history: Vec<Location>,
}

impl Navigator {
    /// Start at `initial` (after root redirection).
    pub fn new(initial: Location) -> Self {
        let (tx, _rx) = watch::channel(redirect(initial));
        Self {
            tx,
            history: Vec::new(),
        }
    }

    /// Receiver that sees the current location as its first value.
    pub fn subscribe(&self) -> watch::Receiver<Location> {
        let mut rx = self.tx.subscribe();
        rx.mark_changed();
        rx
    }

    pub fn current(&self) -> Location {
        self.tx.borrow().clone()
    }

    /// Navigate to `segments`. Returns false when the location did not change.
    pub fn navigate<S: Into<String>>(
        &mut self,
        segments: impl IntoIterator<Item = S>,
        query: &[(&str, Option<&str>)],
        handling: QueryHandling,
    ) -> bool {
        let next = self.current().with_path(segments, query, handling);
        self.go(next)
    }

    /// Relative navigation: same path, query updated per `handling`.
    pub fn set_query(&mut self, query: &[(&str, Option<&str>)], handling: QueryHandling) -> bool {
        let next = self.current().with_query(query, handling);
        self.go(next)
    }

    /// Navigate to an absolute location.
    pub fn go(&mut self, next: Location) -> bool {
        let next = redirect(next);
        let previous = self.current();
        if previous == next {
            return false;
        }
        tracing::debug!(from = %previous, to = %next, "Navigate");
        self.history.push(previous);
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
        self.tx.send_replace(next);
        true
    }

    /// Return to the previous location. Returns false with empty history.
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        tracing::debug!(to = %previous, "Navigate back");
        self.tx.send_replace(previous);
        true
    }

    /// Apply a view's intent. Returns false when nothing changed.
    pub fn apply(&mut self, intent: NavigationIntent) -> bool {
        match intent {
            NavigationIntent::OpenListing { category } => self.navigate(
                Route::listing_segments(category.as_deref()),
                &[(PAGE_PARAM, None)],
                QueryHandling::Merge,
            ),
            NavigationIntent::OpenArticle { category, name } => self.navigate(
                Route::article_segments(&category, &name),
                &[],
                QueryHandling::Merge,
            ),
            NavigationIntent::GoToPage(page) => {
                let page = page.max(1).to_string();
                self.set_query(&[(PAGE_PARAM, Some(page.as_str()))], QueryHandling::Merge)
            }
            NavigationIntent::CloseArticle => {
                let Route::Article { category, .. } = Route::resolve(&self.current()) else {
                    return false;
                };
                self.navigate(
                    Route::listing_segments(Some(category.as_str())),
                    &[],
                    QueryHandling::Merge,
                )
            }
            NavigationIntent::Back => self.back(),
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }
}

/// The empty path redirects to `blog`, keeping the query.
fn redirect(location: Location) -> Location {
    if Route::resolve(&location) == Route::Root {
        return location.with_path([BLOG_SEGMENT], &[], QueryHandling::Merge);
    }
    location
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_redirects_to_blog() {
        let nav = Navigator::new(Location::parse("?theme=dark"));
        assert_eq!(nav.current().to_string(), "blog?theme=dark");
    }

    #[test]
    fn test_navigate_merge_keeps_query() {
        let mut nav = Navigator::new(Location::parse("blog/learn?page=2&theme=dark"));
        assert!(nav.navigate(["blog", "learn", "nesting"], &[], QueryHandling::Merge));
        assert_eq!(
            nav.current().to_string(),
            "blog/learn/nesting?page=2&theme=dark"
        );
    }

    #[test]
    fn test_same_location_is_not_a_change() {
        let mut nav = Navigator::new(Location::parse("blog"));
        assert!(!nav.go(Location::parse("blog")));
        assert!(!nav.can_go_back());
    }

    #[test]
    fn test_back_restores_previous() {
        let mut nav = Navigator::new(Location::parse("blog/learn?page=2"));
        nav.navigate(["blog", "learn", "mixins"], &[], QueryHandling::Merge);
        nav.set_query(&[(PAGE_PARAM, Some("3"))], QueryHandling::Merge);
        assert!(nav.back());
        assert!(nav.back());
        assert_eq!(nav.current().to_string(), "blog/learn?page=2");
        assert!(!nav.back());
    }

    #[test]
    fn test_listing_article_back_preserves_page() {
        let mut nav = Navigator::new(Location::parse("blog/learn?page=2"));
        nav.apply(NavigationIntent::OpenArticle {
            category: "learn".into(),
            name: "mixins".into(),
        });
        assert_eq!(nav.current().query(PAGE_PARAM), Some("2"));
        assert!(nav.apply(NavigationIntent::Back));
        assert_eq!(nav.current().to_string(), "blog/learn?page=2");
    }

    #[test]
    fn test_close_article_keeps_page_and_theme() {
        let mut nav = Navigator::new(Location::parse("blog/learn?page=2"));
        nav.apply(NavigationIntent::OpenArticle {
            category: "learn".into(),
            name: "mixins".into(),
        });
        nav.set_query(&[("theme", Some("dark"))], QueryHandling::Merge);

        assert!(nav.apply(NavigationIntent::CloseArticle));
        assert_eq!(nav.current().to_string(), "blog/learn?page=2&theme=dark");
        assert!(!nav.apply(NavigationIntent::CloseArticle));
    }

    #[test]
    fn test_open_listing_resets_page_keeps_theme() {
        let mut nav = Navigator::new(Location::parse("blog/learn?page=3&theme=dark"));
        nav.apply(NavigationIntent::OpenListing {
            category: Some("doc".into()),
        });
        assert_eq!(nav.current().to_string(), "blog/doc?theme=dark");
    }

    #[test]
    fn test_go_to_page_merges() {
        let mut nav = Navigator::new(Location::parse("blog?theme=dark"));
        assert!(nav.apply(NavigationIntent::GoToPage(2)));
        assert_eq!(nav.current().to_string(), "blog?page=2&theme=dark");
        assert!(!nav.apply(NavigationIntent::GoToPage(2)));
    }

    #[test]
    fn test_replace_navigation_drops_page() {
        let mut nav = Navigator::new(Location::parse("blog/learn?page=3"));
        nav.navigate(["blog", "doc", "comments"], &[], QueryHandling::Replace);
        assert_eq!(nav.current().query(PAGE_PARAM), None);
    }

    #[tokio::test]
    async fn test_subscriber_sees_initial_and_changes() {
        let mut nav = Navigator::new(Location::parse("blog"));
        let mut rx = nav.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().to_string(), "blog");

        nav.set_query(&[(PAGE_PARAM, Some("2"))], QueryHandling::Merge);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().to_string(), "blog?page=2");
    }

    #[tokio::test]
    async fn test_dropped_navigator_closes_subscription() {
        let nav = Navigator::new(Location::parse("blog"));
        let mut rx = nav.subscribe();
        rx.borrow_and_update();
        drop(nav);
        assert!(rx.changed().await.is_err());
    }
}
