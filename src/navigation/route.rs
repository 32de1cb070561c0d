use super::location::Location;
use crate::content::Category;
use std::sync::Arc;

/// Top-level path segment every blog location lives under.
pub const BLOG_SEGMENT: &str = "blog";

/// A location resolved against the known path patterns.
///
/// | path              | route                  |
/// |-------------------|------------------------|
/// | (empty)           | `Root` (redirects)     |
/// | `blog`            | `Blog`                 |
/// | `blog/:cat`       | `Category`             |
/// | `blog/:cat/:name` | `Article`              |
/// | anything else     | `NotFound`             |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Blog,
    Category { category: Category },
    Article { category: Category, name: Arc<str> },
    NotFound { path: String },
}

impl Route {
    pub fn resolve(location: &Location) -> Self {
        match location.segments() {
            [] => Self::Root,
            [blog] if blog == BLOG_SEGMENT => Self::Blog,
            [blog, category] if blog == BLOG_SEGMENT => Self::Category {
                category: Category::new(category),
            },
            [blog, category, name] if blog == BLOG_SEGMENT => Self::Article {
                category: Category::new(category),
                name: Arc::from(name.as_str()),
            },
            _ => Self::NotFound {
                path: location.path(),
            },
        }
    }

    /// Category filter implied by the route, if any.
    pub fn category(&self) -> Option<&Category> {
        match self {
            Self::Category { category } | Self::Article { category, .. } => Some(category),
            _ => None,
        }
    }

    pub fn article_name(&self) -> Option<&Arc<str>> {
        match self {
            Self::Article { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_listing(&self) -> bool {
        matches!(self, Self::Blog | Self::Category { .. })
    }

    /// Path segments for a listing of `category` (all articles when `None`).
    pub fn listing_segments(category: Option<&str>) -> Vec<String> {
        let mut segments = vec![BLOG_SEGMENT.to_string()];
        if let Some(category) = category {
            segments.push(category.to_string());
        }
        segments
    }

    /// Path segments for one article.
    pub fn article_segments(category: &str, name: &str) -> Vec<String> {
        vec![
            BLOG_SEGMENT.to_string(),
            category.to_string(),
            name.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(s: &str) -> Route {
        Route::resolve(&Location::parse(s))
    }

    #[test]
    fn test_empty_path_is_root() {
        assert_eq!(resolve(""), Route::Root);
        assert_eq!(resolve("?theme=dark"), Route::Root);
    }

    #[test]
    fn test_blog_listing() {
        assert_eq!(resolve("blog?page=2"), Route::Blog);
        assert!(resolve("blog").is_listing());
    }

    #[test]
    fn test_category_listing() {
        let route = resolve("blog/learn");
        assert_eq!(route.category().map(Category::as_str), Some("learn"));
        assert!(route.is_listing());
        assert!(route.article_name().is_none());
    }

    #[test]
    fn test_article() {
        let route = resolve("blog/doc/comments");
        assert_eq!(route.category().map(Category::as_str), Some("doc"));
        assert_eq!(route.article_name().map(|n| &**n), Some("comments"));
        assert!(!route.is_listing());
    }

    #[test]
    fn test_unknown_paths_not_found() {
        assert_eq!(
            resolve("about"),
            Route::NotFound {
                path: "about".into()
            }
        );
        assert!(matches!(resolve("blog/a/b/c"), Route::NotFound { .. }));
    }

    #[test]
    fn test_segment_builders() {
        assert_eq!(Route::listing_segments(None), vec!["blog"]);
        assert_eq!(Route::listing_segments(Some("doc")), vec!["blog", "doc"]);
        assert_eq!(
            Route::article_segments("learn", "mixins"),
            vec!["blog", "learn", "mixins"]
        );
    }
}
