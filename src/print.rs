//! Non-interactive rendering of a single location to text.
//!
//! Runs the same reactor and gateway path as the TUI, once, and returns
//! what the view would show: a listing as plain text, an article as an
//! HTML fragment tagged with the display-mode attribute.

use crate::app::article_path;
use crate::content::{render_html, BodyError, BodyLoader, ContentGateway, GatewayError};
use crate::navigation::{FetchPlan, Location, Route, RouteReactor};
use crate::pagination::page_indicator;
use crate::theme::DisplayModeStore;
use crate::util::strip_control_chars;
use std::fmt::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Body(#[from] BodyError),

    #[error("Not found: /{0}")]
    NotFound(String),
}

/// Render `location` the way the matching view would.
pub async fn render_location(
    gateway: &dyn ContentGateway,
    bodies: &BodyLoader,
    location: &Location,
    page_size: usize,
) -> Result<String, PrintError> {
    let mut reactor = RouteReactor::new(page_size);
    let Some(reaction) = reactor.react(location) else {
        return Ok(String::new());
    };

    match reaction.fetch {
        FetchPlan::Listing(query) => {
            let page = gateway.fetch_page(&query).await?;
            let heading = match &reaction.state.route {
                Route::Category { category } => category.to_string(),
                _ => "all".to_string(),
            };

            let mut out = String::new();
            let _ = writeln!(out, "Articles - {}", heading);
            for article in &page.articles {
                let _ = writeln!(
                    out,
                    "- {} [{}]",
                    strip_control_chars(&article.title),
                    article_path(&article.category, &article.slug())
                );
                if !article.description.is_empty() {
                    let _ = writeln!(out, "    {}", strip_control_chars(&article.description));
                }
            }
            if page.is_empty() {
                let _ = writeln!(out, "(no articles on this page)");
            }
            let _ = writeln!(
                out,
                "{}, {} articles",
                page_indicator(page.current_page, page.pages),
                page.total_items
            );
            Ok(out)
        }
        FetchPlan::Article { category, name } => {
            let articles = gateway.fetch_all().await?;
            let Some(article) = articles
                .into_iter()
                .find(|a| a.in_category(category.as_str()) && &*a.slug() == &*name)
            else {
                return Err(PrintError::NotFound(article_path(category.as_str(), &name)));
            };

            let markdown = match bodies.load(&article).await {
                Ok(markdown) => markdown,
                Err(BodyError::NotFound(_)) => {
                    return Err(PrintError::NotFound(article_path(
                        category.as_str(),
                        &name,
                    )))
                }
                Err(e) => return Err(e.into()),
            };

            let display = DisplayModeStore::new(reaction.state.theme);
            let (attribute, value) = display.attribute();
            Ok(format!(
                "<article {}=\"{}\">\n{}</article>\n",
                attribute,
                value,
                render_html(&markdown)
            ))
        }
        FetchPlan::None => Err(PrintError::NotFound(location.path())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BodySource, LocalGateway};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn loader(dir: &std::path::Path) -> BodyLoader {
        BodyLoader::new(
            reqwest::Client::new(),
            BodySource::Directory(dir.to_path_buf()),
            "md",
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_print_category_listing() {
        let gateway = LocalGateway::bundled();
        let bodies = loader(&std::env::temp_dir().join("sassblog_print_listing"));
        let out = render_location(&gateway, &bodies, &Location::parse("blog/doc"), 4)
            .await
            .unwrap();

        assert_eq!(out.lines().next(), Some("Articles - doc"));
        assert!(out.contains("- Syntax [blog/doc/syntax]"));
        assert!(out.ends_with("page 1/1, 2 articles\n"));
    }

    #[tokio::test]
    async fn test_print_page_past_end_is_empty() {
        let gateway = LocalGateway::bundled();
        let bodies = loader(&std::env::temp_dir().join("sassblog_print_past_end"));
        let out = render_location(&gateway, &bodies, &Location::parse("blog?page=9"), 4)
            .await
            .unwrap();
        assert!(out.contains("(no articles on this page)"));
        assert!(out.contains("page 9/3, 9 articles"));
    }

    #[tokio::test]
    async fn test_print_invalid_page_falls_back_to_first() {
        let gateway = LocalGateway::bundled();
        let bodies = loader(&std::env::temp_dir().join("sassblog_print_invalid_page"));
        let out = render_location(&gateway, &bodies, &Location::parse("blog?page=abc"), 4)
            .await
            .unwrap();
        assert!(out.contains("page 1/3"));
    }

    #[tokio::test]
    async fn test_print_article_as_html() {
        let dir = std::env::temp_dir().join("sassblog_print_article");
        std::fs::create_dir_all(dir.join("learn")).unwrap();
        std::fs::write(dir.join("learn").join("mixins.md"), "# Mixins\n\nReuse *styles*.").unwrap();

        let gateway = LocalGateway::bundled();
        let out = render_location(
            &gateway,
            &loader(&dir),
            &Location::parse("blog/learn/mixins?theme=dark"),
            4,
        )
        .await
        .unwrap();

        assert!(out.starts_with("<article data-theme=\"dark\">"));
        assert!(out.contains("<h1>Mixins</h1>"));
        assert!(out.contains("<em>styles</em>"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_print_unknown_article_not_found() {
        let gateway = LocalGateway::bundled();
        let bodies = loader(&std::env::temp_dir().join("sassblog_print_unknown"));
        let err = render_location(&gateway, &bodies, &Location::parse("blog/learn/nope"), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, PrintError::NotFound(ref p) if p == "blog/learn/nope"));
    }

    #[tokio::test]
    async fn test_print_unmatched_path_not_found() {
        let gateway = LocalGateway::bundled();
        let bodies = loader(&std::env::temp_dir().join("sassblog_print_unmatched"));
        let err = render_location(&gateway, &bodies, &Location::parse("docs/intro"), 4)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not found: /docs/intro");
    }
}
