//! Location changes and background task events.
//!
//! A location change runs through the route reactor and starts whatever
//! fetch the new state needs. Completion events then land here and update
//! the app; failures are logged and the previous content stays on screen.

use crate::app::{article_path, App, AppEvent};
use crate::navigation::{FetchPlan, Location};
use tokio::sync::mpsc;

use super::helpers::{spawn_body_load, spawn_page_load};

/// React to a location published by the navigator.
pub(super) fn handle_location_change(
    app: &mut App,
    location: &Location,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let Some(reaction) = app.reactor.react(location) else {
        return;
    };
    app.apply_reaction(&reaction);
    dispatch_fetch(app, reaction.fetch, event_tx);
}

/// Start the fetch described by `plan`.
pub(super) fn dispatch_fetch(app: &mut App, plan: FetchPlan, event_tx: &mpsc::Sender<AppEvent>) {
    match plan {
        FetchPlan::Listing(query) => spawn_page_load(app, query, event_tx),
        FetchPlan::Article { category, name } => match app.resolve_article(&category, &name) {
            Some(article) => spawn_body_load(app, article, event_tx),
            None => app.show_not_found(article_path(category.as_str(), &name)),
        },
        FetchPlan::None => {}
    }
}

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ArticlesLoaded(Ok(articles)) => {
            tracing::info!(count = articles.len(), "Article set loaded");
            app.set_articles(articles);
        }
        AppEvent::ArticlesLoaded(Err(e)) => {
            tracing::warn!(error = %e, "Failed to load article set");
            app.set_status(format!("Failed to load articles: {}", e));
        }
        AppEvent::PageLoaded { generation, result } => {
            app.finish_page_load(generation, result);
        }
        AppEvent::BodyLoaded {
            generation,
            article,
            result,
        } => {
            app.finish_body_load(generation, article, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.abandon_task(task);
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{ContentState, View};
    use crate::content::{BodyLoader, BodySource, LocalGateway};
    use crate::navigation::{NavigationIntent, Navigator, QueryHandling, THEME_PARAM};
    use crate::theme::ThemeVariant;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_app(dir: &std::path::Path) -> App {
        let bodies = BodyLoader::new(
            reqwest::Client::new(),
            BodySource::Directory(dir.to_path_buf()),
            "md",
            Duration::from_secs(1),
        );
        App::new(
            Arc::new(LocalGateway::bundled()),
            bodies,
            Navigator::new(Location::parse("blog")),
            4,
        )
    }

    /// Feed the navigator's current location through the reactor and apply
    /// the one event the resulting fetch produces.
    async fn settle(app: &mut App, tx: &mpsc::Sender<AppEvent>, rx: &mut mpsc::Receiver<AppEvent>) {
        let location = app.navigator.current();
        handle_location_change(app, &location, tx);
        let event = rx.recv().await.unwrap();
        handle_app_event(app, event);
    }

    #[tokio::test]
    async fn test_listing_flow_through_pages() {
        let dir = std::env::temp_dir().join("sassblog_events_listing");
        let mut app = test_app(&dir);
        let (tx, mut rx) = mpsc::channel(8);

        settle(&mut app, &tx, &mut rx).await;
        let page = app.listing.as_ref().unwrap();
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_items, 9);
        assert_eq!(page.articles.len(), 4);

        app.navigator.apply(NavigationIntent::GoToPage(3));
        settle(&mut app, &tx, &mut rx).await;
        let page = app.listing.as_ref().unwrap();
        assert_eq!(page.current_page, 3);
        assert_eq!(page.articles.len(), 1);
        assert_eq!(page.next, None);
    }

    #[tokio::test]
    async fn test_theme_change_refetches_same_page() {
        let dir = std::env::temp_dir().join("sassblog_events_theme");
        let mut app = test_app(&dir);
        let (tx, mut rx) = mpsc::channel(8);
        settle(&mut app, &tx, &mut rx).await;
        let before = app.page_generation;

        app.navigator
            .set_query(&[(THEME_PARAM, Some("dark"))], QueryHandling::Merge);
        settle(&mut app, &tx, &mut rx).await;

        assert_eq!(app.display.current(), ThemeVariant::Dark);
        assert_eq!(app.page_generation, before + 1);
        assert_eq!(app.listing.as_ref().unwrap().current_page, 1);
    }

    #[tokio::test]
    async fn test_article_body_loaded_from_directory() {
        let dir = std::env::temp_dir().join("sassblog_events_article");
        std::fs::create_dir_all(dir.join("learn")).unwrap();
        std::fs::write(dir.join("learn").join("nesting.md"), "# Nesting\n\nBody").unwrap();

        let mut app = test_app(&dir);
        let (tx, mut rx) = mpsc::channel(8);
        app.navigator.apply(NavigationIntent::OpenArticle {
            category: "learn".to_string(),
            name: "nesting".to_string(),
        });
        settle(&mut app, &tx, &mut rx).await;

        assert_eq!(app.view, View::Detail);
        assert!(matches!(
            &app.content_state,
            ContentState::Loaded { slug, .. } if &**slug == "nesting"
        ));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_body_shows_not_found() {
        let dir = std::env::temp_dir().join("sassblog_events_missing");
        let mut app = test_app(&dir);
        let (tx, mut rx) = mpsc::channel(8);
        app.navigator.apply(NavigationIntent::OpenArticle {
            category: "doc".to_string(),
            name: "syntax".to_string(),
        });
        settle(&mut app, &tx, &mut rx).await;
        assert_eq!(app.view, View::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_slug_skips_fetch_once_articles_known() {
        let dir = std::env::temp_dir().join("sassblog_events_unknown");
        let mut app = test_app(&dir);
        let (tx, _rx) = mpsc::channel(8);
        handle_app_event(
            &mut app,
            AppEvent::ArticlesLoaded(Ok(crate::content::catalog::articles())),
        );

        handle_location_change(&mut app, &Location::parse("blog/learn/nope"), &tx);
        assert_eq!(app.view, View::NotFound);
        assert_eq!(app.not_found_path, "blog/learn/nope");
        assert!(app.body_handle.is_none());
    }

    #[tokio::test]
    async fn test_task_panic_sets_status() {
        let dir = std::env::temp_dir().join("sassblog_events_panic");
        let mut app = test_app(&dir);
        app.begin_page_load();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: crate::app::PAGE_LOAD_TASK,
                error: "boom".to_string(),
            },
        );
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("page_load"));
        assert!(!app.listing_loading);
    }
}
