//! Background task spawning shared by the UI layer.
//!
//! Every task is wrapped in [`catch_task_panic`] and reports back through
//! the `AppEvent` channel. Page and body loads carry the generation the app
//! assigned them so late results can be discarded.

use crate::app::{App, AppEvent, ARTICLES_LOAD_TASK, BODY_LOAD_TASK, PAGE_LOAD_TASK};
use crate::content::{Article, PageQuery};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of the task silently disappearing, a panic becomes
/// `Err(String)` holding the panic message.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else if let Some(e) = panic.downcast_ref::<Box<dyn std::error::Error + Send>>() {
                e.to_string()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Spawn `work`, send the event it produces, and report a panic as
/// `AppEvent::TaskPanicked`.
fn spawn_reporting<F>(
    task: &'static str,
    work: F,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()>
where
    F: Future<Output = AppEvent> + Send + 'static,
{
    tokio::spawn(async move {
        match catch_task_panic(work).await {
            Ok(event) => {
                if let Err(e) = tx.send(event).await {
                    tracing::warn!(task, error = %e, "Channel send failed (receiver dropped)");
                }
            }
            Err(panic_msg) => {
                tracing::error!(task, error = %panic_msg, "Background task panicked");
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task,
                        error: panic_msg,
                    })
                    .await;
            }
        }
    })
}

/// Load every article for the navigation panel.
pub(super) fn spawn_articles_load(app: &App, event_tx: &mpsc::Sender<AppEvent>) {
    let gateway = Arc::clone(&app.gateway);
    tracing::debug!("Spawning article set load");
    spawn_reporting(
        ARTICLES_LOAD_TASK,
        async move { AppEvent::ArticlesLoaded(gateway.fetch_all().await) },
        event_tx.clone(),
    );
}

/// Load one listing page, superseding any page load in flight.
pub(super) fn spawn_page_load(app: &mut App, query: PageQuery, event_tx: &mpsc::Sender<AppEvent>) {
    let generation = app.begin_page_load();
    let gateway = Arc::clone(&app.gateway);

    tracing::debug!(
        page = query.page,
        per_page = query.per_page,
        category = ?query.category.as_ref().map(|c| c.as_str()),
        generation,
        "Spawning page load"
    );

    app.page_handle = Some(spawn_reporting(
        PAGE_LOAD_TASK,
        async move {
            let result = gateway.fetch_page(&query).await;
            AppEvent::PageLoaded { generation, result }
        },
        event_tx.clone(),
    ));
}

/// Load an article body, superseding any body load in flight.
pub(super) fn spawn_body_load(app: &mut App, article: Article, event_tx: &mpsc::Sender<AppEvent>) {
    let generation = app.begin_body_load(&article);
    let bodies = app.bodies.clone();

    tracing::debug!(slug = %article.slug(), generation, "Spawning body load");

    app.body_handle = Some(spawn_reporting(
        BODY_LOAD_TASK,
        async move {
            let result = bodies.load(&article).await;
            AppEvent::BodyLoaded {
                generation,
                article,
                result,
            }
        },
        event_tx.clone(),
    ));
}

// ============================================================================
// Tests
// ============================================================================
