//! Input handling for the TUI.
//!
//! Keys resolve to keybinding actions for the focused context. Actions that
//! move around never touch view state directly: they hand a
//! [`NavigationIntent`] to the navigator, and the resulting location change
//! comes back through the route reactor.

use crate::app::{App, AppEvent, Focus, NavItem, View};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::navigation::NavigationIntent;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::events::dispatch_fetch;
use super::Action;

/// Lines moved by a page scroll in the reader.
const PAGE_SCROLL: usize = 20;

/// Keybinding context for the focused panel and current view.
fn current_context(app: &App) -> KbContext {
    match (app.focus, app.view) {
        (Focus::Nav, _) => KbContext::Nav,
        (Focus::Main, View::Detail) => KbContext::Reader,
        (Focus::Main, _) => KbContext::Listing,
    }
}

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Help overlay captures all keys when visible
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    let context = current_context(app);
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Ok(Action::Continue);
    };
    tracing::trace!(?action, ?context, "Key action");

    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::ScrollDown => {
            app.scroll_down(1);
            app.clamp_reader_scroll();
        }
        KbAction::ScrollUp => app.scroll_up(1),
        KbAction::PageDown => {
            app.scroll_down(PAGE_SCROLL);
            app.clamp_reader_scroll();
        }
        KbAction::PageUp => app.scroll_up(PAGE_SCROLL),
        KbAction::CycleFocus => {
            app.focus = match app.focus {
                Focus::Nav => Focus::Main,
                Focus::Main => Focus::Nav,
            };
        }
        KbAction::Select => handle_select(app),
        KbAction::Back => {
            if !app.navigator.apply(NavigationIntent::Back) {
                app.set_status("No previous location");
            }
        }
        KbAction::ExitReader => handle_exit_reader(app),
        KbAction::NextPage => handle_page_step(app, true),
        KbAction::PrevPage => handle_page_step(app, false),
        KbAction::OpenBlog => {
            app.navigator
                .apply(NavigationIntent::OpenListing { category: None });
        }
        KbAction::ToggleTheme => {
            let mode = app.display.toggle(&mut app.navigator);
            tracing::debug!(mode = mode.name(), "Display mode toggled");
        }
        KbAction::SetLight => app.display.set_light(&mut app.navigator),
        KbAction::SetDark => app.display.set_dark(&mut app.navigator),
        KbAction::Reload => {
            let plan = app.fetch.clone();
            tracing::debug!(?plan, "Reloading current view");
            dispatch_fetch(app, plan, event_tx);
        }
    }
    Ok(Action::Continue)
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Open whatever the focused panel has selected.
fn handle_select(app: &mut App) {
    let intent = match app.focus {
        Focus::Nav => match app.selected_nav_item() {
            Some(NavItem::All) => NavigationIntent::OpenListing { category: None },
            Some(NavItem::Category(category)) => NavigationIntent::OpenListing {
                category: Some(category.to_string()),
            },
            Some(NavItem::Article(article)) => NavigationIntent::OpenArticle {
                category: article.category.to_string(),
                name: article.slug().to_string(),
            },
            None => return,
        },
        Focus::Main => {
            // The shown page may belong to the previous listing until the load lands
            if app.view != View::Listing || app.listing_loading {
                return;
            }
            match app.selected_listing_article() {
                Some(article) => NavigationIntent::OpenArticle {
                    category: article.category.to_string(),
                    name: article.slug().to_string(),
                },
                None => return,
            }
        }
    };
    if matches!(intent, NavigationIntent::OpenArticle { .. }) {
        app.focus = Focus::Main;
    }
    app.navigator.apply(intent);
}

/// Leave the reader for the article's category listing. The page and
/// display mode in the location carry over.
fn handle_exit_reader(app: &mut App) {
    if app.view != View::Detail {
        return;
    }
    app.navigator.apply(NavigationIntent::CloseArticle);
}

/// Move one listing page forward or back. The last known page count bounds
/// forward steps; locations typed by hand can still go past it.
fn handle_page_step(app: &mut App, forward: bool) {
    if app.view != View::Listing || app.listing_loading {
        return;
    }
    let current = app.reactor.state().map_or(1, |s| s.page);
    let target = if forward {
        match app.listing.as_ref().and_then(|page| page.next) {
            Some(next) => next,
            None => {
                app.set_status("Already on the last page");
                return;
            }
        }
    } else if current > 1 {
        current - 1
    } else {
        app.set_status("Already on the first page");
        return;
    };
    app.navigator.apply(NavigationIntent::GoToPage(target));
}

// ============================================================================
// Tests
// ============================================================================
