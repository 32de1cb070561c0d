use crate::app::{App, Focus, NavItem};
use crate::navigation::Route;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the navigation panel: all articles, then each category followed
/// by its articles.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Nav;
    let width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = app
        .nav_items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let (label, role) = match item {
                NavItem::All => ("All articles".to_string(), "nav_category"),
                NavItem::Category(category) => (category.to_string(), "nav_category"),
                NavItem::Article(article) => {
                    let current = matches!(
                        &app.route,
                        Route::Article { category, name }
                            if article.in_category(category.as_str()) && article.slug() == *name
                    );
                    let title = strip_control_chars(&article.title).into_owned();
                    (
                        format!("  {}", title),
                        if current { "nav_current" } else { "nav_item" },
                    )
                }
            };
            let style = if is_focused && i == app.selected_nav {
                app.style("nav_selected")
            } else {
                app.style(role)
            };
            ListItem::new(Line::from(Span::styled(
                truncate_to_width(&label, width).into_owned(),
                style,
            )))
        })
        .collect();

    let border_style = if is_focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let title = if app.articles_loaded {
        format!("Browse ({})", app.articles.len())
    } else {
        "Browse".to_string()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    let mut state = ListState::default().with_selected(Some(app.selected_nav));
    f.render_stateful_widget(list, area, &mut state);
}
