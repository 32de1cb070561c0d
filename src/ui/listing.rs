use crate::app::{App, Focus};
use crate::navigation::Route;
use crate::pagination::page_indicator;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::loop_runner::SPINNER_FRAMES;

const SPINNER: [&str; SPINNER_FRAMES] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the paginated article listing
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 4 {
        return;
    }
    let is_focused = app.focus == Focus::Main;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let width = chunks[0].width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = match &app.listing {
        None => vec![ListItem::new("Loading...")],
        Some(page) if page.is_empty() => vec![ListItem::new(Span::styled(
            "No articles on this page",
            app.style("listing_description"),
        ))],
        Some(page) => page
            .articles
            .iter()
            .enumerate()
            .map(|(i, article)| {
                let title_style = if is_focused && i == app.selected_listing {
                    app.style("listing_selected")
                } else {
                    app.style("listing_title")
                };
                let title = strip_control_chars(&article.title).into_owned();
                let description = strip_control_chars(&article.description).into_owned();
                ListItem::new(vec![
                    Line::from(Span::styled(
                        truncate_to_width(&title, width).into_owned(),
                        title_style,
                    )),
                    Line::from(Span::styled(
                        truncate_to_width(&format!("  {}", description), width).into_owned(),
                        app.style("listing_description"),
                    )),
                ])
            })
            .collect(),
    };

    let border_style = if is_focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let mut title = match &app.route {
        Route::Category { category } => format!("Articles - {}", category),
        _ => "Articles - all".to_string(),
    };
    if app.listing_loading {
        title = format!("{} {}", title, SPINNER[app.spinner_frame % SPINNER_FRAMES]);
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    let mut state = ListState::default().with_selected(
        app.listing
            .as_ref()
            .filter(|page| !page.is_empty())
            .map(|_| app.selected_listing),
    );
    f.render_stateful_widget(list, chunks[0], &mut state);

    let footer = match &app.listing {
        Some(page) => format!(
            " {}, {} articles",
            page_indicator(page.current_page, page.pages),
            page.total_items
        ),
        None => String::new(),
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(footer, app.style("listing_page")))),
        chunks[1],
    );
}
