use crate::app::{App, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar: display mode, current location, then either the
/// status message or key hints.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (attribute, mode) = app.display.attribute();
    let mode_label = format!(" {}={} ", attribute, mode);
    let mode_width = (mode_label.len() as u16).min(area.width);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(mode_width), Constraint::Min(0)])
        .split(area);

    f.render_widget(
        Paragraph::new(Span::styled(mode_label, app.style("status_mode"))),
        chunks[0],
    );

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        Cow::Borrowed(match app.view {
            View::Listing => "[Enter]open [n/p]page [Tab]switch [t]heme [?]help [q]uit",
            View::Detail => "[b]ack [j/k]scroll [Ctrl+d/u]page [t]heme [?]help [q]uit",
            View::NotFound => "[g] all articles [Esc]back [?]help [q]uit",
        })
    };

    let line = Line::from(vec![
        Span::raw(" /"),
        Span::raw(app.navigator.current().to_string()),
        Span::raw("  "),
        Span::raw(text),
    ]);
    f.render_widget(
        Paragraph::new(line).style(app.style("status_bar")),
        chunks[1],
    );
}
