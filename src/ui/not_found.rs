use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the not-found view for an unmatched location.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Page not found", app.style("not_found"))),
        Line::from(""),
        Line::from(Span::styled(
            format!("Nothing lives at /{}", app.not_found_path),
            app.style("reader_metadata"),
        )),
        Line::from(""),
        Line::from("Press g for all articles or Esc to go back."),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(app.style("reader_body"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title("404"),
        );
    f.render_widget(paragraph, area);
}
