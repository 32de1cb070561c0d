//! Help overlay listing the active keybindings.
//!
//! Lines are built from the registry (user overrides included) and styled
//! with the `help_*` roles of the current display mode.

use crate::app::App;
use crate::keybindings::{Context, KeybindingRegistry};
use crate::theme::DisplayModeStore;
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SECTIONS: [(Context, &str); 4] = [
    (Context::Global, "General"),
    (Context::Nav, "Navigation"),
    (Context::Listing, "Listing"),
    (Context::Reader, "Article"),
];

/// Width of the key column, including its indent.
const KEY_COLUMN: usize = 16;

/// Styled help lines: a column header, then one section per context.
pub(super) fn help_lines(
    registry: &KeybindingRegistry,
    display: &DisplayModeStore,
) -> Vec<Line<'static>> {
    let bindings = registry.all_bindings();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(pad("Key", KEY_COLUMN), display.style("help_header")),
            Span::styled("Action", display.style("help_header")),
        ]),
        Line::default(),
    ];

    for (context, label) in SECTIONS {
        let mut section = bindings
            .iter()
            .filter(|(c, _, _, _)| *c == context)
            .peekable();
        if section.peek().is_none() {
            continue;
        }

        lines.push(Line::from(Span::styled(
            label.to_string(),
            display.style("help_section"),
        )));
        for (_, key, _, description) in section {
            let key = truncate_to_width(key, KEY_COLUMN - 3);
            lines.push(Line::from(vec![
                Span::styled(pad(&format!("  {}", key), KEY_COLUMN), display.style("help_key")),
                Span::styled(description.to_string(), display.style("help_description")),
            ]));
        }
        lines.push(Line::default());
    }

    if lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    lines
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Draw the overlay centered over the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    let lines = help_lines(&app.keybindings, &app.display);
    let visible = overlay.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible);
    let scroll = app.help_scroll_offset.min(max_scroll);

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}, j/k to scroll) ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let paragraph = Paragraph::new(lines)
        .style(app.style("help_description"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));

    f.render_widget(Clear, overlay);
    f.render_widget(paragraph, overlay);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
