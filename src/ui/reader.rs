use crate::app::{App, ContentState};
use crate::theme::ColorPalette;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::borrow::Cow;

use super::loop_runner::SPINNER_FRAMES;

const SPINNER: [&str; SPINNER_FRAMES] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the article detail view
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    // Borders take two rows and two columns
    app.reader_visible_lines = area.height.saturating_sub(2) as usize;
    app.reader_viewport_width = area.width.saturating_sub(2) as usize;
    app.clamp_reader_scroll();

    let border_style = app.style("panel_border_focused");
    let Some(article) = app.reader_article.as_ref() else {
        let paragraph = Paragraph::new("No article selected")
            .style(app.style("reader_body"))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title("Article"),
            );
        f.render_widget(paragraph, area);
        return;
    };

    let header = vec![
        Line::from(Span::styled(
            article.title.to_string(),
            app.style("reader_heading"),
        )),
        Line::from(Span::styled(
            format!("{} / {}", article.category, article.slug()),
            app.style("reader_metadata"),
        )),
        Line::from(""),
    ];

    let content_lines: Cow<'_, [Line<'static>]> = match &app.content_state {
        ContentState::Idle => Cow::Owned(vec![Line::from("")]),
        ContentState::Loading { .. } => Cow::Owned(vec![Line::from(Span::styled(
            format!("{} Loading article...", SPINNER[app.spinner_frame % SPINNER_FRAMES]),
            app.style("reader_metadata"),
        ))]),
        ContentState::Loaded { rendered_lines, .. } => Cow::Borrowed(rendered_lines),
        ContentState::Failed { error, .. } => Cow::Owned(vec![
            Line::from(Span::styled(
                "Failed to load article",
                app.style("reader_error"),
            )),
            Line::from(""),
            Line::from(Span::styled(error.clone(), app.style("reader_error"))),
        ]),
    };

    let title = match &app.pending_article {
        Some(pending) if !matches!(app.content_state, ContentState::Loading { .. }) => format!(
            "Article {} {}",
            SPINNER[app.spinner_frame % SPINNER_FRAMES],
            pending.title
        ),
        _ => "Article".to_string(),
    };

    let text = Text::from_iter(header.into_iter().chain(content_lines.iter().cloned()));
    let paragraph = Paragraph::new(text)
        .style(app.style("reader_body"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(crate::app::MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, area);
}

/// Convert Markdown to styled lines using the palette's reader roles.
pub fn render_markdown(md: &str, palette: &ColorPalette) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(md, options);

    let mut lines: Vec<Line<'static>> = Vec::with_capacity(md.lines().count());
    let mut current_spans: Vec<Span<'static>> = Vec::with_capacity(4);
    let mut in_code_block = false;
    let mut in_heading = false;
    let mut in_emphasis = false;
    let mut in_strong = false;
    let mut link_depth = 0usize;
    let mut list_depth = 0usize;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut lines, &mut current_spans);
                lines.push(Line::default());
                in_heading = false;
            }
            Event::End(TagEnd::Paragraph) => {
                flush(&mut lines, &mut current_spans);
                if list_depth == 0 {
                    lines.push(Line::default());
                }
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                lines.push(Line::default());
            }
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    lines.push(Line::default());
                }
            }
            Event::Start(Tag::Item) => {
                flush(&mut lines, &mut current_spans);
                current_spans.push(Span::styled(
                    format!("{}• ", "  ".repeat(list_depth.saturating_sub(1))),
                    palette.reader_body,
                ));
            }
            Event::End(TagEnd::Item) => flush(&mut lines, &mut current_spans),
            Event::Start(Tag::Emphasis) => in_emphasis = true,
            Event::End(TagEnd::Emphasis) => in_emphasis = false,
            Event::Start(Tag::Strong) => in_strong = true,
            Event::End(TagEnd::Strong) => in_strong = false,
            Event::Start(Tag::Link { .. }) => link_depth += 1,
            Event::End(TagEnd::Link) => link_depth = link_depth.saturating_sub(1),
            Event::Start(Tag::Image { dest_url, .. }) => {
                current_spans.push(Span::styled(
                    format!("[Image: {}]", dest_url),
                    palette.reader_link,
                ));
            }
            Event::Text(text) => {
                if in_code_block {
                    // Code blocks keep their own line structure
                    for line in text.lines() {
                        lines.push(Line::from(Span::styled(
                            line.to_string(),
                            palette.reader_code_block,
                        )));
                    }
                    continue;
                }
                let style = if in_heading {
                    palette.reader_heading
                } else if link_depth > 0 {
                    palette.reader_link
                } else if in_strong {
                    palette.reader_strong
                } else if in_emphasis {
                    palette.reader_emphasis
                } else {
                    palette.reader_body
                };
                current_spans.push(Span::styled(text.into_string(), style));
            }
            Event::Code(code) => {
                current_spans.push(Span::styled(
                    format!("`{}`", code),
                    palette.reader_inline_code,
                ));
            }
            Event::SoftBreak => current_spans.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut lines, &mut current_spans),
            Event::Rule => {
                flush(&mut lines, &mut current_spans);
                lines.push(Line::from(Span::styled("────────", palette.reader_metadata)));
                lines.push(Line::default());
            }
            _ => {}
        }
    }

    flush(&mut lines, &mut current_spans);

    // Drop trailing blank lines
    while lines
        .last()
        .is_some_and(|l| l.spans.iter().all(|s| s.content.is_empty()))
    {
        lines.pop();
    }
    lines
}

fn flush(lines: &mut Vec<Line<'static>>, spans: &mut Vec<Span<'static>>) {
    if !spans.is_empty() {
        lines.push(Line::from(std::mem::take(spans)));
    }
}
