use adverifier_core::models::ChatMessage;
use adverifier_core::utils::wrap_text;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;

const WELCOME_TITLE: &str = "Welcome to AdVerifier!";
const WELCOME_TEXT: &str =
    "I can help you verify the credibility of advertisements. Try sending me an ad to analyze.";
const WELCOME_EXAMPLE: &str = "For example: \"Verify this ad: New miracle pill guarantees weight loss of 20 pounds in just one week with no diet or exercise!\"";

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    render_log(frame, app, chunks[0]);
    render_input(frame, app, chunks[1]);
}

/// A message as a header line ("You • 10:15:00") followed by its wrapped body.
pub fn message_lines(message: &ChatMessage, width: usize) -> Vec<Line<'static>> {
    let sender = message.sender();
    let mut lines = vec![Line::from(vec![
        Span::styled(sender.label(), styles::sender_style(sender)),
        Span::styled(format!(" • {}", message.local_time()), styles::muted_style()),
    ])];
    for line in wrap_text(&message.message, width.saturating_sub(2)) {
        lines.push(Line::from(format!("  {}", line)));
    }
    lines.push(Line::from(""));
    lines
}

fn welcome_lines(width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(WELCOME_TITLE, styles::title_style())),
        Line::from(""),
    ];
    lines.extend(wrap_text(WELCOME_TEXT, width).into_iter().map(Line::from));
    lines.push(Line::from(""));
    lines.extend(
        wrap_text(WELCOME_EXAMPLE, width)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, styles::muted_style()))),
    );
    lines
}

fn render_log(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::List;
    let block = Block::default()
        .title(format!(" Chat ({}) ", app.chat.messages.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let inner_width = area.width.saturating_sub(2) as usize;
    let visible = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = if app.chat.messages.is_empty() {
        welcome_lines(inner_width)
    } else {
        app.chat
            .messages
            .iter()
            .flat_map(|m| message_lines(m, inner_width))
            .collect()
    };

    // Stick to the bottom unless scrolled back
    let bottom = lines.len().saturating_sub(visible);
    app.chat.max_scroll.set(bottom);
    let offset = bottom.saturating_sub(app.chat.scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let line = if app.chat.sending {
        Line::from(Span::styled("Sending...", styles::muted_style()))
    } else if app.chat.input.is_empty() && !focused {
        Line::from(Span::styled("Type your message here...", styles::muted_style()))
    } else {
        // Show the end of long input
        let width = area.width.saturating_sub(3) as usize;
        let skip = app.chat.input.chars().count().saturating_sub(width);
        let visible: String = app.chat.input.chars().skip(skip).collect();
        let cursor = if focused { "▌" } else { "" };
        Line::from(format!("{}{}", visible, cursor))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_message_lines_label_and_wrap() {
        let msg = ChatMessage::local("one two three four", false, Utc::now(), 0);
        let lines = message_lines(&msg, 12);
        assert_eq!(lines[0].spans[0].content, "AdVerifier Bot");
        // header, wrapped body, trailing blank
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_welcome_mentions_example() {
        let text: String = welcome_lines(200)
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Welcome to AdVerifier!"));
        assert!(text.contains("Verify this ad:"));
    }
}
