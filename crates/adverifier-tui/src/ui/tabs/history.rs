use adverifier_core::utils::format_date;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;

use super::chat::message_lines;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.history.loading {
        let paragraph = Paragraph::new(Span::styled("Loading...", styles::muted_style()))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    if app.history.view.is_empty() {
        render_empty(frame, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(20)])
        .split(area);

    render_date_list(frame, app, chunks[0]);
    render_messages(frame, app, chunks[1]);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("No Chat History", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Start a conversation in the Chat view to see it here.",
            styles::muted_style(),
        )),
    ];
    let block = Block::default()
        .title(" History ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

fn render_date_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .history
        .view
        .groups()
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let line = Line::from(vec![
                Span::raw(format_date(group.date)),
                Span::styled(format!(" ({})", group.messages.len()), styles::muted_style()),
            ]);
            let style = if Some(i) == app.history.view.selected_index() {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let focused = matches!(app.focus, Focus::List);
    let block = Block::default()
        .title(format!(" Dates ({}) ", app.history.view.groups().len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(app.history.view.selected_index());

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_messages(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let title = match app.history.view.selected_date() {
        Some(date) => format!(" {} ", format_date(date)),
        None => " Messages ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let width = area.width.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .history
        .view
        .selected_messages()
        .iter()
        .flat_map(|m| message_lines(m, width))
        .collect();
    let visible = area.height.saturating_sub(2) as usize;
    app.history.max_scroll.set(lines.len().saturating_sub(visible));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.history.scroll.min(app.history.max_scroll.get()).min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}
