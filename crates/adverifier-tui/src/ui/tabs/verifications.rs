use adverifier_core::utils::wrap_text;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.verifications.loading {
        let paragraph = Paragraph::new(Span::styled("Loading...", styles::muted_style()))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_result_table(frame, app, chunks[0]);
    render_result_detail(frame, app, chunks[1]);
}

fn render_result_table(frame: &mut Frame, app: &App, area: Rect) {
    let excerpt_width = area.width.saturating_sub(26) as usize;
    let rows: Vec<Row> = app
        .verifications
        .results
        .iter()
        .map(|result| {
            let credibility = result.credibility();
            Row::new(vec![
                Cell::from(result.created_at.format("%Y-%m-%d").to_string()),
                Cell::from(format!("{:.2}", result.credibility_score))
                    .style(styles::credibility_style(credibility)),
                Cell::from(result.excerpt(excerpt_width.max(8))),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let focused = matches!(app.focus, Focus::List);
    let block = Block::default()
        .title(format!(" Verifications ({}) ", app.verifications.results.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let header = Row::new(vec!["Date", "Score", "Advertisement"]).style(styles::highlight_style());
    let table = Table::new(
        rows,
        [Constraint::Length(11), Constraint::Length(6), Constraint::Min(8)],
    )
    .header(header)
    .block(block)
    .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !app.verifications.results.is_empty() {
        state.select(Some(app.verifications.selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_result_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let block = Block::default()
        .title(" Details ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let width = area.width.saturating_sub(2) as usize;
    let content: Vec<Line> = if let Some(ref error) = app.verifications.error {
        vec![Line::from(Span::styled(error.clone(), styles::error_style()))]
    } else if let Some(result) = app.selected_verification() {
        let credibility = result.credibility();
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Credibility Score: ", styles::highlight_style()),
                Span::styled(result.score_display(), styles::credibility_style(credibility)),
                Span::styled(format!(" ({})", credibility.label()), styles::muted_style()),
            ]),
            Line::from(vec![
                Span::styled("Advertisement: ", styles::highlight_style()),
                Span::raw(format!("#{}", result.advertisement)),
            ]),
            Line::from(vec![
                Span::styled("Verified: ", styles::highlight_style()),
                Span::raw(result.created_at.format("%Y-%m-%d %H:%M").to_string()),
            ]),
            Line::from(""),
        ];
        if let Some(ref content) = result.advertisement_content {
            lines.extend(
                wrap_text(content, width)
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, styles::muted_style()))),
            );
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled("Explanation", styles::highlight_style())));
        lines.extend(wrap_text(&result.explanation, width).into_iter().map(Line::from));
        lines
    } else {
        vec![Line::from(Span::styled(
            "No verification results yet. Send an ad in the Chat view.",
            styles::muted_style(),
        ))]
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}
