use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, Focus, Route, View};

use super::styles;
use super::tabs::{auth, chat, history, verifications};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_navigation(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  AdVerifier";
    let help_hint = "[?] Help";

    let user = app
        .user_email()
        .filter(|email| !email.is_empty())
        .map(|email| format!("{}   ", email))
        .unwrap_or_default();

    let used = title.len() + user.chars().count() + help_hint.len() + 4;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(user, styles::highlight_style()),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_navigation(frame: &mut Frame, app: &App, area: Rect) {
    let authenticated = app.is_authenticated();
    let tabs: Vec<(&str, View)> = if authenticated {
        vec![
            ("[1] Chat", View::Chat),
            ("[2] History", View::History),
            ("[3] Verifications", View::Verifications),
        ]
    } else {
        vec![("Login", View::Login), ("Register", View::Register)]
    };

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, view)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        if app.view == *view {
            spans.push(Span::styled(*label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(*label, styles::muted_style()));
        }
    }

    if authenticated {
        let logout = "[L]ogout";
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let padding = (area.width as usize).saturating_sub(used + logout.len() + 2);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(logout, styles::help_key_style()));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route() {
        Route::Loading => render_loading(frame, area),
        Route::Show(_) => match app.view {
            View::Login => auth::render_login(frame, app, area),
            View::Register => auth::render_register(frame, app, area),
            View::Chat => chat::render(frame, app, area),
            View::History => history::render(frame, app, area),
            View::Verifications => verifications::render(frame, app, area),
        },
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let y = area.y + area.height / 2;
    let line_area = Rect::new(area.x, y, area.width, 1);
    let paragraph = Paragraph::new(Span::styled("Loading...", styles::muted_style()))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, line_area);
}

/// Key hints for the current view and focus.
fn shortcuts(app: &App) -> &'static str {
    match app.view {
        View::Login | View::Register => "[Tab] next field | [Enter] select | [Esc] quit",
        View::Chat if app.focus == Focus::Input => "[Enter] send | [Esc] leave input",
        View::Chat => "[↑/↓] scroll | [i] type | [q]uit",
        View::History => "[↑/↓] date | [PgUp/PgDn] scroll | [q]uit",
        View::Verifications => "[↑/↓] select | [r]eload | [q]uit",
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} ", app.session.api().base_url()),
    };
    let right_text = format!(" {} ", shortcuts(app));

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 22, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  AdVerifier", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("  1-3       ", "Chat / History / Verifications"),
        help_line("  ←/→       ", "Previous/next view"),
        help_line("  ↑/↓       ", "Scroll or select"),
        help_line("  PgUp/PgDn ", "Scroll a page"),
        Line::from(""),
        Line::from(Span::styled(" Chat", styles::highlight_style())),
        help_line("  i / Tab   ", "Focus the message input"),
        help_line("  Enter     ", "Send message"),
        help_line("  Esc       ", "Leave the input"),
        Line::from(""),
        Line::from(Span::styled(" Session", styles::highlight_style())),
        help_line("  L         ", "Log out"),
        help_line("  q         ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
