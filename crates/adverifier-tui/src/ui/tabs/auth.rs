//! Login and registration screens.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::forms::{FieldKind, LoginFocus, RegisterFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Visible width of a text field.
const FIELD_WIDTH: usize = 24;

/// One labelled input field, e.g. `Username: [alice▌            ]`.
fn field_line(label: &str, value: &str, kind: FieldKind, focused: bool) -> Line<'static> {
    let shown: String = if kind.is_masked() {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    // Keep the tail visible while typing past the field width
    let skip = shown.chars().count().saturating_sub(FIELD_WIDTH - 1);
    let visible: String = shown.chars().skip(skip).collect();
    let cursor = if focused { "▌" } else { "" };
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };

    Line::from(vec![
        Span::styled(format!("  {:>9} [", label), styles::muted_style()),
        Span::styled(
            format!("{:<width$}", format!("{}{}", visible, cursor), width = FIELD_WIDTH),
            style,
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

fn button_line(label: &str, focused: bool) -> Line<'static> {
    if focused {
        Line::from(vec![
            Span::raw("             ["),
            Span::styled(format!(" ▶ {} ◀ ", label), styles::selected_style()),
            Span::raw("]"),
        ])
    } else {
        Line::from(vec![
            Span::raw("             ["),
            Span::styled(format!("   {}   ", label), styles::list_item_style()),
            Span::raw("]"),
        ])
    }
}

fn link_line(prompt: &str, link: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::highlight_style()
    };
    Line::from(vec![
        Span::styled(format!("  {} ", prompt), styles::muted_style()),
        Span::styled(link.to_string(), style),
    ])
}

fn render_form(frame: &mut Frame, area: Rect, title: &str, mut lines: Vec<Line<'static>>, error: Option<&str>) {
    if let Some(error) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    let height = lines.len() as u16 + 2;
    let area = centered_rect_fixed(48, height, area);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login;
    let lines = vec![
        Line::from(""),
        field_line("Username:", &form.username, FieldKind::Username, form.focus == LoginFocus::Username),
        field_line("Password:", &form.password, FieldKind::Password, form.focus == LoginFocus::Password),
        Line::from(""),
        button_line("Login", form.focus == LoginFocus::Button),
        Line::from(""),
        link_line("Don't have an account?", "Register", form.focus == LoginFocus::RegisterLink),
    ];
    render_form(frame, area, "Login", lines, form.error.as_deref());
}

pub fn render_register(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.register;
    let lines = vec![
        Line::from(""),
        field_line("Username:", &form.username, FieldKind::Username, form.focus == RegisterFocus::Username),
        field_line("Email:", &form.email, FieldKind::Email, form.focus == RegisterFocus::Email),
        field_line("Password:", &form.password, FieldKind::Password, form.focus == RegisterFocus::Password),
        field_line("Confirm:", &form.confirm_password, FieldKind::Password, form.focus == RegisterFocus::Confirm),
        Line::from(""),
        button_line("Register", form.focus == RegisterFocus::Button),
        Line::from(""),
        link_line("Already have an account?", "Login", form.focus == RegisterFocus::LoginLink),
    ];
    render_form(frame, area, "Register", lines, form.error.as_deref());
}
