//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Focus, View, PAGE_SCROLL_SIZE};
use crate::forms::{push_char, FieldKind, LoginFocus, RegisterFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Forms and the chat input take raw characters
    match app.view {
        View::Login => return handle_login_input(app, key).await,
        View::Register => return handle_register_input(app, key).await,
        View::Chat if app.focus == Focus::Input => {
            handle_chat_input(app, key);
            return Ok(false);
        }
        _ => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('L') => {
            app.logout().await;
            return Ok(false);
        }
        KeyCode::Char('1') => app.navigate(View::Chat).await,
        KeyCode::Char('2') => app.navigate(View::History).await,
        KeyCode::Char('3') => app.navigate(View::Verifications).await,
        KeyCode::Left => {
            let prev = app.view.prev();
            app.navigate(prev).await;
        }
        KeyCode::Right => {
            let next = app.view.next();
            app.navigate(next).await;
        }
        _ => match app.view {
            View::Chat => handle_chat_log_input(app, key),
            View::History => handle_history_input(app, key),
            View::Verifications => handle_verifications_input(app, key).await,
            View::Login | View::Register => {}
        },
    }

    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login.focus = app.login.focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login.focus = app.login.focus.prev();
        }
        KeyCode::Enter => match app.login.focus {
            LoginFocus::Username | LoginFocus::Password => {
                if app.login.validate().is_ok() {
                    app.attempt_login().await;
                } else {
                    app.login.focus = app.login.focus.next();
                }
            }
            LoginFocus::Button => app.attempt_login().await,
            LoginFocus::RegisterLink => app.navigate(View::Register).await,
        },
        KeyCode::Backspace => {
            if let Some((field, _)) = app.login.focused_field() {
                field.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some((field, kind)) = app.login.focused_field() {
                push_char(field, kind, c);
            }
        }
        _ => {}
    }
    Ok(false)
}

async fn handle_register_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.navigate(View::Login).await;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.register.focus = app.register.focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.register.focus = app.register.focus.prev();
        }
        KeyCode::Enter => match app.register.focus {
            RegisterFocus::Confirm => app.attempt_register().await,
            RegisterFocus::Button => app.attempt_register().await,
            RegisterFocus::LoginLink => app.navigate(View::Login).await,
            _ => app.register.focus = app.register.focus.next(),
        },
        KeyCode::Backspace => {
            if let Some((field, _)) = app.register.focused_field() {
                field.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some((field, kind)) = app.register.focused_field() {
                push_char(field, kind, c);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_chat_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Tab => {
            app.focus = Focus::List;
        }
        KeyCode::Enter => {
            app.queue_chat_message();
        }
        KeyCode::Backspace => {
            app.chat.input.pop();
        }
        KeyCode::PageUp => app.chat.scroll_back(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.chat.scroll_forward(PAGE_SCROLL_SIZE),
        KeyCode::Char(c) => {
            if !app.chat.sending {
                push_char(&mut app.chat.input, FieldKind::Message, c);
            }
        }
        _ => {}
    }
}

fn handle_chat_log_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.chat.scroll_back(1),
        KeyCode::Down | KeyCode::Char('j') => app.chat.scroll_forward(1),
        KeyCode::PageUp => app.chat.scroll_back(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.chat.scroll_forward(PAGE_SCROLL_SIZE),
        KeyCode::End => {
            app.chat.scroll = 0;
        }
        KeyCode::Char('i') | KeyCode::Enter | KeyCode::Tab => {
            app.focus = Focus::Input;
        }
        _ => {}
    }
}

fn handle_history_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.history.view.select_prev();
            app.history.scroll = 0;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.history.view.select_next();
            app.history.scroll = 0;
        }
        KeyCode::PageUp => app.history.scroll_up(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.history.scroll_down(PAGE_SCROLL_SIZE),
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                _ => Focus::List,
            };
        }
        _ => {}
    }
}

async fn handle_verifications_input(app: &mut App, key: KeyEvent) {
    let max_index = app.verifications.results.len().saturating_sub(1);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.verifications.selection = app.verifications.selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.verifications.selection = (app.verifications.selection + 1).min(max_index);
        }
        KeyCode::Home => {
            app.verifications.selection = 0;
        }
        KeyCode::End => {
            app.verifications.selection = max_index;
        }
        KeyCode::Char('r') => {
            app.navigate(View::Verifications).await;
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                _ => Focus::List,
            };
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use adverifier_core::auth::{CredentialRecord, MemoryStorage};
    use adverifier_core::{Config, SessionStore};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// An app pointed at a closed port: every request fails fast.
    fn offline_app(logged_in: bool) -> App {
        let storage = Arc::new(MemoryStorage::new());
        if logged_in {
            CredentialRecord::write(storage.as_ref(), "T", "7", "a@x.com").unwrap();
        }
        let session = SessionStore::new("http://127.0.0.1:9", Duration::from_secs(2), storage).unwrap();
        App::with_session(Config::default(), session)
    }

    #[tokio::test]
    async fn test_typing_into_login_form() {
        let mut app = offline_app(false);
        app.start().await;
        assert_eq!(app.view, View::Login);

        for c in "bob".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).await.unwrap();
        }
        handle_input(&mut app, key(KeyCode::Tab)).await.unwrap();
        for c in "pw".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).await.unwrap();
        }
        handle_input(&mut app, key(KeyCode::Backspace)).await.unwrap();

        assert_eq!(app.login.username, "bob");
        assert_eq!(app.login.password, "p");
    }

    #[tokio::test]
    async fn test_register_link_and_back() {
        let mut app = offline_app(false);
        app.start().await;
        app.login.focus = LoginFocus::RegisterLink;
        handle_input(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.view, View::Register);

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.view, View::Login);
    }

    #[tokio::test]
    async fn test_quit_confirmation() {
        let mut app = offline_app(false);
        app.start().await;
        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state, AppState::ConfirmingQuit);

        handle_input(&mut app, key(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))).await.unwrap());
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_chat_typing_keeps_global_keys_as_text() {
        let mut app = offline_app(true);
        app.start().await;
        assert_eq!(app.view, View::Chat);
        assert_eq!(app.focus, Focus::Input);

        for c in "q?1L".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).await.unwrap();
        }
        assert_eq!(app.chat.input, "q?1L");
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.view, View::Chat);

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.focus, Focus::List);
        handle_input(&mut app, key(KeyCode::Char('?'))).await.unwrap();
        assert_eq!(app.state, AppState::ShowingHelp);
    }

    #[tokio::test]
    async fn test_scrolling_stops_at_content_edge() {
        let mut app = offline_app(true);
        app.start().await;
        app.focus = Focus::List;
        app.chat.max_scroll.set(3);

        for _ in 0..50 {
            handle_input(&mut app, key(KeyCode::Up)).await.unwrap();
        }
        assert_eq!(app.chat.scroll, 3);
        handle_input(&mut app, key(KeyCode::Down)).await.unwrap();
        assert_eq!(app.chat.scroll, 2);

        app.view = View::History;
        app.history.max_scroll.set(15);
        for _ in 0..5 {
            handle_input(&mut app, key(KeyCode::PageDown)).await.unwrap();
        }
        assert_eq!(app.history.scroll, 15);
        handle_input(&mut app, key(KeyCode::PageUp)).await.unwrap();
        assert_eq!(app.history.scroll, 5);
    }

    #[tokio::test]
    async fn test_logout_key() {
        let mut app = offline_app(true);
        app.start().await;
        app.focus = Focus::List;
        handle_input(&mut app, key(KeyCode::Char('L'))).await.unwrap();
        assert_eq!(app.view, View::Login);
        assert!(!app.is_authenticated());
    }
}
