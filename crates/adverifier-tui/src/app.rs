//! Application state management for the AdVerifier terminal client.
//!
//! This module contains the `App` struct that owns the session store and all
//! view state, and the operations the input handler calls into.

use std::cell::Cell;

use adverifier_core::history::HistoryView;
use adverifier_core::models::{ChatMessage, VerificationResult};
use adverifier_core::{Config, SessionStore};
use chrono::{Local, Utc};
use tracing::{debug, error, info, warn};

use crate::forms::{LoginFocus, LoginForm, RegisterForm};

// ============================================================================
// Constants
// ============================================================================

/// Bot text appended locally when a chat message could not be sent.
pub const CHAT_FALLBACK_REPLY: &str = "Sorry, I couldn't process your request. Please try again.";

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Screens of the client. Chat, History and Verifications need a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Chat,
    History,
    Verifications,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Register => "Register",
            View::Chat => "Chat",
            View::History => "History",
            View::Verifications => "Verifications",
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, View::Chat | View::History | View::Verifications)
    }

    /// Get the next tab among the logged-in views (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            View::Chat => View::History,
            View::History => View::Verifications,
            View::Verifications => View::Chat,
            View::Login => View::Register,
            View::Register => View::Login,
        }
    }

    /// Get the previous tab among the logged-in views (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            View::Chat => View::Verifications,
            View::History => View::Chat,
            View::Verifications => View::History,
            View::Login => View::Register,
            View::Register => View::Login,
        }
    }
}

/// What a navigation request resolves to once the session is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Session still hydrating; show a loading placeholder.
    Loading,
    Show(View),
}

/// Gate protected views on the session.
pub fn resolve_route(requested: View, authenticated: bool, loading: bool) -> Route {
    if !requested.is_protected() {
        return Route::Show(requested);
    }
    if loading {
        Route::Loading
    } else if authenticated {
        Route::Show(requested)
    } else {
        Route::Show(View::Login)
    }
}

/// Current UI focus area inside a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
    Input,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Chat panel state.
#[derive(Debug, Default)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub sending: bool,
    /// Lines scrolled up from the bottom of the log.
    pub scroll: usize,
    /// Largest useful `scroll`, recorded by the last draw.
    pub max_scroll: Cell<usize>,
}

impl ChatState {
    pub fn scroll_back(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll.get());
    }

    pub fn scroll_forward(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}

/// History panel state.
#[derive(Debug, Default)]
pub struct HistoryState {
    pub view: HistoryView,
    pub loading: bool,
    pub scroll: usize,
    /// Largest useful `scroll`, recorded by the last draw.
    pub max_scroll: Cell<usize>,
}

impl HistoryState {
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll.get());
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}

/// Verification results panel state.
#[derive(Debug, Default)]
pub struct VerificationState {
    pub results: Vec<VerificationResult>,
    pub loading: bool,
    pub selection: usize,
    pub error: Option<String>,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    pub config: Config,
    pub session: SessionStore,

    pub state: AppState,
    pub view: View,
    pub focus: Focus,
    pub status_message: Option<String>,

    pub login: LoginForm,
    pub register: RegisterForm,
    pub chat: ChatState,
    pub history: HistoryState,
    pub verifications: VerificationState,
}

impl App {
    /// Wrap an already opened session. The login form starts with the last
    /// username used, or `ADVERIFIER_USERNAME` when set.
    pub fn with_session(config: Config, session: SessionStore) -> Self {
        let username = std::env::var("ADVERIFIER_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();

        Self {
            config,
            session,
            state: AppState::Normal,
            view: View::Chat,
            focus: Focus::Input,
            status_message: None,
            login: LoginForm::new(username),
            register: RegisterForm::default(),
            chat: ChatState::default(),
            history: HistoryState::default(),
            verifications: VerificationState::default(),
        }
    }

    /// Restore the session and open the default view.
    pub async fn start(&mut self) {
        if self.session.is_loading() {
            self.session.hydrate();
        }
        self.navigate(View::Chat).await;
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.handle().is_authenticated()
    }

    pub fn user_email(&self) -> Option<String> {
        self.session.handle().email()
    }

    pub fn route(&self) -> Route {
        let handle = self.session.handle();
        resolve_route(self.view, handle.is_authenticated(), handle.is_loading())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch views, redirecting to Login when a protected view is
    /// requested without a session. Data views fetch when they open.
    pub async fn navigate(&mut self, requested: View) {
        let handle = self.session.handle();
        let target = match resolve_route(requested, handle.is_authenticated(), handle.is_loading()) {
            Route::Show(view) => view,
            Route::Loading => {
                // Rendered as "Loading..." until the session is known
                self.view = requested;
                return;
            }
        };
        if target != requested {
            debug!(requested = requested.title(), "Redirecting to login");
        }

        self.view = target;
        self.status_message = None;
        match target {
            View::Login => {
                self.login.error = None;
                self.login.focus = if self.login.username.is_empty() {
                    LoginFocus::Username
                } else {
                    LoginFocus::Password
                };
            }
            View::Register => {
                self.register.error = None;
            }
            View::Chat => {
                self.focus = Focus::Input;
                self.load_chat().await;
            }
            View::History => {
                self.focus = Focus::List;
                self.load_history().await;
            }
            View::Verifications => {
                self.focus = Focus::List;
                self.load_verifications().await;
            }
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) {
        if let Err(msg) = self.login.validate() {
            self.login.error = Some(msg.to_string());
            return;
        }
        self.login.error = None;

        let username = self.login.username.clone();
        let password = self.login.password.clone();
        match self.session.login(&username, &password).await {
            Ok(()) => {
                self.login.password.clear();
                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                self.navigate(View::Chat).await;
            }
            Err(e) => {
                self.login.error = Some(e.message());
            }
        }
    }

    /// Attempt registration with the register form
    pub async fn attempt_register(&mut self) {
        if let Err(msg) = self.register.validate() {
            self.register.error = Some(msg.to_string());
            return;
        }
        self.register.error = None;

        let username = self.register.username.clone();
        let email = self.register.email.clone();
        let password = self.register.password.clone();
        match self.session.register(&username, &email, &password).await {
            Ok(()) => {
                self.register = RegisterForm::default();
                self.login.username = username.clone();
                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                self.navigate(View::Chat).await;
            }
            Err(e) => {
                self.register.error = Some(e.message());
            }
        }
    }

    pub async fn logout(&mut self) {
        self.session.logout();
        self.chat = ChatState::default();
        self.history = HistoryState::default();
        self.verifications = VerificationState::default();
        self.navigate(View::Login).await;
    }

    // =========================================================================
    // Chat
    // =========================================================================

    async fn load_chat(&mut self) {
        self.chat.scroll = 0;
        match self.session.api().fetch_chat_messages().await {
            Ok(messages) => self.chat.messages = messages,
            Err(e) => {
                error!(error = %e, "Error fetching messages");
            }
        }
    }

    /// Mark the chat input for sending. The main loop draws "Sending..."
    /// once before `process_pending` performs the request.
    pub fn queue_chat_message(&mut self) {
        if !self.chat.input.trim().is_empty() {
            self.chat.sending = true;
        }
    }

    /// Run work queued by input handlers.
    pub async fn process_pending(&mut self) {
        if self.chat.sending {
            self.send_chat_message().await;
        }
    }

    /// Send the chat input. A failed send appends the user's text and a
    /// fallback bot reply locally and keeps the input for another try.
    pub async fn send_chat_message(&mut self) {
        let text = self.chat.input.trim().to_string();
        if text.is_empty() {
            self.chat.sending = false;
            return;
        }

        self.chat.sending = true;
        match self.session.api().send_chat_message(&text).await {
            Ok(reply) => {
                let echo = reply.user_message.clone().unwrap_or_else(|| text.clone());
                self.chat
                    .messages
                    .push(ChatMessage::local(echo, true, reply.timestamp, 0));
                self.chat.messages.push(reply.into_message());
                self.chat.input.clear();
            }
            Err(e) => {
                error!(error = %e, "Error sending message");
                let now = Utc::now();
                self.chat.messages.push(ChatMessage::local(text, true, now, 0));
                self.chat
                    .messages
                    .push(ChatMessage::local(CHAT_FALLBACK_REPLY, false, now, 1));
            }
        }
        self.chat.sending = false;
        self.chat.scroll = 0;
    }

    // =========================================================================
    // History and verification results
    // =========================================================================

    async fn load_history(&mut self) {
        self.history.loading = true;
        self.history.scroll = 0;
        match self.session.api().fetch_chat_messages().await {
            Ok(messages) => {
                self.history.view = HistoryView::new(&messages, &Local);
                info!(dates = self.history.view.groups().len(), "History loaded");
            }
            Err(e) => {
                error!(error = %e, "Error fetching chat history");
                self.history.view = HistoryView::default();
            }
        }
        self.history.loading = false;
    }

    async fn load_verifications(&mut self) {
        self.verifications.loading = true;
        self.verifications.error = None;
        match self.session.api().fetch_verification_results().await {
            Ok(mut results) => {
                results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                self.fill_advertisement_content(&mut results).await;
                self.verifications.results = results;
                self.verifications.selection = 0;
            }
            Err(e) => {
                error!(error = %e, "Error fetching verification results");
                self.verifications.error = Some(e.to_string());
            }
        }
        self.verifications.loading = false;
    }

    /// Older results carry only the advertisement id; look the text up.
    async fn fill_advertisement_content(&self, results: &mut [VerificationResult]) {
        if results.iter().all(|r| r.advertisement_content.is_some()) {
            return;
        }
        match self.session.api().fetch_advertisements().await {
            Ok(ads) => {
                for result in results.iter_mut().filter(|r| r.advertisement_content.is_none()) {
                    result.advertisement_content = ads
                        .iter()
                        .find(|ad| ad.id == result.advertisement)
                        .map(|ad| ad.content.clone());
                }
            }
            Err(e) => warn!(error = %e, "Error fetching advertisements"),
        }
    }

    pub fn selected_verification(&self) -> Option<&VerificationResult> {
        self.verifications.results.get(self.verifications.selection)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use adverifier_core::auth::{CredentialRecord, CredentialStorage, MemoryStorage};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer, storage: Arc<dyn CredentialStorage>) -> App {
        let session = SessionStore::new(&server.uri(), Duration::from_secs(5), storage).unwrap();
        App::with_session(Config::default(), session)
    }

    async fn mount_messages(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/chat-messages/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn logged_in_storage() -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        CredentialRecord::write(storage.as_ref(), "T", "7", "a@x.com").unwrap();
        storage
    }

    // -------------------------------------------------------------------------
    // Routing
    // -------------------------------------------------------------------------

    #[test]
    fn test_resolve_route() {
        assert_eq!(resolve_route(View::Chat, false, true), Route::Loading);
        assert_eq!(resolve_route(View::Chat, false, false), Route::Show(View::Login));
        assert_eq!(resolve_route(View::History, true, false), Route::Show(View::History));
        assert_eq!(resolve_route(View::Register, false, true), Route::Show(View::Register));
        assert_eq!(resolve_route(View::Login, true, false), Route::Show(View::Login));
    }

    #[test]
    fn test_view_tabs_wrap() {
        assert_eq!(View::Chat.next(), View::History);
        assert_eq!(View::Verifications.next(), View::Chat);
        assert_eq!(View::Chat.prev(), View::Verifications);
        assert_eq!(View::Login.next(), View::Register);
    }

    #[tokio::test]
    async fn test_start_without_session_redirects_to_login() {
        let server = MockServer::start().await;
        let mut app = app_for(&server, Arc::new(MemoryStorage::new()));
        assert_eq!(app.route(), Route::Loading);

        app.start().await;
        assert_eq!(app.view, View::Login);
        assert_eq!(app.route(), Route::Show(View::Login));
    }

    #[tokio::test]
    async fn test_start_with_session_opens_chat() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chat-messages/"))
            .and(header("Authorization", "Token T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "message": "hi", "is_user": true, "created_at": "2025-03-02T10:15:00Z"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server, logged_in_storage());
        app.start().await;
        assert_eq!(app.view, View::Chat);
        assert_eq!(app.chat.messages.len(), 1);
        assert_eq!(app.user_email().as_deref(), Some("a@x.com"));
    }

    // -------------------------------------------------------------------------
    // Login / register / logout
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_form_validation_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = app_for(&server, Arc::new(MemoryStorage::new()));
        app.start().await;
        app.login.username = "alice".to_string();
        app.attempt_login().await;
        assert_eq!(
            app.login.error.as_deref(),
            Some(crate::forms::MISSING_LOGIN_FIELDS)
        );
    }

    #[tokio::test]
    async fn test_login_failure_shows_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "non_field_errors": ["Unable to log in with provided credentials."]
            })))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Arc::new(MemoryStorage::new()));
        app.start().await;
        app.login.username = "alice".to_string();
        app.login.password = "wrong".to_string();
        app.attempt_login().await;

        assert_eq!(app.view, View::Login);
        assert_eq!(
            app.login.error.as_deref(),
            Some("Unable to log in with provided credentials.")
        );
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let server = MockServer::start().await;
        let mut app = app_for(&server, Arc::new(MemoryStorage::new()));
        app.start().await;
        app.navigate(View::Register).await;
        app.register.username = "alice".to_string();
        app.register.email = "a@x.com".to_string();
        app.register.password = "one".to_string();
        app.register.confirm_password = "two".to_string();
        app.attempt_register().await;

        assert_eq!(app.view, View::Register);
        assert_eq!(app.register.error.as_deref(), Some(crate::forms::PASSWORD_MISMATCH));
    }

    #[tokio::test]
    async fn test_logout_returns_to_login() {
        let server = MockServer::start().await;
        mount_messages(&server, json!([])).await;

        let storage = logged_in_storage();
        let mut app = app_for(&server, storage.clone());
        app.start().await;
        assert_eq!(app.view, View::Chat);

        app.logout().await;
        assert_eq!(app.view, View::Login);
        assert!(!app.is_authenticated());
        assert_eq!(CredentialRecord::read(storage.as_ref()).unwrap(), CredentialRecord::default());

        app.navigate(View::History).await;
        assert_eq!(app.view, View::Login);
    }

    // -------------------------------------------------------------------------
    // Chat
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_send_appends_reply_and_clears_input() {
        let server = MockServer::start().await;
        mount_messages(&server, json!([])).await;
        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_message": "Verify this ad: free money",
                "bot_response": "Ad Verification Result:\nCredibility Score: 0.10/1.00",
                "timestamp": "2025-03-02T10:15:00Z"
            })))
            .mount(&server)
            .await;

        let mut app = app_for(&server, logged_in_storage());
        app.start().await;
        app.chat.input = "Verify this ad: free money".to_string();
        app.send_chat_message().await;

        assert!(app.chat.input.is_empty());
        assert_eq!(app.chat.messages.len(), 2);
        assert!(app.chat.messages[0].is_user);
        assert!(!app.chat.messages[1].is_user);
        assert!(app.chat.messages[1].message.starts_with("Ad Verification Result"));
        assert_ne!(app.chat.messages[0].id, app.chat.messages[1].id);
        assert!(!app.chat.sending);
    }

    #[tokio::test]
    async fn test_send_failure_appends_fallback() {
        let server = MockServer::start().await;
        mount_messages(&server, json!([])).await;
        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = app_for(&server, logged_in_storage());
        app.start().await;
        app.chat.input = "hello".to_string();
        app.send_chat_message().await;

        assert_eq!(app.chat.input, "hello");
        assert_eq!(app.chat.messages.len(), 2);
        assert_eq!(app.chat.messages[0].message, "hello");
        assert_eq!(app.chat.messages[1].message, CHAT_FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_blank_input_is_not_sent() {
        let server = MockServer::start().await;
        mount_messages(&server, json!([])).await;
        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = app_for(&server, logged_in_storage());
        app.start().await;
        app.chat.input = "   ".to_string();
        app.send_chat_message().await;
        assert!(app.chat.messages.is_empty());
    }

    #[tokio::test]
    async fn test_queued_send_runs_on_process_pending() {
        let server = MockServer::start().await;
        mount_messages(&server, json!([])).await;
        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_message": "hi",
                "bot_response": "Hello!",
                "timestamp": "2025-03-02T10:15:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server, logged_in_storage());
        app.start().await;

        app.queue_chat_message();
        assert!(!app.chat.sending);

        app.chat.input = "hi".to_string();
        app.queue_chat_message();
        assert!(app.chat.sending);
        assert!(app.chat.messages.is_empty());

        app.process_pending().await;
        assert!(!app.chat.sending);
        assert_eq!(app.chat.messages.len(), 2);
    }

    // -------------------------------------------------------------------------
    // History and verifications
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_history_selects_newest_date() {
        let server = MockServer::start().await;
        mount_messages(
            &server,
            json!([
                {"id": 1, "message": "old", "is_user": true, "created_at": "2024-01-10T12:00:00Z"},
                {"id": 2, "message": "new", "is_user": true, "created_at": "2025-06-20T12:00:00Z"}
            ]),
        )
        .await;

        let mut app = app_for(&server, logged_in_storage());
        app.start().await;
        app.navigate(View::History).await;

        assert!(!app.history.loading);
        assert_eq!(app.history.view.groups().len(), 2);
        assert_eq!(app.history.view.selected_messages()[0].message, "new");
    }

    #[tokio::test]
    async fn test_history_fetch_error_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chat-messages/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = app_for(&server, logged_in_storage());
        app.start().await;
        app.navigate(View::History).await;
        assert!(app.history.view.is_empty());
        assert!(!app.history.loading);
    }

    #[tokio::test]
    async fn test_verifications_newest_first() {
        let server = MockServer::start().await;
        mount_messages(&server, json!([])).await;
        Mock::given(method("GET"))
            .and(path("/api/verification-results/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "advertisement": 1, "user": 7, "credibility_score": 0.2, "explanation": "a", "created_at": "2025-01-01T00:00:00Z"},
                {"id": 2, "advertisement": 2, "user": 7, "credibility_score": 0.9, "explanation": "b", "created_at": "2025-02-01T00:00:00Z"}
            ])))
            .mount(&server)
            .await;

        let mut app = app_for(&server, logged_in_storage());
        app.start().await;
        app.navigate(View::Verifications).await;
        assert_eq!(app.selected_verification().map(|r| r.id), Some(2));
        assert!(app.verifications.error.is_none());
    }

    #[tokio::test]
    async fn test_verifications_fill_missing_ad_content() {
        let server = MockServer::start().await;
        mount_messages(&server, json!([])).await;
        Mock::given(method("GET"))
            .and(path("/api/verification-results/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "advertisement": 4, "user": 7, "credibility_score": 0.2, "explanation": "a", "created_at": "2025-01-01T00:00:00Z"},
                {"id": 2, "advertisement": 5, "advertisement_content": "Kept as sent", "user": 7, "credibility_score": 0.9, "explanation": "b", "created_at": "2025-02-01T00:00:00Z"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/advertisements/"))
            .and(header("Authorization", "Token T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 4, "content": "Miracle pill!", "created_at": "2025-01-01T00:00:00Z"},
                {"id": 5, "content": "Other text", "created_at": "2025-02-01T00:00:00Z"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server, logged_in_storage());
        app.start().await;
        app.navigate(View::Verifications).await;

        let contents: Vec<_> = app
            .verifications
            .results
            .iter()
            .map(|r| r.advertisement_content.as_deref())
            .collect();
        assert_eq!(contents, vec![Some("Kept as sent"), Some("Miracle pill!")]);
    }
}
