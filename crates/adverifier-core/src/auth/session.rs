//! Session store: who is logged in, kept in sync with durable storage.
//!
//! `SessionStore` owns the session and is the only writer. Everything else
//! (views, the API gateway's token interceptor) holds a cloned
//! `SessionHandle`, which is a read-only view of the same state.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError, TokenAuthInterceptor, TokenSource};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};

use super::storage::{CredentialRecord, CredentialStorage};

const LOGIN_FAILED: &str = "Login failed. Check your credentials.";
const REGISTRATION_FAILED: &str = "Registration failed. Please check your input.";

/// Field errors consulted, in order, when registration is rejected.
const REGISTER_ERROR_FIELDS: [&str; 3] = ["username", "email", "password"];

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub token: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The backend refused the request or could not be reached.
    #[error("{0}")]
    Rejected(String),

    #[error("Invalid login response: missing token or user ID")]
    InvalidResponse,

    #[error("Failed to save credentials: {0}")]
    Storage(String),
}

impl AuthError {
    /// Message suitable for showing next to the form.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug)]
struct SessionState {
    identity: Option<Identity>,
    loading: bool,
}

/// Read-only, cheaply cloned view of the session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    state: Arc<RwLock<SessionState>>,
}

impl SessionHandle {
    fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                identity: None,
                loading: true,
            })),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.read().identity.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().identity.as_ref().map(|i| i.token.clone())
    }

    pub fn email(&self) -> Option<String> {
        self.state.read().identity.as_ref().map(|i| i.email.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().identity.is_some()
    }

    /// True until the store has hydrated from durable storage.
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    fn set_identity(&self, identity: Option<Identity>) {
        self.state.write().identity = identity;
    }

    fn finish_loading(&self) {
        self.state.write().loading = false;
    }
}

impl TokenSource for SessionHandle {
    fn current_token(&self) -> Option<String> {
        self.token()
    }
}

/// Owner of the process-wide session.
pub struct SessionStore {
    handle: SessionHandle,
    storage: Arc<dyn CredentialStorage>,
    api: ApiClient,
}

impl SessionStore {
    /// Create a store and the shared API client whose interceptor reads
    /// this store's token. The session starts out loading and logged out.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        storage: Arc<dyn CredentialStorage>,
    ) -> Result<Self, ApiError> {
        let api = ApiClient::new(base_url, timeout)?;
        Ok(Self::with_client(api, storage))
    }

    /// Wrap an existing client, adding the token interceptor to it.
    pub fn with_client(api: ApiClient, storage: Arc<dyn CredentialStorage>) -> Self {
        let handle = SessionHandle::new();
        let api = api.with_interceptor(Arc::new(TokenAuthInterceptor::new(handle.clone())));
        Self {
            handle,
            storage,
            api,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// The shared API client. Requests made through it carry the session token.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn identity(&self) -> Option<Identity> {
        self.handle.identity()
    }

    pub fn is_loading(&self) -> bool {
        self.handle.is_loading()
    }

    /// Rebuild the session from durable storage. Never fails: anything
    /// missing or unreadable leaves the user logged out.
    pub fn hydrate(&self) {
        match CredentialRecord::read(self.storage.as_ref()) {
            Ok(record) => match record.credentials() {
                Some((token, user_id)) => {
                    debug!(user_id, "Session restored from storage");
                    self.handle.set_identity(Some(Identity {
                        id: user_id.to_string(),
                        email: record.email.clone().unwrap_or_default(),
                        token: token.to_string(),
                    }));
                }
                None => debug!("No stored session"),
            },
            Err(e) => warn!(error = %e, "Failed to read stored credentials"),
        }
        self.handle.finish_loading();
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        match self.api.login(&request).await {
            Ok(response) => {
                self.establish(response)?;
                info!(username, "Login successful");
                Ok(())
            }
            Err(ApiError::InvalidResponse(e)) => {
                error!(error = %e, "Malformed login response");
                Err(AuthError::InvalidResponse)
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                let message = e
                    .field_error("non_field_errors")
                    .unwrap_or_else(|| LOGIN_FAILED.to_string());
                Err(AuthError::Rejected(message))
            }
        }
    }

    /// Create an account. The caller is expected to have checked the form
    /// (e.g. password confirmation) already.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), AuthError> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.api.register(&request).await {
            Ok(response) => {
                self.establish(response)?;
                info!(username, "Registration successful");
                Ok(())
            }
            Err(ApiError::InvalidResponse(e)) => {
                error!(error = %e, "Malformed registration response");
                Err(AuthError::InvalidResponse)
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                let message = REGISTER_ERROR_FIELDS
                    .iter()
                    .find_map(|field| e.field_error(field))
                    .unwrap_or_else(|| REGISTRATION_FAILED.to_string());
                Err(AuthError::Rejected(message))
            }
        }
    }

    /// Forget the session, in storage and in memory. No network call.
    pub fn logout(&self) {
        if let Err(e) = CredentialRecord::clear(self.storage.as_ref()) {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        self.handle.set_identity(None);
        info!("Logged out");
    }

    /// Validate a successful auth response, persist it, then publish it.
    fn establish(&self, response: AuthResponse) -> Result<(), AuthError> {
        let (Some(token), Some(user_id)) = (response.token(), response.user_id()) else {
            warn!("Auth response missing token or user id");
            return Err(AuthError::InvalidResponse);
        };
        let email = response.email();
        let previous = CredentialRecord::read(self.storage.as_ref()).unwrap_or_default();

        if let Err(e) = CredentialRecord::write(self.storage.as_ref(), token, &user_id, &email) {
            error!(error = %e, "Failed to persist credentials");
            self.roll_back(&previous);
            return Err(AuthError::Storage(e.to_string()));
        }

        self.handle.set_identity(Some(Identity {
            id: user_id,
            email,
            token: token.to_string(),
        }));
        Ok(())
    }

    /// Put back the record that was stored before a failed write. If that
    /// fails too, drop the session entirely so memory matches storage.
    fn roll_back(&self, previous: &CredentialRecord) {
        let storage = self.storage.as_ref();
        let restored = match previous.credentials() {
            Some((token, user_id)) => {
                let email = previous.email.as_deref().unwrap_or_default();
                CredentialRecord::write(storage, token, user_id, email)
            }
            None => CredentialRecord::clear(storage),
        };
        if let Err(e) = restored {
            warn!(error = %e, "Failed to restore previous credentials, logging out");
            if let Err(e) = CredentialRecord::clear(storage) {
                warn!(error = %e, "Failed to clear credentials");
            }
            self.handle.set_identity(None);
        }
    }
}
