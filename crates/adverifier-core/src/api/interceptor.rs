//! Request interception stage for the API gateway.
//!
//! Every request built by `ApiClient` runs through its interceptors, in the
//! order they were added, before it is sent.

use reqwest::header::{self, HeaderMap, HeaderValue};

use super::ApiError;

/// Prefix the backend expects in front of the session token.
pub const TOKEN_SCHEME: &str = "Token";

/// Hook invoked on the outgoing headers of every request.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, headers: &mut HeaderMap) -> Result<(), ApiError>;
}

/// Anything that can report the bearer token currently in effect.
pub trait TokenSource: Send + Sync {
    fn current_token(&self) -> Option<String>;
}

/// Sets `Authorization: Token <token>` whenever the source has a token.
///
/// With no token the headers are left as they are.
pub struct TokenAuthInterceptor<S> {
    source: S,
}

impl<S: TokenSource> TokenAuthInterceptor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: TokenSource> RequestInterceptor for TokenAuthInterceptor<S> {
    fn intercept(&self, headers: &mut HeaderMap) -> Result<(), ApiError> {
        if let Some(token) = self.source.current_token().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&authorization_value(&token))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(())
    }
}

/// Format the Authorization header value for a token.
pub fn authorization_value(token: &str) -> String {
    format!("{} {}", TOKEN_SCHEME, token)
}
