use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Body of a non-2xx response, kept both as (truncated) text and as JSON
/// when the server sent JSON.
#[derive(Debug, Clone)]
pub struct ErrorBody {
    pub status: StatusCode,
    pub text: String,
    pub json: Option<Value>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            text: truncate_body(body),
            json: serde_json::from_str(body).ok(),
        }
    }

    /// First message listed under `field` in a DRF-style error payload.
    ///
    /// Field errors usually arrive as `{"field": ["msg", ...]}`, but a bare
    /// string is accepted too.
    pub fn field_error(&self, field: &str) -> Option<String> {
        match self.json.as_ref()?.get(field)? {
            Value::Array(items) => items.first().and_then(|v| v.as_str()).map(str::to_string),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "status {}", self.status)
        } else {
            write!(f, "status {}: {}", self.status, self.text)
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - token may be invalid ({0})")]
    Unauthorized(ErrorBody),

    #[error("Access denied: {0}")]
    AccessDenied(ErrorBody),

    #[error("Resource not found: {0}")]
    NotFound(ErrorBody),

    #[error("Request rejected: {0}")]
    BadRequest(ErrorBody),

    #[error("Rate limited - please wait before retrying")]
    RateLimited(ErrorBody),

    #[error("Server error: {0}")]
    ServerError(ErrorBody),

    #[error("Unexpected response: {0}")]
    Http(ErrorBody),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        body.to_string()
    } else {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = ErrorBody::new(status, body);
        match status.as_u16() {
            400 => ApiError::BadRequest(body),
            401 => ApiError::Unauthorized(body),
            403 => ApiError::AccessDenied(body),
            404 => ApiError::NotFound(body),
            429 => ApiError::RateLimited(body),
            500..=599 => ApiError::ServerError(body),
            _ => ApiError::Http(body),
        }
    }

    /// The error body, for errors that came from an HTTP response.
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Unauthorized(b)
            | ApiError::AccessDenied(b)
            | ApiError::NotFound(b)
            | ApiError::BadRequest(b)
            | ApiError::RateLimited(b)
            | ApiError::ServerError(b)
            | ApiError::Http(b) => Some(b),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::NetworkError(e) => e.status(),
            other => other.body().map(|b| b.status),
        }
    }

    pub fn body_json(&self) -> Option<&Value> {
        self.body().and_then(|b| b.json.as_ref())
    }

    pub fn field_error(&self, field: &str) -> Option<String> {
        self.body().and_then(|b| b.field_error(field))
    }
}
