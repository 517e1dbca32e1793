//! API client for communicating with the AdVerifier REST backend.
//!
//! `ApiClient` is the single gateway for backend calls. It owns the base URL,
//! the connection pool and the interceptor chain; typed helpers for each
//! endpoint sit on top of the generic verb methods.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::models::{
    Advertisement, AuthResponse, ChatMessage, ChatReply, ChatRequest, LoginRequest,
    RegisterRequest, VerificationResult,
};

use super::{ApiError, RequestInterceptor};

// ============================================================================
// Constants
// ============================================================================

/// Backend address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) GET requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

const LOGIN_PATH: &str = "/api/login/";
const REGISTER_PATH: &str = "/api/register/";
const CHAT_PATH: &str = "/api/chat/";
const CHAT_MESSAGES_PATH: &str = "/api/chat-messages/";
const VERIFICATION_RESULTS_PATH: &str = "/api/verification-results/";
const ADVERTISEMENTS_PATH: &str = "/api/advertisements/";

/// A successful response: status plus decoded body.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub data: T,
}

/// API client for the AdVerifier backend.
/// Clone is cheap - the reqwest client and the interceptor list are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    initial_backoff: Duration,
}

impl ApiClient {
    /// Create a new API client for `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            interceptors: Vec::new(),
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// Add a request interceptor. Interceptors run in insertion order.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Override the first rate-limit backoff delay.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Headers an outgoing request would carry after the interception stage.
    pub fn request_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        for interceptor in &self.interceptors {
            interceptor.intercept(&mut headers)?;
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        // 204 and friends: decode as JSON null so `()` and `Option<_>` work.
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        let data = serde_json::from_str(text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })?;
        Ok(ApiResponse { status, data })
    }

    /// Send one request through the interception stage.
    ///
    /// GET requests answered with 429 are retried with exponential backoff;
    /// other methods are sent exactly once.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let retryable = method == Method::GET;
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let mut builder = self
                .client
                .request(method.clone(), &url)
                .headers(self.request_headers()?);
            if let Some(body) = body {
                builder = builder.json(body);
            }

            debug!(method = %method, url = %url, "Sending request");
            let response = builder.send().await?;

            if retryable && response.status() == StatusCode::TOO_MANY_REQUESTS {
                retries += 1;
                if retries > MAX_RATE_LIMIT_RETRIES {
                    let body = response.text().await.unwrap_or_default();
                    return Err(ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, &body));
                }
                warn!(url = %url, retry = retries, backoff_ms = backoff.as_millis() as u64, "Rate limited, backing off");
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                continue;
            }

            let response = Self::check_response(response).await?;
            return Self::decode(response, &url).await;
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request::<T, ()>(Method::DELETE, path, None).await
    }

    // ===== Authentication =====

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        Ok(self.post::<AuthResponse, _>(LOGIN_PATH, request).await?.data)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        Ok(self.post::<AuthResponse, _>(REGISTER_PATH, request).await?.data)
    }

    // ===== Chat =====

    /// Fetch the logged-in user's chat log, oldest first.
    pub async fn fetch_chat_messages(&self) -> Result<Vec<ChatMessage>, ApiError> {
        let messages: Vec<ChatMessage> = self.get(CHAT_MESSAGES_PATH).await?.data;
        debug!(count = messages.len(), "Fetched chat messages");
        Ok(messages)
    }

    /// Send a message to the verification bot and return its reply.
    pub async fn send_chat_message(&self, message: &str) -> Result<ChatReply, ApiError> {
        let request = ChatRequest {
            message: message.to_string(),
        };
        Ok(self.post::<ChatReply, _>(CHAT_PATH, &request).await?.data)
    }

    // ===== Verification records =====

    pub async fn fetch_verification_results(&self) -> Result<Vec<VerificationResult>, ApiError> {
        Ok(self.get(VERIFICATION_RESULTS_PATH).await?.data)
    }

    pub async fn fetch_advertisements(&self) -> Result<Vec<Advertisement>, ApiError> {
        Ok(self.get(ADVERTISEMENTS_PATH).await?.data)
    }
}
