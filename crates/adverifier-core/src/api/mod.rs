//! REST API gateway for the AdVerifier backend.
//!
//! This module provides the `ApiClient` through which every backend call is
//! issued. Before a request leaves the process it passes through the
//! client's interceptors, which is where the session token is attached as
//! `Authorization: Token <token>`.

pub mod client;
pub mod error;
pub mod interceptor;

pub use client::{ApiClient, ApiResponse, DEFAULT_BASE_URL};
pub use error::{ApiError, ErrorBody};
pub use interceptor::{RequestInterceptor, TokenAuthInterceptor, TokenSource};
