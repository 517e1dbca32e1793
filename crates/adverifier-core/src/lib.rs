//! Core library for the AdVerifier client.
//!
//! This crate holds everything that is not terminal UI:
//!
//! - `api`: the shared `ApiClient` gateway and its request interceptors
//! - `auth`: the `SessionStore`, its read model and credential storage backends
//! - `models`: wire types for the AdVerifier backend
//! - `history`: grouping chat messages by calendar date
//! - `config`: on-disk configuration and directory locations

pub mod api;
pub mod auth;
pub mod config;
pub mod history;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, Identity, SessionHandle, SessionStore};
pub use config::Config;
