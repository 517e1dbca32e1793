//! Data models for the AdVerifier backend.
//!
//! - `LoginRequest`, `RegisterRequest`, `AuthResponse`: login/registration payloads
//! - `ChatMessage`, `ChatReply`: chat log entries and bot replies
//! - `VerificationResult`, `Advertisement`: stored ad verification records

pub mod auth;
pub mod chat;
pub mod verification;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use chat::{ChatMessage, ChatReply, ChatRequest, Sender};
pub use verification::{Advertisement, Credibility, VerificationResult};
