//! Authentication module for the session and its durable credentials.
//!
//! This module provides:
//! - `SessionStore`: login/register/logout and startup hydration
//! - `SessionHandle`: read-only view of the session, shared with the API gateway
//! - `CredentialStorage`: where the token, user id and email are persisted
//!   (`FileStorage`, `KeyringStorage`, `MemoryStorage`)

pub mod credentials;
pub mod session;
pub mod storage;

pub use credentials::KeyringStorage;
pub use session::{AuthError, Identity, SessionHandle, SessionStore};
pub use storage::{CredentialRecord, CredentialStorage, FileStorage, MemoryStorage, StorageKey};
