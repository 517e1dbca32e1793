pub mod auth;
pub mod chat;
pub mod history;
pub mod verifications;
