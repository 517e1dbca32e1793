//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering and layout
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `tabs`: Per-view content rendering (login, chat, history, verifications)

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
