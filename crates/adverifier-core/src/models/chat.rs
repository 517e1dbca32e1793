use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// A single entry in the user's chat log, as returned by `GET /api/chat-messages/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub message: String,
    pub is_user: bool,
    pub created_at: DateTime<Utc>,
    /// Owning user's primary key. Absent on locally appended entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
}

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "AdVerifier Bot",
        }
    }
}

impl ChatMessage {
    /// Build an entry that only exists client-side (not yet fetched from the server).
    ///
    /// Local entries get a millisecond timestamp id, offset by `seq` so two
    /// entries appended in the same instant stay distinct.
    pub fn local(message: impl Into<String>, is_user: bool, created_at: DateTime<Utc>, seq: i64) -> Self {
        Self {
            id: created_at.timestamp_millis() + seq,
            message: message.into(),
            is_user,
            created_at,
            user: None,
        }
    }

    pub fn sender(&self) -> Sender {
        if self.is_user {
            Sender::User
        } else {
            Sender::Bot
        }
    }

    /// Time of day in the local time zone, e.g. "14:05:09".
    pub fn local_time(&self) -> String {
        self.created_at.with_timezone(&Local).format("%H:%M:%S").to_string()
    }
}

/// Body of `POST /api/chat/`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response of `POST /api/chat/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// Echo of the stored user message.
    #[serde(default)]
    pub user_message: Option<String>,
    pub bot_response: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatReply {
    /// The bot reply as a chat log entry.
    pub fn into_message(self) -> ChatMessage {
        ChatMessage::local(self.bot_response, false, self.timestamp, 1)
    }
}
