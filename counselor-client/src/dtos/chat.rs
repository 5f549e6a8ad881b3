use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One conversation with the counselor.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSession {
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "Message must not be empty"))]
    pub message: String,

    pub session_id: String,
}

/// Counselor reply to a message: the response text plus follow-up
/// suggestions for the UI to offer.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,

    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

/// One entry of a session's history.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,

    pub content: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Validate)]
pub struct RenameSessionRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
}
