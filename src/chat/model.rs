//! Chat transcript entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::image::ImageDataUri;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Ai => write!(f, "ai"),
        }
    }
}

/// One entry in a transcript. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Time-ordered (UUIDv7), so ids sort in creation order.
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Only ever set on user messages that carried an upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data_uri: Option<ImageDataUri>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, image: Option<ImageDataUri>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
            image_data_uri: image,
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender: Sender::Ai,
            text: text.into(),
            timestamp: Utc::now(),
            image_data_uri: None,
        }
    }
}
