//! Chat message types.
//!
//! This module contains types for representing messages in a chat
//! transcript, including roles and the optional search mode marker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a message in a chat transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
}

/// The search mode attached to a message, besides plain chat.
///
/// Fact search returns a direct answer; network search returns a set of
/// personnel candidates rendered as a people card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Fact,
    Network,
}

impl SearchType {
    /// Parses the wire form (`"fact"` / `"network"`); anything else is None.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "fact" => Some(Self::Fact),
            "network" => Some(Self::Network),
            _ => None,
        }
    }

    /// The string sent in request bodies.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Fact => "fact",
            Self::Network => "network",
        }
    }
}

/// A single message in a chat transcript.
///
/// Messages are immutable once created and owned exclusively by the
/// session that contains them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier (UUID format)
    pub id: String,
    /// The content of the message.
    pub content: String,
    /// The role of the message sender.
    pub role: MessageRole,
    /// Timestamp when the message was created.
    pub timestamp: DateTime<Utc>,
    /// Search mode this message was sent or answered with, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchType>,
}

impl ChatMessage {
    /// Creates a user message with a freshly allocated id.
    pub fn user(content: impl Into<String>, search_type: Option<SearchType>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            role: MessageRole::User,
            timestamp: Utc::now(),
            search_type,
        }
    }

    /// Creates an assistant message.
    ///
    /// `id` and `timestamp` usually come from the backend response; pass
    /// `None` to allocate them locally (error messages, for instance).
    pub fn assistant(
        id: Option<String>,
        content: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
        search_type: Option<SearchType>,
    ) -> Self {
        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            content: content.into(),
            role: MessageRole::Assistant,
            timestamp: timestamp.unwrap_or_else(Utc::now),
            search_type,
        }
    }
}
