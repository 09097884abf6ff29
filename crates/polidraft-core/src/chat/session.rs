//! Chat session domain model.
//!
//! A session is a client-local grouping of a chat's message history. It is
//! not necessarily the same as any backend-side session or project
//! identifier.

use super::message::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of characters of the first user message used as the
/// session title before truncation.
pub const TITLE_MAX_CHARS: usize = 30;

/// A client-local chat session.
///
/// Sessions are created lazily on the first send when no session is
/// active. The message list is append-only: no edit or delete operation
/// is exposed, and insertion order is the rendering order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session title, derived from the first user message.
    pub title: String,
    /// Messages in insertion (chronological) order.
    pub messages: Vec<ChatMessage>,
    /// Timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the session was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Creates a new empty session titled after the first user message.
    pub fn new(first_message: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: derive_title(first_message),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message and bumps `updated_at`.
    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }
}

/// Derives a session title from the first user message.
///
/// Messages longer than [`TITLE_MAX_CHARS`] characters are truncated with
/// an ellipsis suffix. Truncation counts characters, not bytes, so
/// multi-byte text stays valid.
pub fn derive_title(first_message: &str) -> String {
    let mut chars = first_message.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
