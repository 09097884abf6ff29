//! JSON-file SessionStore implementation.

use crate::atomic_json::AtomicJsonFile;
use crate::paths::PolidraftPaths;
use async_trait::async_trait;
use polidraft_core::chat::{ChatSession, SessionStore};
use polidraft_core::error::Result;
use std::path::Path;
use tracing::warn;

/// Stores the whole session collection in one JSON file.
///
/// The file holds a plain array of sessions, newest first, with RFC 3339
/// timestamps. A missing or malformed file degrades to an empty
/// collection on load; the condition is logged, never surfaced.
pub struct JsonSessionStore {
    file: AtomicJsonFile<Vec<ChatSession>>,
}

impl JsonSessionStore {
    /// Creates a store over the given file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    /// Creates a store at the default location
    /// (`~/.config/polidraft/chat_sessions.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(PolidraftPaths::sessions_file()?))
    }
}

#[async_trait]
impl SessionStore for JsonSessionStore {
    async fn load_all(&self) -> Vec<ChatSession> {
        match self.file.load() {
            Ok(Some(sessions)) => sessions,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(
                    "failed to load session collection, starting empty: {}",
                    err
                );
                Vec::new()
            }
        }
    }

    async fn save_all(&self, sessions: &[ChatSession]) -> Result<()> {
        self.file.save(&sessions.to_vec())
    }
}
