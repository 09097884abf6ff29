//! Unified path management for polidraft files.
//!
//! All client state lives under the platform config directory:
//!
//! ```text
//! ~/.config/polidraft/
//! ├── config.toml          # Client configuration
//! ├── chat_sessions.json   # Persisted session collection
//! └── ui_state.json        # Progress flags, drafts, lockout record
//! ```

use polidraft_core::error::{PolidraftError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "polidraft";

/// Fixed file name of the session collection.
pub const SESSIONS_FILE: &str = "chat_sessions.json";

/// Fixed file name of the UI state blob.
pub const UI_STATE_FILE: &str = "ui_state.json";

/// Fixed file name of the client configuration.
pub const CONFIG_FILE: &str = "config.toml";

/// Path resolution for polidraft files.
pub struct PolidraftPaths;

impl PolidraftPaths {
    /// Returns the polidraft configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform config directory cannot be
    /// determined.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| PolidraftError::config("Cannot find config directory"))
    }

    /// Returns the path to the session collection file.
    pub fn sessions_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(SESSIONS_FILE))
    }

    /// Returns the path to the UI state file.
    pub fn ui_state_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(UI_STATE_FILE))
    }

    /// Returns the path to the client configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
