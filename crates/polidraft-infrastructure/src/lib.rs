//! File-backed persistence for the polidraft client.
//!
//! Implements the core storage traits over JSON files in the platform
//! config directory, with atomic writes and graceful degradation on
//! corrupt data.

pub mod atomic_json;
pub mod config;
pub mod json_session_store;
pub mod json_ui_state_store;
pub mod paths;

pub use config::ClientConfig;
pub use json_session_store::JsonSessionStore;
pub use json_ui_state_store::JsonUiStateStore;
pub use paths::PolidraftPaths;
