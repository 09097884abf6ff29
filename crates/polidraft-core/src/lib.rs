pub mod auth;
pub mod chat;
pub mod error;
pub mod flow;
pub mod graph;

// Re-export common error type
pub use error::{PolidraftError, Result};
