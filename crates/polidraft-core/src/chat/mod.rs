//! Chat sessions, messages and the session manager.

pub mod backend;
pub mod manager;
pub mod message;
pub mod people;
pub mod session;
pub mod store;

pub use backend::{ChatBackend, ChatReply, ChatRequest, FlowReply, PeopleReply};
pub use manager::{ChatSessionManager, ERROR_PREFIX};
pub use message::{ChatMessage, MessageRole, SearchType};
pub use people::{Candidate, PeopleCard};
pub use session::{ChatSession, TITLE_MAX_CHARS};
pub use store::{SessionStore, UiStateStore};
