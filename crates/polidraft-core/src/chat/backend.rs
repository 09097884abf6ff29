//! Backend abstraction the session manager dispatches to.
//!
//! The concrete HTTP implementation lives in `polidraft-gateway`; tests
//! substitute an in-memory mock.

use super::message::SearchType;
use super::people::Candidate;
use crate::error::Result;
use crate::flow::{FlowState, FlowStep};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A single outgoing chat request.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub content: String,
    pub search_type: Option<SearchType>,
    pub flow_step: Option<FlowStep>,
    pub session_id: Option<String>,
    pub project_id: Option<String>,
}

/// The assistant reply from the direct chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub id: String,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub search_type: Option<SearchType>,
}

/// The assistant reply from the flow-oriented endpoint.
#[derive(Debug, Clone)]
pub struct FlowReply {
    pub id: String,
    pub content: String,
    pub step: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub session_id: String,
    pub project_id: Option<String>,
    pub full_state: Option<FlowState>,
}

/// The people-search result set.
#[derive(Debug, Clone, Default)]
pub struct PeopleReply {
    pub candidates: Vec<Candidate>,
    pub narrative: Option<String>,
}

/// Chat operations the session manager needs from the backend.
///
/// Exactly one of these is invoked per send: the flow endpoint when a
/// flow step is given without an explicit search type, otherwise the
/// direct chat endpoint. The people-search call is a second, independent
/// round trip.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply>;

    async fn send_flow(&self, request: &ChatRequest) -> Result<FlowReply>;

    async fn ask_people(&self, question: &str, top_k: u32, coworker_id: i64)
    -> Result<PeopleReply>;
}
