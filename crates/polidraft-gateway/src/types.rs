//! Wire DTOs for the backend gateway.
//!
//! Request bodies serialize with lowercase enum values and omit absent
//! optionals; response bodies tolerate missing optional fields because
//! the backend has evolved across deployments.

use chrono::{DateTime, Utc};
use polidraft_core::chat::{Candidate, ChatRequest, SearchType};
use polidraft_core::flow::{FlowState, OrganizerSection};
use polidraft_core::graph::NetworkGraph;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/chat` and `POST /api/policy-flexible`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl From<&ChatRequest> for MessageRequest {
    fn from(request: &ChatRequest) -> Self {
        Self {
            content: request.content.clone(),
            search_type: request.search_type.map(|s| s.as_wire()),
            flow_step: request.flow_step.map(|s| s.to_string()),
            session_id: request.session_id.clone(),
            project_id: request.project_id.clone(),
        }
    }
}

/// Reply from `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: String,
    #[serde(default)]
    pub search_type: Option<String>,
}

/// Session header from `GET /api/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Reply from `POST /api/policy-flexible`.
#[derive(Debug, Clone, Deserialize)]
pub struct FlexiblePolicyResponse {
    pub id: String,
    pub content: String,
    pub step: String,
    pub timestamp: String,
    pub session_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub full_state: Option<FlowState>,
}

/// Body of `POST /api/people/ask`.
#[derive(Debug, Clone, Serialize)]
pub struct PeopleAskRequest {
    pub question: String,
    pub top_k: u32,
    pub coworker_id: i64,
}

/// Reply from `POST /api/people/ask`. Both fields are best-effort.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeopleAskResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub narrative: Option<String>,
}

/// Reply from `GET /detail/{id}`: company info and the network graph
/// around the candidate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateDetail {
    #[serde(default)]
    pub network: NetworkGraph,
    #[serde(default)]
    pub gbiz_info: Option<Value>,
}

/// One dated entry in a coworker history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub period: String,
    pub text: String,
}

/// Reply from `GET /api/coworkers/{id}/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoworkerProfile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub work_history: Vec<HistoryEntry>,
    #[serde(default)]
    pub project_history: Vec<HistoryEntry>,
}

/// A coworker directory entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coworker {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    pub email: String,
    #[serde(default)]
    pub department_name: Option<String>,
}

/// Body of `POST /api/projects`.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_coworker_id: i64,
    pub member_ids: Vec<i64>,
}

/// A project with its members, from the project endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    pub owner_coworker_id: i64,
    pub owner_name: String,
    #[serde(default)]
    pub members: Vec<Coworker>,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of `POST /api/project-step-sections`.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectStepSectionRequest {
    pub project_id: String,
    pub step_key: String,
    pub sections: Vec<OrganizerSection>,
}

/// One persisted section row, from the project-step-section endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectStepSectionResponse {
    pub id: String,
    pub project_id: String,
    pub step_key: String,
    pub section_key: String,
    pub content: String,
    #[serde(default)]
    pub label: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Reply from `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Coworker,
    pub expires_at: String,
}

/// Reply from `GET /api/auth/verify`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(default)]
    pub user: Option<Coworker>,
}

/// Reply from the health-check root.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Parses a wire timestamp, tolerating non-RFC3339 values.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

/// Parses a wire search type, tolerating unknown values.
pub(crate) fn parse_search_type(raw: Option<&str>) -> Option<SearchType> {
    raw.and_then(SearchType::from_wire)
}
