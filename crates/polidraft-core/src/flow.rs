//! Policy-drafting flow steps and server-derived flow state.
//!
//! The backend uses the flow step to select which long-running agent
//! logic to apply to a message.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::{Display, EnumIter, EnumString};

/// One of the five fixed stages of the policy-drafting workflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FlowStep {
    Analysis,
    Objective,
    Concept,
    Plan,
    Proposal,
}

impl FlowStep {
    /// Human-readable label shown next to the step name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Analysis => "現状分析・課題整理",
            Self::Objective => "目的整理",
            Self::Concept => "コンセプト策定",
            Self::Plan => "施策案作成",
            Self::Proposal => "提案書作成",
        }
    }
}

/// Snapshot of the per-session flow results, as returned by the backend.
///
/// The client never creates this independently; it is updated from
/// flow-endpoint responses and the session-state endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_timestamps: Option<HashMap<String, String>>,
}

/// One structured note in the per-flow organizer panel.
///
/// Drafts are persisted locally per project/flow pair and can be pushed
/// to the backend as project step sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerSection {
    pub section_key: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FlowState {
    /// Returns the stored result text for a step, if the backend has
    /// produced one.
    pub fn result_for(&self, step: FlowStep) -> Option<&str> {
        match step {
            FlowStep::Analysis => self.analysis_result.as_deref(),
            FlowStep::Objective => self.objective_result.as_deref(),
            FlowStep::Concept => self.concept_result.as_deref(),
            FlowStep::Plan => self.plan_result.as_deref(),
            FlowStep::Proposal => self.proposal_result.as_deref(),
        }
    }
}
