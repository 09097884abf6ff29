//! Storage traits implemented by the infrastructure crate.
//!
//! The session manager only sees these traits; the concrete JSON file
//! stores live in `polidraft-infrastructure`.

use super::session::ChatSession;
use crate::auth::LockoutRecord;
use crate::error::Result;
use crate::flow::{FlowStep, OrganizerSection};
use async_trait::async_trait;

/// Durable store for the whole session collection.
///
/// The collection is persisted under one fixed storage key. Loading must
/// never fail toward the caller: a missing or corrupt blob degrades to an
/// empty collection (the condition is logged by the implementation).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the persisted session collection, newest first.
    async fn load_all(&self) -> Vec<ChatSession>;

    /// Replaces the persisted session collection.
    async fn save_all(&self, sessions: &[ChatSession]) -> Result<()>;
}

/// Durable store for lightweight UI progress state.
///
/// Holds the per-project-per-flow progress markers, organizer drafts,
/// and the login-lockout record. Concurrent processes race with
/// last-write-wins semantics; that is accepted.
#[async_trait]
pub trait UiStateStore: Send + Sync {
    /// Records that a project/flow pair has chat messages.
    async fn mark_flow_has_messages(&self, project_id: &str, flow: FlowStep) -> Result<()>;

    /// True when a project/flow pair has recorded chat messages.
    async fn flow_has_messages(&self, project_id: &str, flow: FlowStep) -> bool;

    /// Records that a project/flow pair has saved organizer content.
    async fn mark_organizer_saved(&self, project_id: &str, flow: FlowStep) -> Result<()>;

    /// True when a project/flow pair has saved organizer content.
    async fn organizer_saved(&self, project_id: &str, flow: FlowStep) -> bool;

    /// Stores the local organizer draft for a project/flow pair.
    async fn save_organizer_draft(
        &self,
        project_id: &str,
        flow: FlowStep,
        sections: &[OrganizerSection],
    ) -> Result<()>;

    /// Loads the local organizer draft for a project/flow pair, if any.
    async fn organizer_draft(&self, project_id: &str, flow: FlowStep)
    -> Option<Vec<OrganizerSection>>;

    /// Loads the login-lockout record; a missing record is the default.
    async fn lockout_record(&self) -> LockoutRecord;

    /// Replaces the login-lockout record.
    async fn save_lockout_record(&self, record: &LockoutRecord) -> Result<()>;

    /// Removes the login-lockout record.
    async fn clear_lockout_record(&self) -> Result<()>;
}
