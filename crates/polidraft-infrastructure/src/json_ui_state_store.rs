//! JSON-file UiStateStore implementation.

use crate::atomic_json::AtomicJsonFile;
use crate::paths::PolidraftPaths;
use async_trait::async_trait;
use polidraft_core::auth::LockoutRecord;
use polidraft_core::chat::UiStateStore;
use polidraft_core::error::Result;
use polidraft_core::flow::{FlowStep, OrganizerSection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::warn;

/// On-disk shape of the UI state blob.
#[derive(Debug, Default, Serialize, Deserialize)]
struct UiState {
    /// Boolean progress markers, keyed `messages:{project}:{flow}` or
    /// `organizer:{project}:{flow}`.
    #[serde(default)]
    flags: BTreeMap<String, bool>,
    /// Organizer drafts keyed `{project}:{flow}`.
    #[serde(default)]
    organizer_drafts: BTreeMap<String, Vec<OrganizerSection>>,
    #[serde(default)]
    lockout: Option<LockoutRecord>,
}

/// Stores progress markers, organizer drafts and the lockout record in
/// one JSON file.
///
/// Every mutation is a read-modify-write of the whole blob, serialized
/// within the process by a mutex. A malformed file degrades to the
/// default state on read. Concurrent processes race with
/// last-write-wins semantics.
pub struct JsonUiStateStore {
    file: AtomicJsonFile<UiState>,
    write_lock: Mutex<()>,
}

impl JsonUiStateStore {
    /// Creates a store over the given file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store at the default location
    /// (`~/.config/polidraft/ui_state.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(PolidraftPaths::ui_state_file()?))
    }

    fn load_state(&self) -> UiState {
        match self.file.load() {
            Ok(Some(state)) => state,
            Ok(None) => UiState::default(),
            Err(err) => {
                warn!("failed to load UI state, starting from default: {}", err);
                UiState::default()
            }
        }
    }

    async fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut UiState),
    {
        let _guard = self.write_lock.lock().await;
        let mut state = self.load_state();
        mutate(&mut state);
        self.file.save(&state)
    }

    fn messages_key(project_id: &str, flow: FlowStep) -> String {
        format!("messages:{}:{}", project_id, flow)
    }

    fn organizer_key(project_id: &str, flow: FlowStep) -> String {
        format!("organizer:{}:{}", project_id, flow)
    }

    fn draft_key(project_id: &str, flow: FlowStep) -> String {
        format!("{}:{}", project_id, flow)
    }
}

#[async_trait]
impl UiStateStore for JsonUiStateStore {
    async fn mark_flow_has_messages(&self, project_id: &str, flow: FlowStep) -> Result<()> {
        self.update(|state| {
            state.flags.insert(Self::messages_key(project_id, flow), true);
        })
        .await
    }

    async fn flow_has_messages(&self, project_id: &str, flow: FlowStep) -> bool {
        self.load_state()
            .flags
            .get(&Self::messages_key(project_id, flow))
            .copied()
            .unwrap_or(false)
    }

    async fn mark_organizer_saved(&self, project_id: &str, flow: FlowStep) -> Result<()> {
        self.update(|state| {
            state
                .flags
                .insert(Self::organizer_key(project_id, flow), true);
        })
        .await
    }

    async fn organizer_saved(&self, project_id: &str, flow: FlowStep) -> bool {
        self.load_state()
            .flags
            .get(&Self::organizer_key(project_id, flow))
            .copied()
            .unwrap_or(false)
    }

    async fn save_organizer_draft(
        &self,
        project_id: &str,
        flow: FlowStep,
        sections: &[OrganizerSection],
    ) -> Result<()> {
        let sections = sections.to_vec();
        self.update(|state| {
            state
                .organizer_drafts
                .insert(Self::draft_key(project_id, flow), sections);
        })
        .await
    }

    async fn organizer_draft(
        &self,
        project_id: &str,
        flow: FlowStep,
    ) -> Option<Vec<OrganizerSection>> {
        self.load_state()
            .organizer_drafts
            .get(&Self::draft_key(project_id, flow))
            .cloned()
    }

    async fn lockout_record(&self) -> LockoutRecord {
        self.load_state().lockout.unwrap_or_default()
    }

    async fn save_lockout_record(&self, record: &LockoutRecord) -> Result<()> {
        let record = record.clone();
        self.update(|state| {
            state.lockout = Some(record);
        })
        .await
    }

    async fn clear_lockout_record(&self) -> Result<()> {
        self.update(|state| {
            state.lockout = None;
        })
        .await
    }
}
