//! Chat session manager.
//!
//! Owns the in-memory session collection and the active-session pointer,
//! appends user/assistant messages, dispatches backend calls, and
//! reconciles people-search results into transient cards.

use super::backend::{ChatBackend, ChatRequest};
use super::message::{ChatMessage, MessageRole, SearchType};
use super::people::PeopleCard;
use super::session::ChatSession;
use super::store::{SessionStore, UiStateStore};
use crate::error::PolidraftError;
use crate::flow::{FlowState, FlowStep};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

/// Prefix marking synthetic assistant messages produced from failures.
pub const ERROR_PREFIX: &str = "❌ ";

const SERVER_ERROR_MESSAGE: &str =
    "サーバーエラーが発生しました。しばらく待ってから再試行してください。";
const UNREACHABLE_MESSAGE: &str =
    "バックエンドサーバーに接続できません。サーバーが起動しているか確認してください。";
const SEND_FAILED_MESSAGE: &str = "メッセージの送信に失敗しました。";

/// How many candidates a people search asks for.
const PEOPLE_TOP_K: u32 = 5;

#[derive(Default)]
struct ChatState {
    /// Session collection, newest first.
    sessions: Vec<ChatSession>,
    /// Id of the active session; None means the next send creates one.
    active_id: Option<String>,
    /// People cards keyed by the id of the triggering user message.
    people_cards: HashMap<String, PeopleCard>,
    /// Server-derived flow snapshots keyed by session id.
    flow_states: HashMap<String, FlowState>,
    /// True while the primary send round trip is outstanding.
    is_loading: bool,
    /// Last localized send error, for inline display.
    last_error: Option<String>,
}

/// Manages chat sessions and their lifecycle.
///
/// `ChatSessionManager` is responsible for:
/// - Creating sessions lazily on the first send
/// - Appending user messages optimistically before the round trip
/// - Dispatching exactly one backend call per send
/// - Converting backend failures into synthetic assistant messages
/// - Binding people-search cards to the triggering user message
/// - Persisting the session collection after every mutation
pub struct ChatSessionManager {
    state: Arc<RwLock<ChatState>>,
    session_store: Arc<dyn SessionStore>,
    ui_state: Arc<dyn UiStateStore>,
    backend: Arc<dyn ChatBackend>,
    /// One network search in flight at a time; overlapping sends are
    /// dropped, not queued, to avoid duplicate people-search calls.
    network_in_flight: AtomicBool,
}

impl ChatSessionManager {
    /// Creates a new manager over the given store and backend.
    pub fn new(
        session_store: Arc<dyn SessionStore>,
        ui_state: Arc<dyn UiStateStore>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(ChatState::default())),
            session_store,
            ui_state,
            backend,
            network_in_flight: AtomicBool::new(false),
        }
    }

    /// Loads the persisted session collection.
    ///
    /// A corrupt or missing blob degrades to an empty collection inside
    /// the store, so this never fails. No session becomes active.
    pub async fn load(&self) {
        let sessions = self.session_store.load_all().await;
        let mut state = self.state.write().await;
        state.sessions = sessions;
    }

    /// Sends a message in the active session, creating one if needed.
    ///
    /// The user message is appended and persisted before the round trip;
    /// the assistant message (or a localized error message) is appended
    /// after it resolves. Backend failures never escape this boundary.
    ///
    /// Dispatch precedence: an explicit `search_type` always goes to the
    /// direct chat endpoint; the flow endpoint is used only when
    /// `flow_step` is given without a search type.
    pub async fn send_message(
        &self,
        content: &str,
        search_type: Option<SearchType>,
        flow_step: Option<FlowStep>,
        project_id: Option<&str>,
    ) {
        if matches!(search_type, Some(SearchType::Network)) {
            if self.network_in_flight.swap(true, Ordering::SeqCst) {
                debug!("network search in flight, dropping send");
                return;
            }
            self.send_network(content, flow_step, project_id).await;
            self.network_in_flight.store(false, Ordering::SeqCst);
            return;
        }
        self.send_plain(content, search_type, flow_step, project_id).await;
    }

    async fn send_plain(
        &self,
        content: &str,
        search_type: Option<SearchType>,
        flow_step: Option<FlowStep>,
        project_id: Option<&str>,
    ) {
        self.mark_progress(project_id, flow_step).await;

        let user = ChatMessage::user(content, search_type);
        let session_id = self.append_user_message(user).await;

        let assistant = self
            .dispatch(content, search_type, flow_step, &session_id, project_id)
            .await;
        self.append_assistant_message(&session_id, assistant).await;
    }

    async fn send_network(
        &self,
        content: &str,
        flow_step: Option<FlowStep>,
        project_id: Option<&str>,
    ) {
        self.mark_progress(project_id, flow_step).await;

        let user = ChatMessage::user(content, Some(SearchType::Network));
        let parent_id = user.id.clone();
        let query = content.trim().to_string();
        let session_id = self.append_user_message(user).await;

        // Bind the card to the pre-allocated message id before any round
        // trip, so two identical queries cannot cross-bind.
        {
            let mut state = self.state.write().await;
            state.people_cards.insert(
                parent_id.clone(),
                PeopleCard::loading(Uuid::new_v4().to_string(), query.clone()),
            );
        }

        // The chat reply and the people search are independent backend
        // calls with independent latency.
        let chat = async {
            let assistant = self
                .dispatch(
                    content,
                    Some(SearchType::Network),
                    flow_step,
                    &session_id,
                    project_id,
                )
                .await;
            self.append_assistant_message(&session_id, assistant).await;
        };
        let people = self.backend.ask_people(&query, PEOPLE_TOP_K, 0);
        let ((), people_result) = tokio::join!(chat, people);

        // The card may be gone if the session was switched away.
        let mut state = self.state.write().await;
        if let Some(card) = state.people_cards.get_mut(&parent_id) {
            match people_result {
                Ok(reply) => {
                    card.items = reply.candidates;
                    card.narrative = reply.narrative;
                }
                Err(err) => {
                    warn!("people search failed: {}", err);
                    card.items.clear();
                }
            }
            card.is_loading = false;
        }
    }

    /// Performs the single backend call for a send and converts the
    /// outcome into the assistant message to append.
    async fn dispatch(
        &self,
        content: &str,
        search_type: Option<SearchType>,
        flow_step: Option<FlowStep>,
        session_id: &str,
        project_id: Option<&str>,
    ) -> ChatMessage {
        let request = ChatRequest {
            content: content.to_string(),
            search_type,
            flow_step,
            session_id: Some(session_id.to_string()),
            project_id: project_id.map(str::to_string),
        };

        let use_flow = search_type.is_none() && flow_step.is_some();
        let result = if use_flow {
            match self.backend.send_flow(&request).await {
                Ok(reply) => {
                    if let Some(full_state) = reply.full_state.clone() {
                        let mut state = self.state.write().await;
                        state.flow_states.insert(session_id.to_string(), full_state);
                    }
                    Ok(ChatMessage::assistant(
                        Some(reply.id),
                        reply.content,
                        reply.timestamp,
                        None,
                    ))
                }
                Err(err) => Err(err),
            }
        } else {
            self.backend.send_chat(&request).await.map(|reply| {
                ChatMessage::assistant(
                    Some(reply.id),
                    reply.content,
                    reply.timestamp,
                    reply.search_type,
                )
            })
        };

        match result {
            Ok(message) => message,
            Err(err) => {
                warn!("send failed: {}", err);
                let text = classify_send_error(&err);
                let mut state = self.state.write().await;
                state.last_error = Some(text.to_string());
                ChatMessage::assistant(None, format!("{}{}", ERROR_PREFIX, text), None, None)
            }
        }
    }

    async fn mark_progress(&self, project_id: Option<&str>, flow_step: Option<FlowStep>) {
        if let (Some(project_id), Some(step)) = (project_id, flow_step) {
            if let Err(err) = self.ui_state.mark_flow_has_messages(project_id, step).await {
                warn!("failed to record progress marker: {}", err);
            }
        }
    }

    /// Appends the user message, creating and activating a session when
    /// none is active, and returns the owning session id.
    async fn append_user_message(&self, message: ChatMessage) -> String {
        let (session_id, sessions) = {
            let mut state = self.state.write().await;
            let session_id = match state.active_id.clone() {
                Some(id) => id,
                None => {
                    let session = ChatSession::new(&message.content);
                    let id = session.id.clone();
                    state.sessions.insert(0, session);
                    state.active_id = Some(id.clone());
                    id
                }
            };
            if let Some(session) = state.sessions.iter_mut().find(|s| s.id == session_id) {
                session.push_message(message);
            }
            state.is_loading = true;
            state.last_error = None;
            (session_id, state.sessions.clone())
        };
        self.persist(&sessions).await;
        session_id
    }

    /// Appends the assistant message to the session the send started in,
    /// even if another session has become active meanwhile.
    async fn append_assistant_message(&self, session_id: &str, message: ChatMessage) {
        let sessions = {
            let mut state = self.state.write().await;
            if let Some(session) = state.sessions.iter_mut().find(|s| s.id == session_id) {
                session.push_message(message);
            }
            state.is_loading = false;
            state.sessions.clone()
        };
        self.persist(&sessions).await;
    }

    /// Persist failures are logged, never surfaced to the caller.
    async fn persist(&self, sessions: &[ChatSession]) {
        if let Err(err) = self.session_store.save_all(sessions).await {
            warn!("failed to persist sessions: {}", err);
        }
    }

    /// Makes the given session active and clears all people cards.
    pub async fn select_session(&self, session_id: &str) {
        let mut state = self.state.write().await;
        state.active_id = Some(session_id.to_string());
        state.people_cards.clear();
        state.last_error = None;
    }

    /// Clears the active session; the next send creates a new one.
    pub async fn start_new_chat(&self) {
        let mut state = self.state.write().await;
        state.active_id = None;
        state.people_cards.clear();
        state.last_error = None;
    }

    /// Session collection snapshot, newest first.
    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.state.read().await.sessions.clone()
    }

    /// Id of the active session, if any.
    pub async fn active_session_id(&self) -> Option<String> {
        self.state.read().await.active_id.clone()
    }

    /// Snapshot of the active session.
    pub async fn active_session(&self) -> Option<ChatSession> {
        let state = self.state.read().await;
        let id = state.active_id.as_deref()?;
        state.sessions.iter().find(|s| s.id == id).cloned()
    }

    /// Messages of the active session in insertion order.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.active_session()
            .await
            .map(|s| s.messages)
            .unwrap_or_default()
    }

    /// Messages to render: assistant network replies are hidden because
    /// the people card takes their place in the transcript.
    pub async fn visible_messages(&self) -> Vec<ChatMessage> {
        self.messages()
            .await
            .into_iter()
            .filter(|m| {
                !(m.role == MessageRole::Assistant && m.search_type == Some(SearchType::Network))
            })
            .collect()
    }

    /// People cards keyed by parent user-message id.
    pub async fn people_cards(&self) -> HashMap<String, PeopleCard> {
        self.state.read().await.people_cards.clone()
    }

    /// The card bound to one user message, if any.
    pub async fn card_for(&self, message_id: &str) -> Option<PeopleCard> {
        self.state.read().await.people_cards.get(message_id).cloned()
    }

    /// True while a send round trip is outstanding.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    /// Last localized send error, for inline display.
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// Server-derived flow snapshot for a session, if one has arrived.
    pub async fn flow_state(&self, session_id: &str) -> Option<FlowState> {
        self.state.read().await.flow_states.get(session_id).cloned()
    }

    /// Replaces the flow snapshot for a session (used when the snapshot
    /// is fetched directly from the session-state endpoint).
    pub async fn set_flow_state(&self, session_id: &str, flow_state: FlowState) {
        let mut state = self.state.write().await;
        state.flow_states.insert(session_id.to_string(), flow_state);
    }
}

/// Maps a gateway failure to the localized message shown in the chat.
fn classify_send_error(err: &PolidraftError) -> &'static str {
    match err.api_status() {
        Some(500) => SERVER_ERROR_MESSAGE,
        Some(0) => UNREACHABLE_MESSAGE,
        _ => SEND_FAILED_MESSAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::backend::{ChatReply, FlowReply, PeopleReply};
    use crate::chat::people::Candidate;
    use crate::error::Result;
    use crate::flow::OrganizerSection;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockSessionStore {
        saved: Mutex<Vec<ChatSession>>,
    }

    impl MockSessionStore {
        fn new() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SessionStore for MockSessionStore {
        async fn load_all(&self) -> Vec<ChatSession> {
            self.saved.lock().unwrap().clone()
        }

        async fn save_all(&self, sessions: &[ChatSession]) -> Result<()> {
            *self.saved.lock().unwrap() = sessions.to_vec();
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockUiStateStore {
        markers: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl UiStateStore for MockUiStateStore {
        async fn mark_flow_has_messages(&self, project_id: &str, flow: FlowStep) -> Result<()> {
            self.markers
                .lock()
                .unwrap()
                .push(format!("messages:{}:{}", project_id, flow));
            Ok(())
        }

        async fn flow_has_messages(&self, project_id: &str, flow: FlowStep) -> bool {
            self.markers
                .lock()
                .unwrap()
                .contains(&format!("messages:{}:{}", project_id, flow))
        }

        async fn mark_organizer_saved(&self, _project_id: &str, _flow: FlowStep) -> Result<()> {
            Ok(())
        }

        async fn organizer_saved(&self, _project_id: &str, _flow: FlowStep) -> bool {
            false
        }

        async fn save_organizer_draft(
            &self,
            _project_id: &str,
            _flow: FlowStep,
            _sections: &[OrganizerSection],
        ) -> Result<()> {
            Ok(())
        }

        async fn organizer_draft(
            &self,
            _project_id: &str,
            _flow: FlowStep,
        ) -> Option<Vec<OrganizerSection>> {
            None
        }

        async fn lockout_record(&self) -> crate::auth::LockoutRecord {
            crate::auth::LockoutRecord::default()
        }

        async fn save_lockout_record(&self, _record: &crate::auth::LockoutRecord) -> Result<()> {
            Ok(())
        }

        async fn clear_lockout_record(&self) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockBackend {
        /// When set, chat and flow sends fail with this normalized status.
        fail_status: Option<u16>,
        /// When set, chat and people calls sleep this long before replying.
        delay: Option<std::time::Duration>,
        chat_calls: Mutex<Vec<ChatRequest>>,
        flow_calls: Mutex<Vec<ChatRequest>>,
        people_calls: Mutex<Vec<String>>,
        people_fail: bool,
    }

    #[async_trait]
    impl ChatBackend for MockBackend {
        async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
            self.chat_calls.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(status) = self.fail_status {
                return Err(PolidraftError::api(status, "boom"));
            }
            Ok(ChatReply {
                id: Uuid::new_v4().to_string(),
                content: format!("echo: {}", request.content),
                timestamp: None,
                search_type: request.search_type,
            })
        }

        async fn send_flow(&self, request: &ChatRequest) -> Result<FlowReply> {
            self.flow_calls.lock().unwrap().push(request.clone());
            if let Some(status) = self.fail_status {
                return Err(PolidraftError::api(status, "boom"));
            }
            let step = request.flow_step.expect("flow dispatch without step");
            Ok(FlowReply {
                id: Uuid::new_v4().to_string(),
                content: format!("{} result", step),
                step: step.to_string(),
                timestamp: None,
                session_id: request.session_id.clone().unwrap_or_default(),
                project_id: request.project_id.clone(),
                full_state: Some(FlowState {
                    session_id: request.session_id.clone().unwrap_or_default(),
                    analysis_result: Some("analyzed".to_string()),
                    ..Default::default()
                }),
            })
        }

        async fn ask_people(
            &self,
            question: &str,
            _top_k: u32,
            _coworker_id: i64,
        ) -> Result<PeopleReply> {
            self.people_calls.lock().unwrap().push(question.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.people_fail {
                return Err(PolidraftError::api(0, "unreachable"));
            }
            Ok(PeopleReply {
                candidates: vec![Candidate {
                    id: 1,
                    name: "山田".to_string(),
                    company: None,
                    department: None,
                    title: None,
                    skills: None,
                    score: Some(0.9),
                    avatar_url: None,
                }],
                narrative: Some("narrative".to_string()),
            })
        }
    }

    fn manager_with(backend: MockBackend) -> (ChatSessionManager, Arc<MockBackend>) {
        let backend = Arc::new(backend);
        let manager = ChatSessionManager::new(
            Arc::new(MockSessionStore::new()),
            Arc::new(MockUiStateStore::default()),
            backend.clone(),
        );
        (manager, backend)
    }

    #[tokio::test]
    async fn test_first_send_creates_titled_active_session() {
        let (manager, _) = manager_with(MockBackend::default());
        manager.send_message("hello", None, None, None).await;

        let sessions = manager.sessions().await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].title, "hello");
        assert_eq!(manager.active_session_id().await, Some(sessions[0].id.clone()));

        let messages = manager.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert!(messages[0].search_type.is_none());
        assert!(!manager.is_loading().await);
    }

    #[tokio::test]
    async fn test_messages_alternate_and_preserve_call_order() {
        let (manager, _) = manager_with(MockBackend::default());
        manager.send_message("first", None, None, None).await;
        manager.send_message("second", None, None, None).await;

        let messages = manager.messages().await;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[2].content, "second");
        assert_eq!(messages[3].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_server_error_becomes_assistant_message() {
        let (manager, _) = manager_with(MockBackend {
            fail_status: Some(500),
            ..Default::default()
        });
        manager.send_message("hello", None, None, None).await;

        let messages = manager.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert!(messages[1].content.starts_with(ERROR_PREFIX));
        assert!(messages[1].content.contains("サーバーエラー"));
        assert!(!manager.is_loading().await);
        assert!(manager.last_error().await.is_some());
    }

    #[tokio::test]
    async fn test_network_failure_uses_unreachable_message() {
        let (manager, _) = manager_with(MockBackend {
            fail_status: Some(0),
            ..Default::default()
        });
        manager.send_message("hello", None, None, None).await;

        let messages = manager.messages().await;
        assert!(messages[1].content.contains("接続できません"));
    }

    #[tokio::test]
    async fn test_search_type_takes_precedence_over_flow_step() {
        let (manager, backend) = manager_with(MockBackend::default());
        manager
            .send_message("q", Some(SearchType::Fact), Some(FlowStep::Analysis), None)
            .await;

        assert_eq!(backend.chat_calls.lock().unwrap().len(), 1);
        assert!(backend.flow_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_flow_step_alone_uses_flow_endpoint_and_updates_state() {
        let (manager, backend) = manager_with(MockBackend::default());
        manager
            .send_message("q", None, Some(FlowStep::Analysis), None)
            .await;

        assert!(backend.chat_calls.lock().unwrap().is_empty());
        assert_eq!(backend.flow_calls.lock().unwrap().len(), 1);

        let session_id = manager.active_session_id().await.unwrap();
        let flow_state = manager.flow_state(&session_id).await.unwrap();
        assert_eq!(flow_state.analysis_result.as_deref(), Some("analyzed"));
    }

    #[tokio::test]
    async fn test_network_send_binds_one_card_to_the_user_message() {
        let (manager, backend) = manager_with(MockBackend::default());
        manager
            .send_message("find experts", Some(SearchType::Network), None, None)
            .await;

        let messages = manager.messages().await;
        let user = &messages[0];
        assert_eq!(user.search_type, Some(SearchType::Network));

        let cards = manager.people_cards().await;
        assert_eq!(cards.len(), 1);
        let card = cards.get(&user.id).expect("card bound to user message id");
        assert!(!card.is_loading);
        assert_eq!(card.items.len(), 1);
        assert_eq!(card.narrative.as_deref(), Some("narrative"));
        assert_eq!(backend.people_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_people_search_finishes_loading_with_empty_items() {
        let (manager, _) = manager_with(MockBackend {
            people_fail: true,
            ..Default::default()
        });
        manager
            .send_message("find experts", Some(SearchType::Network), None, None)
            .await;

        let cards = manager.people_cards().await;
        let card = cards.values().next().expect("card present");
        assert!(!card.is_loading);
        assert!(card.items.is_empty());
    }

    #[tokio::test]
    async fn test_assistant_network_replies_are_hidden() {
        let (manager, _) = manager_with(MockBackend::default());
        manager
            .send_message("find experts", Some(SearchType::Network), None, None)
            .await;

        assert_eq!(manager.messages().await.len(), 2);
        let visible = manager.visible_messages().await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_overlapping_network_send_is_dropped() {
        let backend = Arc::new(MockBackend {
            delay: Some(std::time::Duration::from_millis(200)),
            ..Default::default()
        });
        let manager = Arc::new(ChatSessionManager::new(
            Arc::new(MockSessionStore::new()),
            Arc::new(MockUiStateStore::default()),
            backend.clone(),
        ));

        let first = {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .send_message("find experts", Some(SearchType::Network), None, None)
                    .await;
            })
        };
        // Fire the second send while the first round trip is in flight.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        manager
            .send_message("find more", Some(SearchType::Network), None, None)
            .await;
        first.await.unwrap();

        // The overlapping send was dropped, not queued: one people-search
        // call, one card, and no message appended for the second query.
        assert_eq!(backend.people_calls.lock().unwrap().len(), 1);
        assert_eq!(
            backend.people_calls.lock().unwrap()[0],
            "find experts"
        );
        assert_eq!(manager.people_cards().await.len(), 1);
        let messages = manager.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "find experts");
    }

    #[tokio::test]
    async fn test_session_switch_clears_people_cards() {
        let (manager, _) = manager_with(MockBackend::default());
        manager
            .send_message("find experts", Some(SearchType::Network), None, None)
            .await;
        assert_eq!(manager.people_cards().await.len(), 1);

        manager.start_new_chat().await;
        assert!(manager.people_cards().await.is_empty());
        assert!(manager.active_session_id().await.is_none());

        manager
            .send_message("find more", Some(SearchType::Network), None, None)
            .await;
        let sessions = manager.sessions().await;
        assert_eq!(sessions.len(), 2);
        manager.select_session(&sessions[1].id).await;
        assert!(manager.people_cards().await.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_persist_through_the_store() {
        let store = Arc::new(MockSessionStore::new());
        let manager = ChatSessionManager::new(
            store.clone(),
            Arc::new(MockUiStateStore::default()),
            Arc::new(MockBackend::default()),
        );
        manager.send_message("hello", None, None, None).await;

        let manager2 = ChatSessionManager::new(
            store,
            Arc::new(MockUiStateStore::default()),
            Arc::new(MockBackend::default()),
        );
        manager2.load().await;
        let sessions = manager2.sessions().await;
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].messages.len(), 2);
        // Loading never restores an active pointer.
        assert!(manager2.active_session_id().await.is_none());
    }

    #[tokio::test]
    async fn test_project_send_records_progress_marker() {
        let ui_state = Arc::new(MockUiStateStore::default());
        let manager = ChatSessionManager::new(
            Arc::new(MockSessionStore::new()),
            ui_state.clone(),
            Arc::new(MockBackend::default()),
        );
        manager
            .send_message("q", None, Some(FlowStep::Plan), Some("p-1"))
            .await;
        assert!(ui_state.flow_has_messages("p-1", FlowStep::Plan).await);
    }
}
