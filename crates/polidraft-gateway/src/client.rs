//! HTTP client for the backend gateway.

use crate::config::GatewayConfig;
use crate::error::ApiError;
use crate::types::*;
use async_trait::async_trait;
use polidraft_core::chat::{ChatBackend, ChatReply, ChatRequest, FlowReply, PeopleReply};
use polidraft_core::error::Result;
use polidraft_core::flow::FlowState;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Typed client over every backend endpoint.
///
/// One instance per configured endpoint; holds no mutable state beyond
/// the connection pool, so it is cheap to clone and share. Does not
/// retry automatically.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
    token: Option<String>,
}

impl GatewayClient {
    /// Creates a client over the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            token: None,
        }
    }

    /// Attaches a bearer token to subsequent requests.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Sends one request and decodes the JSON body, normalizing every
    /// failure mode into [`ApiError`].
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| ApiError::decode(&e))
    }

    /// Sends one request and checks the status, ignoring the body.
    async fn send(&self, request: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let mut request = request.header("Content-Type", "application/json");
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| ApiError::transport(&e))?;
        let status = response.status();
        debug!(status = status.as_u16(), "gateway response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(path, "GET");
        self.execute(self.client.get(self.config.endpoint.url(path)))
            .await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        debug!(path, "POST");
        self.execute(self.client.post(self.config.endpoint.url(path)).json(body))
            .await
    }

    // --- chat ---

    /// `POST /api/chat`
    pub async fn send_message(&self, request: &MessageRequest) -> ApiResult<MessageResponse> {
        self.post("/api/chat", request).await
    }

    /// `POST /api/policy-flexible`
    pub async fn send_flexible_policy(
        &self,
        request: &MessageRequest,
    ) -> ApiResult<FlexiblePolicyResponse> {
        self.post("/api/policy-flexible", request).await
    }

    /// `GET /api/sessions`
    pub async fn sessions(&self) -> ApiResult<Vec<SessionSummary>> {
        self.get("/api/sessions").await
    }

    /// `POST /api/sessions`
    pub async fn create_session(&self) -> ApiResult<SessionSummary> {
        debug!("POST /api/sessions");
        self.execute(self.client.post(self.config.endpoint.url("/api/sessions")))
            .await
    }

    /// `GET /api/session-state/{id}`
    pub async fn session_state(&self, session_id: &str) -> ApiResult<FlowState> {
        self.get(&format!("/api/session-state/{}", session_id)).await
    }

    // --- people search ---

    /// `POST /api/people/ask`
    pub async fn people_ask(&self, request: &PeopleAskRequest) -> ApiResult<PeopleAskResponse> {
        self.post("/api/people/ask", request).await
    }

    /// `GET /detail/{id}`: candidate company info and network graph.
    pub async fn candidate_detail(&self, candidate_id: i64) -> ApiResult<CandidateDetail> {
        self.get(&format!("/detail/{}", candidate_id)).await
    }

    /// `GET /api/coworkers/{id}/profile`
    pub async fn coworker_profile(&self, coworker_id: i64) -> ApiResult<CoworkerProfile> {
        self.get(&format!("/api/coworkers/{}/profile", coworker_id))
            .await
    }

    /// `GET /api/coworkers/search?q=&department=`. Empty filters are
    /// omitted from the query string.
    pub async fn search_coworkers(
        &self,
        query: &str,
        department: &str,
    ) -> ApiResult<Vec<Coworker>> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if !query.is_empty() {
            params.push(("q", query));
        }
        if !department.is_empty() {
            params.push(("department", department));
        }
        debug!("GET /api/coworkers/search");
        self.execute(
            self.client
                .get(self.config.endpoint.url("/api/coworkers/search"))
                .query(&params),
        )
        .await
    }

    // --- projects ---

    /// `POST /api/projects`
    pub async fn create_project(&self, request: &ProjectCreateRequest) -> ApiResult<Project> {
        self.post("/api/projects", request).await
    }

    /// `GET /api/projects/{id}`
    pub async fn project(&self, project_id: &str) -> ApiResult<Project> {
        self.get(&format!("/api/projects/{}", project_id)).await
    }

    /// `GET /api/projects/by-coworker/{id}`
    pub async fn projects_by_coworker(&self, coworker_id: i64) -> ApiResult<Vec<Project>> {
        self.get(&format!("/api/projects/by-coworker/{}", coworker_id))
            .await
    }

    /// `POST /api/project-step-sections`
    pub async fn save_project_step_sections(
        &self,
        request: &ProjectStepSectionRequest,
    ) -> ApiResult<Vec<ProjectStepSectionResponse>> {
        self.post("/api/project-step-sections", request).await
    }

    /// `GET /api/project-step-sections/{project}/{step}`
    pub async fn project_step_sections(
        &self,
        project_id: &str,
        step_key: &str,
    ) -> ApiResult<Vec<ProjectStepSectionResponse>> {
        self.get(&format!(
            "/api/project-step-sections/{}/{}",
            project_id, step_key
        ))
        .await
    }

    // --- auth ---

    /// `POST /api/auth/login`
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.post("/api/auth/login", request).await
    }

    /// `POST /api/auth/logout`. The reply body is ignored.
    pub async fn logout(&self) -> ApiResult<()> {
        debug!("POST /api/auth/logout");
        self.send(
            self.client
                .post(self.config.endpoint.url("/api/auth/logout"))
                .json(&serde_json::json!({})),
        )
        .await?;
        Ok(())
    }

    /// `GET /api/auth/verify`. Any failure counts as an invalid token.
    pub async fn verify_token(&self) -> VerifyResponse {
        match self.get("/api/auth/verify").await {
            Ok(response) => response,
            Err(err) => {
                debug!("token verification failed: {}", err);
                VerifyResponse {
                    valid: false,
                    user: None,
                }
            }
        }
    }

    /// `GET /api/auth/me`
    pub async fn current_user(&self) -> ApiResult<Coworker> {
        self.get("/api/auth/me").await
    }

    // --- health ---

    /// `GET /`
    pub async fn health_check(&self) -> ApiResult<HealthResponse> {
        self.get("/").await
    }

    /// True when the health check answers at all.
    pub async fn test_connection(&self) -> bool {
        self.health_check().await.is_ok()
    }
}

#[async_trait]
impl ChatBackend for GatewayClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let response = self.send_message(&MessageRequest::from(request)).await?;
        Ok(ChatReply {
            id: response.id,
            content: response.content,
            timestamp: parse_timestamp(&response.timestamp),
            search_type: parse_search_type(response.search_type.as_deref()),
        })
    }

    async fn send_flow(&self, request: &ChatRequest) -> Result<FlowReply> {
        let response = self
            .send_flexible_policy(&MessageRequest::from(request))
            .await?;
        Ok(FlowReply {
            id: response.id,
            content: response.content,
            step: response.step,
            timestamp: parse_timestamp(&response.timestamp),
            session_id: response.session_id,
            project_id: response.project_id,
            full_state: response.full_state,
        })
    }

    async fn ask_people(
        &self,
        question: &str,
        top_k: u32,
        coworker_id: i64,
    ) -> Result<PeopleReply> {
        let response = self
            .people_ask(&PeopleAskRequest {
                question: question.to_string(),
                top_k,
                coworker_id,
            })
            .await?;
        Ok(PeopleReply {
            candidates: response.candidates,
            narrative: response.narrative,
        })
    }
}
