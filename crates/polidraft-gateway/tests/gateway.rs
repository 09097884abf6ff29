use polidraft_core::chat::{ChatBackend, ChatRequest, SearchType};
use polidraft_core::flow::FlowStep;
use polidraft_gateway::{Endpoint, GatewayClient, GatewayConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GatewayClient {
    GatewayClient::new(GatewayConfig::new(Endpoint::explicit(&server.uri())))
}

#[tokio::test]
async fn chat_round_trip_decodes_the_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "content": "hello",
            "search_type": "fact",
            "session_id": "s-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m-1",
            "content": "answer",
            "type": "ai",
            "timestamp": "2024-05-01T12:00:00Z",
            "search_type": "fact",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ChatRequest {
        content: "hello".to_string(),
        search_type: Some(SearchType::Fact),
        flow_step: None,
        session_id: Some("s-1".to_string()),
        project_id: None,
    };
    let reply = client_for(&server).send_chat(&request).await.unwrap();
    assert_eq!(reply.id, "m-1");
    assert_eq!(reply.content, "answer");
    assert_eq!(reply.search_type, Some(SearchType::Fact));
    assert!(reply.timestamp.is_some());
}

#[tokio::test]
async fn error_message_comes_from_the_detail_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "detail": "session not found" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_message(&(&ChatRequest::default()).into())
        .await
        .unwrap_err();
    assert_eq!(err.status, 422);
    assert_eq!(err.message, "session not found");
    assert!(err.payload.is_some());
}

#[tokio::test]
async fn text_error_body_is_kept_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_message(&(&ChatRequest::default()).into())
        .await
        .unwrap_err();
    assert_eq!(err.status, 500);
    assert_eq!(err.message, "backend exploded");
}

#[tokio::test]
async fn connection_failure_normalizes_to_status_zero() {
    // Nothing listens on this port.
    let client = GatewayClient::new(GatewayConfig::new(Endpoint::explicit(
        "http://127.0.0.1:9",
    )));
    let err = client
        .send_message(&(&ChatRequest::default()).into())
        .await
        .unwrap_err();
    assert_eq!(err.status, 0);
    assert!(err.is_transport());
}

#[tokio::test]
async fn timeout_cancels_the_request_and_reports_status_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "ok" }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = GatewayConfig::new(Endpoint::explicit(&server.uri()))
        .with_timeout(Duration::from_millis(50));
    let err = GatewayClient::new(config).health_check().await.unwrap_err();
    assert_eq!(err.status, 0);
}

#[tokio::test]
async fn flow_reply_carries_the_full_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/policy-flexible"))
        .and(body_json(json!({
            "content": "analyze this",
            "flow_step": "analysis",
            "session_id": "s-1",
            "project_id": "p-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m-2",
            "content": "analysis done",
            "step": "analysis",
            "timestamp": "2024-05-01T12:00:00Z",
            "session_id": "s-1",
            "project_id": "p-1",
            "full_state": {
                "analysis_result": "analysis done",
                "last_updated_step": "analysis",
            },
        })))
        .mount(&server)
        .await;

    let request = ChatRequest {
        content: "analyze this".to_string(),
        search_type: None,
        flow_step: Some(FlowStep::Analysis),
        session_id: Some("s-1".to_string()),
        project_id: Some("p-1".to_string()),
    };
    let reply = client_for(&server).send_flow(&request).await.unwrap();
    assert_eq!(reply.step, "analysis");
    let full_state = reply.full_state.unwrap();
    assert_eq!(full_state.result_for(FlowStep::Analysis), Some("analysis done"));
}

#[tokio::test]
async fn people_ask_tolerates_a_partial_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/people/ask"))
        .and(body_json(json!({
            "question": "who knows tax law",
            "top_k": 5,
            "coworker_id": 0,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "id": 7, "name": "佐藤", "score": 0.8 }],
        })))
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .ask_people("who knows tax law", 5, 0)
        .await
        .unwrap();
    assert_eq!(reply.candidates.len(), 1);
    assert_eq!(reply.candidates[0].id, 7);
    assert_eq!(reply.candidates[0].name, "佐藤");
    assert!(reply.narrative.is_none());
}

#[tokio::test]
async fn coworker_search_omits_empty_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/coworkers/search"))
        .and(query_param("q", "tax"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "田中", "email": "tanaka@example.com" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let coworkers = client_for(&server).search_coworkers("tax", "").await.unwrap();
    assert_eq!(coworkers.len(), 1);
    assert_eq!(coworkers[0].email, "tanaka@example.com");
}

#[tokio::test]
async fn candidate_detail_decodes_the_network_graph() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/detail/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "network": {
                "nodes": [
                    { "id": "hub", "label": "佐藤", "kind": "中心" },
                    { "id": "cw:3", "label": "鈴木" },
                ],
                "edges": [{ "source": "hub", "target": "cw:3" }],
            },
        })))
        .mount(&server)
        .await;

    let detail = client_for(&server).candidate_detail(7).await.unwrap();
    assert_eq!(detail.network.nodes.len(), 2);
    assert_eq!(
        detail.network.center().map(|n| n.label.as_str()),
        Some("佐藤")
    );
    assert!(detail.gbiz_info.is_none());
}

#[tokio::test]
async fn session_listing_and_creation_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "s-1",
                "title": "税制改正",
                "created_at": "2024-05-01T12:00:00Z",
                "updated_at": "2024-05-01T12:05:00Z",
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s-2",
            "title": "新しいチャット",
            "created_at": "2024-05-01T13:00:00Z",
            "updated_at": "2024-05-01T13:00:00Z",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sessions = client.sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].title, "税制改正");

    let created = client.create_session().await.unwrap();
    assert_eq!(created.id, "s-2");
}

#[tokio::test]
async fn coworker_profile_decodes_both_histories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/coworkers/3/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "name": "鈴木",
            "department": "政策企画部",
            "work_history": [{ "period": "2020-2023", "text": "税制調査" }],
            "project_history": [],
        })))
        .mount(&server)
        .await;

    let profile = client_for(&server).coworker_profile(3).await.unwrap();
    assert_eq!(profile.name, "鈴木");
    assert_eq!(profile.work_history.len(), 1);
    assert_eq!(profile.work_history[0].period, "2020-2023");
    assert!(profile.project_history.is_empty());
    assert!(profile.title.is_none());
}

#[tokio::test]
async fn verify_token_swallows_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .mount(&server)
        .await;

    let verdict = client_for(&server).verify_token().await;
    assert!(!verdict.valid);
    assert!(verdict.user.is_none());
}

#[tokio::test]
async fn login_decodes_token_and_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({
            "email": "tanaka@example.com",
            "password": "hunter2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-token",
            "user": { "id": 1, "name": "田中", "email": "tanaka@example.com" },
            "expires_at": "2024-06-01T00:00:00Z",
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .login(&polidraft_gateway::types::LoginRequest {
            email: "tanaka@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.token, "jwt-token");
    assert_eq!(response.user.id, 1);
}

#[tokio::test]
async fn health_check_drives_test_connection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.test_connection().await);

    let dead = GatewayClient::new(GatewayConfig::new(Endpoint::explicit("http://127.0.0.1:9")));
    assert!(!dead.test_connection().await);
}
