use plannotator::gateway::{DecisionServer, ServerOptions, ServerPhase};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;

const PLAN: &str = "# Plan: Rate Limiting\n\n1. Add middleware\n2. Add tests\n";

fn test_options() -> ServerOptions {
    ServerOptions {
        shutdown_grace: Duration::from_millis(20),
        obsidian_config: None,
        ..ServerOptions::default()
    }
}

async fn start_server() -> DecisionServer {
    DecisionServer::start(PLAN, test_options())
        .await
        .expect("ephemeral decision server should bind")
}

fn url(server: &DecisionServer, path: &str) -> String {
    format!("{}{path}", server.url())
}

#[tokio::test]
async fn plan_is_served_under_api_and_root() {
    let server = start_server().await;
    let client = reqwest::Client::new();

    for path in ["/api/plan", "/plan"] {
        let response = client.get(url(&server, path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["plan"], PLAN);
    }

    assert_eq!(server.phase(), ServerPhase::AwaitingDecision);
    server.stop().await;
}

#[tokio::test]
async fn unknown_paths_fall_back_to_ui() {
    let server = start_server().await;
    let client = reqwest::Client::new();

    for path in ["/", "/review/123", "/api/nothing-here"] {
        let response = client.get(url(&server, path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/html"), "{path}: {content_type}");
        assert!(response.text().await.unwrap().contains("<html"));
    }

    server.stop().await;
}

#[tokio::test]
async fn first_decision_wins_and_later_requests_are_acknowledged() {
    let server = start_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(url(&server, "/api/deny"))
        .json(&json!({"feedback": "split step 2"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({"ok": true}));

    let late = client
        .post(url(&server, "/api/approve"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(late.status(), StatusCode::OK);
    assert_eq!(late.json::<Value>().await.unwrap(), json!({"ok": true}));

    // The plan stays readable until teardown.
    let plan = client.get(url(&server, "/api/plan")).send().await.unwrap();
    assert_eq!(plan.status(), StatusCode::OK);

    assert_eq!(server.phase(), ServerPhase::Resolved);
    let decision = server.finish().await;
    assert!(!decision.approved);
    assert_eq!(decision.feedback.as_deref(), Some("split step 2"));
}

#[tokio::test]
async fn deny_without_body_uses_default_feedback() {
    let server = start_server().await;
    let client = reqwest::Client::new();

    let response = client.post(url(&server, "/deny")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let decision = server.finish().await;
    assert_eq!(decision.feedback.as_deref(), Some("Plan rejected by user"));
}

#[tokio::test]
async fn port_is_released_after_finish() {
    let server = start_server().await;
    let port = server.port();
    let client = reqwest::Client::new();

    client
        .post(url(&server, "/api/approve"))
        .send()
        .await
        .unwrap();
    assert!(server.finish().await.approved);

    let rebound = tokio::net::TcpListener::bind(("127.0.0.1", port)).await;
    assert!(rebound.is_ok(), "port {port} should be free after stop");
}

#[tokio::test]
async fn vault_listing_is_empty_without_obsidian_config() {
    let server = start_server().await;
    let body: Value = reqwest::get(url(&server, "/api/obsidian/vaults"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"vaults": []}));
    server.stop().await;
}
