#![allow(clippy::unwrap_used)]
// Integration tests for `PanelClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nodepulse_api::{
    Error, NodeDraft, NodeStatus, PanelClient, ResultsQuery, SpeedTestRequest, TestKind,
    TestStatus,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PanelClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = PanelClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn ok_body(data: serde_json::Value) -> serde_json::Value {
    json!({ "code": 0, "message": "success", "data": data })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn login_success_returns_token_and_user() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "token": "tok-123",
            "user": { "id": "u1", "username": "admin", "role": "admin" }
        }))))
        .mount(&server)
        .await;

    let password: SecretString = "hunter2".to_string().into();
    let reply = client.login("admin", &password).await.unwrap();

    assert_eq!(reply.token, "tok-123");
    assert_eq!(reply.user.username, "admin");
    assert!(!client.has_token(), "login must not install the token itself");
}

#[tokio::test]
async fn login_failure_carries_server_message() {
    let (server, client) = setup().await;

    // The panel reports bad credentials through the envelope with HTTP 200.
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 401, "message": "invalid username or password"
        })))
        .mount(&server)
        .await;

    let password: SecretString = "wrong".to_string().into();
    let result = client.login("admin", &password).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert_eq!(message, "invalid username or password");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn bearer_header_attached_once_token_installed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "id": "u1", "username": "admin", "role": "admin"
        }))))
        .mount(&server)
        .await;

    client.set_token("tok-123".to_string().into());
    let user = client.current_user().await.unwrap();
    assert_eq!(user.id, "u1");
}

#[tokio::test]
async fn bare_http_401_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.current_user().await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

// ── Nodes ───────────────────────────────────────────────────────────

#[tokio::test]
async fn list_nodes_unwraps_the_page() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "nodes": [
                {
                    "id": "n1",
                    "name": "tokyo-1",
                    "ip": "203.0.113.10",
                    "status": "online",
                    "tags": ["asia"],
                    "cpu": 12.5
                },
                {
                    "id": "n2",
                    "name": "fra-1",
                    "ip": "198.51.100.7",
                    "status": "error"
                }
            ],
            "total": 2
        }))))
        .mount(&server)
        .await;

    let page = client.list_nodes().await.unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.nodes[0].name, "tokyo-1");
    assert_eq!(page.nodes[0].status, NodeStatus::Online);
    // Statuses the panel doesn't know degrade to Unknown.
    assert_eq!(page.nodes[1].status, NodeStatus::Unknown);
}

#[tokio::test]
async fn update_node_puts_to_the_id_path() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/nodes/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "id": "n1", "name": "tokyo-1b", "ip": "203.0.113.10"
        }))))
        .mount(&server)
        .await;

    let draft = NodeDraft {
        id: "n1".into(),
        name: "tokyo-1b".into(),
        ip: "203.0.113.10".into(),
        ..NodeDraft::default()
    };
    let node = client.update_node("n1", &draft).await.unwrap();
    assert_eq!(node.name, "tokyo-1b");
}

#[tokio::test]
async fn delete_node_failure_surfaces_envelope_message() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/nodes/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 404, "message": "node not found: ghost"
        })))
        .mount(&server)
        .await;

    match client.delete_node("ghost").await {
        Err(Error::Api { code, ref message }) => {
            assert_eq!(code, 404);
            assert!(message.contains("ghost"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn install_command_returns_the_command_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes/n1/install-command"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "command": "curl -L http://panel/api/install.sh | bash -s -- nk_n1_1 \"tokyo-1\"",
            "node_key": "nk_n1_1",
            "panel_url": "http://panel"
        }))))
        .mount(&server)
        .await;

    let cmd = client.install_command("n1").await.unwrap();
    assert!(cmd.command.starts_with("curl -L"));
    assert_eq!(cmd.node_key, "nk_n1_1");
}

// ── Speed tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn list_results_passes_query_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/speedtest/results"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "10"))
        .and(query_param("nodeId", "n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "results": [{
                "id": "t1",
                "source_node_id": "n1",
                "target_node_id": "n2",
                "type": "full",
                "status": "completed",
                "download_speed": 812.4,
                "upload_speed": 740.0,
                "ping": 3.2
            }],
            "total": 11,
            "page": 2,
            "pageSize": 10
        }))))
        .mount(&server)
        .await;

    let query = ResultsQuery {
        page: Some(2),
        page_size: Some(10),
        node_id: Some("n1".into()),
    };
    let page = client.list_results(&query).await.unwrap();

    assert_eq!(page.total, 11);
    assert_eq!(page.results[0].status, TestStatus::Completed);
    assert_eq!(page.results[0].download_speed, Some(812.4));
}

#[tokio::test]
async fn start_test_serializes_camel_case_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/speedtest"))
        .and(wiremock::matchers::body_json(json!({
            "sourceNodeId": "n1",
            "targetNodeId": "n2",
            "type": "ping"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "id": "t9", "message": "test queued"
        }))))
        .mount(&server)
        .await;

    let ticket = client
        .start_test(&SpeedTestRequest {
            source_node_id: "n1".into(),
            target_node_id: "n2".into(),
            kind: TestKind::Ping,
        })
        .await
        .unwrap();

    assert_eq!(ticket.id, "t9");
}

// ── Settings ────────────────────────────────────────────────────────

#[tokio::test]
async fn settings_round_trip() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "listen_port": "8080",
            "node_timeout": "60"
        }))))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0, "message": "success"
        })))
        .mount(&server)
        .await;

    let mut settings = client.get_settings().await.unwrap();
    assert_eq!(settings.get("listen_port").map(String::as_str), Some("8080"));

    settings.insert("node_timeout".into(), "90".into());
    client.update_settings(&settings).await.unwrap();
}

// ── Error shapes ────────────────────────────────────────────────────

#[tokio::test]
async fn non_json_error_body_maps_to_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    match client.stats().await {
        Err(Error::Http { status, .. }) => assert_eq!(status, 502),
        other => panic!("expected Http error, got: {other:?}"),
    }
}
