#![allow(clippy::unwrap_used)]
// View-model behavior tests against a mocked panel backend.
//
// These exercise the handler contract end to end: state is replaced exactly
// once on success, left untouched on failure, and the busy flag is false
// after every outcome.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nodepulse_core::{
    MemoryStateStore, NodeDraft, NodeFormMode, Page, Panel, PanelClient, SpeedTestRequest,
    StateStore, TestKind,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Panel, Arc<MemoryStateStore>) {
    setup_with_store(MemoryStateStore::new()).await
}

async fn setup_with_store(store: MemoryStateStore) -> (MockServer, Panel, Arc<MemoryStateStore>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = PanelClient::with_client(reqwest::Client::new(), base_url);
    let store = Arc::new(store);
    let panel = Panel::with_reload_delay(client, Arc::clone(&store), Duration::from_millis(50));
    (server, panel, store)
}

fn ok_body(data: serde_json::Value) -> serde_json::Value {
    json!({ "code": 0, "message": "success", "data": data })
}

fn fail_body(code: i64, message: &str) -> serde_json::Value {
    json!({ "code": code, "message": message })
}

/// Mount the three dashboard collections with simple fixtures.
async fn mount_dashboard(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "onlineNodes": 2, "offlineNodes": 1, "totalNodes": 3,
            "todayTests": 5, "totalTests": 40,
            "cpuUsage": 30.0, "memoryUsage": 40.0, "diskUsage": 50.0
        }))))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "nodes": [
                { "id": "n1", "name": "tokyo-1", "ip": "203.0.113.10", "status": "online" },
                { "id": "n2", "name": "fra-1", "ip": "198.51.100.7", "status": "offline" }
            ],
            "total": 2
        }))))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/speedtest/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "results": [{
                "id": "t1", "source_node_id": "n1", "target_node_id": "n2",
                "type": "full", "status": "completed",
                "download_speed": 812.4, "ping": 3.2
            }],
            "total": 1
        }))))
        .mount(server)
        .await;
}

// ── Login / logout ──────────────────────────────────────────────────

#[tokio::test]
async fn login_success_persists_token_and_opens_dashboard() {
    let (server, panel, store) = setup().await;
    mount_dashboard(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "token": "tok-1",
            "user": { "id": "u1", "username": "admin", "role": "admin" }
        }))))
        .mount(&server)
        .await;

    let password: SecretString = "hunter2".to_string().into();
    panel.login("admin", &password).await.unwrap();

    assert!(store.has_token(), "token must be persisted");
    assert!(panel.is_logged_in());
    assert_eq!(panel.current_page(), Page::Dashboard);
    assert_eq!(panel.nodes_snapshot().len(), 2);
    assert_eq!(panel.results_snapshot().len(), 1);
    assert_eq!(panel.stats_snapshot().total_nodes, 3);
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn login_failure_sets_form_error_and_stays_on_login() {
    let (server, panel, store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fail_body(401, "invalid username or password")),
        )
        .mount(&server)
        .await;

    let password: SecretString = "wrong".to_string().into();
    let result = panel.login("admin", &password).await;

    assert!(result.is_err());
    assert!(!store.has_token(), "no token may be persisted");
    assert!(!panel.is_logged_in());
    assert_eq!(panel.current_page(), Page::Login);
    assert_eq!(
        panel.login_error().borrow().as_deref(),
        Some("invalid username or password")
    );
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn logout_clears_session_and_routes_to_login() {
    let (server, panel, store) = setup().await;
    mount_dashboard(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "token": "tok-1",
            "user": { "id": "u1", "username": "admin", "role": "admin" }
        }))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "message": "ok" })))
        .mount(&server)
        .await;

    let password: SecretString = "hunter2".to_string().into();
    panel.login("admin", &password).await.unwrap();
    panel.logout().await.unwrap();

    assert!(!store.has_token());
    assert!(!panel.is_logged_in());
    assert_eq!(panel.current_page(), Page::Login);
    assert!(!panel.is_busy());
}

// ── Bootstrap ───────────────────────────────────────────────────────

#[tokio::test]
async fn bootstrap_restores_a_valid_session() {
    let (server, panel, _store) = setup_with_store(MemoryStateStore::with_token("tok-1")).await;
    mount_dashboard(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "id": "u1", "username": "admin", "role": "admin"
        }))))
        .mount(&server)
        .await;

    assert!(panel.bootstrap().await);
    assert!(panel.is_logged_in());
    assert_eq!(panel.current_page(), Page::Dashboard);
    assert_eq!(panel.nodes_snapshot().len(), 2);
}

#[tokio::test]
async fn bootstrap_discards_an_expired_token_silently() {
    let (server, panel, store) = setup_with_store(MemoryStateStore::with_token("stale")).await;

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fail_body(401, "token expired")))
        .mount(&server)
        .await;

    assert!(!panel.bootstrap().await);
    assert!(!store.has_token(), "stale token must be removed");
    assert!(!panel.is_logged_in());
    assert_eq!(panel.current_page(), Page::Login);
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn bootstrap_without_a_token_is_a_no_op() {
    let (_server, panel, _store) = setup().await;
    assert!(!panel.bootstrap().await);
    assert!(!panel.is_logged_in());
}

// ── Load handlers ───────────────────────────────────────────────────

#[tokio::test]
async fn load_nodes_replaces_the_snapshot_and_is_idempotent() {
    let (server, panel, _store) = setup().await;
    mount_dashboard(&server).await;

    panel.load_nodes().await.unwrap();
    let first = panel.nodes_snapshot();
    assert_eq!(first.len(), 2);

    // Unchanged backend: a second load yields identical state.
    panel.load_nodes().await.unwrap();
    let second = panel.nodes_snapshot();
    assert_eq!(first.len(), second.len());
    assert_eq!(first[0].id, second[0].id);
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn rejected_load_leaves_previous_snapshot_untouched() {
    let (server, panel, _store) = setup().await;

    let seed = Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "nodes": [{ "id": "n1", "name": "tokyo-1", "ip": "203.0.113.10" }],
            "total": 1
        }))))
        .expect(1)
        .mount_as_scoped(&server)
        .await;

    panel.load_nodes().await.unwrap();
    assert_eq!(panel.nodes_snapshot().len(), 1);
    drop(seed);

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fail_body(500, "db locked")))
        .mount(&server)
        .await;

    let result = panel.load_nodes().await;
    assert!(result.is_err());
    assert_eq!(panel.nodes_snapshot().len(), 1, "snapshot must be unchanged");
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn transport_failure_leaves_state_untouched_and_busy_clear() {
    let (server, panel, _store) = setup().await;

    // Stop the server: every request now fails at the transport layer.
    drop(server);

    let result = panel.load_nodes().await;
    assert!(result.is_err());
    assert!(panel.nodes_snapshot().is_empty());
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn goto_absorbs_load_failures() {
    let (server, panel, _store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fail_body(500, "boom")))
        .mount(&server)
        .await;

    // Passive navigation: the page switches, the failure is swallowed.
    panel.goto(Page::Nodes).await;
    assert_eq!(panel.current_page(), Page::Nodes);
    assert!(panel.nodes_snapshot().is_empty());
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn dashboard_skips_rejected_stats_but_still_cascades() {
    let (server, panel, _store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fail_body(500, "stats broken")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "nodes": [{ "id": "n1", "name": "tokyo-1", "ip": "203.0.113.10" }],
            "total": 1
        }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/speedtest/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "results": [], "total": 0
        }))))
        .mount(&server)
        .await;

    panel.load_dashboard().await.unwrap();
    assert_eq!(panel.stats_snapshot().total_nodes, 0, "stats stay at default");
    assert_eq!(panel.nodes_snapshot().len(), 1, "cascade still ran");
}

// ── Node form routing ───────────────────────────────────────────────

#[tokio::test]
async fn edit_mode_puts_and_add_mode_posts_regardless_of_id() {
    let (server, panel, _store) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/nodes/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "id": "n1", "name": "tokyo-1b", "ip": "203.0.113.10"
        }))))
        .expect(1)
        .mount(&server)
        .await;
    // An Add-mode draft still carrying an id must POST, not PUT.
    Mock::given(method("POST"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "id": "n9", "secretKey": "sk_n9_1"
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "nodes": [], "total": 0
        }))))
        .mount(&server)
        .await;

    let draft = NodeDraft {
        id: "n1".into(),
        name: "tokyo-1b".into(),
        ip: "203.0.113.10".into(),
        ..NodeDraft::default()
    };

    panel.submit_node(NodeFormMode::Edit, &draft).await.unwrap();
    panel.submit_node(NodeFormMode::Add, &draft).await.unwrap();
    // Mock expectations verify the method/URL selection on drop.
}

#[tokio::test]
async fn failed_save_keeps_the_form_open() {
    let (server, panel, _store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fail_body(400, "name required")))
        .mount(&server)
        .await;

    panel.open_add_node_form();
    panel.update_node_form(|draft| draft.ip = "203.0.113.99".into());

    let result = panel.save_node().await;
    assert!(result.is_err());
    assert!(panel.node_form().borrow().is_some(), "form stays open");
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn successful_save_closes_the_form_and_reloads() {
    let (server, panel, _store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "id": "n9", "secretKey": "sk_n9_1"
        }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "nodes": [{ "id": "n9", "name": "new-node", "ip": "203.0.113.50" }],
            "total": 1
        }))))
        .expect(1)
        .mount(&server)
        .await;

    panel.open_add_node_form();
    panel.update_node_form(|draft| {
        draft.name = "new-node".into();
        draft.ip = "203.0.113.50".into();
    });

    panel.save_node().await.unwrap();
    assert!(panel.node_form().borrow().is_none(), "form closed");
    assert_eq!(panel.nodes_snapshot().len(), 1, "list reloaded");
}

// ── Speed tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn start_test_closes_form_and_reloads_results_after_delay() {
    let (server, panel, _store) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/speedtest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "id": "t9", "message": "test queued"
        }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/speedtest/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "results": [{
                "id": "t9", "source_node_id": "n1", "target_node_id": "n2",
                "type": "ping", "status": "pending"
            }],
            "total": 1
        }))))
        .mount(&server)
        .await;

    let ticket = panel
        .start_test(SpeedTestRequest {
            source_node_id: "n1".into(),
            target_node_id: "n2".into(),
            kind: TestKind::Ping,
        })
        .await
        .unwrap();
    assert_eq!(ticket.id, "t9");
    assert!(panel.results_snapshot().is_empty(), "reload is deferred");

    // The deferred reload fires after the configured delay (50ms in tests).
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(panel.results_snapshot().len(), 1);
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn speedtest_form_prefills_first_two_nodes() {
    let (server, panel, _store) = setup().await;
    mount_dashboard(&server).await;
    panel.load_nodes().await.unwrap();

    panel.open_speedtest_form();
    let form = panel.speedtest_form().borrow().clone().unwrap();
    assert_eq!(form.source_node_id, "n1");
    assert_eq!(form.target_node_id, "n2");
    assert_eq!(form.kind, TestKind::Full);
}

// ── Settings ────────────────────────────────────────────────────────

#[tokio::test]
async fn save_settings_puts_the_edited_copy_wholesale() {
    let (server, panel, _store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "listen_port": "8080", "node_timeout": "60"
        }))))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/settings"))
        .and(wiremock::matchers::body_json(json!({
            "listen_port": "8080", "node_timeout": "90"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    panel.load_settings().await.unwrap();
    panel.set_setting("node_timeout", "90");
    panel.save_settings().await.unwrap();

    assert_eq!(
        panel.settings_snapshot().get("node_timeout").map(String::as_str),
        Some("90"),
        "canonical settings become the edited copy"
    );
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn rejected_settings_save_keeps_canonical_map() {
    let (server, panel, _store) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "listen_port": "8080"
        }))))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fail_body(400, "invalid port")))
        .mount(&server)
        .await;

    panel.load_settings().await.unwrap();
    panel.set_setting("listen_port", "99999");

    assert!(panel.save_settings().await.is_err());
    assert_eq!(
        panel.settings_snapshot().get("listen_port").map(String::as_str),
        Some("8080"),
        "canonical settings unchanged on rejection"
    );
}

// ── Dark mode ───────────────────────────────────────────────────────

#[tokio::test]
async fn dark_mode_toggle_persists_and_notifies_once() {
    let (_server, panel, store) = setup().await;
    let mut theme = panel.dark_mode();
    assert!(!*theme.borrow_and_update());

    panel.set_dark_mode(true);
    theme.changed().await.unwrap();
    assert!(*theme.borrow_and_update());
    assert!(!theme.has_changed().unwrap(), "exactly one notification");
    assert!(store.load_dark_mode(), "preference persisted");
}

#[tokio::test]
async fn dark_mode_preference_survives_into_a_new_panel() {
    let store = MemoryStateStore::new();
    store.save_dark_mode(true);
    let (_server, panel, _store) = setup_with_store(store).await;
    assert!(panel.is_dark_mode());
}
