// Wire types for the panel API.
//
// JSON casing follows the backend exactly: node and speed-test records are
// snake_case, while the stats payload and the speed-test request body are
// camelCase (the panel-side contract). Keep the serde attributes in sync
// with the server rather than "fixing" the inconsistency here.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uniform reply wrapper used by every endpoint.
///
/// `code == 0` is the sole success discriminator; the HTTP status is
/// advisory at best.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

// ── Users / sessions ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

/// `POST /login` success payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginReply {
    pub token: String,
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Nodes ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Online,
    Offline,
    /// Any status the panel doesn't recognize degrades to Unknown.
    #[default]
    #[serde(other)]
    Unknown,
}

impl NodeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }
}

fn zero_load() -> [f64; 3] {
    [0.0; 3]
}

/// A managed node as reported by the panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub ip: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    // Agent-reported system info
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub memory: f64,
    #[serde(default)]
    pub disk: f64,
    #[serde(default)]
    pub uptime: i64,
    #[serde(default = "zero_load")]
    pub load: [f64; 3],
    #[serde(default)]
    pub network_rx: i64,
    #[serde(default)]
    pub network_tx: i64,
    #[serde(default)]
    pub version: String,
}

/// `GET /nodes` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodePage {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub total: u64,
}

/// Request body for `POST /nodes` and `PUT /nodes/{id}`.
///
/// The panel sends the whole form including a possibly-empty `id`; which
/// endpoint receives it is decided by the caller's form mode, never by
/// whether `id` is filled in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeDraft {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub ip: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// `POST /nodes` payload: the assigned id and the agent credential.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeCreated {
    pub id: String,
    #[serde(rename = "secretKey", default)]
    pub secret_key: Option<String>,
}

/// `GET /nodes/{id}/install-command` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallCommand {
    pub command: String,
    #[serde(default)]
    pub node_key: String,
    #[serde(default)]
    pub panel_url: String,
}

// ── Speed tests ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Timeout,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    /// A test that will not change state anymore.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Timeout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Download,
    Upload,
    Ping,
    #[default]
    Full,
}

impl TestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Upload => "upload",
            Self::Ping => "ping",
            Self::Full => "full",
        }
    }
}

/// One measurement between a source and a target node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedTestResult {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    #[serde(rename = "type", default)]
    pub kind: TestKind,
    #[serde(default)]
    pub status: TestStatus,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Milliseconds.
    #[serde(default)]
    pub duration: i64,

    // Measurements (Mbps / ms / percent)
    #[serde(default)]
    pub download_speed: Option<f64>,
    #[serde(default)]
    pub upload_speed: Option<f64>,
    #[serde(default)]
    pub ping: Option<f64>,
    #[serde(default)]
    pub jitter: Option<f64>,
    #[serde(default)]
    pub packet_loss: Option<f64>,

    #[serde(default)]
    pub error_message: String,
}

/// `GET /speedtest/results` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultPage {
    #[serde(default)]
    pub results: Vec<SpeedTestResult>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(rename = "pageSize", default)]
    pub page_size: Option<u32>,
}

/// Query parameters accepted by `GET /speedtest/results`.
#[derive(Debug, Clone, Default)]
pub struct ResultsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub node_id: Option<String>,
}

impl ResultsQuery {
    pub(crate) fn apply(&self, url: &mut url::Url) {
        let mut pairs = url.query_pairs_mut();
        if let Some(page) = self.page {
            pairs.append_pair("page", &page.to_string());
        }
        if let Some(size) = self.page_size {
            pairs.append_pair("pageSize", &size.to_string());
        }
        if let Some(ref node) = self.node_id {
            pairs.append_pair("nodeId", node);
        }
    }
}

/// Request body for `POST /speedtest`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedTestRequest {
    pub source_node_id: String,
    pub target_node_id: String,
    #[serde(rename = "type")]
    pub kind: TestKind,
}

/// `POST /speedtest` payload: the created test's id.
#[derive(Debug, Clone, Deserialize)]
pub struct TestTicket {
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Stats / settings ────────────────────────────────────────────────

/// `GET /stats` payload. Display-only aggregates; the panel never derives
/// any of these itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelStats {
    pub online_nodes: u64,
    pub offline_nodes: u64,
    pub total_nodes: u64,
    pub today_tests: u64,
    pub total_tests: u64,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
}

/// System settings, round-tripped wholesale as a flat string map.
pub type Settings = BTreeMap<String, String>;
