// nodepulse-api: Async Rust client for the speed-test panel HTTP API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod auth;
mod nodes;
mod settings;
mod speedtest;

pub use client::PanelClient;
pub use error::Error;
pub use models::{
    Envelope, InstallCommand, LoginReply, Node, NodeCreated, NodeDraft, NodePage, NodeStatus,
    PanelStats, ResultPage, ResultsQuery, Settings, SpeedTestRequest, SpeedTestResult, TestKind,
    TestStatus, TestTicket, User,
};
pub use transport::{TlsMode, TransportConfig};
