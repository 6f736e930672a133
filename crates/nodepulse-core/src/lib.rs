//! View-model layer between `nodepulse-api` and UI shells (CLI / TUI).
//!
//! This crate owns the panel's client-side behavior:
//!
//! - **[`Panel`]** — the view-model. Holds page, busy flag, dark-mode flag,
//!   the logged-in user, and a full-replacement snapshot per collection.
//!   Action handlers each perform one HTTP round trip and reconcile the
//!   reply into state; side effects (page routing, preference persistence)
//!   are explicit setters that fire exactly once, after the state commits.
//! - **[`Snapshot`]** — watch-backed full-replacement cells: the panel
//!   never merges or diffs, every load replaces the whole collection.
//! - **[`StateStore`]** — the persisted client state surface (session
//!   token + dark-mode flag), the sole source of "am I logged in" and
//!   "which theme" at bootstrap.
//! - **[`format`]** — pure display helpers (speed/ping/date rendering and
//!   status-to-tone mapping).

pub mod error;
pub mod format;
pub mod panel;
pub mod session;
pub mod store;

pub use error::CoreError;
pub use format::{Tone, format_date, format_ping, format_speed, node_name, node_status_tone,
    test_status_tone};
pub use panel::{NodeForm, NodeFormMode, Page, Panel};
pub use session::{MemoryStateStore, StateStore};
pub use store::Snapshot;

// Re-export the wire model; the panel state IS the server's last reply.
pub use nodepulse_api::{
    InstallCommand, Node, NodeDraft, NodeStatus, PanelClient, PanelStats, ResultPage,
    ResultsQuery, Settings, SpeedTestRequest, SpeedTestResult, TestKind, TestStatus, TestTicket,
    TlsMode, TransportConfig, User,
};
