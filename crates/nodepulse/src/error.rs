//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help.

use miette::Diagnostic;
use thiserror::Error;

use nodepulse_core::CoreError;

/// Exit codes used by the binary.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(
        code(nodepulse::not_logged_in),
        help("Log in first: nodepulse login")
    )]
    NotLoggedIn,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(nodepulse::auth_failed),
        help("Check your username and password, then retry: nodepulse login")
    )]
    AuthFailed { message: String },

    // ── Panel replies ────────────────────────────────────────────────
    #[error("The panel rejected the request: {message}")]
    #[diagnostic(code(nodepulse::rejected))]
    Rejected { code: i64, message: String },

    #[error("Request failed, try again later")]
    #[diagnostic(
        code(nodepulse::request_failed),
        help("Check that the panel is reachable. Increase verbosity (-vv) for transport detail.")
    )]
    RequestFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No panel URL configured")]
    #[diagnostic(
        code(nodepulse::no_panel),
        help(
            "Pass --panel <URL>, set NODEPULSE_PANEL, or add `panel = \"http://...\"`\n\
             to the config file (see: nodepulse config path)."
        )
    )]
    NoPanelUrl,

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nodepulse::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(nodepulse::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Prompt failed: {0}")]
    #[diagnostic(code(nodepulse::prompt))]
    Prompt(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotLoggedIn | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Rejected { code: 404, .. } => exit_code::NOT_FOUND,
            Self::RequestFailed { .. } => exit_code::CONNECTION,
            Self::Validation { .. } | Self::NoPanelUrl | Self::Config { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Rejected { code, message } => CliError::Rejected { code, message },
            CoreError::RequestFailed { source } => CliError::RequestFailed {
                source: Box::new(source),
            },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::Internal(message) => CliError::Config { message },
        }
    }
}

impl From<nodepulse_config::ConfigError> for CliError {
    fn from(err: nodepulse_config::ConfigError) -> Self {
        match err {
            nodepulse_config::ConfigError::NoPanelUrl => CliError::NoPanelUrl,
            nodepulse_config::ConfigError::Validation { field, reason } => {
                CliError::Validation { field, reason }
            }
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
