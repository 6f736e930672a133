use thiserror::Error;

/// Top-level error type for the `nodepulse-api` crate.
///
/// Covers transport failures, envelope-level failures (`code != 0`), and
/// payloads that fail to parse. `nodepulse-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected, token expired, or no token where one is needed.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Panel API ───────────────────────────────────────────────────
    /// The reply envelope carried a non-zero `code`.
    /// `message` is the server-provided text, verbatim.
    #[error("panel error (code {code}): {message}")]
    Api { code: i64, message: String },

    /// Non-2xx reply with no parseable envelope.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the session is not (or no longer)
    /// authenticated and re-login might resolve it.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The server-provided failure message, when the failure came from the
    /// reply envelope rather than the transport.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Authentication { message } => Some(message),
            _ => None,
        }
    }
}
