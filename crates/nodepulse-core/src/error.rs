// ── Core error types ──
//
// User-facing errors from nodepulse-core. Transport and parse failures are
// deliberately collapsed into a single generic variant: the panel never
// leaks wire-level detail to the user, only to the log.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The panel replied with a non-zero envelope code. `message` is the
    /// server text, verbatim — this is what user-initiated actions alert.
    #[error("{message}")]
    Rejected { code: i64, message: String },

    /// Transport or parse failure. The detail lives in the source (and the
    /// log); the displayed message stays generic.
    #[error("request failed, try again later")]
    RequestFailed {
        #[source]
        source: nodepulse_api::Error,
    },

    #[error("validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` when re-authenticating might resolve this error.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// The envelope code, when the panel itself rejected the request.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Rejected { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<nodepulse_api::Error> for CoreError {
    fn from(err: nodepulse_api::Error) -> Self {
        match err {
            nodepulse_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            nodepulse_api::Error::Api { code, message } => CoreError::Rejected { code, message },
            other => CoreError::RequestFailed { source: other },
        }
    }
}
