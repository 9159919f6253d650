use thiserror::Error;

/// Error taxonomy for the evaluation client.
///
/// Callers can tell "the service answered but the contract broke"
/// (`Schema`) apart from "the service rejected the request" (`Remote`).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad local input: unsupported file type, empty message text, or a
    /// send attempted while another turn is in flight. Never reaches the
    /// network.
    #[error("validation error: {0}")]
    Validation(String),

    /// Network-level failure (unreachable host, connection reset). Not
    /// retried here; retrying is the caller's decision.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the server-provided detail when one
    /// was present, else a generic fallback, and is safe to display as-is.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// A 2xx response whose body does not match the expected shape.
    /// Treated as a defect signal rather than a user-facing rejection.
    #[error("schema error: {0}")]
    Schema(String),
}

impl ApiError {
    /// HTTP status of a remote rejection, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
