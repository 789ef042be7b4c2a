/// Failure taxonomy for remote content operations.
///
/// Every variant is recoverable: callers keep their navigation state,
/// surface the message, and let the user retry or move elsewhere.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The remote reports the path as absent. Callers render the
    /// empty-but-valid state rather than an error banner.
    #[error("path not found on remote")]
    NotFound,

    /// The stored version token no longer matches the one we sent: another
    /// writer changed the target. Refresh, then retry.
    #[error("version conflict: {0}")]
    Conflict(String),

    /// Any other non-success response from the remote.
    #[error("remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Network failure or timeout in the transport.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
