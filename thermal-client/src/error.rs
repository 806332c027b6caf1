use thiserror::Error;

use crate::draft::DraftError;

/// Errors raised while talking to the printer API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection, DNS, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The draft could not be turned into a request body.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// A submission was attempted while another print is still running.
    #[error("a print is already in progress")]
    PrintInProgress,
}

impl ClientError {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
