use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrsearchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("TestRail API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Server answered HTTP {status} without a TestRail error: {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("Malformed response from '{uri}': {reason}")]
    MalformedResponse { uri: String, reason: String },

    #[error("Nothing to select: no {0} available")]
    NothingToSelect(&'static str),

    #[error("An unexpected error occurred: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl TrsearchError {
    /// Whether retrying with a different server address might help. Covers
    /// unreachable hosts and hosts that answer with something other than the
    /// TestRail API, such as an HTML page.
    pub fn is_server_problem(&self) -> bool {
        matches!(
            self,
            TrsearchError::Http(_)
                | TrsearchError::InvalidServerUrl { .. }
                | TrsearchError::UnexpectedResponse { .. }
                | TrsearchError::MalformedResponse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TrsearchError>;
