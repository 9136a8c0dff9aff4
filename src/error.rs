//! Error types
//!
//! Every library operation returns [`Result`]. The variants follow the
//! failure points of a single round trip: sending, status, decoding.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by resource operations
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or the response could not be received
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API request failed with status {status}: {message}")]
    HttpStatus { status: StatusCode, message: String },

    /// The server reported that the addressed resource does not exist
    #[error("resource not found: {path}")]
    NotFound { path: String },

    /// The response body is not valid JSON or does not have the expected shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] DecodeError),

    /// The request body could not be encoded as JSON
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A request URL could not be built from the configured base URL
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Why a response body could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("response envelope has no `{0}` field")]
    MissingField(&'static str),

    #[error("expected a JSON object envelope holding `{0}`")]
    NotAnObject(&'static str),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(DecodeError::Json(err))
    }
}

impl Error {
    /// Classify a non-success status. 404 becomes [`Error::NotFound`].
    pub fn from_status(status: StatusCode, path: &str, message: String) -> Self {
        if status == StatusCode::NOT_FOUND {
            Error::NotFound {
                path: path.to_string(),
            }
        } else {
            Error::HttpStatus { status, message }
        }
    }

    /// Status code carried by the error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Error::Transport(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}
