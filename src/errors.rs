use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Server(ServerError),
    #[error("Unsupported response Content-Type: {0}")]
    UnsupportedContentType(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Error response from an OData service, carrying whatever parts of the
/// error envelope the server supplied.
#[derive(Debug, Clone)]
pub struct ServerError {
    pub status: StatusCode,
    pub code: Option<String>,
    pub message: Option<String>,
    pub detailed_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorEnvelope>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    code: Option<String>,
    message: Option<String>,
    innererror: Option<InnerError>,
}

#[derive(Debug, Deserialize)]
struct InnerError {
    message: Option<String>,
}

impl ServerError {
    /// Builds a `ServerError` from a non-2xx response body. The envelope is
    /// `{"error": {"code", "message", "innererror": {"message"}}}` with every
    /// field optional; non-JSON or malformed bodies yield placeholders only.
    pub fn parse(status: StatusCode, content_type: &str, body: &[u8]) -> Self {
        let mut err = ServerError {
            status,
            code: None,
            message: None,
            detailed_message: None,
        };

        if !content_type.contains("application/json") {
            return err;
        }

        if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
            if let Some(envelope) = parsed.error {
                err.code = envelope.code.filter(|s| !s.is_empty());
                err.message = envelope.message.filter(|s| !s.is_empty());
                err.detailed_message = envelope
                    .innererror
                    .and_then(|inner| inner.message)
                    .filter(|s| !s.is_empty());
            }
        }

        err
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP {} | {} | {} | {}",
            self.status.as_u16(),
            self.code.as_deref().unwrap_or("None"),
            self.message
                .as_deref()
                .unwrap_or("Server did not supply any error messages"),
            self.detailed_message.as_deref().unwrap_or("None"),
        )
    }
}
