use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the marketplace backend
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session expired or not logged in (HTTP 401); run `medmarket login`")]
    Unauthorized,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to connect to server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Map a non-success response to an error. `path` names the resource for 404s.
    pub fn from_status(status: StatusCode, path: &str, body: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound(path.to_string()),
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            _ => Self::Http {
                status: status.as_u16(),
                message: extract_message(body),
            },
        }
    }

    /// 404 means "resource absent" for several endpoints (no hospital, empty cart).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Pull a human-readable message out of a JSON error body, falling back to the raw text.
fn extract_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(msg) = json.get(key).and_then(|v| v.as_str())
                && !msg.is_empty()
            {
                return msg.to_string();
            }
        }
    }
    if body.trim().is_empty() {
        "(empty response)".to_string()
    } else {
        body.trim().to_string()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
