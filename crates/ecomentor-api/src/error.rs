use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status of a server-reported error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        match self {
            ApiError::Http(e) => !e.is_decode() && e.status().is_none(),
            _ => false,
        }
    }

    /// The `detail` string of a FastAPI-style error body, if present.
    pub fn detail(&self) -> Option<String> {
        let ApiError::Server { body, .. } = self else {
            return None;
        };
        let json: Value = serde_json::from_str(body).ok()?;
        json.get("detail")?.as_str().map(str::to_string)
    }
}
