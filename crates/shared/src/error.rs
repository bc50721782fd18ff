use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Internal,
}

impl ErrorCode {
    pub fn http_status(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Validation => 422,
            Self::Internal => 500,
        }
    }

    /// Backends that only send a status line still map onto a code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            400 | 422 => Self::Validation,
            _ => Self::Internal,
        }
    }
}

/// Error body for failed task and interview requests. The reference backend
/// sends `{code, message}`; FastAPI-style `{detail}` bodies are read through
/// [`DetailBody`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// `{"detail": "..."}`, the body FastAPI's `HTTPException` produces.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailBody {
    pub detail: String,
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl From<ApiError> for ApiException {
    fn from(value: ApiError) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}

impl ApiException {
    /// Reads either error body shape; `None` when the body is neither.
    pub fn from_body(status: u16, body: &str) -> Option<Self> {
        if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
            return Some(api_error.into());
        }
        let DetailBody { detail } = serde_json::from_str(body).ok()?;
        Some(Self {
            code: ErrorCode::from_http_status(status),
            message: detail,
        })
    }
}
