use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use precis_common::PrecisError;
use precis_core::SummarizeError;
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidConfig(#[from] SummarizeError),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("LLM failed: {0}")]
    Llm(String),

    #[error("Upstream timeout")]
    Timeout,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) | ServerError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            ServerError::Fetch(_) | ServerError::Llm(_) => StatusCode::BAD_GATEWAY,
            ServerError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::InvalidConfig(_) => "INVALID_CONFIG",
            ServerError::Fetch(_) => "FETCH_ERROR",
            ServerError::Llm(_) => "LLM_ERROR",
            ServerError::Timeout => "UPSTREAM_TIMEOUT",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "server.request.failed");
        } else {
            tracing::debug!(%status, error = %self, "server.request.rejected");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<PrecisError> for ServerError {
    fn from(err: PrecisError) -> Self {
        match err {
            PrecisError::Llm(msg) => ServerError::Llm(msg),
            PrecisError::Fetch(e) => ServerError::Fetch(format!("{e:#}")),
            PrecisError::Config(msg) => ServerError::Internal(msg),
            PrecisError::Timeout => ServerError::Timeout,
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Internal(format!("JSON encode error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ServerError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        let invalid = SummarizeError::InvalidConfig {
            field: "abstract_size",
            value: -1,
        };
        assert_eq!(
            ServerError::from(invalid).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(PrecisError::Llm("quota".into())).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ServerError::from(std::io::Error::other("disk full")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ServerError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }
}
