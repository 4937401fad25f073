use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Malformed fragment at index {index}: {reason}")]
    MalformedFragment { index: usize, reason: String },

    #[error("LLM is not configured, set LLM_BASE_URL and LLM_API_KEY")]
    LlmNotConfigured,

    #[error("LLM request timed out after {0:?}")]
    LlmTimeout(Duration),

    #[error("LLM API error: {status} - {body}")]
    LlmStatus { status: u16, body: String },

    #[error("LLM request failed: {0}")]
    LlmRequest(String),

    #[error("LLM response had an unexpected shape")]
    LlmResponse,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for FormatError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            FormatError::MalformedFragment { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "MALFORMED_FRAGMENT")
            }
            FormatError::LlmNotConfigured => (StatusCode::SERVICE_UNAVAILABLE, "LLM_NOT_CONFIGURED"),
            FormatError::LlmTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "LLM_TIMEOUT"),
            FormatError::LlmStatus { .. }
            | FormatError::LlmRequest(_)
            | FormatError::LlmResponse => (StatusCode::BAD_GATEWAY, "LLM_ERROR"),
            FormatError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            FormatError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}
