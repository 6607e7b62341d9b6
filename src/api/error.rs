use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::{json, Value};
use std::fmt;

use crate::core::error::DocumentError;

/// Boundary error: the HTTP status plus the JSON body returned to callers.
/// Structured upstream failures keep their status, code and details;
/// everything else collapses to a message.
#[derive(Debug)]
pub struct ApiError {
    message: String,
    status_code: StatusCode,
    code: Option<String>,
    details: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: StatusCode) -> Self {
        ApiError {
            message: message.into(),
            status_code,
            code: None,
            details: None,
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "message": self.message,
            "status": self.status_code.as_u16()
        });
        if let Some(code) = &self.code {
            body["code"] = json!(code);
        }
        if let Some(details) = &self.details {
            body["details"] = details.clone();
        }
        HttpResponse::build(self.status_code).json(body)
    }

    fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Validation(message) => ApiError::bad_request(message),
            DocumentError::StructuredUpstream {
                status_code,
                code,
                message,
                details,
            } => ApiError {
                message,
                status_code: StatusCode::from_u16(status_code)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                code,
                details: Some(details),
            },
            DocumentError::GenericUpstream(message) => ApiError::internal_server_error(message),
            DocumentError::Transport(err) => ApiError::internal_server_error(err.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
