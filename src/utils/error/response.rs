//! HTTP response handling for errors

use super::types::MonitorError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl MonitorError {
    /// Status code and stable error code for this error
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            MonitorError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            MonitorError::RateLimit(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            MonitorError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            MonitorError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            MonitorError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            MonitorError::Fetch(_) => (StatusCode::INTERNAL_SERVER_ERROR, "FETCH_ERROR"),
            MonitorError::Transform(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TRANSFORM_ERROR"),
            MonitorError::Monitoring(_) => (StatusCode::INTERNAL_SERVER_ERROR, "MONITORING_ERROR"),
            MonitorError::Io(_)
            | MonitorError::Serialization(_)
            | MonitorError::Yaml(_)
            | MonitorError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl ResponseError for MonitorError {
    fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code) = self.classify();

        // Internal details stay in the logs
        let message = match self {
            MonitorError::Io(_) | MonitorError::Serialization(_) | MonitorError::Yaml(_) => {
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
