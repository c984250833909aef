//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.

pub mod edge;
pub mod health;
pub mod monitoring;


use actix_web::HttpResponse;

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Additional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: None,
        }
    }

    /// Create a successful response with metadata
    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: Some(meta),
        }
    }

    /// Convert the API response to an HTTP 200 response
    pub fn to_http_response(&self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}

/// Query parameters for history endpoints
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LimitQuery {
    /// Maximum number of items to return
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl LimitQuery {
    /// Upper bound for a single page of history
    pub const MAX: usize = 1000;

    /// Validate the limit
    pub fn validate(&self) -> Result<(), String> {
        if self.limit == 0 {
            return Err("Limit must be greater than 0".to_string());
        }
        if self.limit > Self::MAX {
            return Err(format!("Limit cannot exceed {}", Self::MAX));
        }
        Ok(())
    }
}
