//! HTTP middleware implementations
//!
//! - Metrics sampling into the monitoring system
//! - Sliding-window rate limiting for edge routes
//! - Request ID tracking

mod helpers;
mod metrics;
mod rate_limit;
mod request_id;


pub use helpers::{
    CACHE_HITS_HEADER, CACHE_MISSES_HEADER, REQUEST_ID_HEADER, client_ip, header_count, user_agent,
};
pub use metrics::{MetricsMiddleware, MetricsMiddlewareService};
pub use rate_limit::{RateLimitMiddleware, RateLimitMiddlewareService};
pub use request_id::{RequestIdMiddleware, RequestIdMiddlewareService};
