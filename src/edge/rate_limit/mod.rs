//! Sliding-window rate limiting for edge endpoints

mod limiter;
mod store;

pub use limiter::{EdgeRateLimiter, RateLimitDecision};
pub use store::{InMemoryRequestLog, RequestLog, WindowState};
