//! Helper functions for middleware

use actix_web::dev::ServiceRequest;
use actix_web::http::header::{self, HeaderMap};
use std::net::SocketAddr;

/// Response header a handler uses to report cache hits
pub const CACHE_HITS_HEADER: &str = "x-cache-hits";
/// Response header a handler uses to report cache misses
pub const CACHE_MISSES_HEADER: &str = "x-cache-misses";
/// Request and response header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Parse a numeric header, 0 when missing or unparsable
pub fn header_count(headers: &HeaderMap, name: &str) -> u64 {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// User agent of the request, empty when absent
pub fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Client address without the port, honouring `Forwarded` and `X-Forwarded-For`
pub fn client_ip(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    let addr = info.realip_remote_addr().unwrap_or("unknown");
    addr.parse::<SocketAddr>()
        .map(|sock| sock.ip().to_string())
        .unwrap_or_else(|_| addr.to_string())
}
