//! Edge image endpoint
//!
//! Mounted under the `/edge` scope, behind the rate limiter and response
//! compression.

use crate::edge::image::{ImageQuery, ImageRequest};
use crate::edge::{CacheStatus, fingerprint};
use crate::server::middleware::{CACHE_HITS_HEADER, CACHE_MISSES_HEADER, user_agent};
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::http::header::{self, CacheControl, CacheDirective};
use actix_web::{HttpRequest, HttpResponse, web};
use std::time::Duration;
use tracing::debug;

/// Reports whether the edge cache served the response
pub const EDGE_CACHE_HEADER: &str = "x-edge-cache";

/// Configure edge routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/image", web::get().to(optimize_image));
}

/// `GET /edge/image?url=&w=&h=&f=&q=`
async fn optimize_image(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ImageQuery>,
) -> Result<HttpResponse> {
    let images = &state.edge.images;
    let accept = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok());

    let request = ImageRequest::from_query(query.into_inner(), accept, images.config())?;
    let cache_key = fingerprint::request(
        req.path(),
        req.query_string(),
        &request.cache_params(),
        &user_agent(req.headers()),
    );

    let (image, status) = images.serve(&request, &cache_key).await?;
    debug!(
        url = %request.url,
        format = %image.format,
        cache = %status,
        "Served edge image"
    );

    let (hits, misses) = match status {
        CacheStatus::Hit => (1u64, 0u64),
        CacheStatus::Miss => (0, 1),
    };

    Ok(HttpResponse::Ok()
        .content_type(image.content_type())
        .insert_header((EDGE_CACHE_HEADER, status.as_str()))
        .insert_header((header::VARY, "Accept, Accept-Encoding"))
        .insert_header(CacheControl(vec![
            CacheDirective::Public,
            CacheDirective::MaxAge(max_age_secs(images.ttl())),
        ]))
        .insert_header((CACHE_HITS_HEADER, hits))
        .insert_header((CACHE_MISSES_HEADER, misses))
        .body(image.bytes))
}

/// `max-age` for a cache TTL, saturating at `u32::MAX`
fn max_age_secs(ttl: Duration) -> u32 {
    u32::try_from(ttl.as_secs()).unwrap_or(u32::MAX)
}
