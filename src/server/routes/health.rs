//! Health check and version endpoints

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/version", web::get().to(version_info)),
    );
}

/// Basic health check endpoint
///
/// Reports liveness along with the state of the monitoring pipeline and
/// edge services. Used by load balancers.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let monitoring = &state.monitoring;
    let sampling = monitoring.collector().stats();

    let health_status = HealthStatus {
        status: Cow::Borrowed("healthy"),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        uptime_seconds: monitoring.uptime().as_secs(),
        monitoring: MonitoringHealth {
            enabled: monitoring.config().enabled,
            sample_rate: monitoring.collector().sample_rate(),
            sampled: sampling.sampled,
            in_flight: sampling.in_flight,
            stored_metrics: monitoring.metric_count(),
            sweeper_active: state.sweeper.is_active(),
        },
        edge: EdgeHealth {
            enabled: state.edge.config.enabled,
            cached_images: state.edge.cache.len(),
            rate_limited_requests: state.edge.limiter.rejected(),
        },
    };

    ApiResponse::success(health_status).to_http_response()
}

/// Version information endpoint
async fn version_info() -> HttpResponse {
    debug!("Version info requested");

    let version_info = VersionInfo {
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        build_time: Cow::Borrowed(env!("BUILD_TIME")),
        git_hash: Cow::Borrowed(env!("GIT_HASH")),
        rust_version: Cow::Borrowed(env!("RUST_VERSION")),
    };

    ApiResponse::success(version_info).to_http_response()
}

/// Basic health status
#[derive(Debug, Clone, serde::Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
    uptime_seconds: u64,
    monitoring: MonitoringHealth,
    edge: EdgeHealth,
}

#[derive(Debug, Clone, serde::Serialize)]
struct MonitoringHealth {
    enabled: bool,
    sample_rate: f64,
    sampled: u64,
    in_flight: u64,
    stored_metrics: usize,
    sweeper_active: bool,
}

#[derive(Debug, Clone, serde::Serialize)]
struct EdgeHealth {
    enabled: bool,
    cached_images: usize,
    rate_limited_requests: u64,
}

/// Version information
#[derive(Debug, Clone, serde::Serialize)]
struct VersionInfo {
    version: Cow<'static, str>,
    build_time: Cow<'static, str>,
    git_hash: Cow<'static, str>,
    rust_version: Cow<'static, str>,
}
