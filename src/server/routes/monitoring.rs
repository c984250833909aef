//! Monitoring endpoints
//!
//! Read-only views over the in-memory metrics pipeline.

use crate::monitoring::RouteStat;
use crate::server::routes::{ApiResponse, LimitQuery};
use crate::server::state::AppState;
use crate::utils::error::{MonitorError, Result};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Configure monitoring routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/_monitoring")
            .route("/performance", web::get().to(performance_report))
            .route("/routes", web::get().to(route_table))
            .route("/alerts", web::get().to(recent_alerts)),
    );
}

/// Query parameters for the performance report
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    /// Trailing window in seconds
    pub window: Option<u64>,
}

/// Performance report over a trailing window
async fn performance_report(
    state: web::Data<AppState>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let monitoring = &state.monitoring;
    let window = match query.window {
        Some(0) => return Err(MonitorError::bad_request("Window must be greater than 0")),
        Some(secs) => Duration::from_secs(secs),
        None => monitoring.config().report_window(),
    };

    debug!(window_secs = window.as_secs(), "Performance report requested");

    let report = monitoring.report(window);
    Ok(ApiResponse::success(report).to_http_response())
}

/// One row of the route table
#[derive(Debug, Clone, Serialize)]
struct RouteRow {
    route: String,
    #[serde(flatten)]
    stat: RouteStat,
}

#[derive(Debug, Clone, Serialize)]
struct RouteTable {
    total_requests: u64,
    total_errors: u64,
    error_rate: f64,
    routes: Vec<RouteRow>,
}

/// Per-route statistics, slowest first
async fn route_table(state: web::Data<AppState>) -> HttpResponse {
    let aggregator = state.monitoring.routes();
    let (total_requests, total_errors) = aggregator.totals();

    let routes = aggregator
        .slowest(usize::MAX)
        .into_iter()
        .map(|(route, stat)| RouteRow { route, stat })
        .collect();

    let table = RouteTable {
        total_requests,
        total_errors,
        error_rate: aggregator.error_rate(),
        routes,
    };

    ApiResponse::success(table).to_http_response()
}

/// Recent alerts, newest first
async fn recent_alerts(
    state: web::Data<AppState>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse> {
    query.validate().map_err(MonitorError::bad_request)?;

    let alerts = state.monitoring.alert_history(query.limit);
    let stats = state.monitoring.alerts().stats();

    Ok(ApiResponse::success_with_meta(
        alerts,
        serde_json::json!({
            "emitted": stats.emitted,
            "suppressed": stats.suppressed,
            "cooldown_secs": state.monitoring.alerts().config().cooldown_secs,
        }),
    )
    .to_http_response())
}
