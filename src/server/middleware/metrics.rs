//! Metrics middleware for request monitoring

use super::helpers::{CACHE_HITS_HEADER, CACHE_MISSES_HEADER, header_count};
use crate::monitoring::MonitoringSystem;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use tracing::warn;

/// Samples requests into the monitoring system
///
/// Instrumentation never alters the response: recording failures are
/// logged and the inner result is returned as-is.
#[derive(Clone)]
pub struct MetricsMiddleware {
    monitoring: MonitoringSystem,
}

impl MetricsMiddleware {
    pub fn new(monitoring: MonitoringSystem) -> Self {
        Self { monitoring }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service,
            monitoring: self.monitoring.clone(),
        }))
    }
}

/// Service implementation for metrics middleware
pub struct MetricsMiddlewareService<S> {
    service: S,
    monitoring: MonitoringSystem,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().to_string();
        let route = req
            .match_pattern()
            .unwrap_or_else(|| req.path().to_string());

        let span = self.monitoring.begin_request(&method, &route);
        let monitoring = self.monitoring.clone();
        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            // A cancelled future drops the span and records nothing
            if let Some(span) = span {
                let (status, hits, misses) = match &result {
                    Ok(res) => (
                        res.status(),
                        header_count(res.headers(), CACHE_HITS_HEADER),
                        header_count(res.headers(), CACHE_MISSES_HEADER),
                    ),
                    Err(err) => (err.as_response_error().status_code(), 0, 0),
                };

                if let Err(e) = monitoring.complete_request(span, status.as_u16(), hits, misses) {
                    warn!(error = %e, %method, %route, "Failed to record request metric");
                }
            }

            result
        })
    }
}
