//! Rate limiting middleware

use super::helpers::{client_ip, user_agent};
use crate::edge::{EdgeRateLimiter, fingerprint};
use crate::utils::error::MonitorError;
use actix_web::ResponseError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{self, HeaderName, HeaderValue};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Rejects clients that exceed the sliding-window limit with 429
///
/// Clients are identified by a fingerprint of address and user agent. If
/// the request log fails, the request is let through.
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<EdgeRateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<EdgeRateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

/// Service implementation for rate limit middleware
pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<EdgeRateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = fingerprint::client(&client_ip(&req), &user_agent(req.headers()));
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();

        Box::pin(async move {
            let decision = match limiter.check(&client).await {
                Ok(decision) => decision,
                Err(e) => {
                    warn!(error = %e, "Rate limit check failed, allowing request");
                    return service.call(req).await.map(ServiceResponse::map_into_left_body);
                }
            };

            if !decision.allowed {
                let retry_after = decision.retry_after_secs.unwrap_or(1);
                debug!(path = %req.path(), retry_after, "Rejecting rate limited request");

                let mut response = MonitorError::rate_limit(format!(
                    "{} requests per {}s exceeded, retry after {}s",
                    decision.limit,
                    limiter.config().window_secs,
                    retry_after
                ))
                .error_response();
                let headers = response.headers_mut();
                headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
                headers.insert(LIMIT_HEADER, HeaderValue::from(decision.limit));
                headers.insert(REMAINING_HEADER, HeaderValue::from(0u32));

                let (req, _) = req.into_parts();
                return Ok(ServiceResponse::new(req, response).map_into_right_body());
            }

            let mut res = service.call(req).await?;
            let headers = res.headers_mut();
            headers.insert(LIMIT_HEADER, HeaderValue::from(decision.limit));
            headers.insert(REMAINING_HEADER, HeaderValue::from(decision.remaining));
            Ok(res.map_into_left_body())
        })
    }
}
