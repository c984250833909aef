//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, ServerConfig};
use crate::server::middleware::{MetricsMiddleware, RateLimitMiddleware, RequestIdMiddleware};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{MonitorError, Result};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{Compress, DefaultHeaders, Logger},
    web,
};
use tracing::info;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");
        let state = AppState::new(config.clone())?;
        Ok(Self::with_state(state))
    }

    /// Create a server around prebuilt state
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config.server().clone(),
            state,
        }
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let monitoring = state.monitoring.clone();
        let limiter = state.edge.limiter.clone();
        let edge_enabled = state.edge.config.enabled;

        App::new()
            .app_data(state)
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                MonitorError::bad_request(err.to_string()).into()
            }))
            .wrap(MetricsMiddleware::new(monitoring))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", "storefront-monitor")))
            .configure(routes::health::configure_routes)
            .configure(routes::monitoring::configure_routes)
            .configure(move |cfg| {
                if edge_enabled {
                    cfg.service(
                        web::scope("/edge")
                            .wrap(Compress::default())
                            .wrap(RateLimitMiddleware::new(limiter))
                            .configure(routes::edge::configure_routes),
                    );
                }
            })
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let port = self.config.port;

        info!("Starting HTTP server on {}", bind_addr);

        let sweeper = self.state.sweeper.clone();
        sweeper.start();

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(self.config.worker_count())
            .shutdown_timeout(self.config.shutdown_timeout)
            .disable_signals()
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .run();

        let handle = server.handle();
        tokio::spawn(async move {
            Self::shutdown_signal().await;
            handle.stop(true).await;
        });

        info!("HTTP server listening on {}", bind_addr);

        let result = server
            .await
            .map_err(|e| MonitorError::server(format!("Server error: {}", e)));

        sweeper.stop();
        info!("HTTP server stopped");
        result
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
