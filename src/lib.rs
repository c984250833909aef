//! # storefront-monitor
//!
//! In-process performance monitoring for a storefront web server.
//!
//! ## Features
//!
//! - **Sampled request metrics**: response time, memory and CPU per request
//! - **Route statistics**: running count, error count and average latency per route
//! - **Threshold alerts**: response time, memory, error rate and CPU with a global cooldown
//! - **Edge services**: TTL cache, sliding-window rate limiter and an image optimizer
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use storefront_monitor::{Config, server::HttpServer};
//!
//! #[actix_web::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/storefront.yaml").await?;
//!     HttpServer::new(&config)?.start().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Recording directly
//!
//! ```rust
//! use storefront_monitor::config::MonitoringConfig;
//! use storefront_monitor::monitoring::MonitoringSystem;
//!
//! let config = MonitoringConfig { sample_rate: 1.0, ..Default::default() };
//! let monitoring = MonitoringSystem::new(&config);
//!
//! if let Some(span) = monitoring.begin_request("GET", "/inventory/{id}") {
//!     monitoring.complete_request(span, 200, 1, 0).unwrap();
//! }
//! assert_eq!(monitoring.metric_count(), 1);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod edge;
pub mod monitoring;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use edge::EdgeServices;
pub use monitoring::MonitoringSystem;
pub use utils::error::{MonitorError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
