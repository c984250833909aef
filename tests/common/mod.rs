//! Common test utilities for storefront-monitor
//!
//! - Fixtures for metrics and configuration
//! - Application builders wired to a static probe and mock clock
//! - Custom assertions

pub mod assertions;
pub mod fixtures;

pub use fixtures::{MetricFactory, TestHarness, png_bytes, test_config};
