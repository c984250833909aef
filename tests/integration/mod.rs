//! Integration tests for storefront-monitor
//!
//! These tests verify the interaction between multiple components through
//! the public API.

pub mod config_tests;
pub mod edge_tests;
pub mod error_handling_tests;
pub mod monitoring_pipeline_tests;
