//! Shared utilities
//!
//! Error types, logging setup and the clock abstraction.

pub mod error;
pub mod logging;
pub mod time;
