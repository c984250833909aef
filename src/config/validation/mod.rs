//! Configuration validation
//!
//! - `trait_def`: the `Validate` trait
//! - `config_validators`: application, server and logging sections
//! - `monitoring_validators`: sampling, retention and alert thresholds
//! - `edge_validators`: cache, rate limit and image limits

mod config_validators;
mod edge_validators;
mod monitoring_validators;
mod trait_def;

pub use trait_def::Validate;
