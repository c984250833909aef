//! Threshold alerting
//!
//! Rules are evaluated in a fixed order against each finalised metric; a
//! single global cooldown limits emission to one alert per window.

mod evaluator;
pub mod rules;

pub use evaluator::{AlertEvaluator, AlertStats};
pub use rules::AlertCandidate;
