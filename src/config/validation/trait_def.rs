//! Validation trait definition

/// Implemented by every configuration section; returns a human readable reason on failure
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
