//! Request metrics collection
//!
//! - `collector`: sample gate and span finalisation
//! - `probe`: memory and CPU figures
//! - `store`: retention-bounded, time-ordered storage

mod collector;
pub(crate) mod helpers;
mod probe;
mod store;


pub use collector::{MetricsCollector, RequestSpan, SamplingStats};
pub use probe::{CpuSnapshot, ResourceProbe, StaticProbe, SysinfoProbe};
pub use store::{RetentionQueue, Timestamped};
