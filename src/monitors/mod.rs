//! Evaluation of polled statistics
//!
//! - [`thresholds`]: stateless threshold rules producing alerts per cycle
//! - [`failures`]: consecutive failure tracking and unreachable escalation

pub mod failures;
pub mod thresholds;

pub use failures::FailureTracker;
pub use thresholds::{ThresholdEvaluator, Thresholds};
