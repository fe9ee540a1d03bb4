use tracing::{debug, trace};

use crate::alerts::Alert;

/// Counts consecutive failed cycles
///
/// ```text
/// failure: count += 1; count >= threshold → Alert::Unreachable
/// success: count = 0
/// ```
///
/// The comparison is re-evaluated on every failure, so once the streak has
/// reached the threshold each further failure alerts again.
#[derive(Debug, Clone)]
pub struct FailureTracker {
    count: u32,
    threshold: u32,
}

impl FailureTracker {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold,
        }
    }

    /// Current streak length
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Record a failed cycle, returning the unreachable alert once the streak
    /// has reached the threshold
    pub fn on_failure(&mut self) -> Option<Alert> {
        self.count = self.count.saturating_add(1);
        trace!("failure streak {}/{}", self.count, self.threshold);

        if self.count < self.threshold {
            return None;
        }

        if self.count == self.threshold {
            debug!("failure streak reached {}", self.threshold);
        }
        Some(Alert::Unreachable {
            failures: self.count,
        })
    }

    /// Record a successful cycle
    pub fn on_success(&mut self) {
        if self.count > 0 {
            debug!("recovered after {} failed cycle(s)", self.count);
        }
        self.count = 0;
    }
}
