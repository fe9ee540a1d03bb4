//! Message types for the poller actor

use tokio::sync::oneshot;

/// Result of a single poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Stats were fetched and parsed; `alerts` threshold alerts were emitted
    Evaluated { alerts: usize },

    /// Fetching or parsing failed; `streak` is the current failure streak
    Failed { streak: u32 },
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CycleOutcome::Evaluated { .. })
    }
}

/// Commands that can be sent to a PollerActor
#[derive(Debug)]
pub enum PollerCommand {
    /// Run a cycle immediately (bypassing the interval timer)
    ///
    /// The cycle is serialized with timer driven cycles.
    PollNow {
        /// Channel to send the outcome back
        respond_to: oneshot::Sender<CycleOutcome>,
    },

    /// Stop polling
    ///
    /// A cycle that is already running finishes before the actor exits.
    Shutdown,
}
