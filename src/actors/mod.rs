//! Actor driving the poll loop
//!
//! A single [`poller::PollerActor`] runs as a tokio task. It owns the poll
//! cycle (and with it the failure streak), fires it on every interval tick
//! and accepts commands through a [`poller::PollerHandle`].
//!
//! ```text
//!   interval tick ──┐
//!                   ├──► PollerActor ──► PollCycle ──► AlertSink (stdout)
//!   PollerHandle ───┘   (one cycle at a time)
//!   (PollNow, Shutdown)
//! ```

pub mod messages;
pub mod poller;

pub use messages::{CycleOutcome, PollerCommand};
pub use poller::{PollCycle, PollerHandle};
