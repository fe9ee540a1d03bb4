//! PollerActor - Polls the stats endpoint and emits alerts
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → fetch → parse → evaluate → AlertSink
//!     ↑           └──────┴── failure → FailureTracker → AlertSink (on escalation)
//!     └─── Commands (PollNow, Shutdown)
//! ```
//!
//! A single task owns the [`PollCycle`], so at most one cycle runs at a time
//! and the failure streak needs no locking. Ticks that fire while a cycle is
//! still running are skipped, and pending commands are served before a due
//! tick.

use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, instrument, trace, warn};

use crate::{
    ServerStats,
    alerts::AlertSink,
    config::Config,
    fetch::{FetchError, HttpStatsSource, StatsSource},
    monitors::{FailureTracker, ThresholdEvaluator, Thresholds},
    parser::{self, ParseError},
};

use super::messages::{CycleOutcome, PollerCommand};

/// Reasons a cycle can fail; both count towards the same streak
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// One fetch → parse → evaluate pass, plus the failure streak across passes
pub struct PollCycle<S, K> {
    source: S,
    sink: K,
    evaluator: ThresholdEvaluator,
    failures: FailureTracker,
}

impl<S, K> PollCycle<S, K>
where
    S: StatsSource,
    K: AlertSink,
{
    pub fn new(source: S, sink: K, thresholds: Thresholds) -> Self {
        Self {
            source,
            sink,
            evaluator: ThresholdEvaluator::new(thresholds),
            failures: FailureTracker::new(thresholds.unreachable_after),
        }
    }

    pub fn failures(&self) -> &FailureTracker {
        &self.failures
    }

    /// Run a single cycle
    ///
    /// Errors never escape: a failed fetch or parse only feeds the failure
    /// tracker, which may emit the unreachable alert.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> CycleOutcome {
        match Self::fetch_stats(&self.source).await {
            Ok(stats) => {
                self.failures.on_success();

                let alerts = self.evaluator.evaluate(&stats);
                for alert in &alerts {
                    self.sink.emit(alert);
                }

                trace!("cycle evaluated with {} alert(s)", alerts.len());
                CycleOutcome::Evaluated {
                    alerts: alerts.len(),
                }
            }
            Err(e) => {
                debug!("cycle failed: {e}");

                if let Some(alert) = self.failures.on_failure() {
                    self.sink.emit(&alert);
                }

                CycleOutcome::Failed {
                    streak: self.failures.count(),
                }
            }
        }
    }

    async fn fetch_stats(source: &S) -> Result<ServerStats, CycleError> {
        let raw = source.fetch().await?;
        Ok(parser::parse(&raw)?)
    }
}

/// Actor that runs a [`PollCycle`] on every tick of its interval
pub struct PollerActor<S, K> {
    cycle: PollCycle<S, K>,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<PollerCommand>,

    /// Time between two ticks
    interval_duration: Duration,
}

impl<S, K> PollerActor<S, K>
where
    S: StatsSource,
    K: AlertSink,
{
    pub fn new(
        cycle: PollCycle<S, K>,
        command_rx: mpsc::Receiver<PollerCommand>,
        interval_duration: Duration,
    ) -> Self {
        Self {
            cycle,
            command_rx,
            interval_duration,
        }
    }

    /// Run the actor's main loop
    ///
    /// This runs until:
    /// - A Shutdown command is received
    /// - The command channel is closed
    #[instrument(skip(self), fields(interval = ?self.interval_duration))]
    pub async fn run(mut self) {
        debug!("starting poller actor");

        // first poll happens one full interval after start
        let mut ticker = interval_at(
            Instant::now() + self.interval_duration,
            self.interval_duration,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // commands first: a queued Shutdown must not lose to a due tick
            tokio::select! {
                biased;

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(PollerCommand::PollNow { respond_to }) => {
                            debug!("received PollNow command");
                            let outcome = self.cycle.run().await;
                            let _ = respond_to.send(outcome);
                        }

                        Some(PollerCommand::Shutdown) => {
                            debug!("received shutdown command");
                            break;
                        }

                        None => {
                            warn!("command channel closed, shutting down");
                            break;
                        }
                    }
                }

                _ = ticker.tick() => {
                    let outcome = self.cycle.run().await;
                    trace!("tick finished: {outcome:?}");
                }
            }
        }

        debug!("poller actor stopped");
    }
}

/// Handle for controlling a PollerActor
pub struct PollerHandle {
    sender: mpsc::Sender<PollerCommand>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Spawn a poller actor running `cycle` every `interval`
    pub fn spawn<S, K>(cycle: PollCycle<S, K>, interval: Duration) -> Self
    where
        S: StatsSource + 'static,
        K: AlertSink + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = PollerActor::new(cycle, cmd_rx, interval);
        let task = tokio::spawn(actor.run());

        Self {
            sender: cmd_tx,
            task,
        }
    }

    /// Spawn a poller for the HTTP endpoint described by `config`
    pub fn spawn_with_config<K>(config: &Config, sink: K) -> Result<Self>
    where
        K: AlertSink + 'static,
    {
        config.validate()?;

        let source = HttpStatsSource::new(config.url.clone(), config.timeout_duration())
            .context("failed to build HTTP client")?;
        let cycle = PollCycle::new(source, sink, config.thresholds);

        Ok(Self::spawn(cycle, config.interval_duration()))
    }

    /// Run a cycle now and return its outcome
    pub async fn poll_now(&self) -> Result<CycleOutcome> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(PollerCommand::PollNow { respond_to: tx })
            .await
            .context("failed to send PollNow command")?;

        rx.await.context("failed to receive response")
    }

    /// Ask the actor to stop after its current cycle
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(PollerCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }

    /// Wait for the actor task to finish
    pub async fn join(self) -> Result<()> {
        self.task.await.context("poller task failed")
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
