use tracing::{instrument, trace};

use crate::{ServerStats, alerts::Alert};

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

const BITS_PER_MEGABIT: f64 = 1_000_000.0;

/// Fixed cutoffs above which a metric is considered unhealthy
///
/// All comparisons are strict: a value exactly at its threshold does not alert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Maximum load average
    pub load_average: f64,

    /// Maximum memory usage in percent
    pub memory_percent: f64,

    /// Maximum disk usage in percent
    pub disk_percent: f64,

    /// Maximum network usage in percent of the available bandwidth
    pub network_percent: f64,

    /// Number of consecutive failed cycles after which the host is reported
    /// as unreachable
    pub unreachable_after: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            load_average: 30.0,
            memory_percent: 80.0,
            disk_percent: 90.0,
            network_percent: 90.0,
            unreachable_after: 3,
        }
    }
}

/// Stateless evaluation of [`ServerStats`] against [`Thresholds`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEvaluator {
    thresholds: Thresholds,
}

impl ThresholdEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Evaluate every rule and return the alerts in rule order
    /// (load, memory, disk, network).
    #[instrument(skip_all)]
    pub fn evaluate(&self, stats: &ServerStats) -> Vec<Alert> {
        let alerts: Vec<Alert> = [
            self.check_load(stats),
            self.check_memory(stats),
            self.check_disk(stats),
            self.check_network(stats),
        ]
        .into_iter()
        .flatten()
        .collect();

        trace!("{} alert(s) for {stats:?}", alerts.len());
        alerts
    }

    fn check_load(&self, stats: &ServerStats) -> Option<Alert> {
        let value = stats.load_average;
        (value > self.thresholds.load_average).then_some(Alert::LoadAverage { value })
    }

    fn check_memory(&self, stats: &ServerStats) -> Option<Alert> {
        let percent = percentage(stats.used_memory, stats.total_memory)?;
        trace!("memory usage {percent:.2}% (max: {})", self.thresholds.memory_percent);

        (percent > self.thresholds.memory_percent).then_some(Alert::MemoryUsage { percent })
    }

    fn check_disk(&self, stats: &ServerStats) -> Option<Alert> {
        let percent = percentage(stats.used_disk, stats.total_disk)?;
        trace!("disk usage {percent:.2}% (max: {})", self.thresholds.disk_percent);

        if percent <= self.thresholds.disk_percent {
            return None;
        }

        // used > total is reported as no space left
        let free = stats.total_disk.saturating_sub(stats.used_disk);
        Some(Alert::DiskSpace {
            percent,
            free_mb: free as f64 / BYTES_PER_MEGABYTE,
        })
    }

    fn check_network(&self, stats: &ServerStats) -> Option<Alert> {
        let percent = percentage(stats.network_usage, stats.network_bandwidth)?;
        trace!("network usage {percent:.2}% (max: {})", self.thresholds.network_percent);

        if percent <= self.thresholds.network_percent {
            return None;
        }

        let available = stats.network_bandwidth.saturating_sub(stats.network_usage);
        Some(Alert::NetworkBandwidth {
            percent,
            available_mbit: available as f64 * 8.0 / BITS_PER_MEGABIT,
        })
    }
}

/// `used` in percent of `total`, or `None` when `total` is zero
fn percentage(used: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(used as f64 * 100.0 / total as f64)
}
