use std::fmt;
use std::io::{self, Write};

use tracing::{error, trace};

/// A single alert raised by a poll cycle
///
/// The [`fmt::Display`] output is the exact line written to the alert sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alert {
    /// Load average above its threshold
    LoadAverage { value: f64 },

    /// Memory usage above its threshold
    MemoryUsage { percent: f64 },

    /// Disk usage above its threshold, with the remaining space in megabytes
    DiskSpace { percent: f64, free_mb: f64 },

    /// Network usage above its threshold, with the remaining bandwidth in Mbit/s
    NetworkBandwidth { percent: f64, available_mbit: f64 },

    /// The stats endpoint failed `failures` cycles in a row
    Unreachable { failures: u32 },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::LoadAverage { value } => write!(f, "Load Average is too high: {value:.2}"),
            Alert::MemoryUsage { percent } => write!(f, "Memory usage too high: {percent:.2}%"),
            Alert::DiskSpace { free_mb, .. } => {
                write!(f, "Free disk space is too low: {free_mb:.2} Mb left")
            }
            Alert::NetworkBandwidth { available_mbit, .. } => write!(
                f,
                "Network bandwidth usage high: {available_mbit:.2} Mbit/s available"
            ),
            Alert::Unreachable { .. } => f.write_str("Unable to fetch server statistic"),
        }
    }
}

/// Destination for alerts produced by a poll cycle
///
/// Any `FnMut(&Alert)` closure is a sink, which keeps tests and embedders free
/// of boilerplate types.
pub trait AlertSink: Send {
    fn emit(&mut self, alert: &Alert);
}

impl<F> AlertSink for F
where
    F: FnMut(&Alert) + Send,
{
    fn emit(&mut self, alert: &Alert) {
        self(alert)
    }
}

/// Writes one line per alert to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl AlertSink for StdoutSink {
    fn emit(&mut self, alert: &Alert) {
        trace!("emitting alert: {alert:?}");

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{alert}") {
            error!("failed to write alert to stdout: {e}");
        }
    }
}
