pub mod actors;
pub mod alerts;
pub mod config;
pub mod fetch;
pub mod monitors;
pub mod parser;
pub mod util;

/// Statistics reported by the monitored host in a single poll.
///
/// Memory and disk values are in bytes. Network values are in whatever rate
/// unit the host reports; usage is only ever compared against bandwidth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServerStats {
    pub load_average: f64,
    pub total_memory: u64,
    pub used_memory: u64,
    pub total_disk: u64,
    pub used_disk: u64,
    pub network_bandwidth: u64,
    pub network_usage: u64,
}
