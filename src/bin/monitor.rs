use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use server_stats_monitor::{
    actors::PollerHandle,
    alerts::StdoutSink,
    config::{Config, Overrides, read_config_file},
    util::get_env_overrides,
};
use tracing::{debug, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

/// Time an in-flight cycle gets to finish after a shutdown request
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Parser)]
#[command(name = "stats-monitor")]
#[command(about = "Polls a server's statistics endpoint and prints alerts", long_about = None)]
struct Args {
    /// Config file (JSON)
    #[arg(short)]
    file: Option<String>,

    /// Stats endpoint (overrides config file and STATS_URL)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Seconds between two polls
    #[arg(long, value_name = "SECS")]
    interval: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Log verbosity on stderr (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            interval: self.interval,
            timeout: self.timeout,
        }
    }
}

fn init(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = filter::Targets::new().with_targets(vec![
        ("server_stats_monitor", level),
        ("stats_monitor", level),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init(args.verbose);
    trace!("started with args: {args:?}");

    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    }
    .with_overrides(&get_env_overrides())
    .with_overrides(&args.overrides());
    debug!("using config: {config:?}");

    let handle = PollerHandle::spawn_with_config(&config, StdoutSink)?;

    println!("Starting server monitor...");
    println!("Press Ctrl+C to stop");

    shutdown_signal().await?;
    println!("\nShutting down monitor...");

    handle.shutdown().await?;
    match tokio::time::timeout(SHUTDOWN_GRACE, handle.join()).await {
        Ok(result) => result?,
        Err(_) => warn!("poll cycle still running after {SHUTDOWN_GRACE:?}, abandoning it"),
    }

    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl+C")
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .context("failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<(), anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        result = ctrl_c => result,
        result = terminate => result,
    }
}
