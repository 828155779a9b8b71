//! dinner — run the dining philosophers until interrupted.
//!
//! ```text
//! dinner [N]        N philosophers around the table (default 5, at least 2)
//! ```
//!
//! Every transition is printed to stdout as `Philosopher <id>: <STATE>`.
//! Diagnostics go to stderr; set `RUST_LOG=debug` to see counter traffic.
//! SIGINT or SIGTERM stops the table; philosophers finish their current
//! think or eat interval, then the process exits with status 0.  A second
//! signal while that drain is running exits at once with status 1.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dp_core::TableConfig;
use dp_output::LogSink;
use dp_table::TableBuilder;

// ── Constants ─────────────────────────────────────────────────────────────────

const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "dinner")]
#[command(about = "Deadlock-free dining philosophers on a ring")]
struct Cli {
    /// Number of philosophers
    #[arg(default_value_t = 5, value_parser = clap::value_parser!(u32).range(2..))]
    philosophers: u32,
}

/// The first signal raises `stop`; a signal arriving once `stop` is already
/// raised terminates the process.
fn install_stop_flag(signals: &[i32], stop: &Arc<AtomicBool>) -> Result<()> {
    for &signal in signals {
        // Registered first so it sees the flag before this signal sets it.
        signal_hook::flag::register_conditional_shutdown(signal, 1, Arc::clone(stop))
            .with_context(|| format!("registering shutdown for signal {signal}"))?;
        signal_hook::flag::register(signal, Arc::clone(stop))
            .with_context(|| format!("registering handler for signal {signal}"))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let stop = Arc::new(AtomicBool::new(false));
    install_stop_flag(&[SIGINT, SIGTERM], &stop)?;

    let config = TableConfig {
        seed: rand::random(),
        ..TableConfig::with_ring_size(cli.philosophers as usize)
    };

    let table = TableBuilder::new(config)
        .observer(LogSink::stdout())
        .build()
        .context("building the table")?;
    let mut report = table.run(&stop, POLL_INTERVAL)?;

    if let Some(e) = report.observer.take_error() {
        return Err(e).context("writing the transition log");
    }
    report.observer.finish()?;

    info!(meals = ?report.meals(), clean = report.is_clean(), "dinner is over");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use signal_hook::consts::SIGUSR1;

    use super::*;

    #[test]
    fn first_signal_only_raises_the_flag() {
        let stop = Arc::new(AtomicBool::new(false));
        install_stop_flag(&[SIGUSR1], &stop).unwrap();
        signal_hook::low_level::raise(SIGUSR1).unwrap();
        assert!(stop.load(Ordering::SeqCst));
    }
}
