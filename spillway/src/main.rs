//! Runs a spillway scene headlessly and logs where the liquid went.
//!
//! Usage: `spillway [config path]`. Log verbosity follows `RUST_LOG`.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use spillway::{DEFAULT_CONFIG_PATH, Simulation, SimulationConfig};
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

fn init_logging() -> anyhow::Result<()> {
    LogTracer::init()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    set_global_default(subscriber)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let path = env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = SimulationConfig::load_or_create(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Running {} ticks at {} Hz with {} containers",
        config.ticks,
        config.tick_rate,
        config.scene.containers.len()
    );

    let mut simulation = Simulation::new(&config).context("building scene")?;
    let summary = simulation.run();

    log::info!(
        "Spilled in {} of {} ticks: {} transfers, {:.3} moved, {:.3} lost, {} cues",
        summary.spilling_ticks,
        summary.ticks,
        summary.transfers,
        summary.volume_transferred,
        summary.volume_lost,
        summary.effects
    );
    for (name, amount, volume) in &summary.fills {
        log::info!("{name}: {amount:.3} / {volume:.3}");
    }

    Ok(())
}
