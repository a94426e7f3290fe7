//! # Starlane Engine
//!
//! Headless host for the Starlane NPC simulation.
//!
//! Loads `starlane.toml` (or the path given as the first argument), runs the
//! simulation at a fixed timestep, logs periodic statistics, and optionally
//! writes a snapshot of the final state.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod timing;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EngineConfig;

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("starlane=info".parse()?))
        .init();

    info!("Starlane starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    config.validate();

    let stats = app::run(&config)?;
    info!("Run statistics: {}", app::stats_json(&stats)?);

    info!("Starlane shutdown complete");
    Ok(())
}
