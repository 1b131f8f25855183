//! Headless driver: build a world from config, run it, print the outcome.

mod telemetry;

use anyhow::{Context, Result};
use eco_core::SimulationConfig;
use eco_world::World;
use tracing::{info, warn};

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_json_file(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => SimulationConfig::default(),
    };

    info!(
        seed = config.seed,
        width = config.world_config.width,
        height = config.world_config.height,
        num_ticks = config.num_ticks,
        "Starting Eco-Grid run"
    );

    let num_ticks = config.num_ticks;
    let mut world = World::new(config)?;
    let summary = world.run(num_ticks)?;

    let broken = world.inconsistencies();
    if !broken.is_empty() {
        warn!(count = broken.len(), agents = ?broken, "Grid and registry disagree");
    }

    println!("{}", serde_json::to_string_pretty(&summary.final_census)?);
    Ok(())
}
