use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};

mod combat;
mod config;
mod crafting;
mod data;
mod geometry;
mod inventory;
mod loot;
mod sim;
mod world;
mod zone;

use config::{DEFAULT_CONFIG_PATH, SimulationConfig};
use data::GameData;
use sim::{Autopilot, SimEvent, SimulationContext};
use world::SceneLog;

fn load_config() -> SimulationConfig {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    match SimulationConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            SimulationConfig::default()
        }
    }
}

fn load_data(config: &SimulationConfig) -> Result<GameData, String> {
    if let Some(dir) = &config.data_dir {
        match GameData::load_from_directory(dir) {
            Ok(data) => return Ok(data),
            Err(e) => error!("Failed to load game data from {:?}: {}", dir, e),
        }
    }
    GameData::builtin()
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("grid_realm=info")),
        )
        .init();

    let config = load_config();
    let data = match load_data(&config) {
        Ok(data) => data,
        Err(e) => {
            error!("No usable game data: {}", e);
            return;
        }
    };

    let tick_secs = config.tick_interval_secs();
    let total_ticks = (config.run_duration_secs / tick_secs).ceil() as u64;

    let mut ctx = match SimulationContext::new(config, data) {
        Ok(ctx) => ctx
            .with_default_world()
            .with_scene(Box::new(SceneLog::new())),
        Err(e) => {
            error!("Failed to build simulation: {}", e);
            return;
        }
    };
    let autopilot = Autopilot::new();

    info!("Running {} ticks at {:.0} Hz", total_ticks, 1.0 / tick_secs);

    let mut interval = tokio::time::interval(Duration::from_secs_f64(tick_secs));
    for _ in 0..total_ticks {
        interval.tick().await;

        for input in autopilot.plan(&ctx) {
            ctx.push_input(input);
        }
        for event in ctx.tick(tick_secs) {
            match &event {
                SimEvent::ZoneUnlocked { .. }
                | SimEvent::BossSpawned { .. }
                | SimEvent::LevelUp { .. }
                | SimEvent::Crafted { .. }
                | SimEvent::PlayerDied => info!("{:?}", event),
                _ => debug!("{:?}", event),
            }
        }
    }

    let hud = ctx.hud();
    match serde_json::to_string_pretty(&hud) {
        Ok(json) => info!("Final HUD after {:.1}s simulated:\n{}", ctx.now(), json),
        Err(e) => error!("Failed to serialize HUD: {}", e),
    }
    let affordable = ctx
        .recipe_snapshots()
        .into_iter()
        .filter(|r| r.affordable)
        .map(|r| r.id)
        .collect::<Vec<_>>();
    info!(
        "Zone {} at {}x, {} monsters alive, {} items on the ground, craftable: {:?}",
        ctx.player_zone(),
        ctx.speed(),
        ctx.monsters().len(),
        ctx.ground_loot_updates().len(),
        affordable
    );
    match serde_json::to_string(&ctx.inventory_snapshot()) {
        Ok(json) => debug!("Inventory: {}", json),
        Err(e) => error!("Failed to serialize inventory: {}", e),
    }
}
