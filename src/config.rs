//! Simulation tuning loaded from `data/simulation.toml`, falling back to
//! defaults for anything missing.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::geometry::Vec2;

pub const DEFAULT_CONFIG_PATH: &str = "data/simulation.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Headless runner ticks per real second
    pub tick_rate_hz: u32,
    pub spawn_interval_secs: f64,
    /// Minimum simulated time between progression checks
    pub progression_interval_secs: f64,
    /// Swing travel time between an attack request and its hit
    pub melee_resolve_delay_secs: f64,
    pub player_respawn_delay_secs: f64,
    pub boss_respawn_delay_secs: f64,
    pub speed_steps: Vec<f32>,
    pub initial_speed_index: usize,
    pub telegraph_windup_secs: f32,
    pub pickup_radius: f32,
    pub smith_position: Vec2,
    pub smith_range: f32,
    pub auto_attack: bool,
    /// Spawner stops adding monsters at this many live ones
    pub max_monsters: usize,
    /// None seeds from entropy
    pub seed: Option<u64>,
    /// How long the headless runner plays, in real seconds
    pub run_duration_secs: f64,
    /// Override for the compiled-in game data
    pub data_dir: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 20,
            spawn_interval_secs: 3.0,
            progression_interval_secs: 1.0,
            melee_resolve_delay_secs: 0.1,
            player_respawn_delay_secs: 3.0,
            boss_respawn_delay_secs: 60.0,
            speed_steps: vec![0.5, 1.0, 2.0, 3.0, 5.0],
            initial_speed_index: 1,
            telegraph_windup_secs: 0.45,
            pickup_radius: 2.0,
            smith_position: Vec2::new(-60.0, -40.0),
            smith_range: 3.0,
            auto_attack: true,
            max_monsters: 50,
            seed: None,
            run_duration_secs: 30.0,
            data_dir: None,
        }
    }
}

impl SimulationConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.is_file() {
            info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
        Self::from_toml(&content).map_err(|e| format!("{:?}: {}", path, e))
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        let parsed: SimulationConfig = toml::from_str(content)
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        Ok(parsed.sanitized())
    }

    /// Clamp values that would stall or break the loop
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.tick_rate_hz == 0 {
            warn!("tick_rate_hz must be positive, using {}", defaults.tick_rate_hz);
            self.tick_rate_hz = defaults.tick_rate_hz;
        }
        self.speed_steps.retain(|s| *s > 0.0);
        if self.speed_steps.is_empty() {
            warn!("No usable speed steps, using defaults");
            self.speed_steps = defaults.speed_steps;
        }
        if self.initial_speed_index >= self.speed_steps.len() {
            self.initial_speed_index = 0;
        }
        if self.spawn_interval_secs <= 0.0 {
            self.spawn_interval_secs = defaults.spawn_interval_secs;
        }
        self.progression_interval_secs = self.progression_interval_secs.max(0.0);
        self.melee_resolve_delay_secs = self.melee_resolve_delay_secs.max(0.0);
        self.telegraph_windup_secs = self.telegraph_windup_secs.max(0.0);
        self
    }

    pub fn tick_interval_secs(&self) -> f64 {
        1.0 / f64::from(self.tick_rate_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let cfg = SimulationConfig::load(&temp_dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, SimulationConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sim.toml");
        std::fs::write(
            &path,
            r#"
seed = 1234
spawn_interval_secs = 1.5
smith_position = { x = 10.0, z = 12.0 }
"#,
        )
        .unwrap();

        let cfg = SimulationConfig::load(&path).unwrap();
        assert_eq!(cfg.seed, Some(1234));
        assert_eq!(cfg.spawn_interval_secs, 1.5);
        assert_eq!(cfg.smith_position, Vec2::new(10.0, 12.0));
        assert_eq!(cfg.tick_rate_hz, 20);
        assert_eq!(cfg.speed_steps, vec![0.5, 1.0, 2.0, 3.0, 5.0]);
    }

    #[test]
    fn test_sanitize_bad_values() {
        let cfg = SimulationConfig::from_toml(
            "tick_rate_hz = 0\nspeed_steps = [0.0, -1.0]\ninitial_speed_index = 9\n",
        )
        .unwrap();
        assert_eq!(cfg.tick_rate_hz, 20);
        assert_eq!(cfg.speed_steps.len(), 5);
        assert_eq!(cfg.initial_speed_index, 0);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(SimulationConfig::from_toml("seed = \"abc\"").is_err());
    }
}
