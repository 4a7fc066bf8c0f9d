//! Zone System
//!
//! The 3x3 world graph, its TOML loading and the progression controller
//! that opens zones as the player grows stronger.

pub mod definition;
pub mod graph;
pub mod progression;
pub mod registry;

pub use definition::{BossConfig, MonsterConfig, ZoneDefinition, ZoneId};
pub use graph::{ZoneGraph, validate_tiling};
pub use progression::ProgressionController;
pub use registry::{load_world_from_directory, parse_world};
