//! Loot System
//!
//! Per-zone loot tables, kill rolls and the items they leave on the ground.

pub mod definition;
pub mod ground;
pub mod registry;

pub use ground::{GroundLoot, GroundLootUpdate};
pub use registry::LootRegistry;
