//! Combat
//!
//! Shared fighter stats, the player, monsters and bosses, and the melee
//! resolver that turns swings into kills.

pub mod area_attack;
pub mod damage;
pub mod monster;
pub mod player;
pub mod resolver;
pub mod stats;

pub use area_attack::AreaOutcome;
pub use monster::{Monster, MonsterAction, MonsterEnv};
pub use player::{PLAYER_SPAWN, Player};
pub use resolver::{request_attack, resolve_melee};
pub use stats::Combatant;
