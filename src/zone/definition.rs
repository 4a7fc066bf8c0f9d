//! Zone Definitions
//!
//! Raw TOML structures for the world layout and their resolved forms with
//! every default applied once at load.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::geometry::Bounds;

pub type ZoneId = u32;

/// Zone used whenever a position falls outside every declared rectangle
pub const FALLBACK_ZONE: ZoneId = 1;

// ============================================================================
// Raw TOML Structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawMonsterConfig {
    pub health: Option<f32>,
    pub damage: Option<f32>,
    pub ferocity: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBossConfig {
    pub name: Option<String>,
    pub health: Option<f32>,
    pub damage: Option<f32>,
    pub ferocity: Option<f32>,
    /// Item always dropped on top of the table rolls
    pub trophy: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawZoneDefinition {
    pub id: ZoneId,
    pub name: Option<String>,
    pub bounds: Bounds,
    #[serde(default)]
    pub unlock_threshold: f32,
    #[serde(default)]
    pub connections: Vec<ZoneId>,
    pub monster: Option<RawMonsterConfig>,
    /// Names given to regular monsters spawned here
    #[serde(default)]
    pub variants: Vec<String>,
    pub boss: Option<RawBossConfig>,
}

/// A world file: `[[zones]]` array of tables
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorldFile {
    #[serde(default)]
    pub zones: Vec<RawZoneDefinition>,
}

// ============================================================================
// Resolved Structures
// ============================================================================

/// Strength of the regular monsters spawned in a zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterConfig {
    pub health: f32,
    pub damage: f32,
    pub ferocity: f32,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            health: 50.0,
            damage: 5.0,
            ferocity: 1.0,
        }
    }
}

impl MonsterConfig {
    fn from_raw(raw: Option<&RawMonsterConfig>) -> Self {
        let defaults = Self::default();
        match raw {
            Some(raw) => Self {
                health: raw.health.unwrap_or(defaults.health),
                damage: raw.damage.unwrap_or(defaults.damage),
                ferocity: raw.ferocity.unwrap_or(defaults.ferocity),
            },
            None => defaults,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossConfig {
    pub name: String,
    pub health: f32,
    pub damage: f32,
    pub ferocity: f32,
    pub trophy: Option<String>,
}

impl BossConfig {
    /// Missing boss fields scale off the zone's monster: 5x health, 3x
    /// damage, ferocity +0.5.
    fn from_raw(zone_name: &str, monster: &MonsterConfig, raw: Option<&RawBossConfig>) -> Self {
        let name = raw
            .and_then(|r| r.name.clone())
            .unwrap_or_else(|| format!("{} Boss", zone_name));
        Self {
            name,
            health: raw.and_then(|r| r.health).unwrap_or(monster.health * 5.0),
            damage: raw.and_then(|r| r.damage).unwrap_or(monster.damage * 3.0),
            ferocity: raw.and_then(|r| r.ferocity).unwrap_or(monster.ferocity + 0.5),
            trophy: raw.and_then(|r| r.trophy.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ZoneDefinition {
    pub id: ZoneId,
    pub name: String,
    pub bounds: Bounds,
    pub unlock_threshold: f32,
    pub connections: Vec<ZoneId>,
    pub monster: MonsterConfig,
    pub variants: Vec<String>,
    pub boss: BossConfig,
}

impl ZoneDefinition {
    pub fn from_raw(raw: &RawZoneDefinition) -> Self {
        let name = raw.name.clone().unwrap_or_else(|| format!("Zone {}", raw.id));
        let monster = MonsterConfig::from_raw(raw.monster.as_ref());
        let boss = BossConfig::from_raw(&name, &monster, raw.boss.as_ref());
        Self {
            id: raw.id,
            name,
            bounds: raw.bounds,
            unlock_threshold: raw.unlock_threshold,
            connections: raw.connections.clone(),
            monster,
            variants: raw.variants.clone(),
            boss,
        }
    }

    /// Random variant name for a regular monster, if the zone lists any
    pub fn pick_variant<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        self.variants.choose(rng).map(String::as_str)
    }
}
