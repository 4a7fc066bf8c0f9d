//! Crafting Recipe Definitions
//!
//! Defines the data structures for crafting recipes, including TOML
//! deserialization (Raw*) and resolved versions with defaults applied.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::{EquipmentSlot, Rarity, StatBonus};

/// Recipe categories for UI organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCategory {
    Weapon,
    Armor,
    Consumable,
    #[default]
    Material,
}

impl RecipeCategory {
    fn default_slot(&self) -> Option<EquipmentSlot> {
        match self {
            RecipeCategory::Weapon => Some(EquipmentSlot::Weapon),
            RecipeCategory::Armor => Some(EquipmentSlot::Armor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawResultType {
    Equipment,
    Material,
    Consumable,
}

// ============================================================================
// Raw TOML Structures
// ============================================================================

/// Raw result descriptor from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawResult {
    #[serde(rename = "type")]
    pub result_type: RawResultType,
    pub slot: Option<EquipmentSlot>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub stats: StatBonus,
    pub healing: Option<f32>,
}

/// Raw recipe definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecipeDefinition {
    pub display_name: Option<String>,
    #[serde(default = "default_tier")]
    pub tier: u32,
    #[serde(default)]
    pub category: RecipeCategory,
    /// item id -> quantity; ids may name other recipes
    #[serde(default)]
    pub requirements: BTreeMap<String, u32>,
    pub result: RawResult,
}

fn default_tier() -> u32 {
    1
}

// ============================================================================
// Resolved Structures
// ============================================================================

/// What a successful craft produces (always exactly one instance)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecipeOutput {
    Equipment {
        slot: EquipmentSlot,
        stats: StatBonus,
        rarity: Rarity,
    },
    Material {
        rarity: Rarity,
    },
    Consumable {
        rarity: Rarity,
        healing: f32,
    },
}

/// A fully resolved recipe definition
#[derive(Debug, Clone)]
pub struct RecipeDefinition {
    pub id: String,
    pub display_name: String,
    pub tier: u32,
    pub category: RecipeCategory,
    pub requirements: BTreeMap<String, u32>,
    pub output: RecipeOutput,
}

impl RecipeDefinition {
    /// Create a resolved RecipeDefinition from raw TOML data
    pub fn from_raw(id: &str, raw: &RawRecipeDefinition) -> Result<Self, String> {
        let result = &raw.result;
        let output = match result.result_type {
            RawResultType::Equipment => {
                let slot = result
                    .slot
                    .or_else(|| raw.category.default_slot())
                    .ok_or_else(|| format!("Recipe '{}' produces equipment without a slot", id))?;
                RecipeOutput::Equipment {
                    slot,
                    stats: result.stats,
                    rarity: result.rarity,
                }
            }
            RawResultType::Material => RecipeOutput::Material {
                rarity: result.rarity,
            },
            RawResultType::Consumable => RecipeOutput::Consumable {
                rarity: result.rarity,
                healing: result.healing.unwrap_or(0.0),
            },
        };

        if raw.requirements.is_empty() {
            return Err(format!("Recipe '{}' has no requirements", id));
        }

        Ok(Self {
            id: id.to_string(),
            display_name: raw
                .display_name
                .clone()
                .unwrap_or_else(|| id.replace('_', " ")),
            tier: raw.tier,
            category: raw.category,
            requirements: raw
                .requirements
                .iter()
                .filter(|(_, qty)| **qty > 0)
                .map(|(item, qty)| (item.clone(), *qty))
                .collect(),
            output,
        })
    }
}
