use serde::{Deserialize, Serialize};

// ============================================================================
// Item Categories
// ============================================================================

/// Inventory bucket an item lands in. Declared per item in data, never
/// inferred from the display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    #[default]
    Material,
    Consumable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
}

// ============================================================================
// Equipment Slots
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

// ============================================================================
// Equipment Stats
// ============================================================================

/// Flat stat deltas granted by an equipped item
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, Default)]
pub struct StatBonus {
    #[serde(default)]
    pub damage: f32,
    #[serde(default)]
    pub health: f32,
}

impl StatBonus {
    /// True if either stat beats `other`
    pub fn improves_on(&self, other: &StatBonus) -> bool {
        self.damage > other.damage || self.health > other.health
    }
}

impl std::ops::Add for StatBonus {
    type Output = StatBonus;

    fn add(self, rhs: StatBonus) -> StatBonus {
        StatBonus {
            damage: self.damage + rhs.damage,
            health: self.health + rhs.health,
        }
    }
}

// ============================================================================
// Raw Item Definition (direct from TOML)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawItemDefinition {
    pub display_name: Option<String>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub category: ItemCategory,
    /// Health restored when drunk (consumables only)
    pub healing: Option<f32>,
}

// ============================================================================
// Resolved Item Definition
// ============================================================================

#[derive(Debug, Clone)]
pub struct ItemDefinition {
    pub id: String,
    pub display_name: String,
    pub rarity: Rarity,
    pub category: ItemCategory,
    pub healing: f32,
}

impl ItemDefinition {
    pub fn from_raw(id: &str, raw: &RawItemDefinition) -> Self {
        Self {
            id: id.to_string(),
            display_name: raw.display_name.clone()
                .unwrap_or_else(|| id.replace('_', " ")),
            rarity: raw.rarity,
            category: raw.category,
            healing: raw.healing.unwrap_or(0.0),
        }
    }

    pub fn is_consumable(&self) -> bool {
        self.category == ItemCategory::Consumable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_item_defaults() {
        let toml_str = r#"
            [iron_ore]
            display_name = "Iron Ore"
            rarity = "uncommon"

            [health_potion_small]
            display_name = "Small Health Potion"
            category = "consumable"
            rarity = "rare"
            healing = 40.0
        "#;

        let parsed: HashMap<String, RawItemDefinition> = toml::from_str(toml_str).unwrap();

        let ore = ItemDefinition::from_raw("iron_ore", &parsed["iron_ore"]);
        assert_eq!(ore.category, ItemCategory::Material);
        assert_eq!(ore.rarity, Rarity::Uncommon);
        assert_eq!(ore.healing, 0.0);

        let potion = ItemDefinition::from_raw("health_potion_small", &parsed["health_potion_small"]);
        assert!(potion.is_consumable());
        assert_eq!(potion.healing, 40.0);
    }

    #[test]
    fn test_stat_bonus_comparison() {
        let sword = StatBonus { damage: 10.0, health: 0.0 };
        let armor = StatBonus { damage: 0.0, health: 20.0 };
        assert!(sword.improves_on(&StatBonus::default()));
        assert!(armor.improves_on(&sword));
        assert!(!StatBonus::default().improves_on(&sword));
        assert_eq!((sword + armor).health, 20.0);
    }
}
