//! Read-only views handed to the HUD and panels. The UI never pushes
//! anything back through these.

use serde::Serialize;
use uuid::Uuid;

use crate::combat::Player;
use crate::crafting::{CraftingRegistry, RecipeCategory, RecipeDefinition};
use crate::data::{EquipmentSlot, ItemRegistry, Rarity, StatBonus};
use crate::inventory::{EquipmentItem, Inventory};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponSummary {
    pub name: String,
    pub damage_bonus: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub weapon: Option<WeaponSummary>,
}

impl From<&Player> for HudSnapshot {
    fn from(player: &Player) -> Self {
        Self {
            level: player.level,
            xp: player.xp,
            xp_to_next_level: player.xp_to_next_level,
            health: player.stats.health,
            max_health: player.stats.max_health,
            damage: player.stats.damage,
            weapon: player
                .inventory
                .equipped(EquipmentSlot::Weapon)
                .map(|w| WeaponSummary {
                    name: w.name.clone(),
                    damage_bonus: w.stats.damage,
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackEntry {
    pub id: String,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumableEntry {
    pub id: String,
    pub name: String,
    pub count: u32,
    pub healing: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentEntry {
    pub instance_id: Uuid,
    pub id: String,
    pub name: String,
    pub slot: EquipmentSlot,
    pub rarity: Rarity,
    pub stats: StatBonus,
    pub equipped: bool,
}

impl From<&EquipmentItem> for EquipmentEntry {
    fn from(item: &EquipmentItem) -> Self {
        Self {
            instance_id: item.instance_id,
            id: item.id.clone(),
            name: item.name.clone(),
            slot: item.slot,
            rarity: item.rarity,
            stats: item.stats,
            equipped: item.equipped,
        }
    }
}

/// Inventory contents grouped by category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySnapshot {
    pub materials: Vec<StackEntry>,
    pub consumables: Vec<ConsumableEntry>,
    pub equipment: Vec<EquipmentEntry>,
}

impl InventorySnapshot {
    /// Names come from the item catalogue, then the recipe book (crafted
    /// intermediates), then the raw id.
    pub fn build(inventory: &Inventory, items: &ItemRegistry, recipes: &CraftingRegistry) -> Self {
        let name_of = |id: &str| item_name(id, items, recipes);
        Self {
            materials: inventory
                .materials()
                .iter()
                .map(|(id, count)| StackEntry {
                    id: id.clone(),
                    name: name_of(id),
                    count: *count,
                })
                .collect(),
            consumables: inventory
                .consumables()
                .iter()
                .map(|(id, stack)| ConsumableEntry {
                    id: id.clone(),
                    name: name_of(id),
                    count: stack.count,
                    healing: stack.healing,
                })
                .collect(),
            equipment: inventory.equipment().iter().map(EquipmentEntry::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementEntry {
    pub item_id: String,
    pub name: String,
    pub have: u32,
    pub need: u32,
}

/// One row of the crafting panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSnapshot {
    pub id: String,
    pub name: String,
    pub tier: u32,
    pub category: RecipeCategory,
    pub requirements: Vec<RequirementEntry>,
    pub affordable: bool,
}

impl RecipeSnapshot {
    fn build(
        recipe: &RecipeDefinition,
        inventory: &Inventory,
        items: &ItemRegistry,
        recipes: &CraftingRegistry,
    ) -> Self {
        Self {
            id: recipe.id.clone(),
            name: recipe.display_name.clone(),
            tier: recipe.tier,
            category: recipe.category,
            requirements: recipe
                .requirements
                .iter()
                .map(|(item_id, need)| RequirementEntry {
                    item_id: item_id.clone(),
                    name: item_name(item_id, items, recipes),
                    have: inventory.item_count(item_id),
                    need: *need,
                })
                .collect(),
            affordable: recipes.can_craft(&recipe.id, inventory),
        }
    }

    /// Every recipe, lowest tier first
    pub fn list(inventory: &Inventory, items: &ItemRegistry, recipes: &CraftingRegistry) -> Vec<Self> {
        recipes
            .sorted()
            .into_iter()
            .map(|recipe| Self::build(recipe, inventory, items, recipes))
            .collect()
    }
}

fn item_name(id: &str, items: &ItemRegistry, recipes: &CraftingRegistry) -> String {
    if items.contains(id) {
        return items.display_name(id);
    }
    recipes
        .get(id)
        .map(|r| r.display_name.clone())
        .unwrap_or_else(|| id.to_string())
}
