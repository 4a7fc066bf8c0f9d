pub mod item_def;
pub mod item_registry;

pub use item_def::{EquipmentSlot, ItemCategory, ItemDefinition, Rarity, StatBonus};
pub use item_registry::ItemRegistry;

use std::path::Path;
use tracing::{info, warn};

use crate::crafting::CraftingRegistry;
use crate::loot::LootRegistry;
use crate::zone::{self, ZoneDefinition};

// Canonical data set, compiled in so the simulation never depends on the
// working directory.
const WORLD_TOML: &str = include_str!("../../data/zones/world.toml");
const ZONE_DROPS_TOML: &str = include_str!("../../data/items/zone_drops.toml");
const TROPHIES_TOML: &str = include_str!("../../data/items/trophies.toml");
const LOOT_TOML: &str = include_str!("../../data/loot/zone_tables.toml");
const WEAPONS_TOML: &str = include_str!("../../data/recipes/weapons.toml");
const ARMOR_TOML: &str = include_str!("../../data/recipes/armor.toml");
const ALCHEMY_TOML: &str = include_str!("../../data/recipes/alchemy.toml");

/// Every static table the simulation reads: zones, items, loot and recipes.
pub struct GameData {
    pub zones: Vec<ZoneDefinition>,
    pub items: ItemRegistry,
    pub loot: LootRegistry,
    pub recipes: CraftingRegistry,
}

impl GameData {
    /// The data set shipped with the binary
    pub fn builtin() -> Result<Self, String> {
        let zones = zone::parse_world("world.toml", WORLD_TOML)?;

        let mut items = ItemRegistry::new();
        items.load_from_str("zone_drops.toml", ZONE_DROPS_TOML)?;
        items.load_from_str("trophies.toml", TROPHIES_TOML)?;

        let mut loot = LootRegistry::new();
        loot.load_from_str("zone_tables.toml", LOOT_TOML)?;

        let mut recipes = CraftingRegistry::new();
        recipes.load_from_str("weapons.toml", WEAPONS_TOML)?;
        recipes.load_from_str("armor.toml", ARMOR_TOML)?;
        recipes.load_from_str("alchemy.toml", ALCHEMY_TOML)?;

        Self::finish(zones, items, loot, recipes)
    }

    /// Load a data set laid out like `data/` (zones/, items/, loot/, recipes/)
    pub fn load_from_directory(data_dir: &Path) -> Result<Self, String> {
        let zones = zone::load_world_from_directory(data_dir)?;

        let mut items = ItemRegistry::new();
        items.load_from_directory(data_dir)?;

        let mut loot = LootRegistry::new();
        loot.load_from_directory(data_dir)?;

        let mut recipes = CraftingRegistry::new();
        recipes.load_from_directory(data_dir)?;

        Self::finish(zones, items, loot, recipes)
    }

    fn finish(
        zones: Vec<ZoneDefinition>,
        items: ItemRegistry,
        mut loot: LootRegistry,
        recipes: CraftingRegistry,
    ) -> Result<Self, String> {
        zone::validate_tiling(&zones)?;
        loot.retain_known_items(&items);
        recipes.validate()?;

        for def in &zones {
            if !loot.contains(def.id) {
                warn!("Zone {} ({}) has no loot table", def.id, def.name);
            }
        }

        info!(
            "Game data ready: {} zones, {} items, {} loot tables, {} recipes",
            zones.len(),
            items.len(),
            loot.len(),
            recipes.len()
        );

        Ok(Self { zones, items, loot, recipes })
    }
}
