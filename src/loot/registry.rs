//! Loot Table Registry
//!
//! Loads per-zone loot tables and performs kill rolls.

use rand::Rng;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use super::definition::{LootTable, RawLootTable};
use crate::data::ItemRegistry;
use crate::zone::ZoneId;

/// Chance a regular kill rolls the table at all
pub const MONSTER_DROP_CHANCE: f64 = 0.6;

pub struct LootRegistry {
    tables: HashMap<ZoneId, LootTable>,
}

impl LootRegistry {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Load all loot tables from `data_dir/loot`
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), String> {
        let loot_dir = data_dir.join("loot");

        if !loot_dir.exists() {
            warn!("Loot directory does not exist: {:?}", loot_dir);
            return Ok(());
        }

        let entries = std::fs::read_dir(&loot_dir)
            .map_err(|e| format!("Failed to read loot directory: {}", e))?;

        for entry in entries {
            let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
            let path = entry.path();

            if path.extension().map_or(false, |ext| ext == "toml") {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
                self.load_from_str(&path.display().to_string(), &content)?;
            }
        }

        info!("Loaded {} loot tables", self.tables.len());

        Ok(())
    }

    pub fn load_from_str(&mut self, source: &str, content: &str) -> Result<(), String> {
        let table: HashMap<String, RawLootTable> = toml::from_str(content)
            .map_err(|e| format!("Failed to parse {}: {}", source, e))?;

        for (key, raw) in table {
            if self.tables.contains_key(&raw.zone_id) {
                warn!(
                    "Duplicate loot table for zone {} ('{}' in {}), overwriting",
                    raw.zone_id, key, source
                );
            }
            let loot = LootTable::from_raw(&raw);
            if loot.total_chance() > 1.0 + 1e-6 {
                warn!(
                    "Loot table for zone {} sums to {:.3}; later entries are shadowed",
                    loot.zone_id,
                    loot.total_chance()
                );
            }
            self.tables.insert(raw.zone_id, loot);
        }

        Ok(())
    }

    /// Drop entries that reference items missing from the catalogue
    pub fn retain_known_items(&mut self, items: &ItemRegistry) {
        for table in self.tables.values_mut() {
            table.entries.retain(|entry| {
                let known = items.contains(&entry.item_id);
                if !known {
                    warn!(
                        "Loot table for zone {} references unknown item '{}', skipping",
                        table.zone_id, entry.item_id
                    );
                }
                known
            });
        }
    }

    pub fn get(&self, zone_id: ZoneId) -> Option<&LootTable> {
        self.tables.get(&zone_id)
    }

    pub fn contains(&self, zone_id: ZoneId) -> bool {
        self.tables.contains_key(&zone_id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// One table roll for a zone
    pub fn roll<R: Rng>(&self, zone_id: ZoneId, rng: &mut R) -> Option<String> {
        let table = self.tables.get(&zone_id)?;
        let u: f64 = rng.gen_range(0.0..1.0);
        table.roll(u).map(str::to_string)
    }

    /// Items dropped by a kill in `zone_id`. Regular kills roll once with
    /// 60% probability; bosses always roll two or three times. A roll that
    /// lands in leftover mass adds nothing.
    pub fn generate_loot<R: Rng>(&self, zone_id: ZoneId, is_boss: bool, rng: &mut R) -> Vec<String> {
        if !self.tables.contains_key(&zone_id) {
            return Vec::new();
        }

        let rolls = if is_boss {
            rng.gen_range(2..=3)
        } else if rng.gen_bool(MONSTER_DROP_CHANCE) {
            1
        } else {
            0
        };

        (0..rolls).filter_map(|_| self.roll(zone_id, rng)).collect()
    }
}

impl Default for LootRegistry {
    fn default() -> Self {
        Self::new()
    }
}
