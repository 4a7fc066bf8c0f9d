//! Loot Table Definitions

use serde::Deserialize;

use crate::zone::ZoneId;

// ============================================================================
// Raw TOML Structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawLootEntry {
    pub item_id: String,
    pub chance: f64,
}

/// One `[zone_N]` table
#[derive(Debug, Clone, Deserialize)]
pub struct RawLootTable {
    pub zone_id: ZoneId,
    #[serde(default)]
    pub entries: Vec<RawLootEntry>,
}

// ============================================================================
// Resolved Structures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LootEntry {
    pub item_id: String,
    pub chance: f64,
}

/// Ordered entries for one zone. Chances need not sum to 1; leftover mass
/// is "no drop".
#[derive(Debug, Clone)]
pub struct LootTable {
    pub zone_id: ZoneId,
    pub entries: Vec<LootEntry>,
}

impl LootTable {
    pub fn from_raw(raw: &RawLootTable) -> Self {
        Self {
            zone_id: raw.zone_id,
            entries: raw
                .entries
                .iter()
                .map(|e| LootEntry {
                    item_id: e.item_id.clone(),
                    chance: e.chance.max(0.0),
                })
                .collect(),
        }
    }

    /// Walk the entries in declared order, accumulating chance, and return
    /// the first entry whose running total reaches `u`.
    pub fn roll(&self, u: f64) -> Option<&str> {
        let mut cumulative = 0.0;
        for entry in &self.entries {
            cumulative += entry.chance;
            if u <= cumulative {
                return Some(&entry.item_id);
            }
        }
        None
    }

    pub fn total_chance(&self) -> f64 {
        self.entries.iter().map(|e| e.chance).sum()
    }
}
