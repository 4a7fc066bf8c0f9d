use serde::Serialize;

use crate::geometry::Vec2;
use crate::zone::ZoneId;

/// Everything observable that happened during a tick, in the order it
/// happened. The HUD turns these into transient messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    ZoneUnlocked { zone_id: ZoneId, name: String },
    BarrierRemoved { a: ZoneId, b: ZoneId },
    FogCleared { zone_id: ZoneId },
    BossSpawned { monster_id: u64, zone_id: ZoneId, name: String, position: Vec2 },
    MonsterSpawned { monster_id: u64, zone_id: ZoneId },
    AttackStarted,
    AttackResolved { hits: usize, damage: f32 },
    MonsterKilled { monster_id: u64, name: String, xp: u32, boss: bool },
    LootDropped { item_id: String, position: Vec2 },
    ItemPickedUp { item_id: String, name: String },
    PlayerHit { damage: f32, health: f32 },
    AreaTelegraph { monster_id: u64, position: Vec2, radius: f32 },
    AreaAttackLanded { monster_id: u64, damage: f32 },
    AreaAttackEvaded { monster_id: u64 },
    PlayerDied,
    PlayerRespawned,
    LevelUp { level: u32 },
    PotionUsed { item_id: String, healed: f32 },
    Crafted { recipe_id: String, name: String, equipped: bool },
    Equipped { item_id: String },
    SpeedChanged { speed: f32 },
    PanelOpened { panel: Panel },
    /// Transient on-screen text ("Missing materials", "No health potions")
    Message { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Inventory,
    Crafting,
}
