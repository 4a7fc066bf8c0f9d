use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::stats::{CombatStats, Combatant};
use crate::data::{EquipmentSlot, Rarity, StatBonus};
use crate::geometry::{Bounds, Vec2};
use crate::inventory::{EquipmentItem, Inventory};

// ============================================================================
// Player Constants
// ============================================================================

pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_ATTACK_RANGE: f32 = 3.0;
pub const PLAYER_ATTACK_COOLDOWN: f32 = 0.5;
pub const FIRST_LEVEL_XP: u32 = 100;

const BASE_HEALTH: f32 = 100.0;
const HEALTH_PER_LEVEL: f32 = 20.0;
const BASE_DAMAGE: f32 = 20.0;
const DAMAGE_PER_LEVEL: f32 = 5.0;

/// Starting position in the centre of zone 1
pub const PLAYER_SPAWN: Vec2 = Vec2 { x: -50.0, z: -50.0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    Alive,
    /// Health hit zero; a respawn is queued
    Downed,
}

// ============================================================================
// Player
// ============================================================================

pub struct Player {
    pub stats: CombatStats,
    pub state: PlayerState,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub inventory: Inventory,
    pub spawn_point: Vec2,
}

impl Player {
    /// Level 1 player at `spawn_point` wielding the starter sword
    pub fn new(spawn_point: Vec2) -> Self {
        let mut stats = CombatStats::new(spawn_point, BASE_HEALTH, BASE_DAMAGE);
        stats.speed = PLAYER_SPEED;
        stats.attack_range = PLAYER_ATTACK_RANGE;
        stats.attack_cooldown_time = PLAYER_ATTACK_COOLDOWN;

        let mut player = Self {
            stats,
            state: PlayerState::Alive,
            level: 1,
            xp: 0,
            xp_to_next_level: FIRST_LEVEL_XP,
            inventory: Inventory::new(),
            spawn_point,
        };

        let starter = player.inventory.add_equipment(EquipmentItem::new(
            "simple_sword",
            "Simple Sword",
            EquipmentSlot::Weapon,
            StatBonus { damage: 8.0, health: 0.0 },
            Rarity::Common,
        ));
        player.equip(starter);
        player.stats.health = player.stats.max_health;
        player
    }

    /// Player power used for zone gating
    pub fn power(&self) -> f32 {
        self.stats.damage
    }

    /// Base stats from level plus every worn item
    pub fn recalculate_stats(&mut self) {
        let level = (self.level - 1) as f32;
        let bonus = self.inventory.equipped_bonus();
        self.stats.max_health = BASE_HEALTH + level * HEALTH_PER_LEVEL + bonus.health;
        self.stats.damage = BASE_DAMAGE + level * DAMAGE_PER_LEVEL + bonus.damage;
        if self.stats.health > self.stats.max_health {
            self.stats.health = self.stats.max_health;
        }
    }

    pub fn equip(&mut self, instance_id: Uuid) -> bool {
        let equipped = self.inventory.equip(instance_id).is_some();
        if equipped {
            self.recalculate_stats();
        }
        equipped
    }

    /// Called with equipment pulled out of the inventory (e.g. eaten by a
    /// craft); worn pieces leave their slot.
    pub fn handle_equipment_removed(&mut self, removed: &[EquipmentItem]) {
        if removed.iter().any(|item| item.equipped) {
            self.recalculate_stats();
        }
    }

    /// Equip `instance_id` if its slot is empty or it beats the current piece
    pub fn equip_if_better(&mut self, instance_id: Uuid) -> bool {
        let Some(candidate) = self
            .inventory
            .equipment()
            .iter()
            .find(|e| e.instance_id == instance_id)
        else {
            return false;
        };

        let better = match self.inventory.equipped(candidate.slot) {
            Some(current) => candidate.stats.improves_on(&current.stats),
            None => true,
        };

        better && self.equip(instance_id)
    }

    /// Add XP, levelling as many times as it covers. Returns levels gained.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        while self.xp >= self.xp_to_next_level {
            self.xp -= self.xp_to_next_level;
            self.level += 1;
            self.xp_to_next_level = (self.xp_to_next_level as f32 * 1.5).floor() as u32;
            self.recalculate_stats();
            self.stats.health = self.stats.max_health;
            gained += 1;
            info!("Level up! Now level {}", self.level);
        }
        gained
    }

    /// Drink the strongest healing consumable. Returns (item id, healed).
    pub fn use_health_potion(&mut self) -> Option<(String, f32)> {
        let (id, healing) = self
            .inventory
            .best_healing_consumable()
            .map(|(id, healing)| (id.to_string(), healing))?;
        self.inventory.remove_item(&id, 1);
        let healed = self.stats.heal(healing);
        Some((id, healed))
    }

    /// Move by `intent * speed * dt`, one axis at a time; an axis step that
    /// `blocked` rejects is dropped. Result is clamped to `world`.
    pub fn apply_movement(
        &mut self,
        intent: Vec2,
        dt: f32,
        world: &Bounds,
        blocked: impl Fn(Vec2) -> bool,
    ) {
        if !self.is_alive() {
            return;
        }
        let dir = intent.normalized();
        if dir == Vec2::ZERO {
            return;
        }
        let step = self.stats.speed * dt;
        let mut pos = self.stats.position;

        let next = world.clamp(pos.offset(dir.x * step, 0.0));
        if !blocked(next) {
            pos = next;
        }
        let next = world.clamp(pos.offset(0.0, dir.z * step));
        if !blocked(next) {
            pos = next;
        }

        self.stats.position = pos;
    }

    /// Back to full health at the spawn point
    pub fn respawn(&mut self) {
        self.stats.health = self.stats.max_health;
        self.stats.position = self.spawn_point;
        self.stats.attack_cooldown = 0.0;
        self.state = PlayerState::Alive;
        info!("Player respawned at ({}, {})", self.spawn_point.x, self.spawn_point.z);
    }
}

impl Combatant for Player {
    fn stats(&self) -> &CombatStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut CombatStats {
        &mut self.stats
    }

    fn take_damage(&mut self, amount: f32) -> bool {
        if self.state == PlayerState::Downed {
            return false;
        }
        self.stats.apply_damage(amount);
        if self.stats.health <= 0.0 {
            self.state = PlayerState::Downed;
            info!("Player died");
            true
        } else {
            false
        }
    }

    fn is_alive(&self) -> bool {
        self.state == PlayerState::Alive
    }
}
