use rand::Rng;
use serde::Serialize;
use std::f32::consts::TAU;
use tracing::debug;

use super::area_attack::{AreaAttack, AreaOutcome};
use super::stats::{CombatStats, Combatant};
use crate::geometry::{Bounds, Vec2};
use crate::world::BarrierSystem;
use crate::zone::{BossConfig, MonsterConfig, ZoneId};

// ============================================================================
// Monster Constants
// ============================================================================

pub const MONSTER_BASE_SPEED: f32 = 2.0;
pub const MONSTER_BASE_DETECTION: f32 = 20.0;
pub const MONSTER_ATTACK_RANGE: f32 = 2.0;
pub const MONSTER_BASE_COOLDOWN: f32 = 1.5;
pub const MONSTER_XP: u32 = 25;
pub const BOSS_XP: u32 = 125;

const WANDER_SPEED_FACTOR: f32 = 0.3;
const WANDER_MIN_SECS: f32 = 2.0;
const WANDER_MAX_SECS: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterState {
    Idle,
    Pursuing,
    Attacking,
    Dead,
}

/// Boss-only state lives in the Boss variant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonsterKind {
    Regular,
    Boss(AreaAttack),
}

/// What a monster wants the world to do this tick
#[derive(Debug, Clone, PartialEq)]
pub enum MonsterAction {
    Strike { damage: f32 },
    TelegraphStarted { position: Vec2, radius: f32 },
    AreaResolved(AreaOutcome),
}

/// Read-only view of the player and world handed to each monster update
pub struct MonsterEnv<'a> {
    pub target: Vec2,
    pub target_alive: bool,
    pub world: Bounds,
    pub barriers: Option<&'a dyn BarrierSystem>,
}

// ============================================================================
// Monster
// ============================================================================

#[derive(Debug, Clone)]
pub struct Monster {
    pub id: u64,
    pub name: String,
    pub zone_id: ZoneId,
    pub stats: CombatStats,
    pub ferocity: f32,
    pub detection_range: f32,
    pub xp_reward: u32,
    pub state: MonsterState,
    pub kind: MonsterKind,
    /// Item always dropped on death (boss trophies)
    pub trophy: Option<String>,
    wander_heading: Vec2,
    wander_timer: f32,
}

impl Monster {
    fn with_ferocity(
        id: u64,
        name: String,
        zone_id: ZoneId,
        position: Vec2,
        health: f32,
        damage: f32,
        ferocity: f32,
    ) -> Self {
        let ferocity = ferocity.max(0.1);
        let mut stats = CombatStats::new(position, health, damage);
        stats.speed = MONSTER_BASE_SPEED * ferocity;
        stats.attack_cooldown_time = MONSTER_BASE_COOLDOWN / ferocity;
        stats.attack_range = MONSTER_ATTACK_RANGE;

        Self {
            id,
            name,
            zone_id,
            stats,
            ferocity,
            detection_range: MONSTER_BASE_DETECTION * (1.0 + (ferocity - 1.0) * 0.5),
            xp_reward: MONSTER_XP,
            state: MonsterState::Idle,
            kind: MonsterKind::Regular,
            trophy: None,
            wander_heading: Vec2::ZERO,
            wander_timer: 0.0,
        }
    }

    /// A regular monster configured from its zone
    pub fn regular(id: u64, zone_id: ZoneId, position: Vec2, config: &MonsterConfig) -> Self {
        Self::with_ferocity(
            id,
            format!("Zone {} Monster", zone_id),
            zone_id,
            position,
            config.health,
            config.damage,
            config.ferocity,
        )
    }

    /// Replace the generated name
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn boss(id: u64, zone_id: ZoneId, position: Vec2, config: &BossConfig, windup: f32) -> Self {
        let mut boss = Self::with_ferocity(
            id,
            config.name.clone(),
            zone_id,
            position,
            config.health,
            config.damage,
            config.ferocity,
        );
        boss.xp_reward = BOSS_XP;
        boss.kind = MonsterKind::Boss(AreaAttack::new(windup));
        boss.trophy = config.trophy.clone();
        boss
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, MonsterKind::Boss(_))
    }

    pub fn area_attack(&self) -> Option<&AreaAttack> {
        match &self.kind {
            MonsterKind::Boss(area) => Some(area),
            MonsterKind::Regular => None,
        }
    }

    /// Run one tick of AI. Dead monsters do nothing.
    pub fn update<R: Rng>(&mut self, dt: f32, env: &MonsterEnv<'_>, rng: &mut R) -> Vec<MonsterAction> {
        let mut actions = Vec::new();
        if self.state == MonsterState::Dead {
            return actions;
        }

        self.stats.tick_cooldown(dt);

        // Area attack timers run regardless of what the body is doing
        if let MonsterKind::Boss(area) = &mut self.kind {
            if area.tick(dt) {
                let outcome = area.resolve(
                    self.stats.position,
                    self.stats.damage,
                    env.target,
                    env.target_alive,
                    env.barriers,
                );
                debug!("{} area attack resolved: {:?}", self.name, outcome);
                actions.push(MonsterAction::AreaResolved(outcome));
            } else if env.target_alive && area.try_start(self.stats.position, env.target) {
                actions.push(MonsterAction::TelegraphStarted {
                    position: self.stats.position,
                    radius: area.range,
                });
            }
        }

        if !env.target_alive {
            self.state = MonsterState::Idle;
            self.wander(dt, env, rng);
            return actions;
        }

        let dist_sq = self.stats.position.distance_sq(env.target);
        if dist_sq >= self.detection_range * self.detection_range {
            self.state = MonsterState::Idle;
            self.wander(dt, env, rng);
        } else if !self.stats.in_attack_range(env.target) {
            self.state = MonsterState::Pursuing;
            let dir = Vec2::new(
                env.target.x - self.stats.position.x,
                env.target.z - self.stats.position.z,
            )
            .normalized();
            self.step(dir, self.stats.speed * dt, env);
        } else {
            self.state = MonsterState::Attacking;
            if self.stats.can_attack() {
                self.stats.start_cooldown();
                actions.push(MonsterAction::Strike {
                    damage: self.stats.damage,
                });
            }
        }

        actions
    }

    fn wander<R: Rng>(&mut self, dt: f32, env: &MonsterEnv<'_>, rng: &mut R) {
        self.wander_timer -= dt;
        if self.wander_timer <= 0.0 {
            let angle = rng.gen_range(0.0..TAU);
            self.wander_heading = Vec2::new(angle.cos(), angle.sin());
            self.wander_timer = rng.gen_range(WANDER_MIN_SECS..WANDER_MAX_SECS);
        }
        let heading = self.wander_heading;
        self.step(heading, self.stats.speed * WANDER_SPEED_FACTOR * dt, env);
    }

    /// Move along `dir`; a step into a barrier is reverted
    fn step(&mut self, dir: Vec2, distance: f32, env: &MonsterEnv<'_>) {
        let next = env.world.clamp(self.stats.position.offset(dir.x * distance, dir.z * distance));
        let blocked = env.barriers.map_or(false, |b| b.blocks_movement(next));
        if !blocked {
            self.stats.position = next;
        }
    }
}

impl Combatant for Monster {
    fn stats(&self) -> &CombatStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut CombatStats {
        &mut self.stats
    }

    /// True exactly once: on the hit that takes a live monster to zero.
    fn take_damage(&mut self, amount: f32) -> bool {
        if self.state == MonsterState::Dead {
            return false;
        }
        self.stats.apply_damage(amount);
        if self.stats.health <= 0.0 {
            self.state = MonsterState::Dead;
            if let MonsterKind::Boss(area) = &mut self.kind {
                area.cancel();
            }
            true
        } else {
            false
        }
    }

    fn is_alive(&self) -> bool {
        self.state != MonsterState::Dead
    }
}
