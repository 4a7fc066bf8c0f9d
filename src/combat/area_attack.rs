use serde::Serialize;

use crate::geometry::Vec2;
use crate::world::BarrierSystem;

pub const AREA_ATTACK_COOLDOWN: f32 = 5.0;
pub const AREA_ATTACK_RANGE: f32 = 5.0;
pub const AREA_ATTACK_WINDUP: f32 = 0.45;
pub const AREA_DAMAGE_MULTIPLIER: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum AreaAttackPhase {
    Ready,
    Telegraphing { remaining: f32 },
}

/// How an expired telegraph played out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaOutcome {
    Hit { damage: f32 },
    /// Target left range or sight during the windup; cooldown stays spent
    Cancelled,
}

/// Boss-only slam: a telegraph, then a range (and sight) check at expiry.
/// The cooldown is committed when the telegraph starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaAttack {
    pub cooldown: f32,
    pub cooldown_time: f32,
    pub range: f32,
    pub windup: f32,
    pub phase: AreaAttackPhase,
}

impl AreaAttack {
    pub fn new(windup: f32) -> Self {
        Self {
            cooldown: 0.0,
            cooldown_time: AREA_ATTACK_COOLDOWN,
            range: AREA_ATTACK_RANGE,
            windup,
            phase: AreaAttackPhase::Ready,
        }
    }

    pub fn is_telegraphing(&self) -> bool {
        matches!(self.phase, AreaAttackPhase::Telegraphing { .. })
    }

    /// Advance timers. Returns true on the tick the windup runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.cooldown = (self.cooldown - dt).max(0.0);
        if let AreaAttackPhase::Telegraphing { remaining } = &mut self.phase {
            *remaining -= dt;
            return *remaining <= 0.0;
        }
        false
    }

    /// Begin a telegraph if none is running, the cooldown has elapsed and
    /// the target is in range.
    pub fn try_start(&mut self, origin: Vec2, target: Vec2) -> bool {
        if self.is_telegraphing() || self.cooldown > 0.0 || !origin.within(target, self.range) {
            return false;
        }
        self.cooldown = self.cooldown_time;
        self.phase = AreaAttackPhase::Telegraphing {
            remaining: self.windup,
        };
        true
    }

    /// Settle the pending telegraph against where the target is now.
    pub fn resolve(
        &mut self,
        origin: Vec2,
        base_damage: f32,
        target: Vec2,
        target_alive: bool,
        sight: Option<&dyn BarrierSystem>,
    ) -> AreaOutcome {
        self.phase = AreaAttackPhase::Ready;

        let in_range = origin.within(target, self.range);
        let visible = sight.map_or(true, |s| s.has_line_of_sight(origin, target));

        if target_alive && in_range && visible {
            AreaOutcome::Hit {
                damage: base_damage * AREA_DAMAGE_MULTIPLIER,
            }
        } else {
            AreaOutcome::Cancelled
        }
    }

    /// Drop any pending telegraph (boss died mid-windup)
    pub fn cancel(&mut self) {
        self.phase = AreaAttackPhase::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blind;

    impl BarrierSystem for Blind {
        fn remove_barrier_between(&mut self, _: u32, _: u32) -> bool {
            false
        }
        fn has_line_of_sight(&self, _: Vec2, _: Vec2) -> bool {
            false
        }
        fn blocks_movement(&self, _: Vec2) -> bool {
            false
        }
    }

    #[test]
    fn test_telegraph_commits_cooldown() {
        let mut area = AreaAttack::new(AREA_ATTACK_WINDUP);
        assert!(area.try_start(Vec2::ZERO, Vec2::new(3.0, 0.0)));
        assert_eq!(area.cooldown, AREA_ATTACK_COOLDOWN);
        assert!(area.is_telegraphing());
        // No stacking while the first is pending
        assert!(!area.try_start(Vec2::ZERO, Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn test_out_of_range_never_starts() {
        let mut area = AreaAttack::new(AREA_ATTACK_WINDUP);
        assert!(!area.try_start(Vec2::ZERO, Vec2::new(6.0, 0.0)));
        assert_eq!(area.cooldown, 0.0);
    }

    #[test]
    fn test_windup_expiry() {
        let mut area = AreaAttack::new(0.45);
        area.try_start(Vec2::ZERO, Vec2::new(1.0, 0.0));
        assert!(!area.tick(0.2));
        assert!(!area.tick(0.2));
        assert!(area.tick(0.1));
    }

    #[test]
    fn test_escape_during_windup_cancels() {
        let mut area = AreaAttack::new(0.45);
        area.try_start(Vec2::ZERO, Vec2::new(2.0, 0.0));
        area.tick(0.45);
        let outcome = area.resolve(Vec2::ZERO, 30.0, Vec2::new(8.0, 0.0), true, None);
        assert_eq!(outcome, AreaOutcome::Cancelled);
        assert!(!area.is_telegraphing());
        assert!(area.cooldown > 0.0);
    }

    #[test]
    fn test_hit_uses_multiplier_and_sight() {
        let mut area = AreaAttack::new(0.45);
        area.try_start(Vec2::ZERO, Vec2::new(2.0, 0.0));
        let outcome = area.resolve(Vec2::ZERO, 30.0, Vec2::new(2.0, 0.0), true, None);
        assert_eq!(outcome, AreaOutcome::Hit { damage: 45.0 });

        area.cooldown = 0.0;
        area.try_start(Vec2::ZERO, Vec2::new(2.0, 0.0));
        let outcome = area.resolve(Vec2::ZERO, 30.0, Vec2::new(2.0, 0.0), true, Some(&Blind));
        assert_eq!(outcome, AreaOutcome::Cancelled);
    }
}
