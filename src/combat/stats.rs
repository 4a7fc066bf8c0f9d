use serde::Serialize;

use crate::geometry::Vec2;

/// The shape every fighter shares: where it is, how hurt it is and whether
/// its attack is ready.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatStats {
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    /// Seconds until the next attack is allowed; attack only at <= 0
    pub attack_cooldown: f32,
    pub attack_cooldown_time: f32,
    pub attack_range: f32,
    pub speed: f32,
}

impl CombatStats {
    pub fn new(position: Vec2, max_health: f32, damage: f32) -> Self {
        Self {
            position,
            health: max_health,
            max_health,
            damage,
            attack_cooldown: 0.0,
            attack_cooldown_time: 1.0,
            attack_range: 2.0,
            speed: 1.0,
        }
    }

    pub fn tick_cooldown(&mut self, dt: f32) {
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
    }

    pub fn can_attack(&self) -> bool {
        self.attack_cooldown <= 0.0
    }

    pub fn start_cooldown(&mut self) {
        self.attack_cooldown = self.attack_cooldown_time;
    }

    pub fn in_attack_range(&self, target: Vec2) -> bool {
        self.position.within(target, self.attack_range)
    }

    /// Subtract health, clamped to [0, max]. Returns the amount applied.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        before - self.health
    }

    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        self.health - before
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }
}

/// Capabilities shared by the player, monsters and bosses: movable,
/// attackable and damageable.
pub trait Combatant {
    fn stats(&self) -> &CombatStats;
    fn stats_mut(&mut self) -> &mut CombatStats;

    /// Apply damage. Returns true only on the hit that brings health to zero.
    fn take_damage(&mut self, amount: f32) -> bool;

    fn is_alive(&self) -> bool;

    fn position(&self) -> Vec2 {
        self.stats().position
    }

    fn set_position(&mut self, position: Vec2) {
        self.stats_mut().position = position;
    }

    fn can_attack(&self) -> bool {
        self.is_alive() && self.stats().can_attack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_clamps() {
        let mut stats = CombatStats::new(Vec2::ZERO, 100.0, 10.0);
        assert_eq!(stats.apply_damage(30.0), 30.0);
        assert_eq!(stats.apply_damage(500.0), 70.0);
        assert_eq!(stats.health, 0.0);
        assert_eq!(stats.apply_damage(-5.0), 0.0);
        assert_eq!(stats.heal(1000.0), 100.0);
        assert_eq!(stats.health, stats.max_health);
    }

    #[test]
    fn test_cooldown_counts_down_to_zero() {
        let mut stats = CombatStats::new(Vec2::ZERO, 10.0, 1.0);
        stats.attack_cooldown_time = 0.5;
        stats.start_cooldown();
        assert!(!stats.can_attack());
        stats.tick_cooldown(0.3);
        assert!(!stats.can_attack());
        stats.tick_cooldown(0.3);
        assert!(stats.can_attack());
        assert_eq!(stats.attack_cooldown, 0.0);
    }
}
