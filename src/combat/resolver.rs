use rand::Rng;
use tracing::debug;

use super::damage::calculate_damage;
use super::monster::Monster;
use super::player::Player;
use super::stats::Combatant;
use crate::geometry::Vec2;

/// A monster that died to a player swing
#[derive(Debug, Clone, PartialEq)]
pub struct Kill {
    pub monster_id: u64,
    pub name: String,
    pub position: Vec2,
    pub xp_reward: u32,
    pub is_boss: bool,
    pub trophy: Option<String>,
}

#[derive(Debug, Default)]
pub struct MeleeReport {
    pub hits: usize,
    pub damage_dealt: f32,
    pub kills: Vec<Kill>,
}

/// Start the player's swing if the cooldown allows. The hit itself lands
/// later through `resolve_melee`.
pub fn request_attack(player: &mut Player) -> bool {
    if !player.can_attack() {
        return false;
    }
    player.stats.start_cooldown();
    true
}

/// Land a swing against every live monster in range of where the player
/// stands now. Each kill is reported exactly once.
pub fn resolve_melee<R: Rng>(player: &Player, monsters: &mut [Monster], rng: &mut R) -> MeleeReport {
    let mut report = MeleeReport::default();
    if !player.is_alive() {
        return report;
    }

    let origin = player.position();
    let range = player.stats.attack_range;
    for monster in monsters.iter_mut() {
        if !monster.is_alive() || !origin.within(monster.position(), range) {
            continue;
        }

        let damage = calculate_damage(player.stats.damage, rng);
        report.hits += 1;
        report.damage_dealt += damage;

        if monster.take_damage(damage) {
            debug!("{} ({}) slain", monster.name, monster.id);
            report.kills.push(Kill {
                monster_id: monster.id,
                name: monster.name.clone(),
                position: monster.position(),
                xp_reward: monster.xp_reward,
                is_boss: monster.is_boss(),
                trophy: monster.trophy.clone(),
            });
        }
    }

    report
}
