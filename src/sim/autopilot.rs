//! Scripted player for headless runs: hunts the nearest monster, drinks when
//! low and visits the smith whenever a better piece of gear is affordable.

use super::context::SimulationContext;
use super::input::InputEvent;
use crate::combat::Combatant;
use crate::crafting::RecipeOutput;
use crate::geometry::Vec2;

/// Health fraction below which a potion is drunk
pub const LOW_HEALTH_FRACTION: f32 = 0.3;

#[derive(Debug, Default)]
pub struct Autopilot;

impl Autopilot {
    pub fn new() -> Self {
        Self
    }

    /// Inputs for this tick, derived from a read-only look at the world
    pub fn plan(&self, ctx: &SimulationContext) -> Vec<InputEvent> {
        let player = ctx.player();
        if !player.is_alive() {
            return vec![InputEvent::Move(Vec2::ZERO)];
        }

        let mut inputs = Vec::new();
        if player.stats.health_fraction() < LOW_HEALTH_FRACTION
            && player.inventory.best_healing_consumable().is_some()
        {
            inputs.push(InputEvent::UsePotion);
        }

        if let Some(recipe_id) = self.next_upgrade(ctx) {
            if ctx.near_smith() {
                inputs.push(InputEvent::Move(Vec2::ZERO));
                inputs.push(InputEvent::Craft { recipe_id });
            } else {
                inputs.push(InputEvent::Move(direction(player.position(), ctx.config().smith_position)));
            }
            return inputs;
        }

        let origin = player.position();
        let nearest = ctx
            .monsters()
            .iter()
            .filter(|m| m.is_alive())
            .min_by(|a, b| {
                origin
                    .distance_sq(a.position())
                    .total_cmp(&origin.distance_sq(b.position()))
            });

        match nearest {
            Some(monster) if origin.within(monster.position(), player.stats.attack_range * 0.8) => {
                inputs.push(InputEvent::Move(Vec2::ZERO));
                if !ctx.config().auto_attack {
                    inputs.push(InputEvent::Attack);
                }
            }
            Some(monster) => inputs.push(InputEvent::Move(direction(origin, monster.position()))),
            None => inputs.push(InputEvent::Move(Vec2::ZERO)),
        }
        inputs
    }

    /// Lowest-tier affordable equipment recipe that beats what is worn
    fn next_upgrade(&self, ctx: &SimulationContext) -> Option<String> {
        let inventory = &ctx.player().inventory;
        ctx.recipes()
            .sorted()
            .into_iter()
            .filter(|recipe| ctx.recipes().can_craft(&recipe.id, inventory))
            .find(|recipe| match &recipe.output {
                RecipeOutput::Equipment { slot, stats, .. } => inventory
                    .equipped(*slot)
                    .is_none_or(|current| stats.improves_on(&current.stats)),
                _ => false,
            })
            .map(|recipe| recipe.id.clone())
    }
}

fn direction(from: Vec2, to: Vec2) -> Vec2 {
    Vec2::new(to.x - from.x, to.z - from.z).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Monster;
    use crate::config::SimulationConfig;
    use crate::data::GameData;
    use crate::sim::events::SimEvent;
    use crate::zone::MonsterConfig;

    fn context() -> SimulationContext {
        let config = SimulationConfig {
            seed: Some(5),
            ..SimulationConfig::default()
        };
        SimulationContext::new(config, GameData::builtin().unwrap()).unwrap()
    }

    #[test]
    fn test_drinks_when_low() {
        let mut ctx = context();
        ctx.player_mut().stats.health = 20.0;
        assert!(!Autopilot::new().plan(&ctx).contains(&InputEvent::UsePotion));

        ctx.player_mut().inventory.add_consumable("health_potion_small", 1, 40.0);
        assert!(Autopilot::new().plan(&ctx).contains(&InputEvent::UsePotion));
    }

    #[test]
    fn test_walks_to_smith_then_crafts() {
        let mut ctx = context();
        ctx.player_mut().inventory.add_material("iron_ore", 10);
        ctx.player_mut().inventory.add_material("leather_scraps", 5);

        let autopilot = Autopilot::new();
        let mut crafted = false;
        for _ in 0..200 {
            for input in autopilot.plan(&ctx) {
                ctx.push_input(input);
            }
            let events = ctx.tick(0.05);
            if events.iter().any(|e| matches!(e, SimEvent::Crafted { .. })) {
                crafted = true;
                break;
            }
        }
        assert!(crafted);
        assert!(ctx.near_smith());
        assert_eq!(ctx.player().power(), 30.0);
    }

    #[test]
    fn test_hunts_nearest_monster() {
        let mut ctx = context();
        let origin = ctx.player().position();
        let config = MonsterConfig::default();
        let far = Monster::regular(1, 1, origin.offset(0.0, 20.0), &config);
        let near = Monster::regular(2, 1, origin.offset(10.0, 0.0), &config);
        let plan = plan_against(&mut ctx, vec![far, near]);
        assert_eq!(plan, vec![InputEvent::Move(Vec2::new(1.0, 0.0))]);
    }

    fn plan_against(ctx: &mut SimulationContext, monsters: Vec<Monster>) -> Vec<InputEvent> {
        ctx.insert_monsters(monsters);
        Autopilot::new().plan(ctx)
    }
}
