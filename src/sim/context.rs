use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

use super::clock::{SimClock, SpeedControl};
use super::events::{Panel, SimEvent};
use super::input::InputEvent;
use super::scheduler::{DeferredAction, Scheduler};
use super::snapshot::{HudSnapshot, InventorySnapshot, RecipeSnapshot};
use super::spawner::SpawnDirector;
use crate::combat::{self, AreaOutcome, Combatant, Monster, MonsterAction, MonsterEnv, Player, PLAYER_SPAWN};
use crate::config::SimulationConfig;
use crate::crafting::CraftingRegistry;
use crate::data::{GameData, ItemRegistry};
use crate::geometry::Vec2;
use crate::loot::{GroundLoot, GroundLootUpdate, LootRegistry};
use crate::world::{BarrierSystem, FogOfWar, FogSystem, SceneSink, VisualKind, WallGrid};
use crate::zone::{BossConfig, ProgressionController, ZoneDefinition, ZoneGraph, ZoneId};

/// Owns every piece of mutable game state and advances it one tick at a
/// time. World collaborators are optional; requests to a missing one are
/// skipped.
pub struct SimulationContext {
    config: SimulationConfig,
    clock: SimClock,
    graph: ZoneGraph,
    progression: ProgressionController,
    spawner: SpawnDirector,
    scheduler: Scheduler,
    player: Player,
    monsters: Vec<Monster>,
    ground_loot: Vec<GroundLoot>,
    items: ItemRegistry,
    loot: LootRegistry,
    recipes: CraftingRegistry,
    barriers: Option<Box<dyn BarrierSystem>>,
    fog: Option<Box<dyn FogSystem>>,
    scene: Option<Box<dyn SceneSink>>,
    rng: StdRng,
    input: VecDeque<InputEvent>,
    move_intent: Vec2,
    open_panel: Option<Panel>,
    next_monster_id: u64,
    next_loot_id: u64,
    events: Vec<SimEvent>,
}

impl SimulationContext {
    pub fn new(config: SimulationConfig, data: GameData) -> Result<Self, String> {
        let GameData { zones, items, loot, recipes } = data;
        let graph = ZoneGraph::new(zones)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let speed = SpeedControl::new(config.speed_steps.clone(), config.initial_speed_index);

        info!(
            "Simulation ready: {} zones, seed {:?}, speed {}",
            graph.len(),
            config.seed,
            speed.label()
        );

        Ok(Self {
            clock: SimClock::new(speed),
            progression: ProgressionController::new(config.progression_interval_secs),
            spawner: SpawnDirector::new(config.spawn_interval_secs, config.max_monsters),
            scheduler: Scheduler::new(),
            player: Player::new(PLAYER_SPAWN),
            monsters: Vec::new(),
            ground_loot: Vec::new(),
            graph,
            items,
            loot,
            recipes,
            barriers: None,
            fog: None,
            scene: None,
            rng,
            input: VecDeque::new(),
            move_intent: Vec2::ZERO,
            open_panel: None,
            next_monster_id: 1,
            next_loot_id: 1,
            events: Vec::new(),
            config,
        })
    }

    pub fn with_barriers(mut self, barriers: Box<dyn BarrierSystem>) -> Self {
        self.barriers = Some(barriers);
        self
    }

    pub fn with_fog(mut self, fog: Box<dyn FogSystem>) -> Self {
        self.fog = Some(fog);
        self
    }

    pub fn with_scene(mut self, scene: Box<dyn SceneSink>) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Attach the in-process wall grid and fog built from the zone layout
    pub fn with_default_world(self) -> Self {
        let defs: Vec<ZoneDefinition> = self.graph.zones().map(|z| z.def.clone()).collect();
        let walls = WallGrid::from_zones(&defs);
        let fog = FogOfWar::from_graph(&self.graph);
        self.with_barriers(Box::new(walls)).with_fog(Box::new(fog))
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push_back(event);
    }

    #[cfg(test)]
    pub(crate) fn insert_monsters(&mut self, monsters: Vec<Monster>) {
        self.monsters.extend(monsters);
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the world by `real_dt` seconds of wall time, scaled by the
    /// current speed. Phases run in a fixed order: movement, input,
    /// progression, deferred actions, auto-attack, monsters, pickup,
    /// dead-entity removal, spawning.
    pub fn tick(&mut self, real_dt: f64) -> Vec<SimEvent> {
        let dt = self.clock.advance(real_dt);
        let now = self.clock.now();
        let dt32 = dt as f32;

        self.player.stats.tick_cooldown(dt32);
        self.move_player(dt32);

        while let Some(event) = self.input.pop_front() {
            self.handle_input(event, now);
        }

        self.check_progression(now);

        for action in self.scheduler.take_due(now) {
            self.run_deferred(action);
        }

        if self.config.auto_attack {
            self.auto_attack(now);
        }

        self.update_monsters(dt32, now);
        self.pickup_loot();
        self.remove_dead(now);
        self.spawn_monsters(dt);

        std::mem::take(&mut self.events)
    }

    fn move_player(&mut self, dt: f32) {
        let world = self.graph.world_bounds();
        let barriers = self.barriers.as_deref();
        self.player.apply_movement(self.move_intent, dt, &world, |pos| {
            barriers.is_some_and(|b| b.blocks_movement(pos))
        });
    }

    fn handle_input(&mut self, event: InputEvent, now: f64) {
        match event {
            InputEvent::Move(intent) => self.move_intent = intent,
            InputEvent::Attack => self.request_attack(now),
            InputEvent::UsePotion => self.use_potion(),
            InputEvent::OpenInventory => self.open(Panel::Inventory),
            InputEvent::OpenCrafting | InputEvent::Interact => {
                if self.near_smith() {
                    self.open(Panel::Crafting);
                } else {
                    self.message("Find the smith to craft");
                }
            }
            InputEvent::Craft { recipe_id } => self.craft(&recipe_id),
            InputEvent::Equip { instance_id } => {
                if self.player.equip(instance_id) {
                    if let Some(item) = self
                        .player
                        .inventory
                        .equipment()
                        .iter()
                        .find(|e| e.instance_id == instance_id)
                    {
                        let item_id = item.id.clone();
                        self.emit(SimEvent::Equipped { item_id });
                    }
                }
            }
            InputEvent::CycleSpeed => {
                let speed = self.clock.speed.cycle();
                self.emit(SimEvent::SpeedChanged { speed });
            }
        }
    }

    fn request_attack(&mut self, now: f64) {
        if !combat::request_attack(&mut self.player) {
            return;
        }
        self.scheduler
            .schedule(now, self.config.melee_resolve_delay_secs, DeferredAction::ResolveMelee);
        self.emit(SimEvent::AttackStarted);
        self.visual(VisualKind::AttackRing, self.player.position());
    }

    fn use_potion(&mut self) {
        if !self.player.is_alive() {
            return;
        }
        match self.player.use_health_potion() {
            Some((item_id, healed)) => {
                debug!("Drank {} for {}", item_id, healed);
                self.emit(SimEvent::PotionUsed { item_id, healed });
            }
            None => self.message("No health potions"),
        }
    }

    fn craft(&mut self, recipe_id: &str) {
        if !self.near_smith() {
            self.message("Find the smith to craft");
            return;
        }

        match self.recipes.craft(recipe_id, &mut self.player.inventory) {
            Ok(crafted) => {
                self.player.handle_equipment_removed(&crafted.consumed_equipment);
                let equipped = crafted
                    .equipment
                    .is_some_and(|id| self.player.equip_if_better(id));
                self.emit(SimEvent::Crafted {
                    recipe_id: crafted.recipe_id,
                    name: crafted.display_name,
                    equipped,
                });
            }
            Err(e) => {
                warn!("Craft failed: {}", e);
                self.message(&e.to_string());
            }
        }
    }

    fn check_progression(&mut self, now: f64) {
        let Some(unlocked) =
            self.progression
                .check_progression(&mut self.graph, self.player.power(), now)
        else {
            return;
        };

        self.emit(SimEvent::ZoneUnlocked {
            zone_id: unlocked.zone_id,
            name: unlocked.name.clone(),
        });

        if let Some(barriers) = self.barriers.as_mut() {
            for &(a, b) in &unlocked.barriers {
                if barriers.remove_barrier_between(a, b) {
                    self.events.push(SimEvent::BarrierRemoved { a, b });
                }
            }
        }

        if let Some(fog) = self.fog.as_mut() {
            if fog.clear_zone(unlocked.zone_id) {
                self.events.push(SimEvent::FogCleared { zone_id: unlocked.zone_id });
            }
        }

        self.spawn_boss(unlocked.zone_id, unlocked.boss_position, &unlocked.boss);
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::ResolveMelee => self.resolve_melee(),
            DeferredAction::RespawnPlayer => {
                if !self.player.is_alive() {
                    self.player.respawn();
                    self.emit(SimEvent::PlayerRespawned);
                }
            }
            DeferredAction::RespawnBoss { zone_id } => {
                let boss_alive = self
                    .monsters
                    .iter()
                    .any(|m| m.is_boss() && m.zone_id == zone_id && m.is_alive());
                if boss_alive {
                    return;
                }
                if let Some(zone) = self.graph.get(zone_id) {
                    let position = zone.def.bounds.centroid();
                    let config = zone.def.boss.clone();
                    self.spawn_boss(zone_id, position, &config);
                }
            }
        }
    }

    fn resolve_melee(&mut self) {
        if !self.player.is_alive() {
            return;
        }
        let report = combat::resolve_melee(&self.player, &mut self.monsters, &mut self.rng);
        self.emit(SimEvent::AttackResolved {
            hits: report.hits,
            damage: report.damage_dealt,
        });

        for kill in report.kills {
            self.emit(SimEvent::MonsterKilled {
                monster_id: kill.monster_id,
                name: kill.name.clone(),
                xp: kill.xp_reward,
                boss: kill.is_boss,
            });
            self.visual(VisualKind::DeathBurst, kill.position);

            if self.player.gain_xp(kill.xp_reward) > 0 {
                self.emit(SimEvent::LevelUp { level: self.player.level });
                self.visual(VisualKind::LevelUp, self.player.position());
            }

            let zone_id = self.graph.zone_at(kill.position);
            let mut drops = self.loot.generate_loot(zone_id, kill.is_boss, &mut self.rng);
            if let Some(trophy) = kill.trophy {
                drops.push(trophy);
            }
            self.drop_loot(drops, kill.position);
        }
    }

    fn drop_loot(&mut self, drops: Vec<String>, origin: Vec2) {
        if drops.is_empty() {
            return;
        }
        let dropped = GroundLoot::scatter(self.next_loot_id, drops, origin);
        self.next_loot_id += dropped.len() as u64;
        for item in &dropped {
            self.events.push(SimEvent::LootDropped {
                item_id: item.item_id.clone(),
                position: item.position,
            });
        }
        self.ground_loot.extend(dropped);
    }

    fn auto_attack(&mut self, now: f64) {
        if !self.player.can_attack() {
            return;
        }
        let origin = self.player.position();
        let range = self.player.stats.attack_range;
        let target_in_range = self
            .monsters
            .iter()
            .any(|m| m.is_alive() && origin.within(m.position(), range));
        if target_in_range {
            self.request_attack(now);
        }
    }

    fn update_monsters(&mut self, dt: f32, now: f64) {
        let env = MonsterEnv {
            target: self.player.position(),
            target_alive: self.player.is_alive(),
            world: self.graph.world_bounds(),
            barriers: self.barriers.as_deref(),
        };

        let mut pending = Vec::new();
        for monster in self.monsters.iter_mut() {
            for action in monster.update(dt, &env, &mut self.rng) {
                pending.push((monster.id, monster.position(), action));
            }
        }

        for (monster_id, position, action) in pending {
            match action {
                MonsterAction::Strike { damage } => self.damage_player(damage, now),
                MonsterAction::TelegraphStarted { position, radius } => {
                    self.emit(SimEvent::AreaTelegraph { monster_id, position, radius });
                    self.visual(VisualKind::AreaWarning, position);
                }
                MonsterAction::AreaResolved(AreaOutcome::Hit { damage }) => {
                    self.visual(VisualKind::AreaBlast, position);
                    self.emit(SimEvent::AreaAttackLanded { monster_id, damage });
                    self.damage_player(damage, now);
                }
                MonsterAction::AreaResolved(AreaOutcome::Cancelled) => {
                    self.emit(SimEvent::AreaAttackEvaded { monster_id });
                }
            }
        }
    }

    fn damage_player(&mut self, damage: f32, now: f64) {
        if !self.player.is_alive() {
            return;
        }
        let died = self.player.take_damage(damage);
        self.emit(SimEvent::PlayerHit {
            damage,
            health: self.player.stats.health,
        });
        if died {
            self.emit(SimEvent::PlayerDied);
            self.scheduler.schedule(
                now,
                self.config.player_respawn_delay_secs,
                DeferredAction::RespawnPlayer,
            );
        }
    }

    fn pickup_loot(&mut self) {
        if !self.player.is_alive() {
            return;
        }
        let origin = self.player.position();
        let radius = self.config.pickup_radius;
        let (picked, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut self.ground_loot)
            .into_iter()
            .partition(|item| item.in_pickup_range(origin, radius));
        self.ground_loot = remaining;

        for item in picked {
            match self.items.get(&item.item_id) {
                Some(def) => self.player.inventory.add_item(def, 1),
                None => self.player.inventory.add_material(&item.item_id, 1),
            }
            let name = self.items.display_name(&item.item_id);
            debug!("Picked up {}", name);
            self.events.push(SimEvent::ItemPickedUp {
                item_id: item.item_id,
                name,
            });
        }
    }

    fn remove_dead(&mut self, now: f64) {
        let mut fallen_bosses = Vec::new();
        self.monsters.retain(|m| {
            if m.is_alive() {
                return true;
            }
            if m.is_boss() {
                fallen_bosses.push(m.zone_id);
            }
            false
        });

        for zone_id in fallen_bosses {
            debug!("Boss of zone {} returns in {}s", zone_id, self.config.boss_respawn_delay_secs);
            self.scheduler.schedule(
                now,
                self.config.boss_respawn_delay_secs,
                DeferredAction::RespawnBoss { zone_id },
            );
        }
    }

    fn spawn_monsters(&mut self, dt: f64) {
        let barriers = self.barriers.as_deref();
        let spawned = self.spawner.update(
            dt,
            &self.graph,
            self.player.position(),
            self.monsters.len(),
            self.next_monster_id,
            |pos| barriers.is_some_and(|b| b.blocks_movement(pos)),
            &mut self.rng,
        );

        if let Some(monster) = spawned {
            self.next_monster_id += 1;
            self.emit(SimEvent::MonsterSpawned {
                monster_id: monster.id,
                zone_id: monster.zone_id,
            });
            self.monsters.push(monster);
        }
    }

    fn spawn_boss(&mut self, zone_id: ZoneId, position: Vec2, config: &BossConfig) {
        let id = self.next_monster_id;
        self.next_monster_id += 1;

        let boss = Monster::boss(id, zone_id, position, config, self.config.telegraph_windup_secs);
        info!(
            "{} spawned in zone {} at ({}, {})",
            boss.name, zone_id, position.x, position.z
        );
        self.emit(SimEvent::BossSpawned {
            monster_id: id,
            zone_id,
            name: boss.name.clone(),
            position,
        });
        self.visual(VisualKind::BossArrival, position);
        self.monsters.push(boss);
    }

    fn open(&mut self, panel: Panel) {
        self.open_panel = Some(panel);
        self.emit(SimEvent::PanelOpened { panel });
    }

    fn message(&mut self, text: &str) {
        self.emit(SimEvent::Message { text: text.to_string() });
    }

    fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    fn visual(&mut self, kind: VisualKind, position: Vec2) {
        if let Some(scene) = self.scene.as_mut() {
            scene.spawn_visual_at(kind, position);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn speed(&self) -> f32 {
        self.clock.speed.current()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn graph(&self) -> &ZoneGraph {
        &self.graph
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn recipes(&self) -> &CraftingRegistry {
        &self.recipes
    }

    pub fn open_panel(&self) -> Option<Panel> {
        self.open_panel
    }

    pub fn player_zone(&self) -> ZoneId {
        self.graph.zone_at(self.player.position())
    }

    pub fn near_smith(&self) -> bool {
        self.player
            .position()
            .within(self.config.smith_position, self.config.smith_range)
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::from(&self.player)
    }

    pub fn inventory_snapshot(&self) -> InventorySnapshot {
        InventorySnapshot::build(&self.player.inventory, &self.items, &self.recipes)
    }

    pub fn recipe_snapshots(&self) -> Vec<RecipeSnapshot> {
        RecipeSnapshot::list(&self.player.inventory, &self.items, &self.recipes)
    }

    pub fn ground_loot_updates(&self) -> Vec<GroundLootUpdate> {
        self.ground_loot.iter().map(GroundLootUpdate::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EquipmentSlot, Rarity};
    use crate::world::SceneLog;
    use crate::zone::MonsterConfig;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn context() -> SimulationContext {
        let config = SimulationConfig {
            seed: Some(7),
            ..SimulationConfig::default()
        };
        SimulationContext::new(config, GameData::builtin().unwrap()).unwrap()
    }

    /// Barrier double that records removal requests
    #[derive(Clone, Default)]
    struct RecordingBarriers(Rc<RefCell<Vec<(ZoneId, ZoneId)>>>);

    impl BarrierSystem for RecordingBarriers {
        fn remove_barrier_between(&mut self, a: ZoneId, b: ZoneId) -> bool {
            self.0.borrow_mut().push((a, b));
            true
        }

        fn has_line_of_sight(&self, _: Vec2, _: Vec2) -> bool {
            true
        }

        fn blocks_movement(&self, _: Vec2) -> bool {
            false
        }
    }

    fn run(ctx: &mut SimulationContext, ticks: usize, dt: f64) -> Vec<SimEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(ctx.tick(dt));
        }
        events
    }

    #[test]
    fn test_zone_two_unlocks_after_one_second() {
        let removed = RecordingBarriers::default();
        let mut ctx = context().with_barriers(Box::new(removed.clone()));
        ctx.player_mut().stats.damage = 50.0;

        let events = run(&mut ctx, 19, 0.05);
        assert!(!ctx.graph().is_unlocked(2));
        assert!(events.iter().all(|e| !matches!(e, SimEvent::ZoneUnlocked { .. })));

        let events = run(&mut ctx, 6, 0.05);
        assert!(ctx.graph().is_unlocked(2));
        assert!(!ctx.graph().is_unlocked(4));
        assert!(events.contains(&SimEvent::ZoneUnlocked {
            zone_id: 2,
            name: "Desert Wastes".into()
        }));
        assert_eq!(*removed.0.borrow(), vec![(2, 1)]);

        let boss = ctx.monsters().iter().find(|m| m.is_boss()).unwrap();
        assert_eq!(boss.zone_id, 2);
        assert_eq!(boss.stats.max_health, 500.0);
        assert_eq!(boss.stats.damage, 30.0);
        // Boss may have wandered a little since spawning
        assert!(boss.position().within(Vec2::new(0.0, -50.0), 1.0));
    }

    #[test]
    fn test_unlock_drives_default_world() {
        let mut ctx = context().with_default_world();
        ctx.player_mut().stats.damage = 50.0;
        let events = run(&mut ctx, 25, 0.05);
        assert!(events.contains(&SimEvent::BarrierRemoved { a: 2, b: 1 }));
        assert!(events.contains(&SimEvent::FogCleared { zone_id: 2 }));
    }

    #[test]
    fn test_craft_iron_sword_at_smith() {
        let mut ctx = context();
        let smith = ctx.config().smith_position;
        ctx.player_mut().set_position(smith);
        ctx.player_mut().inventory.add_material("iron_ore", 10);
        ctx.player_mut().inventory.add_material("leather_scraps", 5);

        ctx.push_input(InputEvent::Craft { recipe_id: "iron_sword".into() });
        let events = ctx.tick(0.0);
        assert!(events.contains(&SimEvent::Crafted {
            recipe_id: "iron_sword".into(),
            name: "Iron Sword".into(),
            equipped: true,
        }));

        let inv = &ctx.player().inventory;
        assert_eq!(inv.item_count("iron_ore"), 0);
        assert!(!inv.materials().contains_key("iron_ore"));
        assert!(!inv.materials().contains_key("leather_scraps"));
        let sword = inv.equipment().iter().find(|e| e.id == "iron_sword").unwrap();
        assert_eq!(sword.slot, EquipmentSlot::Weapon);
        assert_eq!(sword.stats.damage, 10.0);
        assert_eq!(sword.rarity, Rarity::Uncommon);
        assert_eq!(ctx.player().power(), 30.0);
    }

    #[test]
    fn test_craft_away_from_smith_is_refused() {
        let mut ctx = context();
        ctx.player_mut().inventory.add_material("iron_ore", 10);
        ctx.player_mut().inventory.add_material("leather_scraps", 5);

        ctx.push_input(InputEvent::Craft { recipe_id: "iron_sword".into() });
        ctx.push_input(InputEvent::OpenCrafting);
        let events = ctx.tick(0.0);
        assert!(events.iter().all(|e| !matches!(e, SimEvent::Crafted { .. })));
        assert_eq!(ctx.player().inventory.item_count("iron_ore"), 10);
        assert_eq!(ctx.open_panel(), None);

        ctx.push_input(InputEvent::OpenInventory);
        ctx.tick(0.0);
        assert_eq!(ctx.open_panel(), Some(Panel::Inventory));
    }

    #[test]
    fn test_kill_awards_xp_once_and_clears_corpse() {
        let mut ctx = context();
        let pos = ctx.player().position().offset(1.0, 0.0);
        ctx.monsters.push(Monster::regular(
            99,
            1,
            pos,
            &MonsterConfig { health: 1.0, damage: 0.0, ferocity: 1.0 },
        ));

        let events = run(&mut ctx, 10, 0.05);
        let kills = events
            .iter()
            .filter(|e| matches!(e, SimEvent::MonsterKilled { monster_id: 99, .. }))
            .count();
        assert_eq!(kills, 1);
        assert_eq!(ctx.player().xp, 25);
        assert!(ctx.monsters().iter().all(|m| m.id != 99));
    }

    #[test]
    fn test_boss_kill_drops_trophy_and_respawns() {
        let scene = SceneLog::new();
        let mut ctx = context();
        ctx.scene = Some(Box::new(scene));

        let centre = ctx.graph().get(5).unwrap().def.bounds.centroid();
        ctx.player_mut().set_position(centre);
        let mut config = ctx.graph().get(5).unwrap().def.boss.clone();
        config.health = 1.0;
        config.damage = 0.0;
        ctx.spawn_boss(5, centre, &config);

        let events = run(&mut ctx, 10, 0.05);
        let drops = events
            .iter()
            .filter(|e| matches!(e, SimEvent::LootDropped { .. }))
            .count();
        assert!((2..=4).contains(&drops), "{} drops", drops);
        assert_eq!(ctx.player().inventory.item_count("frost_relic"), 1);
        assert!(ctx.monsters().iter().all(|m| !m.is_boss()));

        run(&mut ctx, 62, 1.0);
        assert!(ctx.monsters().iter().any(|m| m.is_boss() && m.zone_id == 5));
    }

    #[test]
    fn test_swing_checks_range_when_it_lands() {
        let config = SimulationConfig {
            seed: Some(7),
            auto_attack: false,
            ..SimulationConfig::default()
        };
        let mut ctx = SimulationContext::new(config, GameData::builtin().unwrap()).unwrap();
        let origin = ctx.player().position();
        ctx.monsters.push(Monster::regular(
            99,
            1,
            origin.offset(1.0, 0.0),
            &MonsterConfig { health: 1.0, damage: 0.0, ferocity: 1.0 },
        ));

        ctx.push_input(InputEvent::Attack);
        let events = ctx.tick(0.05);
        assert!(events.contains(&SimEvent::AttackStarted));

        // Step back before the swing resolves
        ctx.monsters[0].stats.position = origin.offset(10.0, 0.0);
        let delay = ctx.config().melee_resolve_delay_secs;
        let ticks = (delay / 0.05).ceil() as usize + 2;
        let events = run(&mut ctx, ticks, 0.05);

        assert!(events.contains(&SimEvent::AttackResolved { hits: 0, damage: 0.0 }));
        assert!(events.iter().all(|e| !matches!(e, SimEvent::MonsterKilled { .. })));
        let monster = ctx.monsters().iter().find(|m| m.id == 99).unwrap();
        assert_eq!(monster.stats.health, monster.stats.max_health);
        assert_eq!(ctx.player().xp, 0);
    }

    #[test]
    fn test_death_cancels_swing_and_respawns() {
        let mut ctx = context();
        ctx.player_mut().stats.health = 1.0;
        let pos = ctx.player().position().offset(1.0, 0.0);
        ctx.monsters.push(Monster::regular(
            99,
            1,
            pos,
            &MonsterConfig { health: 1.0, damage: 5.0, ferocity: 1.0 },
        ));

        let events = ctx.tick(0.05);
        assert!(events.contains(&SimEvent::AttackStarted));
        assert!(events.contains(&SimEvent::PlayerDied));

        // The queued swing lands on nobody while the player is down
        let events = run(&mut ctx, 5, 0.05);
        assert!(events.iter().all(|e| !matches!(e, SimEvent::MonsterKilled { .. })));
        assert!(ctx.monsters().iter().any(|m| m.id == 99));

        let events = run(&mut ctx, 60, 0.05);
        assert!(events.contains(&SimEvent::PlayerRespawned));
        assert!(ctx.player().is_alive());
    }

    #[test]
    fn test_potion_and_speed_inputs() {
        let mut ctx = context();
        ctx.push_input(InputEvent::UsePotion);
        let events = ctx.tick(0.1);
        assert!(events.contains(&SimEvent::Message { text: "No health potions".into() }));

        ctx.player_mut().inventory.add_consumable("health_potion_small", 1, 40.0);
        ctx.player_mut().stats.health = 30.0;
        ctx.push_input(InputEvent::UsePotion);
        ctx.push_input(InputEvent::CycleSpeed);
        let events = ctx.tick(0.1);
        assert!(events.contains(&SimEvent::PotionUsed {
            item_id: "health_potion_small".into(),
            healed: 40.0
        }));
        assert!(events.contains(&SimEvent::SpeedChanged { speed: 2.0 }));

        ctx.tick(0.1);
        assert!((ctx.now() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_spawner_fills_world_over_time() {
        let mut ctx = context();
        let events = run(&mut ctx, 200, 0.05);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, SimEvent::MonsterSpawned { .. }))
            .count();
        assert_eq!(spawned, 3);
    }
}
