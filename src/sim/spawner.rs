use rand::Rng;
use tracing::debug;

use crate::combat::Monster;
use crate::geometry::Vec2;
use crate::zone::ZoneGraph;

/// Attempts at finding a spawn point outside every barrier
const PLACEMENT_ATTEMPTS: usize = 8;

/// Periodic monster spawner. One monster per elapsed interval, placed in
/// the player's zone or one of its unlocked neighbours.
pub struct SpawnDirector {
    interval: f64,
    elapsed: f64,
    max_monsters: usize,
}

impl SpawnDirector {
    pub fn new(interval: f64, max_monsters: usize) -> Self {
        Self {
            interval,
            elapsed: 0.0,
            max_monsters,
        }
    }

    /// Advance the timer by simulated `dt`. When an interval has elapsed and
    /// the live count is under the cap, returns the monster to add. The timer
    /// restarts from zero either way, so a long tick yields one spawn.
    pub fn update<R: Rng>(
        &mut self,
        dt: f64,
        graph: &ZoneGraph,
        player_pos: Vec2,
        live_monsters: usize,
        id: u64,
        blocked: impl Fn(Vec2) -> bool,
        rng: &mut R,
    ) -> Option<Monster> {
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return None;
        }
        self.elapsed = 0.0;

        if live_monsters >= self.max_monsters {
            return None;
        }

        let zone_id = graph.zone_for_spawning(player_pos, rng);
        let zone = graph.get(zone_id)?;

        let mut position = graph.random_position_in(zone_id, rng);
        for _ in 1..PLACEMENT_ATTEMPTS {
            if !blocked(position) {
                break;
            }
            position = graph.random_position_in(zone_id, rng);
        }

        debug!("Spawning monster {} in zone {} at ({:.1}, {:.1})", id, zone_id, position.x, position.z);
        let monster = Monster::regular(id, zone_id, position, &zone.def.monster);
        Some(match zone.def.pick_variant(rng) {
            Some(name) => monster.named(name),
            None => monster,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::PLAYER_SPAWN;
    use crate::data::GameData;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn graph() -> ZoneGraph {
        ZoneGraph::new(GameData::builtin().unwrap().zones).unwrap()
    }

    #[test]
    fn test_spawns_once_per_interval() {
        let graph = graph();
        let mut rng = StdRng::seed_from_u64(3);
        let mut director = SpawnDirector::new(3.0, 50);

        let mut spawned = 0;
        for i in 0..200 {
            // 10 simulated seconds
            if director.update(0.05, &graph, PLAYER_SPAWN, 0, i, |_| false, &mut rng).is_some() {
                spawned += 1;
            }
        }
        assert_eq!(spawned, 3);
    }

    #[test]
    fn test_long_tick_does_not_queue_spawns() {
        let graph = graph();
        let mut rng = StdRng::seed_from_u64(3);
        let mut director = SpawnDirector::new(3.0, 50);

        assert!(director.update(30.0, &graph, PLAYER_SPAWN, 0, 1, |_| false, &mut rng).is_some());
        // A fresh interval has to pass before the next spawn
        for i in 0..50 {
            assert!(director.update(0.05, &graph, PLAYER_SPAWN, 1, i, |_| false, &mut rng).is_none());
        }
        assert!(director.update(0.6, &graph, PLAYER_SPAWN, 1, 2, |_| false, &mut rng).is_some());
    }

    #[test]
    fn test_spawned_monsters_take_zone_variant_names() {
        let graph = graph();
        let mut rng = StdRng::seed_from_u64(5);
        let mut director = SpawnDirector::new(1.0, 50);
        let variants = &graph.get(1).unwrap().def.variants;
        assert_eq!(variants.len(), 3);

        for i in 0..30 {
            let monster = director
                .update(1.0, &graph, PLAYER_SPAWN, 0, i, |_| false, &mut rng)
                .unwrap();
            assert!(variants.contains(&monster.name), "{}", monster.name);
        }
    }

    #[test]
    fn test_cap_blocks_spawn() {
        let graph = graph();
        let mut rng = StdRng::seed_from_u64(3);
        let mut director = SpawnDirector::new(1.0, 2);
        assert!(director.update(1.0, &graph, PLAYER_SPAWN, 2, 1, |_| false, &mut rng).is_none());
        assert!(director.update(1.0, &graph, PLAYER_SPAWN, 1, 1, |_| false, &mut rng).is_some());
    }

    #[test]
    fn test_neighbour_spawns_use_neighbour_config() {
        let mut graph = graph();
        graph.unlock(2);
        let mut rng = StdRng::seed_from_u64(11);
        let mut director = SpawnDirector::new(1.0, 50);

        let mut zones = std::collections::BTreeSet::new();
        for i in 0..200 {
            let monster = director
                .update(1.0, &graph, PLAYER_SPAWN, 0, i, |_| false, &mut rng)
                .unwrap();
            let def = &graph.get(monster.zone_id).unwrap().def;
            assert!(def.bounds.contains(monster.stats.position));
            assert_eq!(monster.stats.max_health, def.monster.health);
            zones.insert(monster.zone_id);
        }
        // Zone 4 is still locked, so only home and zone 2 are candidates
        assert_eq!(zones.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }
}
