use tracing::debug;

use super::definition::{BossConfig, ZoneId};
use super::graph::ZoneGraph;
use crate::geometry::Vec2;

/// Everything the world must do once a zone opens. The controller only
/// decides; the simulation context applies these requests to whichever
/// collaborators it has.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneUnlocked {
    pub zone_id: ZoneId,
    pub name: String,
    /// Pairs whose shared barrier should come down (neighbour already open)
    pub barriers: Vec<(ZoneId, ZoneId)>,
    pub boss_position: Vec2,
    pub boss: BossConfig,
}

/// Polls player power against the zone graph, at most once per interval.
pub struct ProgressionController {
    interval: f64,
    last_check: f64,
}

impl ProgressionController {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last_check: 0.0,
        }
    }

    /// Unlock the lowest-id locked zone whose threshold `player_power`
    /// meets. Never unlocks more than one zone per call.
    pub fn check_progression(
        &mut self,
        graph: &mut ZoneGraph,
        player_power: f32,
        now: f64,
    ) -> Option<ZoneUnlocked> {
        if now - self.last_check < self.interval {
            return None;
        }
        self.last_check = now;

        let target = graph
            .zones()
            .find(|z| !z.unlocked && z.def.unlock_threshold <= player_power)
            .map(|z| z.id())?;

        if !graph.unlock(target) {
            return None;
        }

        let zone = graph.get(target)?;
        let barriers = zone
            .def
            .connections
            .iter()
            .copied()
            .filter(|n| graph.is_unlocked(*n))
            .map(|n| (target, n))
            .collect::<Vec<_>>();

        debug!(
            "Progression: power {} opened zone {} ({} barriers)",
            player_power,
            target,
            barriers.len()
        );

        Some(ZoneUnlocked {
            zone_id: target,
            name: zone.def.name.clone(),
            barriers,
            boss_position: zone.def.bounds.centroid(),
            boss: zone.def.boss.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GameData;

    fn graph() -> ZoneGraph {
        ZoneGraph::new(GameData::builtin().unwrap().zones).unwrap()
    }

    #[test]
    fn test_rate_limited_to_interval() {
        let mut g = graph();
        let mut ctl = ProgressionController::new(1.0);

        assert!(ctl.check_progression(&mut g, 50.0, 0.5).is_none());
        assert!(!g.is_unlocked(2));

        let unlock = ctl.check_progression(&mut g, 50.0, 1.0).unwrap();
        assert_eq!(unlock.zone_id, 2);
        assert_eq!(unlock.barriers, vec![(2, 1)]);
        assert_eq!(unlock.boss_position, Vec2::new(0.0, -50.0));
        assert_eq!(unlock.boss.health, 500.0);
        assert_eq!(unlock.boss.damage, 30.0);
    }

    #[test]
    fn test_one_unlock_per_check_lowest_id_first() {
        let mut g = graph();
        let mut ctl = ProgressionController::new(1.0);

        let mut order = Vec::new();
        let mut now = 0.0;
        for _ in 0..20 {
            now += 1.0;
            let before = g.zones().filter(|z| z.unlocked).count();
            if let Some(u) = ctl.check_progression(&mut g, 1000.0, now) {
                order.push(u.zone_id);
            }
            let after = g.zones().filter(|z| z.unlocked).count();
            assert!(after - before <= 1);
        }

        assert_eq!(order, vec![2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_barriers_only_to_open_neighbours() {
        let mut g = graph();
        let mut ctl = ProgressionController::new(1.0);
        // Zone 4 qualifies at 100 while 2 qualifies too; 2 comes first.
        ctl.check_progression(&mut g, 100.0, 1.0);
        let unlock = ctl.check_progression(&mut g, 100.0, 2.0).unwrap();
        assert_eq!(unlock.zone_id, 4);
        assert_eq!(unlock.barriers, vec![(4, 1)]);

        ctl.check_progression(&mut g, 300.0, 3.0); // zone 3
        let unlock = ctl.check_progression(&mut g, 300.0, 4.0).unwrap();
        assert_eq!(unlock.zone_id, 5);
        assert_eq!(unlock.barriers, vec![(5, 2), (5, 4)]);
    }

    #[test]
    fn test_nothing_to_unlock() {
        let mut g = graph();
        let mut ctl = ProgressionController::new(1.0);
        assert!(ctl.check_progression(&mut g, 10.0, 5.0).is_none());
    }
}
