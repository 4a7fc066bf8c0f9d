use std::collections::BTreeSet;
use tracing::info;

use super::FogSystem;
use crate::zone::{ZoneGraph, ZoneId};

/// Tracks which zones are still hidden
pub struct FogOfWar {
    fogged: BTreeSet<ZoneId>,
}

impl FogOfWar {
    /// Fog over every zone that starts locked
    pub fn from_graph(graph: &ZoneGraph) -> Self {
        Self {
            fogged: graph
                .zones()
                .filter(|z| !z.unlocked)
                .map(|z| z.id())
                .collect(),
        }
    }

    pub fn fogged_zones(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.fogged.iter().copied()
    }
}

impl FogSystem for FogOfWar {
    fn clear_zone(&mut self, zone_id: ZoneId) -> bool {
        let cleared = self.fogged.remove(&zone_id);
        if cleared {
            info!("Fog cleared over zone {}", zone_id);
        }
        cleared
    }

    fn is_fogged(&self, zone_id: ZoneId) -> bool {
        self.fogged.contains(&zone_id)
    }
}
