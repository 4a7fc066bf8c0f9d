use rand::Rng;
use tracing::{info, warn};

use super::definition::{FALLBACK_ZONE, ZoneDefinition, ZoneId};
use crate::geometry::{Bounds, Vec2};

const AREA_EPSILON: f32 = 0.01;

/// A zone plus its one mutable bit
#[derive(Debug, Clone)]
pub struct Zone {
    pub def: ZoneDefinition,
    pub unlocked: bool,
}

impl Zone {
    pub fn id(&self) -> ZoneId {
        self.def.id
    }
}

/// Check that the zone rectangles tile their bounding box exactly:
/// no shared area between any pair, no gap anywhere in the union.
pub fn validate_tiling(zones: &[ZoneDefinition]) -> Result<(), String> {
    let Some(first) = zones.first() else {
        return Err("World has no zones".to_string());
    };

    for (i, a) in zones.iter().enumerate() {
        if a.bounds.area() <= 0.0 {
            return Err(format!("Zone {} has empty bounds", a.id));
        }
        for b in &zones[i + 1..] {
            if a.id == b.id {
                return Err(format!("Zone id {} declared twice", a.id));
            }
            if a.bounds.overlap_area(&b.bounds) > AREA_EPSILON {
                return Err(format!("Zones {} and {} overlap", a.id, b.id));
            }
        }
    }

    let union = zones
        .iter()
        .fold(first.bounds, |acc, z| acc.union(&z.bounds));
    let covered: f32 = zones.iter().map(|z| z.bounds.area()).sum();
    if (union.area() - covered).abs() > AREA_EPSILON {
        return Err(format!(
            "Zones leave gaps: union area {} but zones cover {}",
            union.area(),
            covered
        ));
    }

    Ok(())
}

/// The static world graph. Zones never change apart from `unlocked`, which
/// only ever goes from false to true.
#[derive(Debug)]
pub struct ZoneGraph {
    // Ascending by id; progression scans rely on this order.
    zones: Vec<Zone>,
    world: Bounds,
}

impl ZoneGraph {
    pub fn new(mut defs: Vec<ZoneDefinition>) -> Result<Self, String> {
        validate_tiling(&defs)?;
        defs.sort_by_key(|d| d.id);

        for def in &defs {
            for neighbor in &def.connections {
                let Some(other) = defs.iter().find(|d| d.id == *neighbor) else {
                    return Err(format!(
                        "Zone {} connects to unknown zone {}",
                        def.id, neighbor
                    ));
                };
                if !other.connections.contains(&def.id) {
                    warn!("Connection {} -> {} is one-way", def.id, neighbor);
                }
            }

            // Every zone past the start should be reachable from a cheaper one
            if def.id != FALLBACK_ZONE
                && !def.connections.iter().any(|n| {
                    defs.iter()
                        .any(|d| d.id == *n && d.unlock_threshold < def.unlock_threshold)
                })
            {
                warn!(
                    "Zone {} ({}) has no neighbour with a lower unlock threshold",
                    def.id, def.name
                );
            }
        }

        if !defs.iter().any(|d| d.id == FALLBACK_ZONE) {
            return Err(format!("World must contain starting zone {}", FALLBACK_ZONE));
        }

        let world = defs
            .iter()
            .skip(1)
            .fold(defs[0].bounds, |acc, d| acc.union(&d.bounds));

        let zones = defs
            .into_iter()
            .map(|def| {
                let unlocked = def.id == FALLBACK_ZONE;
                Zone { def, unlocked }
            })
            .collect();

        Ok(Self { zones, world })
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id() == id)
    }

    /// All zones, ascending by id
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn world_bounds(&self) -> Bounds {
        self.world
    }

    pub fn is_unlocked(&self, id: ZoneId) -> bool {
        self.get(id).map_or(false, |z| z.unlocked)
    }

    /// Flip a zone to unlocked. Returns false if it was already unlocked or
    /// does not exist.
    pub fn unlock(&mut self, id: ZoneId) -> bool {
        match self.zones.iter_mut().find(|z| z.id() == id) {
            Some(zone) if !zone.unlocked => {
                zone.unlocked = true;
                info!("Zone {} ({}) unlocked", zone.def.id, zone.def.name);
                true
            }
            _ => false,
        }
    }

    /// Zone containing `pos`; points outside every rectangle map to the
    /// starting zone. The world's own max edges count as inside.
    pub fn zone_at(&self, pos: Vec2) -> ZoneId {
        self.zones
            .iter()
            .find(|z| z.def.bounds.contains_within(pos, &self.world))
            .map(|z| z.id())
            .unwrap_or(FALLBACK_ZONE)
    }

    pub fn unlocked_neighbors(&self, id: ZoneId) -> Vec<ZoneId> {
        self.get(id)
            .map(|zone| {
                zone.def
                    .connections
                    .iter()
                    .copied()
                    .filter(|n| self.is_unlocked(*n))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pick uniformly among the player's zone and its unlocked neighbours
    pub fn zone_for_spawning<R: Rng>(&self, player_pos: Vec2, rng: &mut R) -> ZoneId {
        let home = self.zone_at(player_pos);
        let mut candidates = vec![home];
        candidates.extend(self.unlocked_neighbors(home));
        candidates[rng.gen_range(0..candidates.len())]
    }

    /// Uniform point inside a zone's rectangle
    pub fn random_position_in<R: Rng>(&self, id: ZoneId, rng: &mut R) -> Vec2 {
        let bounds = self
            .get(id)
            .map(|z| z.def.bounds)
            .unwrap_or(self.world);
        Vec2::new(
            rng.gen_range(bounds.min_x..bounds.max_x),
            rng.gen_range(bounds.min_z..bounds.max_z),
        )
    }
}
