use tracing::{debug, info};

use super::BarrierSystem;
use crate::geometry::{Bounds, Vec2};
use crate::zone::{ZoneDefinition, ZoneId};

/// Full thickness of a wall slab
pub const WALL_THICKNESS: f32 = 3.0;
/// Clearance kept between a mover's centre and a wall
pub const COLLISION_RADIUS: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct Wall {
    pub zones: (ZoneId, ZoneId),
    pub bounds: Bounds,
    pub active: bool,
}

impl Wall {
    fn joins(&self, a: ZoneId, b: ZoneId) -> bool {
        self.zones == (a, b) || self.zones == (b, a)
    }
}

/// One wall slab on every edge shared by two connected zones
pub struct WallGrid {
    walls: Vec<Wall>,
}

impl WallGrid {
    pub fn from_zones(zones: &[ZoneDefinition]) -> Self {
        let mut walls = Vec::new();
        let half = WALL_THICKNESS / 2.0;

        for (i, a) in zones.iter().enumerate() {
            for b in &zones[i + 1..] {
                if !a.connections.contains(&b.id) && !b.connections.contains(&a.id) {
                    continue;
                }
                let (ra, rb) = (a.bounds, b.bounds);

                let shared_x = [ra.max_x, ra.min_x]
                    .into_iter()
                    .find(|x| *x == rb.min_x || *x == rb.max_x);
                let z_lo = ra.min_z.max(rb.min_z);
                let z_hi = ra.max_z.min(rb.max_z);

                let shared_z = [ra.max_z, ra.min_z]
                    .into_iter()
                    .find(|z| *z == rb.min_z || *z == rb.max_z);
                let x_lo = ra.min_x.max(rb.min_x);
                let x_hi = ra.max_x.min(rb.max_x);

                let bounds = match (shared_x, shared_z) {
                    (Some(x), _) if z_hi > z_lo => Bounds {
                        min_x: x - half,
                        max_x: x + half,
                        min_z: z_lo,
                        max_z: z_hi,
                    },
                    (_, Some(z)) if x_hi > x_lo => Bounds {
                        min_x: x_lo,
                        max_x: x_hi,
                        min_z: z - half,
                        max_z: z + half,
                    },
                    _ => continue,
                };

                walls.push(Wall {
                    zones: (a.id, b.id),
                    bounds,
                    active: true,
                });
            }
        }

        debug!("Built {} zone walls", walls.len());
        Self { walls }
    }

}

impl BarrierSystem for WallGrid {
    fn remove_barrier_between(&mut self, a: ZoneId, b: ZoneId) -> bool {
        match self.walls.iter_mut().find(|w| w.joins(a, b)) {
            Some(wall) if wall.active => {
                wall.active = false;
                info!("Barrier between zones {} and {} removed", a, b);
                true
            }
            _ => false,
        }
    }

    fn has_line_of_sight(&self, from: Vec2, to: Vec2) -> bool {
        !self
            .walls
            .iter()
            .any(|w| w.active && w.bounds.intersects_segment(from, to))
    }

    fn blocks_movement(&self, position: Vec2) -> bool {
        self.walls
            .iter()
            .any(|w| w.active && w.bounds.expanded(COLLISION_RADIUS).touches(position))
    }
}
