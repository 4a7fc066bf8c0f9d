//! World Collaborators
//!
//! Narrow interfaces the simulation drives but does not own the rendering
//! side of: barriers between zones, fog of war and the scene. The in-process
//! implementations here keep the headless runner and tests self-contained.

pub mod barrier;
pub mod fog;
pub mod scene;

pub use barrier::WallGrid;
pub use fog::FogOfWar;
pub use scene::{SceneLog, VisualKind};

use crate::geometry::Vec2;
use crate::zone::ZoneId;

/// Walls separating zones
pub trait BarrierSystem {
    /// Remove the barrier shared by two zones. Returns true only if a
    /// standing barrier came down; repeated calls are no-ops.
    fn remove_barrier_between(&mut self, a: ZoneId, b: ZoneId) -> bool;

    fn has_line_of_sight(&self, from: Vec2, to: Vec2) -> bool;

    fn blocks_movement(&self, position: Vec2) -> bool;
}

pub trait FogSystem {
    /// Returns false if the zone was already clear
    fn clear_zone(&mut self, zone_id: ZoneId) -> bool;

    fn is_fogged(&self, zone_id: ZoneId) -> bool;
}

/// Receives fire-and-forget visual requests
pub trait SceneSink {
    fn spawn_visual_at(&mut self, kind: VisualKind, position: Vec2);
}
