use serde::Serialize;
use tracing::debug;

use super::SceneSink;
use crate::geometry::Vec2;

/// Cosmetic effects the core asks the renderer for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualKind {
    AttackRing,
    DeathBurst,
    AreaWarning,
    AreaBlast,
    LevelUp,
    BossArrival,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualRequest {
    pub kind: VisualKind,
    pub x: f32,
    pub z: f32,
}

/// Scene collaborator that records requests and traces them; the headless
/// runner has nothing to draw.
#[derive(Default)]
pub struct SceneLog {
    requests: Vec<VisualRequest>,
}

impl SceneLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[VisualRequest] {
        &self.requests
    }

    pub fn count(&self, kind: VisualKind) -> usize {
        self.requests.iter().filter(|r| r.kind == kind).count()
    }
}

impl SceneSink for SceneLog {
    fn spawn_visual_at(&mut self, kind: VisualKind, position: Vec2) {
        debug!("Visual {:?} at ({:.1}, {:.1})", kind, position.x, position.z);
        self.requests.push(VisualRequest {
            kind,
            x: position.x,
            z: position.z,
        });
    }
}
