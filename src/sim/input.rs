use uuid::Uuid;

use crate::geometry::Vec2;

/// Discrete player intents, queued by the input layer and drained once per
/// tick.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Desired direction; zero stops. Persists until replaced.
    Move(Vec2),
    Attack,
    UsePotion,
    OpenInventory,
    OpenCrafting,
    /// Talk to whatever is nearby (the smith)
    Interact,
    Craft { recipe_id: String },
    Equip { instance_id: Uuid },
    CycleSpeed,
}
