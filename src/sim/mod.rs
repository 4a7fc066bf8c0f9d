//! The simulation loop: clock, deferred actions, spawning and the context
//! that ties every subsystem together.

pub mod autopilot;
pub mod clock;
pub mod context;
pub mod events;
pub mod input;
pub mod scheduler;
pub mod snapshot;
pub mod spawner;

pub use autopilot::Autopilot;
pub use context::SimulationContext;
pub use events::SimEvent;
