//! Crafting System
//!
//! Recipe definitions, their registry and the atomic craft transaction.

pub mod definition;
pub mod registry;

pub use definition::{RecipeCategory, RecipeDefinition, RecipeOutput};
pub use registry::CraftingRegistry;
