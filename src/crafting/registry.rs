//! Crafting Recipe Registry
//!
//! Loads recipe definitions from TOML files and runs crafting transactions
//! against an inventory.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use super::definition::{RawRecipeDefinition, RecipeDefinition, RecipeOutput};
use crate::inventory::{EquipmentItem, Inventory};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CraftError {
    InvalidRecipe(String),
    InsufficientMaterials(String),
}

impl fmt::Display for CraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CraftError::InvalidRecipe(id) => write!(f, "Unknown recipe '{}'", id),
            CraftError::InsufficientMaterials(id) => write!(f, "Missing materials for '{}'", id),
        }
    }
}

impl std::error::Error for CraftError {}

/// What a successful craft did to the inventory
#[derive(Debug, Clone)]
pub struct Crafted {
    pub recipe_id: String,
    pub display_name: String,
    /// Instance id when the result is equipment
    pub equipment: Option<uuid::Uuid>,
    /// Equipment instances consumed as ingredients
    pub consumed_equipment: Vec<EquipmentItem>,
}

// ============================================================================
// Registry
// ============================================================================

/// Registry for all recipe definitions
pub struct CraftingRegistry {
    recipes: HashMap<String, RecipeDefinition>,
}

impl CraftingRegistry {
    pub fn new() -> Self {
        Self {
            recipes: HashMap::new(),
        }
    }

    /// Load all recipe definitions from a directory
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), String> {
        let recipes_dir = data_dir.join("recipes");

        if !recipes_dir.exists() {
            warn!("Recipes directory does not exist: {:?}", recipes_dir);
            return Ok(());
        }

        let entries = std::fs::read_dir(&recipes_dir)
            .map_err(|e| format!("Failed to read recipes directory: {}", e))?;

        for entry in entries {
            let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
            let path = entry.path();

            if path.extension().map_or(false, |ext| ext == "toml") {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
                self.load_from_str(&path.display().to_string(), &content)?;
            }
        }

        info!("Loaded {} recipe definitions", self.recipes.len());

        Ok(())
    }

    /// Parse one TOML document (a table of recipes keyed by id)
    pub fn load_from_str(&mut self, source: &str, content: &str) -> Result<(), String> {
        let table: HashMap<String, RawRecipeDefinition> = toml::from_str(content)
            .map_err(|e| format!("Failed to parse {}: {}", source, e))?;

        for (id, raw) in table {
            if self.recipes.contains_key(&id) {
                warn!("Duplicate recipe ID '{}' in {}, overwriting", id, source);
            }
            let recipe = RecipeDefinition::from_raw(&id, &raw)?;
            debug!(
                "Loaded recipe: {} ({}) tier {} - {} requirements",
                recipe.display_name,
                id,
                recipe.tier,
                recipe.requirements.len()
            );
            self.recipes.insert(id, recipe);
        }

        Ok(())
    }

    /// Requirements that name other recipes must form a DAG. Returns recipe
    /// ids in dependency order (ingredients before the recipes using them).
    pub fn validate(&self) -> Result<Vec<String>, String> {
        let mut sorted = Vec::new();
        let mut visited = HashSet::new();
        let mut visiting = HashSet::new();

        fn visit(
            id: &str,
            recipes: &HashMap<String, RecipeDefinition>,
            sorted: &mut Vec<String>,
            visited: &mut HashSet<String>,
            visiting: &mut HashSet<String>,
        ) -> Result<(), String> {
            if visited.contains(id) {
                return Ok(());
            }
            if visiting.contains(id) {
                return Err(format!("Circular recipe requirement detected at '{}'", id));
            }

            visiting.insert(id.to_string());

            if let Some(recipe) = recipes.get(id) {
                for ingredient in recipe.requirements.keys() {
                    if let Some(inner) = recipes.get(ingredient) {
                        if inner.tier >= recipe.tier {
                            warn!(
                                "Recipe '{}' (tier {}) consumes '{}' of tier {}",
                                id, recipe.tier, ingredient, inner.tier
                            );
                        }
                        visit(ingredient, recipes, sorted, visited, visiting)?;
                    }
                }
            }

            visiting.remove(id);
            visited.insert(id.to_string());
            sorted.push(id.to_string());

            Ok(())
        }

        let mut ids: Vec<&String> = self.recipes.keys().collect();
        ids.sort();
        for id in ids {
            visit(id, &self.recipes, &mut sorted, &mut visited, &mut visiting)?;
        }

        Ok(sorted)
    }

    /// True iff every requirement is covered by current counts
    pub fn can_craft(&self, recipe_id: &str, inventory: &Inventory) -> bool {
        self.recipes.get(recipe_id).map_or(false, |recipe| {
            recipe
                .requirements
                .iter()
                .all(|(item, qty)| inventory.has_item(item, *qty))
        })
    }

    /// Consume every requirement then add one result. Nothing is touched
    /// unless the whole recipe is affordable.
    pub fn craft(&self, recipe_id: &str, inventory: &mut Inventory) -> Result<Crafted, CraftError> {
        let recipe = self
            .recipes
            .get(recipe_id)
            .ok_or_else(|| CraftError::InvalidRecipe(recipe_id.to_string()))?;

        if !self.can_craft(recipe_id, inventory) {
            return Err(CraftError::InsufficientMaterials(recipe_id.to_string()));
        }

        let mut consumed_equipment = Vec::new();
        for (item, qty) in &recipe.requirements {
            let outcome = inventory.remove_item(item, *qty);
            consumed_equipment.extend(outcome.equipment);
        }

        let equipment = match &recipe.output {
            RecipeOutput::Equipment { slot, stats, rarity } => Some(inventory.add_equipment(
                EquipmentItem::new(&recipe.id, &recipe.display_name, *slot, *stats, *rarity),
            )),
            RecipeOutput::Material { .. } => {
                inventory.add_material(&recipe.id, 1);
                None
            }
            RecipeOutput::Consumable { healing, .. } => {
                inventory.add_consumable(&recipe.id, 1, *healing);
                None
            }
        };

        info!("Crafted {} ({})", recipe.display_name, recipe.id);

        Ok(Crafted {
            recipe_id: recipe.id.clone(),
            display_name: recipe.display_name.clone(),
            equipment,
            consumed_equipment,
        })
    }

    /// Get a recipe definition by ID
    pub fn get(&self, id: &str) -> Option<&RecipeDefinition> {
        self.recipes.get(id)
    }

    /// Recipes ordered by tier then id, the way the crafting panel lists them
    pub fn sorted(&self) -> Vec<&RecipeDefinition> {
        let mut list: Vec<_> = self.recipes.values().collect();
        list.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.id.cmp(&b.id)));
        list
    }

    /// Check if a recipe exists
    pub fn contains(&self, id: &str) -> bool {
        self.recipes.contains_key(id)
    }

    /// Get the number of loaded recipes
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl Default for CraftingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
