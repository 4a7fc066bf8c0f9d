use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use super::item_def::{ItemDefinition, RawItemDefinition};

/// Registry for all item definitions
pub struct ItemRegistry {
    items: HashMap<String, ItemDefinition>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Load all item definitions from a directory
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), String> {
        let items_dir = data_dir.join("items");

        if !items_dir.exists() {
            warn!("Items directory does not exist: {:?}", items_dir);
            return Ok(());
        }

        let entries = std::fs::read_dir(&items_dir)
            .map_err(|e| format!("Failed to read items directory: {}", e))?;

        for entry in entries {
            let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
            let path = entry.path();

            if path.extension().map_or(false, |ext| ext == "toml") {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
                self.load_from_str(&path.display().to_string(), &content)?;
            }
        }

        info!("Loaded {} item definitions", self.items.len());

        Ok(())
    }

    /// Parse one TOML document (a table of items keyed by id)
    pub fn load_from_str(&mut self, source: &str, content: &str) -> Result<(), String> {
        let table: HashMap<String, RawItemDefinition> = toml::from_str(content)
            .map_err(|e| format!("Failed to parse {}: {}", source, e))?;

        for (id, raw) in table {
            if self.items.contains_key(&id) {
                warn!("Duplicate item ID '{}' in {}, overwriting", id, source);
            }
            let item = ItemDefinition::from_raw(&id, &raw);
            self.items.insert(id, item);
        }

        Ok(())
    }

    /// Get an item definition by ID
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Check if an item exists
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Display name for an id, falling back to the id itself
    pub fn display_name(&self, id: &str) -> String {
        self.items
            .get(id)
            .map(|def| def.display_name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Get the number of loaded items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ItemCategory;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_items_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        let items_dir = temp_dir.path().join("items");
        std::fs::create_dir(&items_dir).unwrap();

        let toml_content = r#"
[fire_essence]
display_name = "Fire Essence"
category = "consumable"
rarity = "rare"

[steel_ore]
display_name = "Steel Ore"
"#;

        let mut file = std::fs::File::create(items_dir.join("drops.toml")).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();
        std::fs::write(items_dir.join("notes.txt"), "ignored").unwrap();

        let mut registry = ItemRegistry::new();
        registry.load_from_directory(temp_dir.path()).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("fire_essence").unwrap().category, ItemCategory::Consumable);
        assert_eq!(registry.display_name("steel_ore"), "Steel Ore");
        assert_eq!(registry.display_name("mystery"), "mystery");
    }

    #[test]
    fn test_missing_directory_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = ItemRegistry::new();
        assert!(registry.load_from_directory(temp_dir.path()).is_ok());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_malformed_toml_reports_source() {
        let mut registry = ItemRegistry::new();
        let err = registry.load_from_str("broken.toml", "[oops").unwrap_err();
        assert!(err.contains("broken.toml"));
    }
}
