//! Zone Loading
//!
//! Reads the world layout from TOML. Every file under `zones/` contributes
//! `[[zones]]` entries; later files overwrite earlier ids.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use super::definition::{RawWorldFile, ZoneDefinition, ZoneId};

/// Parse a single world document into resolved zones, ascending by id
pub fn parse_world(source: &str, content: &str) -> Result<Vec<ZoneDefinition>, String> {
    let mut zones = BTreeMap::new();
    merge_world(&mut zones, source, content)?;
    info!("Loaded {} zone definitions from {}", zones.len(), source);
    Ok(zones.into_values().collect())
}

/// Load every `*.toml` file under `data_dir/zones`
pub fn load_world_from_directory(data_dir: &Path) -> Result<Vec<ZoneDefinition>, String> {
    let zones_dir = data_dir.join("zones");

    let entries = std::fs::read_dir(&zones_dir)
        .map_err(|e| format!("Failed to read zones directory {:?}: {}", zones_dir, e))?;

    let mut zones = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
        let path = entry.path();

        if path.extension().map_or(false, |ext| ext == "toml") {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
            merge_world(&mut zones, &path.display().to_string(), &content)?;
        }
    }

    if zones.is_empty() {
        return Err(format!("No zones defined under {:?}", zones_dir));
    }

    info!("Loaded {} zone definitions", zones.len());

    Ok(zones.into_values().collect())
}

fn merge_world(
    zones: &mut BTreeMap<ZoneId, ZoneDefinition>,
    source: &str,
    content: &str,
) -> Result<(), String> {
    let file: RawWorldFile = toml::from_str(content)
        .map_err(|e| format!("Failed to parse {}: {}", source, e))?;

    for raw in &file.zones {
        if zones.contains_key(&raw.id) {
            warn!("Duplicate zone ID {} in {}, overwriting", raw.id, source);
        }
        zones.insert(raw.id, ZoneDefinition::from_raw(raw));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TWO_ZONES: &str = r#"
[[zones]]
id = 2
name = "East"
bounds = { min_x = 0.0, max_x = 10.0, min_z = 0.0, max_z = 10.0 }
unlock_threshold = 5.0
connections = [1]

[[zones]]
id = 1
name = "West"
bounds = { min_x = -10.0, max_x = 0.0, min_z = 0.0, max_z = 10.0 }
connections = [2]
"#;

    #[test]
    fn test_parse_world_sorts_by_id() {
        let zones = parse_world("inline", TWO_ZONES).unwrap();
        assert_eq!(zones.iter().map(|z| z.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(zones[0].unlock_threshold, 0.0);
    }

    #[test]
    fn test_load_world_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        let zones_dir = temp_dir.path().join("zones");
        std::fs::create_dir(&zones_dir).unwrap();
        std::fs::write(zones_dir.join("world.toml"), TWO_ZONES).unwrap();

        let zones = load_world_from_directory(temp_dir.path()).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[1].name, "East");
    }

    #[test]
    fn test_missing_zones_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_world_from_directory(temp_dir.path()).is_err());
    }
}
