use serde::Serialize;

use crate::geometry::Vec2;

/// Spacing between items dropped by the same kill
const DROP_SPREAD: f32 = 0.8;

/// An item lying in the world waiting to be walked over
#[derive(Debug, Clone)]
pub struct GroundLoot {
    pub id: u64,
    pub item_id: String,
    pub position: Vec2,
}

impl GroundLoot {
    /// Spread a kill's drops in a short row centred on the death position
    pub fn scatter(first_id: u64, items: Vec<String>, origin: Vec2) -> Vec<GroundLoot> {
        let n = items.len() as f32;
        items
            .into_iter()
            .enumerate()
            .map(|(i, item_id)| GroundLoot {
                id: first_id + i as u64,
                item_id,
                position: origin.offset((i as f32 - (n - 1.0) / 2.0) * DROP_SPREAD, 0.0),
            })
            .collect()
    }

    pub fn in_pickup_range(&self, player: Vec2, radius: f32) -> bool {
        self.position.within(player, radius)
    }
}

/// What the renderer needs to draw a ground item
#[derive(Debug, Clone, Serialize)]
pub struct GroundLootUpdate {
    pub id: u64,
    pub item_id: String,
    pub x: f32,
    pub z: f32,
}

impl From<&GroundLoot> for GroundLootUpdate {
    fn from(item: &GroundLoot) -> Self {
        Self {
            id: item.id,
            item_id: item.item_id.clone(),
            x: item.position.x,
            z: item.position.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scatter_centres_on_origin() {
        let drops = GroundLoot::scatter(
            10,
            vec!["a".into(), "b".into(), "c".into()],
            Vec2::new(5.0, 5.0),
        );
        assert_eq!(drops.len(), 3);
        assert_eq!(drops[0].id, 10);
        assert_eq!(drops[2].id, 12);
        assert_eq!(drops[1].position, Vec2::new(5.0, 5.0));
        assert!((drops[0].position.x - 4.2).abs() < 1e-5);
    }

    #[test]
    fn test_pickup_radius() {
        let item = GroundLoot::scatter(1, vec!["iron_ore".into()], Vec2::ZERO).remove(0);
        assert!(item.in_pickup_range(Vec2::new(1.9, 0.0), 2.0));
        assert!(!item.in_pickup_range(Vec2::new(2.1, 0.0), 2.0));
    }
}
