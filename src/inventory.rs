use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::data::{EquipmentSlot, ItemCategory, ItemDefinition, Rarity, StatBonus};

// ============================================================================
// Inventory Entries
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumableStack {
    pub count: u32,
    pub healing: f32,
}

/// One crafted (or starter) piece of gear. Instances are never stacked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentItem {
    pub instance_id: Uuid,
    pub id: String,
    pub name: String,
    pub slot: EquipmentSlot,
    pub stats: StatBonus,
    pub rarity: Rarity,
    pub equipped: bool,
}

impl EquipmentItem {
    pub fn new(id: &str, name: &str, slot: EquipmentSlot, stats: StatBonus, rarity: Rarity) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            id: id.to_string(),
            name: name.to_string(),
            slot,
            stats,
            rarity,
            equipped: false,
        }
    }
}

/// Result of `Inventory::remove_item`
#[derive(Debug, Default)]
pub struct RemoveOutcome {
    pub removed: u32,
    pub requested: u32,
    /// Equipment instances taken out; the owner must unequip any of these
    /// that were worn.
    pub equipment: Vec<EquipmentItem>,
}

impl RemoveOutcome {
    pub fn is_complete(&self) -> bool {
        self.removed == self.requested
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// Materials and consumables are keyed by item id (entries vanish at zero);
/// equipment is an ordered list of instances.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    materials: BTreeMap<String, u32>,
    consumables: BTreeMap<String, ConsumableStack>,
    equipment: Vec<EquipmentItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a catalogued item, routed by its declared category
    pub fn add_item(&mut self, def: &ItemDefinition, quantity: u32) {
        match def.category {
            ItemCategory::Material => self.add_material(&def.id, quantity),
            ItemCategory::Consumable => self.add_consumable(&def.id, quantity, def.healing),
        }
    }

    pub fn add_material(&mut self, id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.materials.entry(id.to_string()).or_insert(0) += quantity;
    }

    pub fn add_consumable(&mut self, id: &str, quantity: u32, healing: f32) {
        if quantity == 0 {
            return;
        }
        self.consumables
            .entry(id.to_string())
            .or_insert(ConsumableStack { count: 0, healing })
            .count += quantity;
    }

    pub fn add_equipment(&mut self, item: EquipmentItem) -> Uuid {
        let instance_id = item.instance_id;
        self.equipment.push(item);
        instance_id
    }

    /// Count across all three categories
    pub fn item_count(&self, id: &str) -> u32 {
        let materials = self.materials.get(id).copied().unwrap_or(0);
        let consumables = self.consumables.get(id).map_or(0, |c| c.count);
        let equipment = self.equipment.iter().filter(|e| e.id == id).count() as u32;
        materials + consumables + equipment
    }

    pub fn has_item(&self, id: &str, quantity: u32) -> bool {
        self.item_count(id) >= quantity
    }

    /// Take up to `quantity` of `id`. Stacks are drained first and deleted
    /// at zero; equipment instances go spare-before-worn, newest first.
    pub fn remove_item(&mut self, id: &str, quantity: u32) -> RemoveOutcome {
        let mut outcome = RemoveOutcome {
            requested: quantity,
            ..Default::default()
        };

        if let Some(count) = self.materials.get_mut(id) {
            let taken = (*count).min(quantity - outcome.removed);
            *count -= taken;
            outcome.removed += taken;
            if *count == 0 {
                self.materials.remove(id);
            }
        }

        if outcome.removed < quantity {
            if let Some(stack) = self.consumables.get_mut(id) {
                let taken = stack.count.min(quantity - outcome.removed);
                stack.count -= taken;
                outcome.removed += taken;
                if stack.count == 0 {
                    self.consumables.remove(id);
                }
            }
        }

        for worn in [false, true] {
            let mut i = self.equipment.len();
            while i > 0 && outcome.removed < quantity {
                i -= 1;
                if self.equipment[i].id == id && self.equipment[i].equipped == worn {
                    outcome.equipment.push(self.equipment.remove(i));
                    outcome.removed += 1;
                }
            }
        }

        outcome
    }

    /// Mark `instance_id` as worn, unequipping whatever held its slot.
    /// Returns the newly equipped item, or None for an unknown instance.
    pub fn equip(&mut self, instance_id: Uuid) -> Option<&EquipmentItem> {
        let slot = self
            .equipment
            .iter()
            .find(|e| e.instance_id == instance_id)?
            .slot;

        for item in &mut self.equipment {
            if item.slot == slot {
                item.equipped = item.instance_id == instance_id;
            }
        }

        self.equipment.iter().find(|e| e.instance_id == instance_id)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> bool {
        let mut changed = false;
        for item in self.equipment.iter_mut().filter(|e| e.slot == slot && e.equipped) {
            item.equipped = false;
            changed = true;
        }
        changed
    }

    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&EquipmentItem> {
        self.equipment.iter().find(|e| e.slot == slot && e.equipped)
    }

    /// Sum of every worn item's stat deltas
    pub fn equipped_bonus(&self) -> StatBonus {
        self.equipment
            .iter()
            .filter(|e| e.equipped)
            .fold(StatBonus::default(), |acc, e| acc + e.stats)
    }

    /// The consumable with the highest positive healing value
    pub fn best_healing_consumable(&self) -> Option<(&str, f32)> {
        self.consumables
            .iter()
            .filter(|(_, stack)| stack.healing > 0.0 && stack.count > 0)
            .max_by(|a, b| a.1.healing.total_cmp(&b.1.healing))
            .map(|(id, stack)| (id.as_str(), stack.healing))
    }

    pub fn materials(&self) -> &BTreeMap<String, u32> {
        &self.materials
    }

    pub fn consumables(&self) -> &BTreeMap<String, ConsumableStack> {
        &self.consumables
    }

    pub fn equipment(&self) -> &[EquipmentItem] {
        &self.equipment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sword(id: &str, damage: f32) -> EquipmentItem {
        EquipmentItem::new(
            id,
            id,
            EquipmentSlot::Weapon,
            StatBonus { damage, health: 0.0 },
            Rarity::Uncommon,
        )
    }

    #[test]
    fn test_stacks_delete_at_zero() {
        let mut inv = Inventory::new();
        inv.add_material("iron_ore", 10);
        let outcome = inv.remove_item("iron_ore", 10);
        assert!(outcome.is_complete());
        assert!(!inv.materials().contains_key("iron_ore"));
        assert_eq!(inv.item_count("iron_ore"), 0);
    }

    #[test]
    fn test_over_removal_is_partial() {
        let mut inv = Inventory::new();
        inv.add_consumable("health_potion_small", 2, 40.0);
        let outcome = inv.remove_item("health_potion_small", 5);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.removed, 2);
        assert!(inv.consumables().is_empty());
    }

    #[test]
    fn test_equipment_removal_prefers_spares_and_reports_items() {
        let mut inv = Inventory::new();
        let worn = inv.add_equipment(sword("iron_sword", 10.0));
        inv.add_equipment(sword("iron_sword", 10.0));
        inv.equip(worn);

        let outcome = inv.remove_item("iron_sword", 1);
        assert!(outcome.is_complete());
        assert!(!outcome.equipment[0].equipped);
        assert_eq!(inv.equipped(EquipmentSlot::Weapon).unwrap().instance_id, worn);

        let outcome = inv.remove_item("iron_sword", 2);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.equipment.len(), 1);
        assert!(outcome.equipment[0].equipped);
        assert!(inv.equipped(EquipmentSlot::Weapon).is_none());
    }

    #[test]
    fn test_equip_replaces_slot() {
        let mut inv = Inventory::new();
        let a = inv.add_equipment(sword("iron_sword", 10.0));
        let b = inv.add_equipment(sword("bronze_sword", 25.0));
        inv.equip(a);
        inv.equip(b);
        assert_eq!(inv.equipped(EquipmentSlot::Weapon).unwrap().instance_id, b);
        assert_eq!(inv.equipped_bonus().damage, 25.0);
        assert!(inv.equip(Uuid::new_v4()).is_none());
        assert!(inv.unequip(EquipmentSlot::Weapon));
        assert_eq!(inv.equipped_bonus(), StatBonus::default());
    }

    #[test]
    fn test_best_potion_ignores_zero_healing() {
        let mut inv = Inventory::new();
        inv.add_consumable("fire_essence", 4, 0.0);
        assert!(inv.best_healing_consumable().is_none());
        inv.add_consumable("health_potion_small", 1, 40.0);
        inv.add_consumable("health_potion_medium", 1, 80.0);
        assert_eq!(inv.best_healing_consumable(), Some(("health_potion_medium", 80.0)));
    }
}
