use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::TerraError;
use crate::tile::TileType;

/// Receives items awarded by mining
pub trait InventorySink {
    fn add_item(&mut self, item: TileType, count: u32);
}

/// Item counts held by the player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<TileType, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, item: TileType) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn has(&self, item: TileType, count: u32) -> bool {
        self.count(item) >= count
    }

    /// Take `count` of an item, failing without change if there are too few
    pub fn remove(&mut self, item: TileType, count: u32) -> Result<(), TerraError> {
        let available = self.count(item);
        if available < count {
            return Err(TerraError::InsufficientItems {
                item,
                needed: count,
                available,
            });
        }
        if available == count {
            self.items.remove(&item);
        } else {
            self.items.insert(item, available - count);
        }
        Ok(())
    }

    /// Check every `(item, count)` pair is covered
    pub fn has_all<'a>(&self, cost: impl IntoIterator<Item = (&'a TileType, &'a u32)>) -> bool {
        cost.into_iter().all(|(item, count)| self.has(*item, *count))
    }

    /// Non-zero stacks in item order
    pub fn iter(&self) -> impl Iterator<Item = (TileType, u32)> + '_ {
        self.items.iter().map(|(item, count)| (*item, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl InventorySink for Inventory {
    fn add_item(&mut self, item: TileType, count: u32) {
        if count > 0 {
            *self.items.entry(item).or_insert(0) += count;
        }
    }
}

impl FromIterator<(TileType, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (TileType, u32)>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for (item, count) in iter {
            inventory.add_item(item, count);
        }
        inventory
    }
}
