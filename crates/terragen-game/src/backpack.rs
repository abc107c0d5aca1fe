//! Saved gate and rail configurations ("custom items").

use serde::{Deserialize, Serialize};
use terragen_core::{IoConfig, Tile, TileType};
use uuid::Uuid;

use crate::error::{GameError, Result};
use crate::player::CustomPlacement;

/// A named preset for placing a gate or rail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomItem {
    pub id: Uuid,
    pub name: String,
    pub base_type: TileType,
    /// Port layout; gates only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io_config: Option<IoConfig>,
    /// Gate facing or rail connection mask
    pub variant: u8,
}

impl CustomItem {
    /// Build a preset for a gate. AND and OR gates need at least two inputs.
    pub fn gate(name: impl Into<String>, base_type: TileType, variant: u8, io_config: IoConfig) -> Result<Self> {
        let kind = base_type
            .gate_kind()
            .ok_or(GameError::NotCustomizable(base_type))?;
        io_config.validate(kind)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            base_type,
            io_config: Some(io_config),
            variant: variant % 4,
        })
    }

    /// Build a preset for a rail with the given connection mask
    pub fn rail(name: impl Into<String>, mask: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            base_type: TileType::Rail,
            io_config: None,
            variant: mask & 0x0F,
        }
    }

    /// Capture the settings of a tile already in the world
    pub fn from_tile(name: impl Into<String>, tile: &Tile) -> Result<Self> {
        match tile.tile_type {
            TileType::Rail => Ok(Self::rail(name, tile.variant)),
            t if t.is_gate() => Self::gate(name, t, tile.variant, tile.io_config()),
            other => Err(GameError::NotCustomizable(other)),
        }
    }

    pub fn placement(&self) -> CustomPlacement {
        CustomPlacement {
            item_id: self.id,
            variant: self.variant,
            io_config: self.io_config,
        }
    }
}

/// The player's collection of custom items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Backpack {
    items: Vec<CustomItem>,
}

impl Backpack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: CustomItem) -> Uuid {
        let id = item.id;
        tracing::debug!(%id, name = %item.name, base = %item.base_type, "custom item saved");
        self.items.push(item);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&CustomItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<CustomItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terragen_core::{GateKind, TerraError};

    #[test]
    fn test_and_needs_two_inputs() {
        let err = CustomItem::gate("half and", TileType::AndGate, 0, IoConfig::from_masks(0b0010, 0b0001))
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::World(TerraError::TooFewInputs {
                required: 2,
                actual: 1,
                ..
            })
        ));

        let item = CustomItem::gate("and", TileType::AndGate, 5, IoConfig::from_masks(0b1010, 0b0001)).unwrap();
        assert_eq!(item.variant, 1);
    }

    #[test]
    fn test_not_accepts_no_inputs() {
        let item = CustomItem::gate("clock", TileType::NotGate, 0, IoConfig::from_masks(0, 0b0001));
        assert!(item.is_ok());
    }

    #[test]
    fn test_from_tile() {
        let gate = Tile::gate(GateKind::Or, 3, IoConfig::DEFAULT);
        let item = CustomItem::from_tile("or", &gate).unwrap();
        assert_eq!(item.io_config, Some(IoConfig::DEFAULT));
        assert_eq!(item.variant, 3);

        let rail = Tile {
            variant: 0b0101,
            ..Tile::new(TileType::Rail)
        };
        let item = CustomItem::from_tile("straight", &rail).unwrap();
        assert_eq!(item.io_config, None);
        assert_eq!(item.variant, 0b0101);

        assert!(matches!(
            CustomItem::from_tile("wire", &Tile::new(TileType::Wire)),
            Err(GameError::NotCustomizable(TileType::Wire))
        ));
    }

    #[test]
    fn test_backpack_lookup() {
        let mut backpack = Backpack::new();
        let id = backpack.add(CustomItem::rail("cross", 0b1111));
        assert_eq!(backpack.len(), 1);
        assert_eq!(backpack.get(id).unwrap().placement().variant, 15);
        assert!(backpack.remove(id).is_some());
        assert!(backpack.is_empty());
        assert!(backpack.get(id).is_none());
    }
}
