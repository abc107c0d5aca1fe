//! Reusable structures: capture a region of placed tiles, price it, and
//! stamp it back into the world.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use terragen_circuit::CircuitEngine;
use terragen_core::{Inventory, IoConfig, TileGrid, TilePos, TileRect, TileType};
use uuid::Uuid;

use crate::error::{GameError, Result};

/// One tile of a blueprint, relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintTile {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub tile_type: TileType,
    /// Keeps the ground's variant when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io_config: Option<IoConfig>,
}

impl BlueprintTile {
    const fn at(x: i32, y: i32, tile_type: TileType) -> Self {
        Self {
            x,
            y,
            tile_type,
            variant: None,
            active: None,
            io_config: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: String,
    pub name: String,
    pub tiles: Vec<BlueprintTile>,
}

impl Blueprint {
    /// Copy every player-placed tile inside `rect`, positioned relative to
    /// the rectangle's centre.
    pub fn capture(grid: &TileGrid, rect: TileRect, name: &str) -> Self {
        let center = rect.center();
        let tiles = grid
            .tiles_in_rect(rect)
            .into_iter()
            .filter(|(_, tile)| tile.placed)
            .map(|(pos, tile)| BlueprintTile {
                x: pos.x - center.x,
                y: pos.y - center.y,
                tile_type: tile.tile_type,
                variant: Some(tile.variant),
                active: Some(tile.active),
                io_config: tile.io_config,
            })
            .collect();

        let name = if name.trim().is_empty() { "Untitled" } else { name };
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            tiles,
        }
    }

    /// One item per non-terrain tile. A lit lamp costs a plain lamp.
    pub fn cost(&self) -> BTreeMap<TileType, u32> {
        let mut cost = BTreeMap::new();
        for tile in &self.tiles {
            if tile.tile_type.is_terrain() {
                continue;
            }
            let item = match tile.tile_type {
                TileType::LampOn => TileType::Lamp,
                other => other,
            };
            *cost.entry(item).or_insert(0) += 1;
        }
        cost
    }

    pub fn can_build(&self, inventory: &Inventory) -> bool {
        inventory.has_all(&self.cost())
    }

    /// Pay for and stamp the blueprint with its origin at `anchor`, then
    /// settle every logic tile it wrote.
    pub fn place(
        &self,
        grid: &mut TileGrid,
        inventory: &mut Inventory,
        anchor: TilePos,
        max_depth: u32,
    ) -> Result<()> {
        let cost = self.cost();
        if !inventory.has_all(&cost) {
            return Err(GameError::MissingMaterials(self.name.clone()));
        }
        for (&item, &count) in &cost {
            inventory.remove(item, count)?;
        }

        let mut logic = Vec::new();
        let mut seen = HashSet::new();
        for bp in &self.tiles {
            let pos = anchor.offset(bp.x, bp.y);
            grid.modify_tile(pos, |t| {
                t.tile_type = bp.tile_type;
                t.variant = bp.variant.unwrap_or(t.variant);
                t.active = bp.active.unwrap_or(false);
                t.io_config = bp.io_config;
                t.placed = true;
            });
            if bp.tile_type.is_logic_component() && seen.insert(pos) {
                logic.push(pos);
            }
        }

        let mut engine = CircuitEngine::new(grid).with_max_depth(max_depth);
        for pos in logic {
            engine.update_circuit(pos);
        }
        tracing::info!(
            blueprint = %self.name,
            %anchor,
            tiles = self.tiles.len(),
            stats = ?engine.stats(),
            "blueprint placed"
        );
        Ok(())
    }
}

/// Blueprints every new world starts with
pub fn default_blueprints() -> Vec<Blueprint> {
    use TileType::{Flower, Floor, Grass, Lamp, NotGate, Wall, Water, Wire};

    let mut house = Vec::new();
    for y in -2i32..=2 {
        for x in -2i32..=2 {
            let edge = x.abs() == 2 || y.abs() == 2;
            let door = (x, y) == (0, 2);
            house.push(BlueprintTile::at(x, y, if edge && !door { Wall } else { Floor }));
        }
    }
    house.push(BlueprintTile::at(-1, 1, Lamp));
    house.push(BlueprintTile::at(1, 1, Flower));

    let mut clock = vec![BlueprintTile {
        variant: Some(1),
        io_config: Some(IoConfig::DEFAULT),
        ..BlueprintTile::at(0, 0, NotGate)
    }];
    for (x, y) in [(1, 0), (2, 0), (2, 1), (1, 1), (0, 1), (-1, 1), (-1, 0)] {
        clock.push(BlueprintTile::at(x, y, Wire));
    }
    clock.push(BlueprintTile::at(3, 0, Lamp));

    let mut garden = vec![BlueprintTile::at(0, 0, Water)];
    for (x, y) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
        garden.push(BlueprintTile::at(x, y, Flower));
    }
    for (x, y) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
        garden.push(BlueprintTile::at(x, y, Grass));
    }

    [("house_small", house), ("logic_clock", clock), ("garden_plot", garden)]
        .into_iter()
        .map(|(id, tiles)| Blueprint {
            id: id.to_string(),
            name: id.to_string(),
            tiles,
        })
        .collect()
}
