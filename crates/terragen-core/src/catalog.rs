//! Static per-kind facts: what mining yields, what can be placed where, and
//! which tiles block movement.

use serde::{Deserialize, Serialize};

use crate::tile::TileType;

/// Items awarded for mining a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loot {
    pub item: TileType,
    pub count: u32,
}

/// Tool and hold time needed to mine a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineRequirement {
    pub required_tool: Option<TileType>,
    pub min_duration_ms: u32,
}

const fn loot(item: TileType, count: u32) -> Option<Loot> {
    Some(Loot { item, count })
}

const fn requirement(required_tool: Option<TileType>, min_duration_ms: u32) -> Option<MineRequirement> {
    Some(MineRequirement {
        required_tool,
        min_duration_ms,
    })
}

impl TileType {
    /// What mining this tile yields; `None` means it cannot be mined
    pub const fn loot(self) -> Option<Loot> {
        match self {
            TileType::Tree => loot(TileType::Wood, 2),
            TileType::Stone => loot(TileType::Stone, 2),
            TileType::Wall => loot(TileType::Wood, 1),
            TileType::Flower => loot(TileType::Flower, 1),
            TileType::Rail => loot(TileType::Rail, 1),
            TileType::Wire => loot(TileType::Wire, 1),
            TileType::Lever => loot(TileType::Lever, 1),
            TileType::Lamp | TileType::LampOn => loot(TileType::Lamp, 1),
            TileType::Sapling => loot(TileType::Sapling, 1),
            TileType::AndGate => loot(TileType::AndGate, 1),
            TileType::OrGate => loot(TileType::OrGate, 1),
            TileType::NotGate => loot(TileType::NotGate, 1),
            _ => None,
        }
    }

    /// Whether a click can break this tile
    pub const fn is_interactable(self) -> bool {
        self.loot().is_some()
    }

    pub const fn mine_requirement(self) -> Option<MineRequirement> {
        match self {
            TileType::Tree => requirement(None, 1000),
            TileType::Stone => requirement(Some(TileType::Pickaxe), 500),
            TileType::Wall => requirement(Some(TileType::Axe), 500),
            TileType::Flower | TileType::Wire | TileType::Sapling => requirement(None, 0),
            TileType::Rail => requirement(Some(TileType::Pickaxe), 200),
            TileType::Lever => requirement(None, 200),
            TileType::Lamp | TileType::LampOn => requirement(Some(TileType::Pickaxe), 200),
            TileType::AndGate | TileType::OrGate | TileType::NotGate => {
                requirement(Some(TileType::Pickaxe), 500)
            }
            _ => None,
        }
    }

    /// Items the player may put into the world
    pub const fn is_placeable(self) -> bool {
        matches!(
            self,
            TileType::Wall
                | TileType::Floor
                | TileType::Tree
                | TileType::Flower
                | TileType::Rail
                | TileType::Wire
                | TileType::Lever
                | TileType::Lamp
                | TileType::Minecart
                | TileType::Robot
                | TileType::Sapling
                | TileType::AndGate
                | TileType::OrGate
                | TileType::NotGate
        )
    }

    /// Placeable items that become entities rather than tiles
    pub const fn is_entity(self) -> bool {
        matches!(self, TileType::Minecart | TileType::Robot)
    }

    /// Blocks movement and placement
    pub const fn is_solid(self) -> bool {
        matches!(
            self,
            TileType::Water
                | TileType::Tree
                | TileType::Stone
                | TileType::Wall
                | TileType::Lamp
                | TileType::LampOn
                | TileType::AndGate
                | TileType::OrGate
                | TileType::NotGate
        )
    }

    /// Drawn over the ground rather than replacing it
    pub const fn is_overlay(self) -> bool {
        matches!(
            self,
            TileType::Rail
                | TileType::Wire
                | TileType::Lever
                | TileType::Lamp
                | TileType::LampOn
                | TileType::Flower
                | TileType::Sapling
                | TileType::AndGate
                | TileType::OrGate
                | TileType::NotGate
        )
    }

    /// Natural ground that blueprints neither capture as cost nor charge for
    pub const fn is_terrain(self) -> bool {
        matches!(self, TileType::Grass | TileType::Water | TileType::Sand)
    }

    /// Tile left behind when this one is mined and nothing lies underneath
    pub const fn mined_remainder(self) -> TileType {
        match self {
            TileType::Wall => TileType::Floor,
            _ => TileType::Grass,
        }
    }
}
