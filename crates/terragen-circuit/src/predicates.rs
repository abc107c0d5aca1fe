//! Classification of possibly-absent tiles. An unloaded position is never
//! conductive, a gate, or a rail.

use terragen_core::Tile;

pub fn is_conductive(tile: Option<&Tile>) -> bool {
    tile.is_some_and(|t| t.tile_type.is_conductive())
}

pub fn is_gate(tile: Option<&Tile>) -> bool {
    tile.is_some_and(|t| t.tile_type.is_gate())
}

pub fn is_rail(tile: Option<&Tile>) -> bool {
    tile.is_some_and(|t| t.tile_type.is_rail())
}
