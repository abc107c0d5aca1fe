//! Grid builders shared by the unit tests.

use terragen_core::{Chunk, ChunkCoord, GateKind, IoConfig, Tile, TileGrid, TilePos, TileType};

/// Nine loaded grass chunks around the origin, with dirty flags cleared
pub fn flat_world() -> TileGrid {
    let mut grid = TileGrid::new();
    for cy in -1..=1 {
        for cx in -1..=1 {
            grid.insert_chunk(Chunk::filled(
                ChunkCoord::new(cx, cy),
                Tile::new(TileType::Grass),
            ));
        }
    }
    for coord in grid.dirty_chunks() {
        grid.take_dirty(coord);
    }
    grid
}

pub fn put(grid: &mut TileGrid, x: i32, y: i32, tile_type: TileType) {
    grid.set_tile(
        TilePos::new(x, y),
        Tile {
            placed: true,
            background: tile_type.is_overlay().then_some(TileType::Grass),
            ..Tile::new(tile_type)
        },
    );
}

pub fn put_gate(grid: &mut TileGrid, x: i32, y: i32, kind: GateKind, variant: u8, config: IoConfig) {
    grid.set_tile(TilePos::new(x, y), Tile::gate(kind, variant, config));
}

/// A horizontal run of wire from `x0` to `x1` inclusive
pub fn wire_row(grid: &mut TileGrid, x0: i32, x1: i32, y: i32) {
    for x in x0..=x1 {
        put(grid, x, y, TileType::Wire);
    }
}

pub fn tile(grid: &TileGrid, x: i32, y: i32) -> Tile {
    *grid.get_tile(TilePos::new(x, y)).expect("tile in loaded chunk")
}

pub fn is_on(grid: &TileGrid, x: i32, y: i32) -> bool {
    tile(grid, x, y).active
}
