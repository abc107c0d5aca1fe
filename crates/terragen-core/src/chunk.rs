//! Chunked storage for the infinite tile world.
//!
//! The world is split into square 16x16 chunks keyed by chunk coordinate:
//! - Top level: HashMap of chunk coordinates, populated on demand by a
//!   [`ChunkGenerator`] as the player moves
//! - Bottom level: a dense row-major array of tiles per chunk
//!
//! Chunks carry a dirty flag for the renderer. Any edit marks its own chunk
//! dirty, and edits on a chunk border also mark the neighbouring chunk, since
//! edge-matching visuals there depend on the edited tile.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::coord::{TilePos, TileRect};
use crate::error::TerraError;
use crate::tile::Tile;

/// Size of each chunk in both dimensions (16x16 tiles per chunk).
pub const CHUNK_SIZE: usize = 16;

const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

/// Coordinate of a chunk in the world.
///
/// Represents which 16x16 block a tile belongs to, using floored division so
/// negative world coordinates land in negative chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkCoord {
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// Create a ChunkCoord from a tile's world coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use terragen_core::{ChunkCoord, TilePos};
    ///
    /// assert_eq!(ChunkCoord::from_world(TilePos::new(17, 33)), ChunkCoord::new(1, 2));
    /// assert_eq!(ChunkCoord::from_world(TilePos::new(-1, -16)), ChunkCoord::new(-1, -1));
    /// assert_eq!(ChunkCoord::from_world(TilePos::new(-17, 0)), ChunkCoord::new(-2, 0));
    /// ```
    pub fn from_world(pos: TilePos) -> Self {
        Self {
            cx: pos.x.div_euclid(CHUNK_SIZE_I32),
            cy: pos.y.div_euclid(CHUNK_SIZE_I32),
        }
    }

    /// World position of this chunk's top-left tile
    pub fn origin(self) -> TilePos {
        TilePos::new(self.cx * CHUNK_SIZE_I32, self.cy * CHUNK_SIZE_I32)
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.cx + dx, self.cy + dy)
    }
}

/// Formats as the save-data key `"cx,cy"`
impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.cx, self.cy)
    }
}

impl FromStr for ChunkCoord {
    type Err = TerraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TerraError::InvalidChunkKey(s.to_string());
        let (cx, cy) = s.split_once(',').ok_or_else(invalid)?;
        let cx = cx.trim().parse().map_err(|_| invalid())?;
        let cy = cy.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(cx, cy))
    }
}

/// A single 16x16 chunk of tiles.
///
/// Tiles are stored row-major and addressed with local coordinates (0-15).
#[derive(Clone, Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    tiles: Vec<Tile>,
    dirty: bool,
    /// Opaque handle owned by the renderer; never read by the core
    cache_handle: Option<u64>,
}

impl Chunk {
    /// Build a chunk by evaluating `f` at every world position it covers.
    ///
    /// New chunks start dirty so they get rendered at least once.
    pub fn from_fn(coord: ChunkCoord, mut f: impl FnMut(TilePos) -> Tile) -> Self {
        let mut tiles = Vec::with_capacity(CHUNK_SIZE * CHUNK_SIZE);
        for local_y in 0..CHUNK_SIZE {
            for local_x in 0..CHUNK_SIZE {
                tiles.push(f(to_world_coords(coord, local_x, local_y)));
            }
        }
        Self {
            coord,
            tiles,
            dirty: true,
            cache_handle: None,
        }
    }

    /// A chunk where every tile is a copy of `tile`
    pub fn filled(coord: ChunkCoord, tile: Tile) -> Self {
        Self::from_fn(coord, |_| tile)
    }

    /// Rebuild a chunk from stored row-major tiles
    pub fn from_tiles(coord: ChunkCoord, tiles: Vec<Tile>) -> Result<Self, TerraError> {
        let expected = CHUNK_SIZE * CHUNK_SIZE;
        if tiles.len() != expected {
            return Err(TerraError::ChunkSize {
                coord,
                actual: tiles.len(),
                expected,
            });
        }
        Ok(Self {
            coord,
            tiles,
            dirty: true,
            cache_handle: None,
        })
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Get a reference to a tile at the given local coordinates.
    ///
    /// # Arguments
    ///
    /// * `local_x` - Column within this chunk (0-15)
    /// * `local_y` - Row within this chunk (0-15)
    pub fn get(&self, local_x: usize, local_y: usize) -> Option<&Tile> {
        if local_x >= CHUNK_SIZE || local_y >= CHUNK_SIZE {
            return None;
        }
        self.tiles.get(local_y * CHUNK_SIZE + local_x)
    }

    /// Get a mutable reference to a tile at the given local coordinates.
    ///
    /// Does not touch the dirty flag; go through [`TileGrid::modify_tile`]
    /// for edits that should reach the renderer.
    pub fn get_mut(&mut self, local_x: usize, local_y: usize) -> Option<&mut Tile> {
        if local_x >= CHUNK_SIZE || local_y >= CHUNK_SIZE {
            return None;
        }
        self.tiles.get_mut(local_y * CHUNK_SIZE + local_x)
    }

    /// Row-major tiles
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Iterate over all tiles with their world positions.
    pub fn iter(&self) -> impl Iterator<Item = (TilePos, &Tile)> {
        let coord = self.coord;
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            (
                to_world_coords(coord, i % CHUNK_SIZE, i / CHUNK_SIZE),
                tile,
            )
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Read and clear the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn cache_handle(&self) -> Option<u64> {
        self.cache_handle
    }

    pub fn set_cache_handle(&mut self, handle: Option<u64>) {
        self.cache_handle = handle;
    }
}

/// Produces chunks for coordinates that have not been visited yet.
pub trait ChunkGenerator {
    fn generate(&self, coord: ChunkCoord) -> Chunk;
}

impl<F> ChunkGenerator for F
where
    F: Fn(ChunkCoord) -> Chunk,
{
    fn generate(&self, coord: ChunkCoord) -> Chunk {
        self(coord)
    }
}

/// The sparse infinite tile grid.
///
/// Only chunks that have been generated or loaded exist. Reads and writes to
/// unloaded regions are not errors: reads return `None` and writes are
/// dropped.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TileGrid {
    #[serde(with = "chunk_map_serde")]
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl TileGrid {
    pub fn new() -> Self {
        Self {
            chunks: HashMap::new(),
        }
    }

    /// Get a reference to the tile at the given world position.
    pub fn get_tile(&self, pos: TilePos) -> Option<&Tile> {
        let (local_x, local_y) = to_local_coords(pos);
        self.chunks
            .get(&ChunkCoord::from_world(pos))?
            .get(local_x, local_y)
    }

    /// Edit the tile at `pos` in place and mark the affected chunks dirty.
    ///
    /// Returns `false` without calling `f` if the chunk is not loaded.
    pub fn modify_tile(&mut self, pos: TilePos, f: impl FnOnce(&mut Tile)) -> bool {
        let coord = ChunkCoord::from_world(pos);
        let (local_x, local_y) = to_local_coords(pos);

        let Some(chunk) = self.chunks.get_mut(&coord) else {
            tracing::trace!(%pos, "edit dropped, chunk {} not loaded", coord);
            return false;
        };
        if let Some(tile) = chunk.get_mut(local_x, local_y) {
            f(tile);
        }
        chunk.mark_dirty();

        // Border tiles feed the neighbour's edge-matching visuals
        if local_x == 0 {
            self.mark_dirty(coord.offset(-1, 0));
        }
        if local_x == CHUNK_SIZE - 1 {
            self.mark_dirty(coord.offset(1, 0));
        }
        if local_y == 0 {
            self.mark_dirty(coord.offset(0, -1));
        }
        if local_y == CHUNK_SIZE - 1 {
            self.mark_dirty(coord.offset(0, 1));
        }
        true
    }

    /// Replace the tile at `pos` wholesale
    pub fn set_tile(&mut self, pos: TilePos, tile: Tile) -> bool {
        self.modify_tile(pos, |t| *t = tile)
    }

    /// Insert (or replace) a chunk. Returns the previous chunk if one existed.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.coord(), chunk)
    }

    /// Generate the chunk at `coord` if it is not loaded yet.
    ///
    /// Returns `true` if a chunk was created.
    pub fn ensure_chunk(&mut self, coord: ChunkCoord, generator: &impl ChunkGenerator) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }
        let chunk = generator.generate(coord);
        debug_assert_eq!(chunk.coord(), coord);
        self.chunks.insert(coord, chunk);
        true
    }

    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Number of loaded chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Coordinates of chunks waiting to be re-rendered, sorted
    pub fn dirty_chunks(&self) -> Vec<ChunkCoord> {
        let mut dirty: Vec<_> = self
            .chunks
            .values()
            .filter(|c| c.is_dirty())
            .map(|c| c.coord())
            .collect();
        dirty.sort();
        dirty
    }

    /// Read and clear one chunk's dirty flag
    pub fn take_dirty(&mut self, coord: ChunkCoord) -> bool {
        self.chunks
            .get_mut(&coord)
            .map(|c| c.take_dirty())
            .unwrap_or(false)
    }

    /// All loaded tiles within a world rectangle, row by row.
    ///
    /// Positions in unloaded chunks are skipped.
    pub fn tiles_in_rect(&self, rect: TileRect) -> Vec<(TilePos, &Tile)> {
        rect.positions()
            .filter_map(|pos| self.get_tile(pos).map(|tile| (pos, tile)))
            .collect()
    }

    fn mark_dirty(&mut self, coord: ChunkCoord) {
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.mark_dirty();
        }
    }
}

/// Convert world coordinates to local coordinates within their chunk.
///
/// Uses floored modulo, so `-1` maps to `15`.
pub fn to_local_coords(pos: TilePos) -> (usize, usize) {
    (
        pos.x.rem_euclid(CHUNK_SIZE_I32) as usize,
        pos.y.rem_euclid(CHUNK_SIZE_I32) as usize,
    )
}

/// Convert a chunk coordinate and local coordinates to a world position.
pub fn to_world_coords(chunk: ChunkCoord, local_x: usize, local_y: usize) -> TilePos {
    chunk.origin().offset(local_x as i32, local_y as i32)
}

/// Chunks serialize as a map from `"cx,cy"` keys to row-major tile arrays
mod chunk_map_serde {
    use super::*;
    use serde::ser::SerializeMap;
    use serde::{de, Deserializer, Serializer};

    pub fn serialize<S>(chunks: &HashMap<ChunkCoord, Chunk>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut coords: Vec<_> = chunks.keys().copied().collect();
        coords.sort();

        let mut map = serializer.serialize_map(Some(coords.len()))?;
        for coord in coords {
            map.serialize_entry(&coord.to_string(), chunks[&coord].tiles())?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HashMap<ChunkCoord, Chunk>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ChunkMapVisitor;

        impl<'de> de::Visitor<'de> for ChunkMapVisitor {
            type Value = HashMap<ChunkCoord, Chunk>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map with chunk coordinate keys")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                let mut chunks = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    let tiles: Vec<Tile> = map.next_value()?;
                    let coord: ChunkCoord = key.parse().map_err(de::Error::custom)?;
                    let chunk = Chunk::from_tiles(coord, tiles).map_err(de::Error::custom)?;
                    chunks.insert(coord, chunk);
                }

                Ok(chunks)
            }
        }

        deserializer.deserialize_map(ChunkMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileType;

    fn grass_chunk(coord: ChunkCoord) -> Chunk {
        Chunk::filled(coord, Tile::new(TileType::Grass))
    }

    fn loaded_grid(radius: i32) -> TileGrid {
        let mut grid = TileGrid::new();
        for cy in -radius..=radius {
            for cx in -radius..=radius {
                grid.insert_chunk(grass_chunk(ChunkCoord::new(cx, cy)));
            }
        }
        for coord in grid.dirty_chunks() {
            grid.take_dirty(coord);
        }
        grid
    }

    #[test]
    fn test_chunk_coord_from_world() {
        assert_eq!(ChunkCoord::from_world(TilePos::new(0, 0)), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(TilePos::new(15, 15)), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(TilePos::new(16, 16)), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_world(TilePos::new(-1, 0)), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::from_world(TilePos::new(-16, -17)), ChunkCoord::new(-1, -2));
    }

    #[test]
    fn test_to_local_coords_negative() {
        assert_eq!(to_local_coords(TilePos::new(0, 0)), (0, 0));
        assert_eq!(to_local_coords(TilePos::new(17, 33)), (1, 1));
        assert_eq!(to_local_coords(TilePos::new(-1, -1)), (15, 15));
        assert_eq!(to_local_coords(TilePos::new(-16, -17)), (0, 15));
    }

    #[test]
    fn test_to_world_coords() {
        assert_eq!(to_world_coords(ChunkCoord::new(0, 0), 15, 15), TilePos::new(15, 15));
        assert_eq!(to_world_coords(ChunkCoord::new(1, 2), 1, 1), TilePos::new(17, 33));
        assert_eq!(to_world_coords(ChunkCoord::new(-1, -1), 15, 0), TilePos::new(-1, -16));
    }

    #[test]
    fn test_chunk_key_round_trip() {
        let coord = ChunkCoord::new(-3, 7);
        assert_eq!(coord.to_string(), "-3,7");
        assert_eq!("-3,7".parse::<ChunkCoord>(), Ok(coord));
        assert!("3;7".parse::<ChunkCoord>().is_err());
        assert!("a,7".parse::<ChunkCoord>().is_err());
    }

    #[test]
    fn test_chunk_from_tiles_checks_size() {
        let coord = ChunkCoord::new(0, 0);
        let err = Chunk::from_tiles(coord, vec![Tile::default(); 10]).unwrap_err();
        assert_eq!(
            err,
            TerraError::ChunkSize {
                coord,
                actual: 10,
                expected: 256
            }
        );
        assert!(Chunk::from_tiles(coord, vec![Tile::default(); 256]).is_ok());
    }

    #[test]
    fn test_chunk_iter_positions() {
        let chunk = Chunk::from_fn(ChunkCoord::new(-1, 0), |pos| {
            Tile::natural(TileType::Grass, (pos.x.rem_euclid(3)) as u8)
        });
        let (first, _) = chunk.iter().next().unwrap();
        assert_eq!(first, TilePos::new(-16, 0));
        let (last, _) = chunk.iter().last().unwrap();
        assert_eq!(last, TilePos::new(-1, 15));
        assert_eq!(chunk.get(15, 0).unwrap().variant, ((-1i32).rem_euclid(3)) as u8);
        assert!(chunk.get(16, 0).is_none());
    }

    #[test]
    fn test_get_tile_missing_chunk() {
        let grid = loaded_grid(0);
        assert!(grid.get_tile(TilePos::new(3, 3)).is_some());
        assert!(grid.get_tile(TilePos::new(-1, 3)).is_none());
        assert!(grid.get_tile(TilePos::new(100, 100)).is_none());
    }

    #[test]
    fn test_modify_tile_missing_chunk_is_noop() {
        let mut grid = loaded_grid(0);
        let mut called = false;
        assert!(!grid.modify_tile(TilePos::new(40, 40), |_| called = true));
        assert!(!called);
        assert!(grid.dirty_chunks().is_empty());
    }

    #[test]
    fn test_modify_tile_marks_own_chunk() {
        let mut grid = loaded_grid(1);
        assert!(grid.modify_tile(TilePos::new(5, 5), |t| t.tile_type = TileType::Wire));
        assert_eq!(grid.get_tile(TilePos::new(5, 5)).unwrap().tile_type, TileType::Wire);
        assert_eq!(grid.dirty_chunks(), vec![ChunkCoord::new(0, 0)]);
    }

    #[test]
    fn test_modify_tile_marks_border_neighbours() {
        let mut grid = loaded_grid(1);
        grid.modify_tile(TilePos::new(0, 7), |t| t.active = true);
        assert_eq!(
            grid.dirty_chunks(),
            vec![ChunkCoord::new(-1, 0), ChunkCoord::new(0, 0)]
        );
        for coord in grid.dirty_chunks() {
            grid.take_dirty(coord);
        }

        // Corner tile touches two neighbours
        grid.modify_tile(TilePos::new(15, 15), |t| t.active = true);
        assert_eq!(
            grid.dirty_chunks(),
            vec![ChunkCoord::new(0, 0), ChunkCoord::new(0, 1), ChunkCoord::new(1, 0)]
        );
    }

    #[test]
    fn test_modify_tile_negative_coordinates() {
        let mut grid = loaded_grid(1);
        let pos = TilePos::new(-1, -16);
        grid.set_tile(pos, Tile::new(TileType::Lever));
        let chunk = grid.chunk(ChunkCoord::new(-1, -1)).unwrap();
        assert_eq!(chunk.get(15, 0).unwrap().tile_type, TileType::Lever);
        // (-1, -16) is on the right and top borders of chunk (-1, -1); the
        // chunk above is not loaded
        assert_eq!(
            grid.dirty_chunks(),
            vec![ChunkCoord::new(-1, -1), ChunkCoord::new(0, -1)]
        );
    }

    #[test]
    fn test_take_dirty() {
        let mut grid = TileGrid::new();
        grid.insert_chunk(grass_chunk(ChunkCoord::new(0, 0)));
        assert!(grid.take_dirty(ChunkCoord::new(0, 0)));
        assert!(!grid.take_dirty(ChunkCoord::new(0, 0)));
        assert!(!grid.take_dirty(ChunkCoord::new(9, 9)));
    }

    #[test]
    fn test_ensure_chunk() {
        let mut grid = TileGrid::new();
        assert!(grid.ensure_chunk(ChunkCoord::new(2, -1), &grass_chunk));
        assert!(!grid.ensure_chunk(ChunkCoord::new(2, -1), &grass_chunk));
        assert_eq!(grid.chunk_count(), 1);
        assert!(grid.get_tile(TilePos::new(32, -16)).is_some());
    }

    #[test]
    fn test_tiles_in_rect_skips_unloaded() {
        let grid = loaded_grid(0);
        let rect = TileRect::new(TilePos::new(-2, 0), TilePos::new(1, 1));
        let tiles = grid.tiles_in_rect(rect);
        assert_eq!(tiles.len(), 4);
        assert_eq!(tiles[0].0, TilePos::new(0, 0));
    }

    #[test]
    fn test_grid_serde() {
        let mut grid = loaded_grid(0);
        grid.set_tile(TilePos::new(1, 2), Tile::new(TileType::Wire));
        let json = serde_json::to_string(&grid).unwrap();
        let back: TileGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back.chunk_count(), 1);
        assert_eq!(back.get_tile(TilePos::new(1, 2)).unwrap().tile_type, TileType::Wire);

        let bad = r#"{"chunks":{"0,0":[{"type":"GRASS"}]}}"#;
        assert!(serde_json::from_str::<TileGrid>(bad).is_err());
        let bad_key = r#"{"chunks":{"zero":[]}}"#;
        assert!(serde_json::from_str::<TileGrid>(bad_key).is_err());
    }
}
