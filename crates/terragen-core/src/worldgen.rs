//! Deterministic terrain generation.
//!
//! Biomes come from low-frequency value noise; vegetation and rocks from a
//! per-tile hash. The same seed always produces the same world.

use crate::chunk::{Chunk, ChunkCoord, ChunkGenerator};
use crate::coord::TilePos;
use crate::tile::{Tile, TileType};

/// Frequency of the biome noise in world tiles
const BIOME_SCALE: f64 = 0.05;

/// Generates natural terrain chunks for a world seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainGenerator {
    seed: i64,
}

impl TerrainGenerator {
    pub fn new(seed: i64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// The natural tile at a world position
    pub fn tile_at(&self, pos: TilePos) -> Tile {
        let biome = value_noise(
            pos.x as f64 * BIOME_SCALE,
            pos.y as f64 * BIOME_SCALE,
            self.seed,
        );
        let detail = hash_unit(pos.x as i64, pos.y as i64, self.seed);
        let variant = (hash_unit(pos.x as i64, pos.y as i64, self.seed.wrapping_add(1)) * 3.0) as u8;
        Tile::natural(classify(biome, detail), variant.min(2))
    }
}

impl ChunkGenerator for TerrainGenerator {
    fn generate(&self, coord: ChunkCoord) -> Chunk {
        tracing::trace!(chunk = %coord, seed = self.seed, "generating chunk");
        Chunk::from_fn(coord, |pos| self.tile_at(pos))
    }
}

/// Pick a terrain kind from biome noise and per-tile detail noise, both in
/// `[0, 1)`.
pub fn classify(biome: f64, detail: f64) -> TileType {
    if biome < 0.3 {
        TileType::Water
    } else if biome < 0.4 {
        TileType::Sand
    } else if detail > 0.95 {
        TileType::Stone
    } else if detail > 0.88 {
        TileType::Tree
    } else if detail > 0.85 {
        TileType::Flower
    } else {
        TileType::Grass
    }
}

/// Hash integer lattice coordinates to a value in `[0, 1)`
fn hash_unit(x: i64, y: i64, seed: i64) -> f64 {
    let mut h = (x as u64).wrapping_mul(374_761_393)
        ^ (y as u64).wrapping_mul(668_265_263)
        ^ (seed as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^= h >> 31;
    (h >> 11) as f64 / (1u64 << 53) as f64
}

/// Bilinear value noise over the hashed integer lattice
fn value_noise(x: f64, y: f64, seed: i64) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let (ix, iy) = (x0 as i64, y0 as i64);

    let s = hash_unit(ix, iy, seed);
    let t = hash_unit(ix + 1, iy, seed);
    let u = hash_unit(ix, iy + 1, seed);
    let v = hash_unit(ix + 1, iy + 1, seed);

    let fx = x - x0;
    let fy = y - y0;
    let top = s + (t - s) * fx;
    let bottom = u + (v - u) * fx;
    top + (bottom - top) * fy
}
