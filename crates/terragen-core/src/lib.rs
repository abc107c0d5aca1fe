pub mod catalog;
pub mod chunk;
pub mod coord;
pub mod error;
pub mod inventory;
pub mod tile;
pub mod worldgen;

pub use catalog::{Loot, MineRequirement};
pub use chunk::{Chunk, ChunkCoord, ChunkGenerator, TileGrid, CHUNK_SIZE};
pub use coord::{Direction, TilePos, TileRect, DIRS};
pub use error::TerraError;
pub use inventory::{Inventory, InventorySink};
pub use tile::{GateKind, IoConfig, PortMode, Tile, TileType};
pub use worldgen::TerrainGenerator;
