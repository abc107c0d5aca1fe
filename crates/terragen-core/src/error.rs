use thiserror::Error;

use crate::chunk::ChunkCoord;
use crate::tile::TileType;

/// Errors raised by the tile model and world storage.
///
/// The circuit engine never produces these: lookups on unloaded regions are
/// a normal "absent" result, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerraError {
    /// A chunk was built from the wrong number of tiles
    #[error("chunk {coord} has {actual} tiles, expected {expected}")]
    ChunkSize {
        coord: ChunkCoord,
        actual: usize,
        expected: usize,
    },

    /// A serialized chunk key was not of the form "cx,cy"
    #[error("invalid chunk key: {0}")]
    InvalidChunkKey(String),

    /// A tile type name did not match any known kind
    #[error("unknown tile type: {0}")]
    UnknownTileType(String),

    /// An AND/OR gate configuration with too few input ports
    #[error("{gate} needs at least {required} inputs, got {actual}")]
    TooFewInputs {
        gate: TileType,
        required: u32,
        actual: u32,
    },

    /// Not enough of an item in the inventory
    #[error("not enough {item}: need {needed}, have {available}")]
    InsufficientItems {
        item: TileType,
        needed: u32,
        available: u32,
    },
}
