use terragen_core::{TilePos, TileType};
use thiserror::Error;

/// Why a tile could not be placed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("{0} cannot be placed as a tile")]
    NotPlaceable(TileType),

    #[error("no loaded tile at {0}")]
    NotLoaded(TilePos),

    #[error("{occupant} at {pos} blocks placement")]
    Blocked { pos: TilePos, occupant: TileType },
}
