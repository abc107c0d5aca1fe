use terragen_circuit::PlaceError;
use terragen_core::{TerraError, TilePos, TileType};
use thiserror::Error;

/// Game session error type
#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    World(#[from] TerraError),

    #[error("Placement failed: {0}")]
    Place(#[from] PlaceError),

    #[error("No loaded tile at {0}")]
    NotLoaded(TilePos),

    #[error("{target} is out of reach")]
    OutOfReach { target: TilePos },

    #[error("Not enough materials for blueprint {0}")]
    MissingMaterials(String),

    #[error("Unknown blueprint: {0}")]
    UnknownBlueprint(String),

    #[error("Nothing placed inside the selection")]
    EmptyBlueprint,

    #[error("Mining this needs a {0}")]
    MissingTool(TileType),

    #[error("No recipe makes {0}")]
    NoRecipe(TileType),

    #[error("Cannot craft {0} from the current inventory")]
    CannotCraft(TileType),

    #[error("{0} cannot be saved as a custom item")]
    NotCustomizable(TileType),

    #[error("Unknown custom item: {0}")]
    UnknownCustomItem(uuid::Uuid),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
