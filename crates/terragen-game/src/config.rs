use std::env;
use std::path::PathBuf;

use terragen_circuit::MAX_PROPAGATION_DEPTH;

/// Game configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// World seed for terrain generation
    pub seed: i64,
    /// Chunks streamed in each direction around the player
    pub load_radius: i32,
    /// Depth guard for circuit cascades
    pub max_depth: u32,
    /// Furthest a click may land from the player, in tiles
    pub reach: f32,
    /// Where the binary writes its snapshot
    pub save_path: PathBuf,
}

impl GameConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let seed = env::var("TERRAGEN_SEED")
            .unwrap_or_else(|_| "1337".to_string())
            .parse()?;
        let load_radius = env::var("TERRAGEN_LOAD_RADIUS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()?;
        let max_depth = env::var("TERRAGEN_MAX_DEPTH")
            .unwrap_or_else(|_| MAX_PROPAGATION_DEPTH.to_string())
            .parse()?;
        let reach = env::var("TERRAGEN_REACH")
            .unwrap_or_else(|_| "8.0".to_string())
            .parse()?;
        let save_path = env::var("TERRAGEN_SAVE_PATH")
            .unwrap_or_else(|_| "terragen-save.json".to_string())
            .into();

        Ok(Self {
            seed,
            load_radius,
            max_depth,
            reach,
            save_path,
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            load_radius: 1,
            max_depth: MAX_PROPAGATION_DEPTH,
            reach: 8.0,
            save_path: PathBuf::from("terragen-save.json"),
        }
    }
}
