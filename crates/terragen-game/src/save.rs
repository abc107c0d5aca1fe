//! JSON snapshots of a whole session.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use terragen_core::{Inventory, TileGrid};

use crate::backpack::Backpack;
use crate::blueprint::Blueprint;
use crate::config::GameConfig;
use crate::error::Result;
use crate::player::Player;
use crate::state::{Entity, GameState};

/// Crate version written into every snapshot
pub const SNAPSHOT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything needed to resume a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub seed: i64,
    pub player: Player,
    pub inventory: Inventory,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub blueprints: Vec<Blueprint>,
    #[serde(default, rename = "customItems")]
    pub backpack: Backpack,
    pub world: TileGrid,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION.to_string(),
            saved_at: Utc::now(),
            seed: self.seed(),
            player: self.player.clone(),
            inventory: self.inventory.clone(),
            entities: self.entities.clone(),
            blueprints: self.blueprints.clone(),
            backpack: self.backpack.clone(),
            world: self.grid.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Resume from a snapshot. Every loaded chunk comes back dirty.
    pub fn from_json(json: &str, config: GameConfig) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        tracing::info!(
            version = %snapshot.version,
            saved_at = %snapshot.saved_at.to_rfc3339(),
            chunks = snapshot.world.chunk_count(),
            "snapshot loaded"
        );
        Ok(GameState::from_snapshot(snapshot, config))
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    pub fn load_from(path: impl AsRef<Path>, config: GameConfig) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backpack::CustomItem;
    use crate::error::GameError;
    use terragen_core::{TilePos, TileType};

    #[test]
    fn test_round_trip() {
        let mut state = GameState::new(GameConfig {
            seed: 42,
            ..GameConfig::default()
        });
        state.grant(TileType::Wire, 3);
        state.player.select(Some(TileType::Wire));
        state.click(TilePos::new(8, 9), false).ok();
        state.backpack.add(CustomItem::rail("corner", 0b0011));

        let json = state.to_json().unwrap();
        assert!(json.contains("\"savedAt\""));
        assert!(json.contains("\"customItems\""));

        let loaded = GameState::from_json(&json, GameConfig::default()).unwrap();
        assert_eq!(loaded.seed(), 42);
        assert_eq!(loaded.config().seed, 42);
        assert_eq!(loaded.inventory, state.inventory);
        assert_eq!(loaded.player, state.player);
        assert_eq!(loaded.backpack, state.backpack);
        assert_eq!(loaded.blueprints, state.blueprints);
        assert_eq!(loaded.grid.chunk_count(), state.grid.chunk_count());
        assert_eq!(
            loaded.grid.get_tile(TilePos::new(8, 9)),
            state.grid.get_tile(TilePos::new(8, 9))
        );
        assert_eq!(loaded.grid.dirty_chunks().len(), loaded.grid.chunk_count());
    }

    #[test]
    fn test_snapshot_metadata() {
        let snapshot = GameState::default().snapshot();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        let json = serde_json::to_value(&snapshot).unwrap();
        let saved_at = json["savedAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(saved_at).is_ok());
    }

    #[test]
    fn test_truncated_chunk_is_rejected() {
        let state = GameState::default();
        let mut json = serde_json::to_value(state.snapshot()).unwrap();
        let chunks = json["world"]["chunks"].as_object_mut().unwrap();
        let first = chunks.values_mut().next().unwrap();
        first.as_array_mut().unwrap().pop();

        let err = GameState::from_json(&json.to_string(), GameConfig::default()).unwrap_err();
        assert!(matches!(err, GameError::Serialization(_)));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("terragen-{}.json", uuid::Uuid::new_v4()));
        let state = GameState::default();
        state.save_to(&path).unwrap();
        let loaded = GameState::load_from(&path, GameConfig::default()).unwrap();
        assert_eq!(loaded.inventory, state.inventory);
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            GameState::load_from(&path, GameConfig::default()),
            Err(GameError::Io(_))
        ));
    }
}
