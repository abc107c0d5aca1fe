use serde::{Deserialize, Serialize};
use terragen_core::{ChunkCoord, Direction, IoConfig, TilePos, TileType};
use uuid::Uuid;

/// Walking speed in tiles per second
pub const WALK_SPEED: f32 = 5.0;

/// Settings carried over from a backpack item while placing it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPlacement {
    pub item_id: Uuid,
    pub variant: u8,
    pub io_config: Option<IoConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub facing: Direction,
    pub selected_item: Option<TileType>,
    #[serde(default)]
    pub placing_custom: Option<CustomPlacement>,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            facing: Direction::Down,
            selected_item: None,
            placing_custom: None,
        }
    }

    /// Tile the player is standing on
    pub fn tile_pos(&self) -> TilePos {
        TilePos::new((self.x + 0.5).floor() as i32, (self.y + 0.5).floor() as i32)
    }

    pub fn chunk(&self) -> ChunkCoord {
        ChunkCoord::from_world(TilePos::new(self.x.floor() as i32, self.y.floor() as i32))
    }

    /// Straight-line distance to the corner of a tile
    pub fn distance_to(&self, pos: TilePos) -> f32 {
        let dx = pos.x as f32 - self.x;
        let dy = pos.y as f32 - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Pick a plain inventory item, dropping any custom placement
    pub fn select(&mut self, item: Option<TileType>) {
        self.selected_item = item;
        self.placing_custom = None;
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::new(8.0, 8.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        let player = Player::new(-0.7, 15.6);
        assert_eq!(player.tile_pos(), TilePos::new(-1, 16));
        assert_eq!(player.chunk(), ChunkCoord::new(-1, 0));
        assert!((player.distance_to(TilePos::new(2, 19)) - 4.3417).abs() < 1e-3);
    }

    #[test]
    fn test_select_clears_custom() {
        let mut player = Player::default();
        player.placing_custom = Some(CustomPlacement {
            item_id: Uuid::new_v4(),
            variant: 2,
            io_config: None,
        });
        player.select(Some(TileType::Wire));
        assert_eq!(player.selected_item, Some(TileType::Wire));
        assert!(player.placing_custom.is_none());
    }
}
