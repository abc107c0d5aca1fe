pub mod backpack;
pub mod blueprint;
pub mod config;
pub mod crafting;
pub mod error;
pub mod player;
pub mod save;
pub mod state;

pub use backpack::{Backpack, CustomItem};
pub use blueprint::{default_blueprints, Blueprint, BlueprintTile};
pub use config::GameConfig;
pub use crafting::{can_craft, craft, craft_item, recipe_for, Recipe, RecipeCategory, RECIPES};
pub use error::{GameError, Result};
pub use player::{CustomPlacement, Player};
pub use save::{Snapshot, SNAPSHOT_VERSION};
pub use state::{ClickResult, Entity, GameState};
