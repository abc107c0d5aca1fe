//! A running game session.

use serde::{Deserialize, Serialize};
use terragen_circuit::{CircuitEngine, ClickOutcome, Placement};
use terragen_core::{
    ChunkCoord, Direction, Inventory, InventorySink, IoConfig, TerrainGenerator, TileGrid,
    TilePos, TileRect, TileType,
};
use uuid::Uuid;

use crate::backpack::{Backpack, CustomItem};
use crate::blueprint::{default_blueprints, Blueprint};
use crate::config::GameConfig;
use crate::crafting;
use crate::error::{GameError, Result};
use crate::player::{Player, WALK_SPEED};
use crate::save::Snapshot;

/// A spawned minecart or robot. Only its resting position is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: Uuid,
    pub kind: TileType,
    pub x: f32,
    pub y: f32,
}

/// What a world click ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResult {
    Placed(TileType),
    Spawned(Uuid),
    Interacted(ClickOutcome),
}

/// World, player and everything the player owns
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: TileGrid,
    pub player: Player,
    pub inventory: Inventory,
    pub entities: Vec<Entity>,
    pub blueprints: Vec<Blueprint>,
    pub backpack: Backpack,
    generator: TerrainGenerator,
    config: GameConfig,
}

impl GameState {
    /// Start a fresh world and stream in the chunks around the player
    pub fn new(config: GameConfig) -> Self {
        let mut state = Self {
            grid: TileGrid::new(),
            player: Player::default(),
            inventory: [(TileType::Axe, 1), (TileType::Pickaxe, 1)].into_iter().collect(),
            entities: Vec::new(),
            blueprints: default_blueprints(),
            backpack: Backpack::new(),
            generator: TerrainGenerator::new(config.seed),
            config,
        };
        let generated = state.tick();
        tracing::info!(seed = state.seed(), chunks = generated, "world created");
        state
    }

    /// Rebuild a session from a snapshot, keeping the snapshot's seed
    pub(crate) fn from_snapshot(snapshot: Snapshot, config: GameConfig) -> Self {
        let blueprints = if snapshot.blueprints.is_empty() {
            default_blueprints()
        } else {
            snapshot.blueprints
        };
        Self {
            grid: snapshot.world,
            player: snapshot.player,
            inventory: snapshot.inventory,
            entities: snapshot.entities,
            blueprints,
            backpack: snapshot.backpack,
            generator: TerrainGenerator::new(snapshot.seed),
            config: GameConfig {
                seed: snapshot.seed,
                ..config
            },
        }
    }

    pub fn seed(&self) -> i64 {
        self.generator.seed()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Make sure every chunk within the load radius of the player exists.
    ///
    /// Returns how many chunks were generated.
    pub fn tick(&mut self) -> usize {
        let center = self.player.chunk();
        let radius = self.config.load_radius;
        let mut generated = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let coord = ChunkCoord::new(center.cx + dx, center.cy + dy);
                if self.grid.ensure_chunk(coord, &self.generator) {
                    generated += 1;
                }
            }
        }
        generated
    }

    /// Move the player for `dt_ms` along `(dx, dy)`, each in -1..=1.
    ///
    /// Axes are checked separately against solid tiles, so the player slides
    /// along walls.
    pub fn walk(&mut self, dx: f32, dy: f32, dt_ms: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        let scale = if dx != 0.0 && dy != 0.0 { 0.707 } else { 1.0 };
        let step = WALK_SPEED * dt_ms / 1000.0 * scale;
        let next_x = self.player.x + dx * step;
        let next_y = self.player.y + dy * step;

        if !self.collides(next_x, self.player.y) {
            self.player.x = next_x;
        }
        if !self.collides(self.player.x, next_y) {
            self.player.y = next_y;
        }

        if dy < 0.0 {
            self.player.facing = Direction::Up;
        }
        if dy > 0.0 {
            self.player.facing = Direction::Down;
        }
        if dx < 0.0 {
            self.player.facing = Direction::Left;
        }
        if dx > 0.0 {
            self.player.facing = Direction::Right;
        }
    }

    fn collides(&self, x: f32, y: f32) -> bool {
        let pos = TilePos::new((x + 0.5).floor() as i32, (y + 0.5).floor() as i32);
        self.grid
            .get_tile(pos)
            .is_some_and(|t| t.tile_type.is_solid())
    }

    fn engine(grid: &mut TileGrid, max_depth: u32) -> CircuitEngine<'_> {
        CircuitEngine::new(grid).with_max_depth(max_depth)
    }

    fn check_reach(&self, target: TilePos) -> Result<()> {
        if self.player.distance_to(target) > self.config.reach {
            return Err(GameError::OutOfReach { target });
        }
        Ok(())
    }

    /// Handle a click on a world tile.
    ///
    /// With a held entity item, spawns it. With a held placeable item and a
    /// free target, places it. Otherwise the click goes to the tile itself.
    pub fn click(&mut self, pos: TilePos, shift: bool) -> Result<ClickResult> {
        self.check_reach(pos)?;

        if let Some(item) = self.player.selected_item {
            if item.is_entity() && self.inventory.has(item, 1) {
                return Ok(ClickResult::Spawned(self.spawn_entity(item, pos)?));
            }
            let free = self
                .grid
                .get_tile(pos)
                .is_some_and(|t| !t.tile_type.is_solid());
            if item.is_placeable() && self.inventory.has(item, 1) && free {
                let placement = self.placement_for(item);
                Self::engine(&mut self.grid, self.config.max_depth).place_tile(pos, placement)?;
                self.inventory.remove(item, 1)?;
                return Ok(ClickResult::Placed(item));
            }
        }

        let Some(tile) = self.grid.get_tile(pos).copied() else {
            return Ok(ClickResult::Interacted(ClickOutcome::Nothing));
        };
        let mines = !(tile.tile_type == TileType::Lever
            || tile.is_gate()
            || (tile.tile_type.is_rail() && shift));
        if mines {
            if let Some(tool) = tile.tile_type.mine_requirement().and_then(|r| r.required_tool) {
                if !self.inventory.has(tool, 1) {
                    return Err(GameError::MissingTool(tool));
                }
            }
        }

        let outcome =
            Self::engine(&mut self.grid, self.config.max_depth).interact(pos, shift, &mut self.inventory);
        Ok(ClickResult::Interacted(outcome))
    }

    /// Variant and ports for placing `item`: a selected custom item wins,
    /// otherwise gates face the way the player does.
    fn placement_for(&self, item: TileType) -> Placement {
        let placement = Placement::new(item);
        match self.player.placing_custom {
            Some(custom) if item.is_gate() || item.is_rail() => {
                let placement = placement.with_variant(custom.variant);
                match custom.io_config {
                    Some(io_config) => placement.with_io_config(io_config),
                    None => placement,
                }
            }
            _ if item.is_gate() => placement.with_variant(self.player.facing.index() as u8),
            _ => placement,
        }
    }

    fn spawn_entity(&mut self, kind: TileType, pos: TilePos) -> Result<Uuid> {
        self.inventory.remove(kind, 1)?;
        let entity = Entity {
            id: Uuid::new_v4(),
            kind,
            x: pos.x as f32 + 0.5,
            y: pos.y as f32 + 0.5,
        };
        tracing::debug!(id = %entity.id, %kind, %pos, "entity spawned");
        self.entities.push(entity);
        Ok(entity.id)
    }

    /// Replace the ports of the gate at `pos`
    pub fn configure_gate(&mut self, pos: TilePos, io_config: IoConfig) -> bool {
        Self::engine(&mut self.grid, self.config.max_depth).reconfigure_gate(pos, io_config)
    }

    /// Replace the connection mask of the rail at `pos`
    pub fn configure_rail(&mut self, pos: TilePos, mask: u8) -> bool {
        Self::engine(&mut self.grid, self.config.max_depth).configure_rail(pos, mask)
    }

    pub fn blueprint(&self, id: &str) -> Option<&Blueprint> {
        self.blueprints.iter().find(|bp| bp.id == id)
    }

    /// Capture the placed tiles between two corners as a new blueprint
    pub fn save_blueprint(&mut self, a: TilePos, b: TilePos, name: &str) -> Result<&Blueprint> {
        let blueprint = Blueprint::capture(&self.grid, TileRect::new(a, b), name);
        if blueprint.tiles.is_empty() {
            return Err(GameError::EmptyBlueprint);
        }
        tracing::info!(name = %blueprint.name, tiles = blueprint.tiles.len(), "blueprint saved");
        self.blueprints.push(blueprint);
        let index = self.blueprints.len() - 1;
        Ok(&self.blueprints[index])
    }

    /// Build a blueprint from the library centred on `anchor`
    pub fn place_blueprint(&mut self, id: &str, anchor: TilePos) -> Result<()> {
        self.check_reach(anchor)?;
        let blueprint = self
            .blueprint(id)
            .cloned()
            .ok_or_else(|| GameError::UnknownBlueprint(id.to_string()))?;
        blueprint.place(&mut self.grid, &mut self.inventory, anchor, self.config.max_depth)
    }

    /// Store the gate or rail at `pos` in the backpack
    pub fn save_custom_item(&mut self, pos: TilePos, name: &str) -> Result<Uuid> {
        let tile = self
            .grid
            .get_tile(pos)
            .copied()
            .ok_or(GameError::NotLoaded(pos))?;
        let item = CustomItem::from_tile(name, &tile)?;
        Ok(self.backpack.add(item))
    }

    /// Hold a backpack item so the next placement uses its settings
    pub fn select_custom_item(&mut self, id: Uuid) -> Result<()> {
        let item = self.backpack.get(id).ok_or(GameError::UnknownCustomItem(id))?;
        self.player.selected_item = Some(item.base_type);
        self.player.placing_custom = Some(item.placement());
        Ok(())
    }

    pub fn craft(&mut self, item: TileType) -> Result<()> {
        crafting::craft_item(item, &mut self.inventory)
    }

    /// Give the player items directly
    pub fn grant(&mut self, item: TileType, count: u32) {
        self.inventory.add_item(item, count);
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(GameConfig::default())
    }
}
