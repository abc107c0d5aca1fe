//! Player-facing edits that keep the circuit consistent: mining, lever
//! toggles, gate rotation and reconfiguration, and placement.

use terragen_core::{InventorySink, IoConfig, Loot, Tile, TilePos, TileType};

use crate::engine::CircuitEngine;
use crate::error::PlaceError;

/// A tile about to be put into the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub tile_type: TileType,
    /// Gate facing or rail mask
    pub variant: u8,
    /// Port layout for gates; the default layout when `None`
    pub io_config: Option<IoConfig>,
}

impl Placement {
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            variant: 0,
            io_config: None,
        }
    }

    pub fn with_variant(mut self, variant: u8) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_io_config(mut self, io_config: IoConfig) -> Self {
        self.io_config = Some(io_config);
        self
    }
}

/// What a click on an existing tile did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    LeverToggled { active: bool },
    GateRotated { variant: u8 },
    /// Shift-click on a gate; the caller should open the port editor
    ConfigureGate,
    /// Shift-click on a rail; the caller should open the rail editor
    ConfigureRail,
    Mined(Loot),
    Nothing,
}

impl CircuitEngine<'_> {
    /// Break the tile at `pos`, award its loot and re-settle the neighbours.
    ///
    /// Returns `None` when the tile is missing or cannot be mined.
    pub fn mine(&mut self, pos: TilePos, sink: &mut impl InventorySink) -> Option<Loot> {
        let tile = self.tile(pos)?;
        if !tile.tile_type.is_interactable() {
            return None;
        }
        let loot = tile.tile_type.loot()?;

        let next = tile
            .background
            .unwrap_or_else(|| tile.tile_type.mined_remainder());
        self.grid.modify_tile(pos, |t| {
            t.tile_type = next;
            t.active = false;
            t.placed = next == TileType::Floor && t.placed;
            t.background = None;
            t.io_config = None;
        });
        sink.add_item(loot.item, loot.count);
        tracing::debug!(%pos, mined = %tile.tile_type, left = %next, "tile mined");

        for neighbor in pos.neighbors() {
            self.propagate(neighbor, 0);
        }
        Some(loot)
    }

    /// Flip a lever and re-settle its net. Returns the new state.
    pub fn toggle_lever(&mut self, pos: TilePos) -> Option<bool> {
        let tile = self.tile(pos)?;
        if tile.tile_type != TileType::Lever {
            return None;
        }
        let active = !tile.active;
        self.grid.modify_tile(pos, |t| t.active = active);
        tracing::debug!(%pos, active, "lever toggled");
        self.propagate(pos, 0);
        Some(active)
    }

    /// Turn a gate a quarter clockwise. Returns the new facing.
    pub fn rotate_gate(&mut self, pos: TilePos) -> Option<u8> {
        let tile = self.tile(pos)?;
        if !tile.is_gate() {
            return None;
        }
        let variant = (tile.variant + 1) % 4;
        self.grid.modify_tile(pos, |t| t.variant = variant);
        tracing::debug!(%pos, variant, "gate rotated");

        self.evaluate_gate_at(pos, 0);
        for neighbor in pos.neighbors() {
            self.propagate(neighbor, 0);
        }
        Some(variant)
    }

    /// Replace a gate's port layout and re-settle it with its neighbours.
    pub fn reconfigure_gate(&mut self, pos: TilePos, io_config: IoConfig) -> bool {
        if !self.tile(pos).is_some_and(|t| t.is_gate()) {
            return false;
        }
        self.grid.modify_tile(pos, |t| t.io_config = Some(io_config));
        tracing::debug!(%pos, bits = io_config.bits(), "gate reconfigured");

        self.propagate(pos, 0);
        for neighbor in pos.neighbors() {
            self.propagate(neighbor, 0);
        }
        true
    }

    /// Set a rail's connection mask. Rails carry no signal.
    pub fn configure_rail(&mut self, pos: TilePos, mask: u8) -> bool {
        if !self.tile(pos).is_some_and(|t| t.tile_type.is_rail()) {
            return false;
        }
        self.grid.modify_tile(pos, |t| t.variant = mask & 0x0F)
    }

    /// Put a tile into the world, layering overlays over the existing ground.
    pub fn place_tile(&mut self, pos: TilePos, placement: Placement) -> Result<(), PlaceError> {
        let kind = placement.tile_type;
        if !kind.is_placeable() || kind.is_entity() {
            return Err(PlaceError::NotPlaceable(kind));
        }
        let existing = self.tile(pos).ok_or(PlaceError::NotLoaded(pos))?;
        if existing.tile_type.is_solid() {
            return Err(PlaceError::Blocked {
                pos,
                occupant: existing.tile_type,
            });
        }

        let background = layered_background(&existing, kind);
        let io_config = kind
            .is_gate()
            .then(|| placement.io_config.unwrap_or_default());
        self.grid.set_tile(
            pos,
            Tile {
                tile_type: kind,
                variant: placement.variant,
                active: false,
                placed: true,
                io_config,
                background,
            },
        );
        tracing::debug!(%pos, placed = %kind, variant = placement.variant, "tile placed");

        if kind.is_logic_component() {
            self.propagate(pos, 0);
        }
        // Replacing part of a net can cut it in two
        if kind.is_logic_component() || existing.tile_type.is_logic_component() {
            for neighbor in pos.neighbors() {
                self.propagate(neighbor, 0);
            }
        }
        Ok(())
    }

    /// Handle a click on an existing tile.
    ///
    /// Levers toggle. Gates rotate, or ask for the port editor when `shift`
    /// is held. Shift on a rail asks for the rail editor. Everything else is
    /// mined.
    pub fn interact(
        &mut self,
        pos: TilePos,
        shift: bool,
        sink: &mut impl InventorySink,
    ) -> ClickOutcome {
        let Some(tile) = self.tile(pos) else {
            return ClickOutcome::Nothing;
        };

        match tile.tile_type {
            TileType::Lever => self
                .toggle_lever(pos)
                .map_or(ClickOutcome::Nothing, |active| ClickOutcome::LeverToggled { active }),
            t if t.is_gate() && shift => ClickOutcome::ConfigureGate,
            t if t.is_gate() => self
                .rotate_gate(pos)
                .map_or(ClickOutcome::Nothing, |variant| ClickOutcome::GateRotated { variant }),
            t if t.is_rail() && shift => ClickOutcome::ConfigureRail,
            _ => self
                .mine(pos, sink)
                .map_or(ClickOutcome::Nothing, ClickOutcome::Mined),
        }
    }
}

/// Ground recorded under a newly placed tile of kind `placing`.
fn layered_background(existing: &Tile, placing: TileType) -> Option<TileType> {
    if !placing.is_overlay() {
        return None;
    }
    match existing.tile_type {
        TileType::Flower => Some(TileType::Flower),
        t if t.is_overlay() => existing.background,
        t => Some(t),
    }
}
