//! The propagation engine shared by the net and gate passes.
//!
//! Net propagation and gate evaluation call each other: a net that changes
//! level re-evaluates the gates around it, and a gate whose output flips
//! re-floods the nets on its output sides. Every hop carries a depth counter
//! and a cascade stops once it exceeds the engine's depth limit, which is the
//! only protection against combinational loops.

use terragen_core::{Tile, TileGrid, TilePos};

/// Default depth limit for one cascade
pub const MAX_PROPAGATION_DEPTH: u32 = 100;

/// Counters for one engine's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Nets flooded and re-levelled
    pub net_updates: u32,
    /// Gate evaluations, including ones that changed nothing
    pub gate_evaluations: u32,
    /// Tile writes made by propagation
    pub tiles_changed: u32,
    /// Calls cut off by the depth limit
    pub depth_limit_hits: u32,
    /// Deepest level reached
    pub max_depth: u32,
}

/// Runs circuit updates against a borrowed grid.
///
/// Create one per external edit; all propagation finishes before the call
/// that triggered it returns.
pub struct CircuitEngine<'g> {
    pub(crate) grid: &'g mut TileGrid,
    max_depth: u32,
    stats: PropagationStats,
}

impl<'g> CircuitEngine<'g> {
    pub fn new(grid: &'g mut TileGrid) -> Self {
        Self {
            grid,
            max_depth: MAX_PROPAGATION_DEPTH,
            stats: PropagationStats::default(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn grid(&self) -> &TileGrid {
        &*self.grid
    }

    pub fn stats(&self) -> &PropagationStats {
        &self.stats
    }

    /// Re-settle the circuit starting at `pos`.
    ///
    /// A gate is re-evaluated; a conductive tile has its whole net flooded
    /// and re-levelled; anything else is ignored.
    pub fn update_circuit(&mut self, pos: TilePos) {
        self.propagate(pos, 0);
    }

    /// Re-evaluate the gate at `pos`; no-op if it is not a gate.
    pub fn evaluate_gate(&mut self, pos: TilePos) {
        self.evaluate_gate_at(pos, 0);
    }

    pub(crate) fn stats_mut(&mut self) -> &mut PropagationStats {
        &mut self.stats
    }

    pub(crate) fn tile(&self, pos: TilePos) -> Option<Tile> {
        self.grid.get_tile(pos).copied()
    }

    /// Depth guard. Returns `false` when the cascade must stop here.
    pub(crate) fn enter(&mut self, depth: u32) -> bool {
        if depth > self.max_depth {
            if self.stats.depth_limit_hits == 0 {
                tracing::warn!(
                    limit = self.max_depth,
                    "circuit cascade hit the depth limit, likely a combinational loop"
                );
            }
            self.stats.depth_limit_hits += 1;
            return false;
        }
        self.stats.max_depth = self.stats.max_depth.max(depth);
        true
    }
}

/// Re-settle the circuit at `pos` with the default depth limit.
pub fn update_circuit(grid: &mut TileGrid, pos: TilePos) -> PropagationStats {
    let mut engine = CircuitEngine::new(grid);
    engine.update_circuit(pos);
    *engine.stats()
}
