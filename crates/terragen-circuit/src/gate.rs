//! Logic gate evaluation.

use terragen_core::{Direction, Tile, TileGrid, TilePos};

use crate::engine::CircuitEngine;
use crate::source::signal_into;

/// Input ports of a gate and how many of them are live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputReading {
    pub configured: u32,
    pub active: u32,
}

/// Sample the signal on every configured input port of `gate`, which sits
/// at `pos`.
pub fn read_inputs(grid: &TileGrid, pos: TilePos, gate: &Tile) -> InputReading {
    let mut reading = InputReading::default();
    for side in gate.io_config().input_sides() {
        reading.configured += 1;
        let from = pos.step(Direction::from_relative(gate.variant, side));
        if signal_into(grid, from, pos) {
            reading.active += 1;
        }
    }
    reading
}

impl CircuitEngine<'_> {
    /// Recompute the gate at `pos`. When its output flips, every net on an
    /// output side is propagated one level deeper.
    pub(crate) fn evaluate_gate_at(&mut self, pos: TilePos, depth: u32) {
        let Some(gate) = self.tile(pos) else {
            return;
        };
        let Some(kind) = gate.gate_kind() else {
            return;
        };
        self.stats_mut().gate_evaluations += 1;

        let inputs = read_inputs(self.grid, pos, &gate);
        let output = kind.output(inputs.configured, inputs.active);
        tracing::trace!(
            %pos,
            ?kind,
            configured = inputs.configured,
            active = inputs.active,
            output,
            depth,
            "gate evaluated"
        );
        if output == gate.active {
            return;
        }

        self.grid.modify_tile(pos, |t| t.active = output);
        self.stats_mut().tiles_changed += 1;

        for side in gate.io_config().output_sides() {
            let target = pos.step(Direction::from_relative(gate.variant, side));
            self.propagate(target, depth + 1);
        }
    }
}
