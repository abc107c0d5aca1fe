//! Nets: maximal groups of orthogonally connected conductive tiles that
//! share one signal level.
//!
//! Nets are not stored. Every update re-floods from the edited tile, so
//! edits that split or join nets need no bookkeeping.

use std::collections::HashSet;

use terragen_core::{TileGrid, TilePos, TileType};

use crate::engine::CircuitEngine;
use crate::predicates::{is_conductive, is_gate};
use crate::source::is_power_source_for;

/// One flood-filled net
#[derive(Debug, Clone, Default)]
pub struct Net {
    members: Vec<TilePos>,
    index: HashSet<TilePos>,
}

impl Net {
    /// Collect every conductive tile reachable from `start`.
    ///
    /// Empty if `start` itself is not conductive.
    pub fn flood(grid: &TileGrid, start: TilePos) -> Self {
        let mut net = Net::default();
        let mut stack = vec![start];

        while let Some(pos) = stack.pop() {
            if net.index.contains(&pos) || !is_conductive(grid.get_tile(pos)) {
                continue;
            }
            net.index.insert(pos);
            net.members.push(pos);
            stack.extend(pos.neighbors());
        }

        net
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        self.index.contains(&pos)
    }

    /// Members in discovery order
    pub fn members(&self) -> &[TilePos] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A net is powered if it holds an active lever, or if any member is
    /// driven by a source outside the net.
    pub fn is_powered(&self, grid: &TileGrid) -> bool {
        self.members.iter().any(|&pos| {
            let Some(tile) = grid.get_tile(pos) else {
                return false;
            };
            if tile.tile_type == TileType::Lever && tile.active {
                return true;
            }
            pos.neighbors().into_iter().any(|n| {
                !self.contains(n)
                    && grid
                        .get_tile(n)
                        .is_some_and(|source| is_power_source_for(source, n, pos))
            })
        })
    }
}

impl CircuitEngine<'_> {
    /// Settle the circuit at `start`: gates are evaluated, conductive tiles
    /// have their net re-levelled, anything else is ignored.
    pub(crate) fn propagate(&mut self, start: TilePos, depth: u32) {
        if !self.enter(depth) {
            return;
        }
        let Some(start_tile) = self.tile(start) else {
            return;
        };
        if start_tile.is_gate() {
            self.evaluate_gate_at(start, depth);
            return;
        }
        if !start_tile.is_conductive() {
            return;
        }

        let net = Net::flood(self.grid, start);
        let powered = net.is_powered(self.grid);
        self.stats_mut().net_updates += 1;
        tracing::trace!(%start, depth, size = net.len(), powered, "net update");

        let mut notified = HashSet::new();
        for &pos in net.members() {
            let Some(tile) = self.tile(pos) else {
                continue;
            };

            // Levers keep their own state but tell adjacent gates they exist
            if tile.tile_type == TileType::Lever {
                self.notify_gates(pos, depth + 1, &mut notified);
                continue;
            }

            let target_type = match tile.tile_type {
                TileType::Lamp | TileType::LampOn if powered => TileType::LampOn,
                TileType::Lamp | TileType::LampOn => TileType::Lamp,
                other => other,
            };
            if tile.active == powered && tile.tile_type == target_type {
                continue;
            }

            self.grid.modify_tile(pos, |t| {
                t.active = powered;
                t.tile_type = target_type;
            });
            self.stats_mut().tiles_changed += 1;
            self.notify_gates(pos, depth + 1, &mut notified);
        }
    }

    /// Evaluate each gate next to `pos` that has not been evaluated yet in
    /// this net update.
    fn notify_gates(&mut self, pos: TilePos, depth: u32, notified: &mut HashSet<TilePos>) {
        for neighbor in pos.neighbors() {
            if is_gate(self.grid.get_tile(neighbor)) && notified.insert(neighbor) {
                self.evaluate_gate_at(neighbor, depth);
            }
        }
    }
}
