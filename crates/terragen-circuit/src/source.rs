//! Which neighbours drive a signal into which tiles.

use terragen_core::{Tile, TileGrid, TilePos, TileType};

/// Whether `source`, sitting at `source_pos`, actively drives `target`.
///
/// An active lever drives every neighbour. An active gate drives only the
/// neighbours on its configured output sides, so `target` must be
/// orthogonally adjacent. Nothing else is a source.
pub fn is_power_source_for(source: &Tile, source_pos: TilePos, target: TilePos) -> bool {
    if !source.active {
        return false;
    }
    if source.tile_type == TileType::Lever {
        return true;
    }
    if !source.is_gate() {
        return false;
    }
    let Some(dir) = source_pos.direction_to(target) else {
        return false;
    };
    source.io_config().is_output(dir.relative_side(source.variant))
}

/// Signal arriving at `target` from whatever sits at `from`.
///
/// Conductive tiles carry their own level in every direction; gates only
/// through their output ports.
pub fn signal_into(grid: &TileGrid, from: TilePos, target: TilePos) -> bool {
    match grid.get_tile(from) {
        Some(tile) if tile.is_conductive() => tile.active,
        Some(tile) if tile.is_gate() => is_power_source_for(tile, from, target),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use terragen_core::{GateKind, IoConfig};

    fn active(tile: Tile) -> Tile {
        Tile { active: true, ..tile }
    }

    #[test]
    fn test_inactive_is_never_a_source() {
        let origin = TilePos::new(0, 0);
        let lever = Tile::new(TileType::Lever);
        assert!(!is_power_source_for(&lever, origin, TilePos::new(1, 0)));
        let gate = Tile::gate(GateKind::Not, 0, IoConfig::DEFAULT);
        assert!(!is_power_source_for(&gate, origin, TilePos::new(0, -1)));
    }

    #[test]
    fn test_lever_radiates_everywhere() {
        let lever = active(Tile::new(TileType::Lever));
        let origin = TilePos::new(4, 4);
        for target in origin.neighbors() {
            assert!(is_power_source_for(&lever, origin, target));
        }
    }

    #[test]
    fn test_active_wire_is_not_a_source() {
        let wire = active(Tile::new(TileType::Wire));
        assert!(!is_power_source_for(&wire, TilePos::new(0, 0), TilePos::new(1, 0)));
    }

    #[test]
    fn test_gate_drives_only_output_side() {
        // Default config: output on the front. Facing right (variant 1).
        let gate = active(Tile::gate(GateKind::Or, 1, IoConfig::DEFAULT));
        let origin = TilePos::new(0, 0);
        assert!(is_power_source_for(&gate, origin, TilePos::new(1, 0)));
        assert!(!is_power_source_for(&gate, origin, TilePos::new(-1, 0)));
        assert!(!is_power_source_for(&gate, origin, TilePos::new(0, -1)));
        assert!(!is_power_source_for(&gate, origin, TilePos::new(0, 1)));
    }

    #[test]
    fn test_gate_multiple_outputs_after_rotation() {
        // Outputs on relative back and left, facing down (variant 2):
        // back is up, left is right.
        let config = IoConfig::from_masks(0b0001, 0b1100);
        let gate = active(Tile::gate(GateKind::Not, 2, config));
        let origin = TilePos::new(0, 0);
        assert!(is_power_source_for(&gate, origin, TilePos::new(0, -1)));
        assert!(is_power_source_for(&gate, origin, TilePos::new(1, 0)));
        assert!(!is_power_source_for(&gate, origin, TilePos::new(0, 1)));
        assert!(!is_power_source_for(&gate, origin, TilePos::new(-1, 0)));
    }

    #[test]
    fn test_gate_non_adjacent_target() {
        let gate = active(Tile::gate(GateKind::Not, 0, IoConfig::from_bits(0xF0)));
        let origin = TilePos::new(0, 0);
        assert!(!is_power_source_for(&gate, origin, origin));
        assert!(!is_power_source_for(&gate, origin, TilePos::new(1, 1)));
        assert!(!is_power_source_for(&gate, origin, TilePos::new(0, -2)));
    }

    #[test]
    fn test_signal_into() {
        let mut grid = flat_world();
        put(&mut grid, 0, 0, TileType::Wire);
        assert!(!signal_into(&grid, TilePos::new(0, 0), TilePos::new(1, 0)));
        grid.modify_tile(TilePos::new(0, 0), |t| t.active = true);
        assert!(signal_into(&grid, TilePos::new(0, 0), TilePos::new(1, 0)));

        // An active gate facing up only feeds the tile above it
        put_gate(&mut grid, 5, 5, GateKind::Not, 0, IoConfig::DEFAULT);
        grid.modify_tile(TilePos::new(5, 5), |t| t.active = true);
        assert!(signal_into(&grid, TilePos::new(5, 5), TilePos::new(5, 4)));
        assert!(!signal_into(&grid, TilePos::new(5, 5), TilePos::new(6, 5)));

        // Terrain and unloaded positions carry nothing
        assert!(!signal_into(&grid, TilePos::new(9, 9), TilePos::new(9, 8)));
        assert!(!signal_into(&grid, TilePos::new(500, 0), TilePos::new(501, 0)));
    }
}
