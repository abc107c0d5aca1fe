use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TerraError;

/// Every kind of tile (and item) in the world.
///
/// Serialized with the save-data names, e.g. `"AND_GATE"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    Grass,
    Water,
    Sand,
    Tree,
    Stone,
    Wall,
    Flower,
    Floor,
    Wood,
    Axe,
    Pickaxe,
    Rail,
    Minecart,
    Wire,
    Lever,
    Lamp,
    LampOn,
    Robot,
    Sapling,
    AndGate,
    OrGate,
    NotGate,
}

impl TileType {
    pub const ALL: [TileType; 22] = [
        TileType::Grass,
        TileType::Water,
        TileType::Sand,
        TileType::Tree,
        TileType::Stone,
        TileType::Wall,
        TileType::Flower,
        TileType::Floor,
        TileType::Wood,
        TileType::Axe,
        TileType::Pickaxe,
        TileType::Rail,
        TileType::Minecart,
        TileType::Wire,
        TileType::Lever,
        TileType::Lamp,
        TileType::LampOn,
        TileType::Robot,
        TileType::Sapling,
        TileType::AndGate,
        TileType::OrGate,
        TileType::NotGate,
    ];

    /// Save-data name of this kind
    pub const fn as_str(self) -> &'static str {
        match self {
            TileType::Grass => "GRASS",
            TileType::Water => "WATER",
            TileType::Sand => "SAND",
            TileType::Tree => "TREE",
            TileType::Stone => "STONE",
            TileType::Wall => "WALL",
            TileType::Flower => "FLOWER",
            TileType::Floor => "FLOOR",
            TileType::Wood => "WOOD",
            TileType::Axe => "AXE",
            TileType::Pickaxe => "PICKAXE",
            TileType::Rail => "RAIL",
            TileType::Minecart => "MINECART",
            TileType::Wire => "WIRE",
            TileType::Lever => "LEVER",
            TileType::Lamp => "LAMP",
            TileType::LampOn => "LAMP_ON",
            TileType::Robot => "ROBOT",
            TileType::Sapling => "SAPLING",
            TileType::AndGate => "AND_GATE",
            TileType::OrGate => "OR_GATE",
            TileType::NotGate => "NOT_GATE",
        }
    }

    /// Wires, levers and lamps: tiles that join into a net
    pub const fn is_conductive(self) -> bool {
        matches!(
            self,
            TileType::Wire | TileType::Lever | TileType::Lamp | TileType::LampOn
        )
    }

    pub const fn is_gate(self) -> bool {
        matches!(self, TileType::AndGate | TileType::OrGate | TileType::NotGate)
    }

    pub const fn is_rail(self) -> bool {
        matches!(self, TileType::Rail)
    }

    pub const fn is_lamp(self) -> bool {
        matches!(self, TileType::Lamp | TileType::LampOn)
    }

    /// Anything that takes part in circuit propagation once placed
    pub const fn is_logic_component(self) -> bool {
        self.is_conductive() || self.is_gate()
    }

    pub const fn gate_kind(self) -> Option<GateKind> {
        match self {
            TileType::AndGate => Some(GateKind::And),
            TileType::OrGate => Some(GateKind::Or),
            TileType::NotGate => Some(GateKind::Not),
            _ => None,
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TileType {
    type Err = TerraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_uppercase();
        TileType::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| TerraError::UnknownTileType(s.to_string()))
    }
}

/// The three logic gate kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    And,
    Or,
    Not,
}

impl GateKind {
    pub const fn tile_type(self) -> TileType {
        match self {
            GateKind::And => TileType::AndGate,
            GateKind::Or => TileType::OrGate,
            GateKind::Not => TileType::NotGate,
        }
    }

    /// Output level given how many input ports are configured and how many
    /// of them currently carry a signal.
    ///
    /// A NOT gate with no configured inputs is always on; an AND gate with no
    /// configured inputs is always off.
    pub const fn output(self, configured_inputs: u32, active_inputs: u32) -> bool {
        match self {
            GateKind::Not => active_inputs == 0,
            GateKind::Or => active_inputs > 0,
            GateKind::And => configured_inputs > 0 && active_inputs == configured_inputs,
        }
    }

    /// Minimum number of input ports the gate editor accepts
    pub const fn min_inputs(self) -> u32 {
        match self {
            GateKind::And | GateKind::Or => 2,
            GateKind::Not => 0,
        }
    }
}

/// What a single side of a gate is wired as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortMode {
    None,
    Input,
    Output,
}

/// Per-gate port configuration.
///
/// Bits 0-3 mark input sides, bits 4-7 output sides. Sides are relative to
/// the gate's facing: 0=front, 1=right, 2=back, 3=left. Stored in save data
/// as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IoConfig(u8);

impl IoConfig {
    /// Inputs on right, back and left; output on front (0b0001_1110)
    pub const DEFAULT: IoConfig = IoConfig(30);

    pub const fn from_bits(bits: u8) -> Self {
        IoConfig(bits)
    }

    pub const fn from_masks(input_mask: u8, output_mask: u8) -> Self {
        IoConfig((input_mask & 0x0F) | ((output_mask & 0x0F) << 4))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn input_mask(self) -> u8 {
        self.0 & 0x0F
    }

    pub const fn output_mask(self) -> u8 {
        (self.0 >> 4) & 0x0F
    }

    pub fn is_input(self, side: usize) -> bool {
        side < 4 && self.0.view_bits::<Lsb0>()[side]
    }

    pub fn is_output(self, side: usize) -> bool {
        side < 4 && self.0.view_bits::<Lsb0>()[4 + side]
    }

    /// Relative sides configured as inputs, ascending
    pub fn input_sides(self) -> impl Iterator<Item = usize> {
        (0..4).filter(move |&side| self.is_input(side))
    }

    /// Relative sides configured as outputs, ascending
    pub fn output_sides(self) -> impl Iterator<Item = usize> {
        (0..4).filter(move |&side| self.is_output(side))
    }

    pub const fn input_count(self) -> u32 {
        self.input_mask().count_ones()
    }

    /// Mode of a side as the editor shows it; a side marked both ways reads
    /// as an input.
    pub fn port(self, side: usize) -> PortMode {
        if self.is_input(side) {
            PortMode::Input
        } else if self.is_output(side) {
            PortMode::Output
        } else {
            PortMode::None
        }
    }

    /// Set one side to exactly the given mode
    pub fn with_port(self, side: usize, mode: PortMode) -> Self {
        if side >= 4 {
            return self;
        }
        let mut raw = self.0;
        let bits = raw.view_bits_mut::<Lsb0>();
        bits.set(side, mode == PortMode::Input);
        bits.set(4 + side, mode == PortMode::Output);
        IoConfig(raw)
    }

    /// Advance a side through none -> input -> output -> none
    pub fn cycle_port(self, side: usize) -> Self {
        let next = match self.port(side) {
            PortMode::None => PortMode::Input,
            PortMode::Input => PortMode::Output,
            PortMode::Output => PortMode::None,
        };
        self.with_port(side, next)
    }

    /// Check the configuration is acceptable for a gate kind
    pub fn validate(self, gate: GateKind) -> Result<(), TerraError> {
        let required = gate.min_inputs();
        let actual = self.input_count();
        if actual < required {
            return Err(TerraError::TooFewInputs {
                gate: gate.tile_type(),
                required,
                actual,
            });
        }
        Ok(())
    }
}

impl Default for IoConfig {
    fn default() -> Self {
        IoConfig::DEFAULT
    }
}

/// The atomic unit of the world grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(rename = "type")]
    pub tile_type: TileType,
    /// Gate facing (0=up, 1=right, 2=down, 3=left), rail connection mask, or
    /// terrain texture noise
    #[serde(default)]
    pub variant: u8,
    /// Signal level for conductive tiles and gates
    #[serde(default)]
    pub active: bool,
    /// Put here by a player or blueprint rather than generated
    #[serde(default)]
    pub placed: bool,
    #[serde(rename = "ioConfig", default, skip_serializing_if = "Option::is_none")]
    pub io_config: Option<IoConfig>,
    /// Ground type underneath an overlay tile
    #[serde(rename = "backgroundType", default, skip_serializing_if = "Option::is_none")]
    pub background: Option<TileType>,
}

impl Tile {
    pub const fn new(tile_type: TileType) -> Self {
        Tile {
            tile_type,
            variant: 0,
            active: false,
            placed: false,
            io_config: None,
            background: None,
        }
    }

    /// A generated terrain tile
    pub const fn natural(tile_type: TileType, variant: u8) -> Self {
        Tile {
            variant,
            ..Tile::new(tile_type)
        }
    }

    /// A gate facing `variant` with the given port configuration
    pub const fn gate(kind: GateKind, variant: u8, io_config: IoConfig) -> Self {
        Tile {
            variant,
            placed: true,
            io_config: Some(io_config),
            ..Tile::new(kind.tile_type())
        }
    }

    /// Port configuration, falling back to the default when unset
    pub fn io_config(&self) -> IoConfig {
        self.io_config.unwrap_or_default()
    }

    pub const fn is_conductive(&self) -> bool {
        self.tile_type.is_conductive()
    }

    pub const fn is_gate(&self) -> bool {
        self.tile_type.is_gate()
    }

    pub const fn gate_kind(&self) -> Option<GateKind> {
        self.tile_type.gate_kind()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::new(TileType::Grass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_type_names() {
        assert_eq!(TileType::AndGate.to_string(), "AND_GATE");
        assert_eq!("lamp_on".parse::<TileType>(), Ok(TileType::LampOn));
        assert_eq!(
            "LAVA".parse::<TileType>(),
            Err(TerraError::UnknownTileType("LAVA".to_string()))
        );
        for t in TileType::ALL {
            assert_eq!(t.as_str().parse::<TileType>(), Ok(t));
        }
    }

    #[test]
    fn test_classification() {
        assert!(TileType::Wire.is_conductive());
        assert!(TileType::LampOn.is_conductive());
        assert!(!TileType::AndGate.is_conductive());
        assert!(TileType::NotGate.is_gate());
        assert!(!TileType::Lever.is_gate());
        assert!(TileType::Rail.is_rail());
        assert!(!TileType::Grass.is_logic_component());
    }

    #[test]
    fn test_gate_truth_rules() {
        assert!(GateKind::Not.output(0, 0));
        assert!(!GateKind::Not.output(1, 1));
        assert!(GateKind::Or.output(3, 1));
        assert!(!GateKind::Or.output(3, 0));
        assert!(GateKind::And.output(2, 2));
        assert!(!GateKind::And.output(2, 1));
        // Vacuous AND stays off
        assert!(!GateKind::And.output(0, 0));
    }

    #[test]
    fn test_default_io_config() {
        let config = IoConfig::default();
        assert_eq!(config.bits(), 30);
        assert_eq!(config.input_sides().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(config.output_sides().collect::<Vec<_>>(), vec![0]);
        assert_eq!(config.input_count(), 3);
        assert_eq!(Tile::new(TileType::AndGate).io_config(), IoConfig::DEFAULT);
    }

    #[test]
    fn test_masks() {
        let config = IoConfig::from_masks(0b1010, 0b0001);
        assert_eq!(config.bits(), 0b0001_1010);
        assert_eq!(config.input_mask(), 0b1010);
        assert_eq!(config.output_mask(), 0b0001);
        assert!(config.is_input(1));
        assert!(!config.is_input(0));
        assert!(config.is_output(0));
        assert!(!config.is_output(4));
    }

    #[test]
    fn test_cycle_port() {
        let config = IoConfig::from_bits(0);
        let config = config.cycle_port(2);
        assert_eq!(config.port(2), PortMode::Input);
        let config = config.cycle_port(2);
        assert_eq!(config.port(2), PortMode::Output);
        assert!(!config.is_input(2));
        let config = config.cycle_port(2);
        assert_eq!(config.port(2), PortMode::None);
        assert_eq!(config.bits(), 0);
    }

    #[test]
    fn test_validate() {
        let one_input = IoConfig::from_masks(0b0010, 0b0001);
        assert_eq!(
            one_input.validate(GateKind::And),
            Err(TerraError::TooFewInputs {
                gate: TileType::AndGate,
                required: 2,
                actual: 1
            })
        );
        assert!(one_input.validate(GateKind::Not).is_ok());
        assert!(IoConfig::DEFAULT.validate(GateKind::Or).is_ok());
    }

    #[test]
    fn test_tile_serde_uses_save_names() {
        let tile = Tile::gate(GateKind::And, 1, IoConfig::from_bits(26));
        let json = serde_json::to_value(tile).unwrap();
        assert_eq!(json["type"], "AND_GATE");
        assert_eq!(json["ioConfig"], 26);
        assert_eq!(json["variant"], 1);
        assert!(json.get("backgroundType").is_none());

        let back: Tile = serde_json::from_value(json).unwrap();
        assert_eq!(back, tile);

        let grass: Tile = serde_json::from_str(r#"{"type":"GRASS"}"#).unwrap();
        assert_eq!(grass, Tile::new(TileType::Grass));
    }
}
