use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute world direction offsets, indexed up, right, down, left.
///
/// Gate rotation depends on this exact order: relative side `i` of a tile
/// facing `variant` points along `DIRS[(variant + i) % 4]`.
pub const DIRS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// World tile coordinate. Unbounded in both directions; y grows downwards.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        TilePos { x, y }
    }

    /// Translate by a raw offset
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        TilePos::new(self.x + dx, self.y + dy)
    }

    /// The adjacent position in the given direction
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        self.offset(dx, dy)
    }

    /// The four orthogonal neighbours, in east, west, south, north order.
    pub const fn neighbors(self) -> [TilePos; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }

    /// Direction from `self` to `other` when they are orthogonally adjacent.
    ///
    /// ```
    /// use terragen_core::{Direction, TilePos};
    ///
    /// let gate = TilePos::new(3, 3);
    /// assert_eq!(gate.direction_to(TilePos::new(3, 2)), Some(Direction::Up));
    /// assert_eq!(gate.direction_to(TilePos::new(4, 4)), None);
    /// ```
    pub fn direction_to(self, other: TilePos) -> Option<Direction> {
        Direction::from_offset(other.x - self.x, other.y - self.y)
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four absolute world directions, in `DIRS` order.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    /// Direction for an index into `DIRS`, wrapping modulo 4
    pub const fn from_index(index: usize) -> Self {
        Direction::ALL[index % 4]
    }

    pub const fn offset(self) -> (i32, i32) {
        DIRS[self.index()]
    }

    /// Direction matching a unit offset; `None` for anything else
    pub fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        Direction::ALL
            .into_iter()
            .find(|dir| dir.offset() == (dx, dy))
    }

    /// World direction of relative side `side` (0=front, 1=right, 2=back,
    /// 3=left) for a tile facing `variant`.
    pub const fn from_relative(variant: u8, side: usize) -> Self {
        Direction::from_index(variant as usize % 4 + side)
    }

    /// The relative side of a tile facing `variant` that looks along `self`.
    pub const fn relative_side(self, variant: u8) -> usize {
        (self.index() + 4 - variant as usize % 4) % 4
    }

    pub const fn opposite(self) -> Self {
        Direction::from_index(self.index() + 2)
    }

    pub const fn rotate_cw(self) -> Self {
        Direction::from_index(self.index() + 1)
    }
}

/// An inclusive rectangle of world tiles (e.g. a blueprint selection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub min: TilePos,
    pub max: TilePos,
}

impl TileRect {
    /// Build from two opposite corners in any order
    pub fn new(a: TilePos, b: TilePos) -> Self {
        TileRect {
            min: TilePos::new(a.x.min(b.x), a.y.min(b.y)),
            max: TilePos::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    pub fn width(&self) -> u32 {
        (self.max.x - self.min.x) as u32 + 1
    }

    pub fn height(&self) -> u32 {
        (self.max.y - self.min.y) as u32 + 1
    }

    /// Floored midpoint, used as the anchor of captured blueprints
    pub fn center(&self) -> TilePos {
        TilePos::new(
            (self.min.x + self.max.x).div_euclid(2),
            (self.min.y + self.max.y).div_euclid(2),
        )
    }

    /// All positions, row by row
    pub fn positions(&self) -> impl Iterator<Item = TilePos> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| TilePos::new(x, y)))
    }
}
