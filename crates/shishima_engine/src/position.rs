//! Board coordinates.

use serde::{Deserialize, Serialize};

/// A `(row, col)` coordinate supplied by a caller.
///
/// Positions are not validated on construction: requests arrive with
/// arbitrary integers and the engine reports `OutOfBounds` for anything
/// outside the 3x3 grid. Serialized as a `[row, col]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Position {
    row: i32,
    col: i32,
}

impl Position {
    /// The center square, `(1, 1)`.
    pub const CENTER: Position = Position::new(1, 1);

    /// All 9 on-board positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position::new(0, 0),
        Position::new(0, 1),
        Position::new(0, 2),
        Position::new(1, 0),
        Position::new(1, 1),
        Position::new(1, 2),
        Position::new(2, 0),
        Position::new(2, 1),
        Position::new(2, 2),
    ];

    /// Creates a position.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Row index.
    pub fn row(self) -> i32 {
        self.row
    }

    /// Column index.
    pub fn col(self) -> i32 {
        self.col
    }

    /// Whether both indices fall inside `[0, 2]`.
    pub fn is_on_board(self) -> bool {
        (0..3).contains(&self.row) && (0..3).contains(&self.col)
    }

    /// Whether this is the center square.
    pub fn is_center(self) -> bool {
        self == Self::CENTER
    }
}

impl From<[i32; 2]> for Position {
    fn from([row, col]: [i32; 2]) -> Self {
        Self::new(row, col)
    }
}

impl From<Position> for [i32; 2] {
    fn from(pos: Position) -> Self {
        [pos.row, pos.col]
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
