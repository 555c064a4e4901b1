//! Board coordinates.

use serde::{Deserialize, Serialize};

/// Side length of the square board.
pub const GRID_SIZE: u8 = 15;

/// A cell on the 15x15 board, addressed as `(row, col)`.
///
/// Squares are compared by value everywhere: path lookup, collisions and
/// safe-square checks all go through `==`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    /// Create a square. Both coordinates must be below [`GRID_SIZE`].
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < GRID_SIZE && col < GRID_SIZE, "Square outside the board");
        Self { row, col }
    }

    /// Manhattan distance between two squares.
    #[must_use]
    pub const fn manhattan(self, other: Square) -> u8 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(u8, u8)> for Square {
    fn from((row, col): (u8, u8)) -> Self {
        Self::new(row, col)
    }
}
