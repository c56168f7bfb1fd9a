//! Cell coordinates and the four cardinal directions an arrow can take

use std::fmt;
use std::str::FromStr;

use crate::io::error::{GameError, invalid_parameter};

/// Cell coordinates on the board, row-major from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Row index (0 = top)
    pub row: usize,
    /// Column index (0 = left)
    pub col: usize,
}

impl Position {
    /// Create a position from row and column
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Index form used by `ndarray` storage
    pub const fn index(self) -> [usize; 2] {
        [self.row, self.col]
    }

    /// Manhattan distance between two cells
    pub const fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = GameError;

    /// Parses `row,col`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| invalid_parameter("position", &s, &"expected ROW,COL"))?;
        let row = row
            .trim()
            .parse()
            .map_err(|e| invalid_parameter("position", &s, &e))?;
        let col = col
            .trim()
            .parse()
            .map_err(|e| invalid_parameter("position", &s, &e))?;
        Ok(Self::new(row, col))
    }
}

/// Orthogonal direction of an arrow (and of the edge it sits on)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Towards row 0
    Up,
    /// Towards column 0
    Left,
    /// Towards the last row
    Down,
    /// Towards the last column
    Right,
}

impl Direction {
    /// All directions in a fixed order
    pub const ALL: [Self; 4] = [Self::Up, Self::Left, Self::Down, Self::Right];

    /// The direction pointing back across the same edge
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Down => Self::Up,
            Self::Right => Self::Left,
        }
    }

    /// The neighbouring cell in this direction, if it lies on a `rows` x `cols` board
    pub const fn step(self, from: Position, rows: usize, cols: usize) -> Option<Position> {
        if from.row >= rows || from.col >= cols {
            return None;
        }
        match self {
            Self::Up => {
                if from.row == 0 {
                    None
                } else {
                    Some(Position::new(from.row - 1, from.col))
                }
            }
            Self::Left => {
                if from.col == 0 {
                    None
                } else {
                    Some(Position::new(from.row, from.col - 1))
                }
            }
            Self::Down => {
                if from.row + 1 < rows {
                    Some(Position::new(from.row + 1, from.col))
                } else {
                    None
                }
            }
            Self::Right => {
                if from.col + 1 < cols {
                    Some(Position::new(from.row, from.col + 1))
                } else {
                    None
                }
            }
        }
    }

    /// Lowercase name, as accepted by [`FromStr`]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Left => "left",
            Self::Down => "down",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Self::Up),
            "left" | "l" => Ok(Self::Left),
            "down" | "d" => Ok(Self::Down),
            "right" | "r" => Ok(Self::Right),
            _ => Err(invalid_parameter(
                "direction",
                &s,
                &"expected one of up, left, down, right",
            )),
        }
    }
}
