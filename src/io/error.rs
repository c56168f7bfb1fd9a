//! Error types for board editing, simulation and output operations

use std::fmt;
use std::path::PathBuf;

use crate::session::controller::Mode;
use crate::spatial::direction::{Direction, Position};

/// Why an arrow placement was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRefusal {
    /// The cell lies outside the board
    OffGrid,
    /// Arrows cannot leave the goal cell
    GoalCell,
    /// Arrows cannot leave a blocked cell
    BlockedCell,
    /// The arrow would point past the edge of the board
    PointsOffGrid,
    /// The arrow would point into a blocked cell
    PointsIntoBlocked,
    /// The edge already carries an arrow
    EdgeOccupied,
    /// The cell already holds two arrows
    CellFull,
    /// No arrows remain in the level's budget
    BudgetExhausted,
}

impl fmt::Display for PlacementRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::OffGrid => "cell is outside the board",
            Self::GoalCell => "the goal cell cannot hold arrows",
            Self::BlockedCell => "a blocked cell cannot hold arrows",
            Self::PointsOffGrid => "arrow would point off the board",
            Self::PointsIntoBlocked => "arrow would point into a blocked cell",
            Self::EdgeOccupied => "edge already carries an arrow",
            Self::CellFull => "cell already holds two arrows",
            Self::BudgetExhausted => "no arrows remaining",
        };
        f.write_str(reason)
    }
}

/// Main error type for all game operations
#[derive(Debug)]
pub enum GameError {
    /// Arrow placement rejected by the board rules
    InvalidPlacement {
        /// Cell the arrow was meant for
        position: Position,
        /// Direction of the rejected arrow
        direction: Direction,
        /// Rule that refused the placement
        reason: PlacementRefusal,
    },

    /// Command issued in a mode that does not accept it
    WrongMode {
        /// Name of the rejected command
        command: &'static str,
        /// Mode the session was in
        mode: Mode,
    },

    /// Toggle requested on a cell that does not hold two arrows
    NotDualArrow {
        /// Cell that was toggled
        position: Position,
    },

    /// The simulator reached a state the board rules should make impossible
    ///
    /// Signals a bug in placement enforcement rather than a game outcome.
    InvariantViolation {
        /// Cell where the violation was observed
        position: Position,
        /// Description of the broken invariant
        reason: String,
    },

    /// Level layout failed validation
    InvalidLevel {
        /// Name of the level being loaded
        name: String,
        /// Description of what's wrong with the layout
        reason: String,
    },

    /// No built-in level with the given name
    UnknownLevel {
        /// Requested level name
        name: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to save an animation to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlacement {
                position,
                direction,
                reason,
            } => {
                write!(f, "Cannot place {direction} arrow at {position}: {reason}")
            }
            Self::WrongMode { command, mode } => {
                write!(f, "Command '{command}' is not available in {mode} mode")
            }
            Self::NotDualArrow { position } => {
                write!(f, "Cell {position} does not hold two arrows")
            }
            Self::InvariantViolation { position, reason } => {
                write!(f, "Board invariant violated at {position}: {reason}")
            }
            Self::InvalidLevel { name, reason } => {
                write!(f, "Invalid level '{name}': {reason}")
            }
            Self::UnknownLevel { name } => {
                write!(f, "Unknown level '{name}'")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export animation to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl GameError {
    /// Whether the error is a recoverable refusal of player input
    ///
    /// Refusals leave the board and mode untouched; everything else either
    /// aborts a run or fails an output operation.
    pub const fn is_refusal(&self) -> bool {
        matches!(self, Self::InvalidPlacement { .. } | Self::WrongMode { .. })
    }
}

/// Convenience type alias for game results
pub type Result<T> = std::result::Result<T, GameError>;

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create a placement refusal
pub const fn refuse(
    position: Position,
    direction: Direction,
    reason: PlacementRefusal,
) -> GameError {
    GameError::InvalidPlacement {
        position,
        direction,
        reason,
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GameError {
    GameError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invariant violation error
pub fn invariant_violation(position: Position, reason: &impl ToString) -> GameError {
    GameError::InvariantViolation {
        position,
        reason: reason.to_string(),
    }
}
