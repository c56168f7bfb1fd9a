//! Statically defined levels and their text layout format
//!
//! A layout is one line per row using `S` (start), `G` (goal), `#` (blocked)
//! and `.` (empty). Leading/trailing whitespace and blank lines are ignored.

use ndarray::Array2;

use crate::io::configuration::DEFAULT_ARROW_BUDGET;
use crate::io::error::{GameError, Result};
use crate::spatial::direction::Position;

/// Fixed role of a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Where the token starts
    Start,
    /// Where the token wants to go
    Goal,
    /// An ordinary cell
    Empty,
    /// A boulder; nothing may enter or leave it
    Blocked,
}

impl Role {
    const fn from_char(c: char) -> Option<Self> {
        match c {
            'S' => Some(Self::Start),
            'G' => Some(Self::Goal),
            '.' => Some(Self::Empty),
            '#' => Some(Self::Blocked),
            _ => None,
        }
    }

    /// Layout character for this role
    pub const fn symbol(self) -> char {
        match self {
            Self::Start => 'S',
            Self::Goal => 'G',
            Self::Empty => '.',
            Self::Blocked => '#',
        }
    }
}

/// How arrows on opposite sides of a shared edge interact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeRule {
    /// An edge between two cells carries at most one arrow in total
    #[default]
    Shared,
    /// Each side of an edge is its own slot, so neighbours may point at each other
    PerSide,
}

/// A loaded level: landmarks, arrow budget and edge rule
#[derive(Debug, Clone)]
pub struct Level {
    name: String,
    roles: Array2<Role>,
    start: Position,
    goal: Position,
    arrow_budget: usize,
    edge_rule: EdgeRule,
}

/// Names of the levels compiled into the crate
pub const BUILTIN_LEVELS: [&str; 3] = ["classic", "open", "corridor"];

const CLASSIC_LAYOUT: &str = "
    S....
    ..#..
    ....G
";

const OPEN_LAYOUT: &str = "
    S...
    ....
    ....
    ...G
";

const CORRIDOR_LAYOUT: &str = "
    S.#...
    ...#.G
";

impl Level {
    /// Parse a level from its text layout
    ///
    /// # Errors
    ///
    /// Returns `InvalidLevel` if the layout is empty, ragged, contains an unknown
    /// character, or does not have exactly one start and one goal
    pub fn parse(
        name: &str,
        layout: &str,
        arrow_budget: usize,
        edge_rule: EdgeRule,
    ) -> Result<Self> {
        let invalid = |reason: String| GameError::InvalidLevel {
            name: name.to_string(),
            reason,
        };

        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let rows = lines.len();
        let cols = lines.first().map_or(0, |line| line.chars().count());
        if rows == 0 || cols == 0 {
            return Err(invalid("layout is empty".to_string()));
        }

        let mut cells = Vec::with_capacity(rows * cols);
        let mut start = Vec::new();
        let mut goal = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(invalid(format!(
                    "row {row} has {} cells, expected {cols}",
                    line.chars().count()
                )));
            }
            for (col, c) in line.chars().enumerate() {
                let role = Role::from_char(c)
                    .ok_or_else(|| invalid(format!("unknown cell '{c}' at ({row}, {col})")))?;
                match role {
                    Role::Start => start.push(Position::new(row, col)),
                    Role::Goal => goal.push(Position::new(row, col)),
                    Role::Empty | Role::Blocked => {}
                }
                cells.push(role);
            }
        }

        let (&[start], &[goal]) = (start.as_slice(), goal.as_slice()) else {
            return Err(invalid(format!(
                "expected exactly one start and one goal, found {} and {}",
                start.len(),
                goal.len()
            )));
        };

        let roles = Array2::from_shape_vec((rows, cols), cells)
            .map_err(|e| invalid(format!("layout shape: {e}")))?;

        Ok(Self {
            name: name.to_string(),
            roles,
            start,
            goal,
            arrow_budget,
            edge_rule,
        })
    }

    /// Load one of the [`BUILTIN_LEVELS`] with the default arrow budget
    ///
    /// # Errors
    ///
    /// Returns `UnknownLevel` if no built-in level has this name
    pub fn builtin(name: &str) -> Result<Self> {
        let layout = match name {
            "classic" => CLASSIC_LAYOUT,
            "open" => OPEN_LAYOUT,
            "corridor" => CORRIDOR_LAYOUT,
            _ => {
                return Err(GameError::UnknownLevel {
                    name: name.to_string(),
                });
            }
        };
        Self::parse(name, layout, DEFAULT_ARROW_BUDGET, EdgeRule::Shared)
    }

    /// Replace the arrow budget
    #[must_use]
    pub const fn with_arrow_budget(mut self, arrow_budget: usize) -> Self {
        self.arrow_budget = arrow_budget;
        self
    }

    /// Replace the edge rule
    #[must_use]
    pub const fn with_edge_rule(mut self, edge_rule: EdgeRule) -> Self {
        self.edge_rule = edge_rule;
        self
    }

    /// Level name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role of every cell
    pub const fn roles(&self) -> &Array2<Role> {
        &self.roles
    }

    /// Start cell
    pub const fn start(&self) -> Position {
        self.start
    }

    /// Goal cell
    pub const fn goal(&self) -> Position {
        self.goal
    }

    /// Total arrows the player may place
    pub const fn arrow_budget(&self) -> usize {
        self.arrow_budget
    }

    /// Edge rule in force
    pub const fn edge_rule(&self) -> EdgeRule {
        self.edge_rule
    }
}
