//! The board: landmarks, arrow slots, arrow budget and junction state
//!
//! The board owns every piece of editable state. Placement rules are enforced
//! here so that a simulation over any board produced by these operations can
//! never walk off the grid or into a boulder.

use ndarray::Array2;
use tracing::debug;

use crate::algorithm::switches::Switches;
use crate::io::error::{PlacementRefusal, Result, refuse};
use crate::spatial::direction::{Direction, Position};
use crate::spatial::level::{EdgeRule, Level, Role};

/// Up to two outgoing arrows of a cell, in placement order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrowSlots {
    older: Option<Direction>,
    newer: Option<Direction>,
}

impl ArrowSlots {
    /// Number of arrows held (0, 1 or 2)
    pub const fn count(&self) -> usize {
        match (self.older, self.newer) {
            (None, _) => 0,
            (Some(_), None) => 1,
            (Some(_), Some(_)) => 2,
        }
    }

    /// Test whether an arrow points in `direction`
    pub fn contains(&self, direction: Direction) -> bool {
        self.older == Some(direction) || self.newer == Some(direction)
    }

    /// Arrow placed first
    pub const fn older(&self) -> Option<Direction> {
        self.older
    }

    /// Arrow placed second, present only in junction cells
    pub const fn newer(&self) -> Option<Direction> {
        self.newer
    }

    /// All arrows, oldest first
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.older.into_iter().chain(self.newer)
    }

    /// Arrow selected by a junction flag (`false` = older, `true` = newer)
    pub const fn select(&self, flag: bool) -> Option<Direction> {
        if flag { self.newer } else { self.older }
    }

    fn push(&mut self, direction: Direction) {
        if self.older.is_none() {
            self.older = Some(direction);
        } else {
            self.newer = Some(direction);
        }
    }

    fn remove(&mut self, direction: Direction) -> bool {
        if self.newer == Some(direction) {
            self.newer = None;
            true
        } else if self.older == Some(direction) {
            self.older = self.newer.take();
            true
        } else {
            false
        }
    }
}

/// Where the token goes next from a given cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    /// The cell is the goal; the run is over
    Goal,
    /// Follow the arrow in this direction
    Follow(Direction),
    /// No arrow to follow
    DeadEnd,
}

/// Editable game board built from a [`Level`]
#[derive(Debug, Clone)]
pub struct Board {
    roles: Array2<Role>,
    arrows: Array2<ArrowSlots>,
    switches: Switches,
    start: Position,
    goal: Position,
    total_arrows: usize,
    remaining_arrows: usize,
    edge_rule: EdgeRule,
}

impl Board {
    /// Create an empty board (no arrows placed) for a level
    pub fn new(level: &Level) -> Self {
        let roles = level.roles().clone();
        let (rows, cols) = roles.dim();
        Self {
            arrows: Array2::default((rows, cols)),
            switches: Switches::new(rows, cols),
            roles,
            start: level.start(),
            goal: level.goal(),
            total_arrows: level.arrow_budget(),
            remaining_arrows: level.arrow_budget(),
            edge_rule: level.edge_rule(),
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.roles.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.roles.ncols()
    }

    /// Start cell
    pub const fn start(&self) -> Position {
        self.start
    }

    /// Goal cell
    pub const fn goal(&self) -> Position {
        self.goal
    }

    /// Edge rule in force
    pub const fn edge_rule(&self) -> EdgeRule {
        self.edge_rule
    }

    /// Arrows the level allows in total
    pub const fn total_arrows(&self) -> usize {
        self.total_arrows
    }

    /// Arrows still available to place
    pub const fn remaining_arrows(&self) -> usize {
        self.remaining_arrows
    }

    /// Role of a cell, `None` off the board
    pub fn role(&self, position: Position) -> Option<Role> {
        self.roles.get(position.index()).copied()
    }

    /// Arrows held by a cell (empty off the board)
    pub fn arrows_at(&self, position: Position) -> ArrowSlots {
        self.arrows.get(position.index()).copied().unwrap_or_default()
    }

    /// Current junction state
    pub const fn switches(&self) -> &Switches {
        &self.switches
    }

    /// Neighbour of `position` in `direction`, if on the board
    pub fn neighbour(&self, position: Position, direction: Direction) -> Option<Position> {
        direction.step(position, self.rows(), self.cols())
    }

    /// Every cell position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let cols = self.cols();
        (0..self.rows()).flat_map(move |row| (0..cols).map(move |col| Position::new(row, col)))
    }

    /// Direction the token follows on entering `position` with the board's own junction state
    pub fn active_direction(&self, position: Position) -> Heading {
        self.heading_with(position, &self.switches)
    }

    /// Direction the token follows on entering `position` with the given junction state
    pub fn heading_with(&self, position: Position, switches: &Switches) -> Heading {
        if position == self.goal {
            return Heading::Goal;
        }
        let slots = self.arrows_at(position);
        let flag = switches.flag(position).unwrap_or(false);
        slots
            .select(flag)
            .or_else(|| slots.older())
            .map_or(Heading::DeadEnd, Heading::Follow)
    }

    /// Place an arrow leaving `position` in `direction`
    ///
    /// When this is the cell's second arrow, the cell becomes a junction whose
    /// active arrow is the one just placed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlacement` if the cell is off the board, the goal or
    /// blocked, if the arrow would point off the board or into a blocked cell,
    /// if the edge already carries an arrow, if the cell is full, or if the
    /// arrow budget is exhausted. The board is unchanged on error.
    pub fn place_arrow(&mut self, position: Position, direction: Direction) -> Result<()> {
        let target = self.check_geometry(position, direction)?;
        let slots = self.arrows_at(position);

        if slots.contains(direction) || self.shared_edge_taken(target, direction) {
            return Err(refuse(
                position,
                direction,
                PlacementRefusal::EdgeOccupied,
            ));
        }
        if slots.count() == 2 {
            return Err(refuse(position, direction, PlacementRefusal::CellFull));
        }
        if self.remaining_arrows == 0 {
            return Err(refuse(
                position,
                direction,
                PlacementRefusal::BudgetExhausted,
            ));
        }

        self.insert_arrow(position, direction);
        Ok(())
    }

    /// Remove an arrow if present
    ///
    /// Returns whether an arrow was removed; removing an absent arrow is a no-op.
    pub fn remove_arrow(&mut self, position: Position, direction: Direction) -> bool {
        let Some(slots) = self.arrows.get_mut(position.index()) else {
            return false;
        };
        if !slots.remove(direction) {
            return false;
        }
        self.switches.uninstall(position);
        self.remaining_arrows = (self.remaining_arrows + 1).min(self.total_arrows);
        true
    }

    /// Editor gesture for a single direction key at `position`
    ///
    /// - pressing the active arrow removes it
    /// - pressing the inactive arrow of a junction makes it active
    /// - otherwise the arrow is placed, first evicting a neighbour's arrow on the
    ///   shared edge and, in a full cell, the inactive arrow
    ///
    /// # Errors
    ///
    /// Returns `InvalidPlacement` when the arrow can never sit there (see
    /// [`Board::place_arrow`]) or the budget cannot cover it. The board is
    /// unchanged on error.
    pub fn press_arrow(&mut self, position: Position, direction: Direction) -> Result<()> {
        let slots = self.arrows_at(position);
        let flag = self.switches.flag(position);

        match (slots.select(flag.unwrap_or(false)), flag) {
            (Some(active), _) if active == direction => {
                self.remove_arrow(position, direction);
                return Ok(());
            }
            (Some(_), Some(flag)) if slots.contains(direction) => {
                return self.switches.set(position, !flag);
            }
            _ => {}
        }

        let target = self.check_geometry(position, direction)?;

        let evict_neighbour = self.shared_edge_taken(target, direction);
        let evict_inactive = slots.count() == 2;
        let refunds = usize::from(evict_neighbour) + usize::from(evict_inactive);
        if self.remaining_arrows + refunds == 0 {
            return Err(refuse(
                position,
                direction,
                PlacementRefusal::BudgetExhausted,
            ));
        }

        if evict_neighbour {
            debug!(%target, direction = %direction.opposite(), "evicting arrow on shared edge");
            self.remove_arrow(target, direction.opposite());
        }
        if evict_inactive {
            if let Some(inactive) = slots.select(!flag.unwrap_or(false)) {
                self.remove_arrow(position, inactive);
            }
        }

        self.insert_arrow(position, direction);
        Ok(())
    }

    /// Clear every arrow and junction and refund the budget
    pub fn reset(&mut self) {
        self.arrows.fill(ArrowSlots::default());
        self.switches.clear();
        self.remaining_arrows = self.total_arrows;
    }

    /// Number of arrows currently on the board
    pub fn arrow_count(&self) -> usize {
        self.arrows.iter().map(ArrowSlots::count).sum()
    }

    /// Upper bound on distinct simulation states: cells the token can occupy
    /// times every combination of junction flags
    ///
    /// Saturates at `usize::MAX`.
    pub fn state_space_bound(&self) -> usize {
        let cells = self
            .roles
            .iter()
            .filter(|&&role| role != Role::Blocked)
            .count();
        u32::try_from(self.switches.dual_count())
            .ok()
            .and_then(|duals| 2usize.checked_pow(duals))
            .and_then(|combinations| combinations.checked_mul(cells))
            .unwrap_or(usize::MAX)
    }

    /// Placement commands that rebuild the current arrows on an empty board
    ///
    /// Within a junction the inactive arrow is listed first, so replaying the
    /// list through [`Board::place_arrow`] reproduces the active selection.
    pub fn placements(&self) -> Vec<(Position, Direction)> {
        let mut placements = Vec::with_capacity(self.arrow_count());
        for position in self.positions() {
            let slots = self.arrows_at(position);
            match self.switches.flag(position) {
                Some(flag) => {
                    placements.extend(slots.select(!flag).map(|d| (position, d)));
                    placements.extend(slots.select(flag).map(|d| (position, d)));
                }
                None => placements.extend(slots.iter().map(|d| (position, d))),
            }
        }
        placements
    }

    /// Rules every arrow must satisfy regardless of what else is on the board
    fn check_geometry(&self, position: Position, direction: Direction) -> Result<Position> {
        match self.role(position) {
            None => return Err(refuse(position, direction, PlacementRefusal::OffGrid)),
            Some(Role::Goal) => return Err(refuse(position, direction, PlacementRefusal::GoalCell)),
            Some(Role::Blocked) => {
                return Err(refuse(position, direction, PlacementRefusal::BlockedCell));
            }
            Some(Role::Start | Role::Empty) => {}
        }

        let target = self
            .neighbour(position, direction)
            .ok_or_else(|| refuse(position, direction, PlacementRefusal::PointsOffGrid))?;

        if self.role(target) == Some(Role::Blocked) {
            return Err(refuse(
                position,
                direction,
                PlacementRefusal::PointsIntoBlocked,
            ));
        }
        Ok(target)
    }

    fn shared_edge_taken(&self, target: Position, direction: Direction) -> bool {
        self.edge_rule == EdgeRule::Shared && self.arrows_at(target).contains(direction.opposite())
    }

    fn insert_arrow(&mut self, position: Position, direction: Direction) {
        let Some(slots) = self.arrows.get_mut(position.index()) else {
            return;
        };
        slots.push(direction);
        if slots.count() == 2 {
            self.switches.install(position, true);
        }
        self.remaining_arrows = self.remaining_arrows.saturating_sub(1);
    }
}
