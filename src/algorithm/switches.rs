use bitvec::prelude::*;
use std::fmt;

use crate::io::error::{GameError, Result};
use crate::spatial::direction::Position;

/// Junction state for every cell holding two arrows
///
/// One bit per cell marks whether the cell is a junction, a second bit selects
/// its active arrow: unset follows the older arrow, set follows the newer one.
/// Flags of non-junction cells are always unset, so the flag vector alone is
/// an exact snapshot of the automaton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Switches {
    dual: BitVec,
    flags: BitVec,
    cols: usize,
}

impl Switches {
    /// Create switch storage for a `rows` x `cols` board with no junctions
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            dual: bitvec![0; rows * cols],
            flags: bitvec![0; rows * cols],
            cols,
        }
    }

    fn slot(&self, position: Position) -> Option<usize> {
        let index = position.row * self.cols + position.col;
        (position.col < self.cols && index < self.dual.len()).then_some(index)
    }

    /// Test whether a cell currently holds two arrows
    pub fn is_dual(&self, position: Position) -> bool {
        self.slot(position)
            .is_some_and(|index| self.dual.get(index).as_deref() == Some(&true))
    }

    /// Current flag of a junction, `None` for any other cell
    pub fn flag(&self, position: Position) -> Option<bool> {
        let index = self.slot(position)?;
        if self.dual.get(index).as_deref() == Some(&true) {
            self.flags.get(index).as_deref().copied()
        } else {
            None
        }
    }

    /// Flip the active arrow of a junction
    ///
    /// Pure XOR on the flag; no history is kept.
    ///
    /// # Errors
    ///
    /// Returns `NotDualArrow` if the cell does not hold two arrows
    pub fn toggle(&mut self, position: Position) -> Result<()> {
        let current = self
            .flag(position)
            .ok_or(GameError::NotDualArrow { position })?;
        self.write_flag(position, !current)
    }

    /// Select a junction's active arrow explicitly
    ///
    /// # Errors
    ///
    /// Returns `NotDualArrow` if the cell does not hold two arrows
    pub fn set(&mut self, position: Position, flag: bool) -> Result<()> {
        if !self.is_dual(position) {
            return Err(GameError::NotDualArrow { position });
        }
        self.write_flag(position, flag)
    }

    fn write_flag(&mut self, position: Position, flag: bool) -> Result<()> {
        let index = self
            .slot(position)
            .ok_or(GameError::NotDualArrow { position })?;
        self.flags.set(index, flag);
        Ok(())
    }

    /// Mark a cell as a junction with the given initial flag
    pub(crate) fn install(&mut self, position: Position, flag: bool) {
        if let Some(index) = self.slot(position) {
            self.dual.set(index, true);
            self.flags.set(index, flag);
        }
    }

    /// Drop a cell's junction state
    pub(crate) fn uninstall(&mut self, position: Position) {
        if let Some(index) = self.slot(position) {
            self.dual.set(index, false);
            self.flags.set(index, false);
        }
    }

    /// Remove every junction
    pub fn clear(&mut self) {
        self.dual.fill(false);
        self.flags.fill(false);
    }

    /// Number of junction cells
    pub fn dual_count(&self) -> usize {
        self.dual.count_ones()
    }

    /// Ordered snapshot of all flags, usable as a hash key
    pub fn signature(&self) -> BitVec {
        self.flags.clone()
    }

    /// Positions of all junctions in row-major order
    pub fn junctions(&self) -> Vec<Position> {
        self.dual
            .iter_ones()
            .map(|index| Position::new(index / self.cols, index % self.cols))
            .collect()
    }
}

impl fmt::Display for Switches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Switches({} junctions: ", self.dual_count())?;
        for index in self.dual.iter_ones() {
            let bit = if self.flags.get(index).as_deref() == Some(&true) {
                '1'
            } else {
                '0'
            };
            write!(f, "{bit}")?;
        }
        f.write_str(")")
    }
}
