//! Seeded local search for the arrow layout with the longest finite path
//!
//! Each attempt starts from the base board and applies random editor gestures,
//! keeping a change when the path still reaches the goal and is no shorter.
//! While no finite path exists yet every legal change is kept, which lets an
//! attempt wander until it first connects start to goal.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::algorithm::cycle::CycleStrategy;
use crate::algorithm::simulator::simulate;
use crate::io::configuration::SEARCH_MOVES_PER_ATTEMPT;
use crate::io::error::Result;
use crate::spatial::direction::{Direction, Position};
use crate::spatial::grid::Board;

/// Search parameters
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Random gestures tried per attempt
    pub moves_per_attempt: usize,
    /// Cycle detection used to evaluate layouts
    pub strategy: CycleStrategy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            moves_per_attempt: SEARCH_MOVES_PER_ATTEMPT,
            strategy: CycleStrategy::Signature,
        }
    }
}

/// Best layout found so far
#[derive(Debug, Clone)]
pub struct Solution {
    /// Board carrying the layout
    pub board: Board,
    /// Path length from start to goal
    pub length: usize,
}

/// Random-restart hill climbing over arrow layouts
pub struct PathSearch {
    base: Board,
    rng: StdRng,
    config: SearchConfig,
    best: Option<Solution>,
    attempts: usize,
}

impl PathSearch {
    /// Create a search starting every attempt from `board`
    pub fn new(board: &Board, seed: u64, config: SearchConfig) -> Self {
        Self {
            base: board.clone(),
            rng: StdRng::seed_from_u64(seed),
            config,
            best: None,
            attempts: 0,
        }
    }

    /// Best layout across all attempts
    pub const fn best(&self) -> Option<&Solution> {
        self.best.as_ref()
    }

    /// Attempts run so far
    pub const fn attempts(&self) -> usize {
        self.attempts
    }

    /// Run one attempt, returning its best finite path length
    ///
    /// # Errors
    ///
    /// Propagates invariant violations from the simulator
    pub fn run_attempt(&mut self) -> Result<Option<usize>> {
        self.attempts += 1;

        let mut current = self.base.clone();
        let mut current_length = self.evaluate(&current)?;

        for _ in 0..self.config.moves_per_attempt {
            let (position, direction) = self.random_gesture(&current);
            let mut trial = current.clone();
            if trial.press_arrow(position, direction).is_err() {
                continue;
            }

            let trial_length = self.evaluate(&trial)?;
            let keep = match (trial_length, current_length) {
                (Some(trial_length), Some(current_length)) => trial_length >= current_length,
                (_, None) => true,
                (None, Some(_)) => false,
            };
            if keep {
                current = trial;
                current_length = trial_length;
            }
        }

        if let Some(length) = current_length {
            if self.best.as_ref().is_none_or(|best| length > best.length) {
                debug!(attempt = self.attempts, length, "new longest path");
                self.best = Some(Solution {
                    board: current,
                    length,
                });
            }
        }

        Ok(current_length)
    }

    fn evaluate(&self, board: &Board) -> Result<Option<usize>> {
        Ok(simulate(board, self.config.strategy)?.verdict.path_length())
    }

    fn random_gesture(&mut self, board: &Board) -> (Position, Direction) {
        let row = self.rng.random_range(0..board.rows());
        let col = self.rng.random_range(0..board.cols());
        let direction = Direction::ALL
            .get(self.rng.random_range(0..Direction::ALL.len()))
            .copied()
            .unwrap_or(Direction::Right);
        (Position::new(row, col), direction)
    }
}
