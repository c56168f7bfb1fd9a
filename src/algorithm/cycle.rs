//! Infinite-loop detection over the finite `(position, junction flags)` state space
//!
//! A run that neither reaches the goal nor gets stuck within
//! [`Board::state_space_bound`] moves must revisit a state, and since stepping is
//! deterministic it then repeats forever. The strategies here turn that bound
//! into a verdict; all of them agree on whether a run cycles.

use bitvec::vec::BitVec;
use std::collections::HashMap;

use crate::algorithm::simulator::{Advance, Token};
use crate::io::error::{Result, invariant_violation};
use crate::spatial::direction::Position;
use crate::spatial::grid::Board;

/// Shape of an infinite walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopMetrics {
    /// Moves in one lap of the loop
    pub loop_length: usize,
    /// Moves before the walk first enters the loop
    pub preamble_length: usize,
}

/// How a run decides it is looping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CycleStrategy {
    /// Remember every visited state; report exact loop metrics
    #[default]
    Signature,
    /// Declare a loop once the state-space bound is exceeded; no metrics
    StepBound,
    /// Floyd's tortoise and hare with constant memory; exact metrics
    TortoiseHare,
}

/// Per-run detector state for a [`CycleStrategy`]
#[derive(Debug)]
pub enum Detector {
    /// Signature memo: first step index of each state seen
    Signature {
        /// Seen states
        seen: HashMap<(Position, BitVec), usize>,
    },
    /// Step bound
    StepBound {
        /// Moves after which the walk must be looping
        bound: usize,
    },
    /// Loop shape found up front by Floyd's algorithm, `None` if the walk terminates
    TortoiseHare {
        /// Precomputed loop
        cycle: Option<LoopMetrics>,
    },
}

impl Detector {
    /// Prepare detection for a run over `board`
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the tortoise-hare precomputation walks into
    /// an impossible state
    pub fn new(board: &Board, strategy: CycleStrategy) -> Result<Self> {
        Ok(match strategy {
            CycleStrategy::Signature => Self::Signature {
                seen: HashMap::new(),
            },
            CycleStrategy::StepBound => Self::StepBound {
                bound: board.state_space_bound(),
            },
            CycleStrategy::TortoiseHare => Self::TortoiseHare {
                cycle: tortoise_hare(board)?,
            },
        })
    }

    /// Record the token's state after a move
    ///
    /// Returns `Some(metrics)` once the walk is known to loop; the inner option
    /// is empty for the step-bound strategy.
    pub fn observe(&mut self, token: &Token) -> Option<Option<LoopMetrics>> {
        match self {
            Self::Signature { seen } => {
                let step = token.steps();
                let key = (token.position(), token.switches().signature());
                match seen.get(&key) {
                    Some(&first) => Some(Some(LoopMetrics {
                        loop_length: step - first,
                        preamble_length: first,
                    })),
                    None => {
                        seen.insert(key, step);
                        None
                    }
                }
            }
            Self::StepBound { bound } => (token.steps() >= *bound).then_some(None),
            Self::TortoiseHare { cycle } => cycle
                .filter(|m| token.steps() == m.preamble_length + m.loop_length)
                .map(Some),
        }
    }
}

/// Find the loop a board's walk falls into, if any, with two tokens
///
/// Returns `None` when the walk reaches the goal or gets stuck.
///
/// # Errors
///
/// Returns `InvariantViolation` if a token leaves the board or enters a blocked cell
pub fn tortoise_hare(board: &Board) -> Result<Option<LoopMetrics>> {
    let mut tortoise = Token::new(board);
    let mut hare = Token::new(board);

    // Hare runs at double speed until it either terminates or laps the tortoise
    loop {
        for _ in 0..2 {
            if hare.advance(board)? != Advance::Moved {
                return Ok(None);
            }
        }
        lap(&mut tortoise, board)?;
        if tortoise.same_state(&hare) {
            break;
        }
    }

    // Preamble: restart the tortoise and move both at the same speed
    let mut tortoise = Token::new(board);
    let mut preamble_length = 0;
    while !tortoise.same_state(&hare) {
        lap(&mut tortoise, board)?;
        lap(&mut hare, board)?;
        preamble_length += 1;
    }

    // Loop length: walk the hare once around
    let mut loop_length = 1;
    lap(&mut hare, board)?;
    while !tortoise.same_state(&hare) {
        lap(&mut hare, board)?;
        loop_length += 1;
    }

    Ok(Some(LoopMetrics {
        loop_length,
        preamble_length,
    }))
}

// A token inside a known loop must always be able to move
fn lap(token: &mut Token, board: &Board) -> Result<()> {
    match token.advance(board)? {
        Advance::Moved => Ok(()),
        Advance::AtGoal | Advance::DeadEnd => Err(invariant_violation(
            token.position(),
            &"walk terminated inside a detected loop",
        )),
    }
}
