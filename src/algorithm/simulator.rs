//! Token stepping and the run state machine
//!
//! A run is a deterministic walk over `(position, junction flags)` states. The
//! simulator owns a private copy of the junction state, so the board a run was
//! started from is never mutated and every run is a pure function of it.

use std::fmt;
use tracing::{error, info, trace};

use crate::algorithm::cycle::{CycleStrategy, Detector, LoopMetrics};
use crate::algorithm::switches::Switches;
use crate::io::error::{Result, invariant_violation};
use crate::spatial::direction::Position;
use crate::spatial::grid::{Board, Heading};
use crate::spatial::level::Role;

/// Run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    /// More steps may be taken
    Running,
    /// The token sits on the goal
    ReachedGoal,
    /// The token sits on a cell without arrows
    Stuck,
    /// The walk provably repeats forever
    CycleDetected,
    /// Cancelled before a verdict was reached
    StoppedEarly,
}

impl SimState {
    /// Whether no further transitions are possible
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Terminal classification of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The token reached the goal after `length` moves
    Reached {
        /// Number of moves taken
        length: usize,
    },
    /// The token stopped on a cell without arrows
    Stuck {
        /// Cell the token is stuck on
        at: Position,
        /// Number of moves taken before getting stuck
        steps: usize,
    },
    /// The token loops forever
    Cycle {
        /// Exact loop shape, when the detection strategy measures it
        metrics: Option<LoopMetrics>,
    },
}

impl Verdict {
    /// Path length when the run terminates at the goal
    pub const fn path_length(&self) -> Option<usize> {
        match self {
            Self::Reached { length } => Some(*length),
            Self::Stuck { .. } | Self::Cycle { .. } => None,
        }
    }

    /// Whether two verdicts are the same kind of outcome, ignoring loop metrics
    pub const fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Reached { .. }, Self::Reached { .. })
                | (Self::Stuck { .. }, Self::Stuck { .. })
                | (Self::Cycle { .. }, Self::Cycle { .. })
        )
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reached { length } => write!(f, "reached goal in {length} moves"),
            Self::Stuck { at, steps } => write!(f, "stuck at {at} after {steps} moves"),
            Self::Cycle {
                metrics: Some(metrics),
            } => write!(
                f,
                "infinite loop of {} moves after {} moves",
                metrics.loop_length, metrics.preamble_length
            ),
            Self::Cycle { metrics: None } => f.write_str("infinite loop"),
        }
    }
}

/// What a single token move did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to a neighbouring cell
    Moved,
    /// Already on the goal
    AtGoal,
    /// No arrow to follow
    DeadEnd,
}

/// The moving piece: its cell, step count and private junction state
#[derive(Debug, Clone)]
pub struct Token {
    position: Position,
    switches: Switches,
    steps: usize,
}

impl Token {
    /// Place a token on the board's start cell with the board's junction state
    pub fn new(board: &Board) -> Self {
        Self {
            position: board.start(),
            switches: board.switches().clone(),
            steps: 0,
        }
    }

    /// Current cell
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Moves taken so far
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// The token's junction state
    pub const fn switches(&self) -> &Switches {
        &self.switches
    }

    /// Whether two tokens are in the same simulation state (step counts aside)
    pub fn same_state(&self, other: &Self) -> bool {
        self.position == other.position && self.switches == other.switches
    }

    /// Follow the active arrow out of the current cell
    ///
    /// A junction is toggled after the token has left it.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the arrow leads off the board or into a
    /// blocked cell, which placement rules forbid
    pub fn advance(&mut self, board: &Board) -> Result<Advance> {
        let direction = match board.heading_with(self.position, &self.switches) {
            Heading::Goal => return Ok(Advance::AtGoal),
            Heading::DeadEnd => return Ok(Advance::DeadEnd),
            Heading::Follow(direction) => direction,
        };

        let next = board.neighbour(self.position, direction).ok_or_else(|| {
            invariant_violation(
                self.position,
                &format!("{direction} arrow leads off the board"),
            )
        })?;
        if board.role(next) == Some(Role::Blocked) {
            return Err(invariant_violation(
                self.position,
                &format!("{direction} arrow leads into blocked cell {next}"),
            ));
        }

        let exited = self.position;
        self.position = next;
        self.steps += 1;
        if self.switches.is_dual(exited) {
            self.switches.toggle(exited)?;
        }
        Ok(Advance::Moved)
    }
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Every cell the token occupied, starting with the start cell
    pub trace: Vec<Position>,
    /// How the run ended
    pub verdict: Verdict,
}

/// An in-progress run that can be stepped, stopped or driven to completion
pub struct Simulation<'a> {
    board: &'a Board,
    token: Token,
    trace: Vec<Position>,
    detector: Detector,
    state: SimState,
    verdict: Option<Verdict>,
}

impl<'a> Simulation<'a> {
    /// Start a run at the board's start cell
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the strategy's precomputation walks into
    /// an impossible state
    pub fn new(board: &'a Board, strategy: CycleStrategy) -> Result<Self> {
        let token = Token::new(board);
        let mut detector = Detector::new(board, strategy)?;
        // The start state is the first observed signature and never a repeat
        detector.observe(&token);

        info!(
            start = %board.start(),
            goal = %board.goal(),
            junctions = board.switches().dual_count(),
            bound = board.state_space_bound(),
            ?strategy,
            "starting run"
        );

        Ok(Self {
            board,
            trace: vec![token.position()],
            token,
            detector,
            state: SimState::Running,
            verdict: None,
        })
    }

    /// Current state
    pub const fn state(&self) -> SimState {
        self.state
    }

    /// Cells visited so far
    pub fn trace(&self) -> &[Position] {
        &self.trace
    }

    /// The token
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Verdict, once a terminal state other than `StoppedEarly` is reached
    pub const fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    /// Take one step
    ///
    /// Steps after a terminal state are no-ops returning that state.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the token would leave the board or enter a
    /// blocked cell; the run is abandoned
    pub fn step(&mut self) -> Result<SimState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }

        let advance = match self.token.advance(self.board) {
            Ok(advance) => advance,
            Err(err) => {
                error!(%err, steps = self.token.steps(), "aborting run");
                self.state = SimState::StoppedEarly;
                return Err(err);
            }
        };

        match advance {
            Advance::AtGoal => {
                self.finish(
                    SimState::ReachedGoal,
                    Verdict::Reached {
                        length: self.token.steps(),
                    },
                );
            }
            Advance::DeadEnd => {
                self.finish(
                    SimState::Stuck,
                    Verdict::Stuck {
                        at: self.token.position(),
                        steps: self.token.steps(),
                    },
                );
            }
            Advance::Moved => {
                trace!(step = self.token.steps(), position = %self.token.position(), "moved");
                self.trace.push(self.token.position());
                if let Some(metrics) = self.detector.observe(&self.token) {
                    self.finish(SimState::CycleDetected, Verdict::Cycle { metrics });
                }
            }
        }
        Ok(self.state)
    }

    /// Cancel the run; the next step is simply not taken
    pub fn stop(&mut self) {
        if !self.state.is_terminal() {
            self.state = SimState::StoppedEarly;
        }
    }

    /// Consume the simulation, returning the run if it produced a verdict
    pub fn into_run(self) -> Option<Run> {
        self.verdict.map(|verdict| Run {
            trace: self.trace,
            verdict,
        })
    }

    fn finish(&mut self, state: SimState, verdict: Verdict) {
        info!(%verdict, steps = self.token.steps(), "run finished");
        self.state = state;
        self.verdict = Some(verdict);
    }
}

/// Simulate a board to its verdict
///
/// Always terminates: every strategy declares a cycle within
/// [`Board::state_space_bound`] moves.
///
/// # Errors
///
/// Returns `InvariantViolation` if the board lets the token leave the grid or
/// enter a blocked cell
pub fn simulate(board: &Board, strategy: CycleStrategy) -> Result<Run> {
    let mut simulation = Simulation::new(board, strategy)?;
    while simulation.step()? == SimState::Running {}
    let start = board.start();
    simulation
        .into_run()
        .ok_or_else(|| invariant_violation(start, &"run ended without a verdict"))
}
