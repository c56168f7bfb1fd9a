//! Frame-by-frame replay of a finished run
//!
//! Replay never re-simulates: it walks the recorded trace and re-applies the
//! junction toggles so the presentation layer can draw the active arrows as
//! they stood at each frame.

use crate::algorithm::simulator::Run;
use crate::algorithm::switches::Switches;
use crate::io::error::{Result, invariant_violation};
use crate::spatial::direction::Position;
use crate::spatial::grid::Board;

/// Replay cursor over a precomputed [`Run`]
#[derive(Debug, Clone)]
pub struct Playback {
    run: Run,
    frame: usize,
    switches: Switches,
    paused: bool,
}

impl Playback {
    /// Start replaying `run`, which must have been simulated from `board`
    pub fn new(board: &Board, run: Run) -> Self {
        Self {
            run,
            frame: 0,
            switches: board.switches().clone(),
            paused: false,
        }
    }

    /// The run being replayed
    pub const fn run(&self) -> &Run {
        &self.run
    }

    /// Give back the run
    pub fn into_run(self) -> Run {
        self.run
    }

    /// Index of the current frame
    pub const fn frame(&self) -> usize {
        self.frame
    }

    /// Number of frames (trace length)
    pub fn frame_count(&self) -> usize {
        self.run.trace.len()
    }

    /// Token position at the current frame
    pub fn position(&self) -> Option<Position> {
        self.run.trace.get(self.frame).copied()
    }

    /// Junction state at the current frame
    pub const fn switches(&self) -> &Switches {
        &self.switches
    }

    /// Whether the last frame is showing
    pub fn is_finished(&self) -> bool {
        self.frame + 1 >= self.frame_count()
    }

    /// Whether advancement is suspended
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suspend advancement
    pub const fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume advancement
    pub const fn resume(&mut self) {
        self.paused = false;
    }

    /// Move to the next frame
    ///
    /// Returns whether the frame changed; paused or finished replays stay put.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the trace does not match the board the
    /// playback was created from
    pub fn advance(&mut self) -> Result<bool> {
        if self.paused || self.is_finished() {
            return Ok(false);
        }
        let exited = self
            .position()
            .ok_or_else(|| invariant_violation(Position::new(0, 0), &"empty trace"))?;
        if self.switches.is_dual(exited) {
            self.switches.toggle(exited)?;
        }
        self.frame += 1;
        Ok(true)
    }
}
