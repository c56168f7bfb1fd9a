//! Edit/run mode machine and the command surface for a presentation layer
//!
//! Edit commands mutate the board; run commands drive a [`Playback`] of a run
//! computed up front. The mode itself provides the mutual exclusion: while a
//! run is showing, nothing can touch the arrows it was computed from.

use std::fmt;
use tracing::{debug, info};

use crate::algorithm::cycle::CycleStrategy;
use crate::algorithm::simulator::{Run, Verdict, simulate};
use crate::io::error::{GameError, Result};
use crate::session::playback::Playback;
use crate::spatial::direction::{Direction, Position};
use crate::spatial::grid::Board;
use crate::spatial::level::Role;

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Arrows may be edited
    Edit,
    /// A run is being replayed
    Run,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit => f.write_str("edit"),
            Self::Run => f.write_str("run"),
        }
    }
}

/// Commands accepted from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the edit cursor one cell, clamped to the board
    MoveCursor(Direction),
    /// Place an arrow (strict rules)
    PlaceArrow(Position, Direction),
    /// Remove an arrow if present
    RemoveArrow(Position, Direction),
    /// Editor key gesture at the cursor
    PressArrow(Direction),
    /// Clear every arrow
    ResetGrid,
    /// Compute a run and begin replaying it
    StartRun,
    /// Advance the replay one frame; past the last frame the run ends
    Tick,
    /// Abandon the replay
    StopRun,
    /// Suspend replay
    PauseRun,
    /// Resume replay
    ResumeRun,
}

impl Command {
    /// Command name for diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Self::MoveCursor(_) => "move-cursor",
            Self::PlaceArrow(..) => "place-arrow",
            Self::RemoveArrow(..) => "remove-arrow",
            Self::PressArrow(_) => "press-arrow",
            Self::ResetGrid => "reset-grid",
            Self::StartRun => "start-run",
            Self::Tick => "tick",
            Self::StopRun => "stop-run",
            Self::PauseRun => "pause-run",
            Self::ResumeRun => "resume-run",
        }
    }

    /// Mode the command is valid in
    pub const fn mode(self) -> Mode {
        match self {
            Self::MoveCursor(_)
            | Self::PlaceArrow(..)
            | Self::RemoveArrow(..)
            | Self::PressArrow(_)
            | Self::ResetGrid
            | Self::StartRun => Mode::Edit,
            Self::Tick | Self::StopRun | Self::PauseRun | Self::ResumeRun => Mode::Run,
        }
    }
}

/// What a cell looks like to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    /// Cell position
    pub position: Position,
    /// Landmark
    pub role: Role,
    /// Arrows, oldest first
    pub arrows: Vec<Direction>,
    /// Arrow the token would follow from here
    pub active: Option<Direction>,
}

/// Everything needed to draw the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Current mode
    pub mode: Mode,
    /// Board rows
    pub rows: usize,
    /// Board columns
    pub cols: usize,
    /// Cells in row-major order
    pub cells: Vec<CellView>,
    /// Edit cursor
    pub cursor: Position,
    /// Token position while a run is showing
    pub token: Option<Position>,
    /// Whether replay is paused
    pub paused: bool,
    /// Arrows left to place
    pub remaining_arrows: usize,
    /// Arrows the level allows
    pub total_arrows: usize,
}

/// A game session over one board
pub struct Session {
    board: Board,
    cursor: Position,
    strategy: CycleStrategy,
    playback: Option<Playback>,
    last_run: Option<Run>,
}

impl Session {
    /// Start in edit mode with the cursor on the top-left cell
    pub const fn new(board: Board, strategy: CycleStrategy) -> Self {
        Self {
            board,
            cursor: Position::new(0, 0),
            strategy,
            playback: None,
            last_run: None,
        }
    }

    /// Current mode
    pub const fn mode(&self) -> Mode {
        if self.playback.is_some() {
            Mode::Run
        } else {
            Mode::Edit
        }
    }

    /// The board
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Edit cursor
    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    /// Replay in progress
    pub const fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    /// Most recent run replayed to its end
    pub const fn last_run(&self) -> Option<&Run> {
        self.last_run.as_ref()
    }

    /// Verdict of the current layout, without entering run mode
    ///
    /// # Errors
    ///
    /// Propagates invariant violations from the simulator
    pub fn preview(&self) -> Result<Verdict> {
        Ok(simulate(&self.board, self.strategy)?.verdict)
    }

    /// Apply a command
    ///
    /// # Errors
    ///
    /// Returns `WrongMode` for a command issued in the other mode and
    /// `InvalidPlacement` for refused edits; in both cases nothing changes.
    /// Invariant violations while starting a run are returned as-is and leave
    /// the session in edit mode.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        let mode = self.mode();
        if command.mode() != mode {
            debug!(command = command.name(), %mode, "rejecting command");
            return Err(GameError::WrongMode {
                command: command.name(),
                mode,
            });
        }

        let result = self.dispatch(command);
        if let Err(err) = &result {
            debug!(command = command.name(), %err, "command refused");
        }
        result
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::MoveCursor(direction) => {
                if let Some(next) = self.board.neighbour(self.cursor, direction) {
                    self.cursor = next;
                }
                Ok(())
            }
            Command::PlaceArrow(position, direction) => {
                self.board.place_arrow(position, direction)
            }
            Command::RemoveArrow(position, direction) => {
                self.board.remove_arrow(position, direction);
                Ok(())
            }
            Command::PressArrow(direction) => self.board.press_arrow(self.cursor, direction),
            Command::ResetGrid => {
                self.board.reset();
                Ok(())
            }
            Command::StartRun => {
                let run = simulate(&self.board, self.strategy)?;
                info!(verdict = %run.verdict, frames = run.trace.len(), "replaying run");
                self.playback = Some(Playback::new(&self.board, run));
                Ok(())
            }
            Command::Tick => self.tick(),
            Command::StopRun => {
                self.playback = None;
                Ok(())
            }
            Command::PauseRun => {
                if let Some(playback) = self.playback.as_mut() {
                    playback.pause();
                }
                Ok(())
            }
            Command::ResumeRun => {
                if let Some(playback) = self.playback.as_mut() {
                    playback.resume();
                }
                Ok(())
            }
        }
    }

    fn tick(&mut self) -> Result<()> {
        let Some(playback) = self.playback.as_mut() else {
            return Ok(());
        };
        if playback.is_paused() {
            return Ok(());
        }
        if playback.is_finished() {
            self.last_run = self.playback.take().map(Playback::into_run);
            return Ok(());
        }
        playback.advance()?;
        Ok(())
    }

    /// Current state for drawing
    pub fn snapshot(&self) -> Snapshot {
        let switches = self
            .playback
            .as_ref()
            .map_or_else(|| self.board.switches(), Playback::switches);

        let cells = self
            .board
            .positions()
            .map(|position| {
                let slots = self.board.arrows_at(position);
                let active = match switches.flag(position) {
                    Some(flag) => slots.select(flag),
                    None => slots.older(),
                };
                CellView {
                    position,
                    role: self.board.role(position).unwrap_or(Role::Empty),
                    arrows: slots.iter().collect(),
                    active,
                }
            })
            .collect();

        Snapshot {
            mode: self.mode(),
            rows: self.board.rows(),
            cols: self.board.cols(),
            cells,
            cursor: self.cursor,
            token: self.playback.as_ref().and_then(Playback::position),
            paused: self.playback.as_ref().is_some_and(Playback::is_paused),
            remaining_arrows: self.board.remaining_arrows(),
            total_arrows: self.board.total_arrows(),
        }
    }
}
