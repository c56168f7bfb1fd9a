//! Command-line interface: load a level, place arrows, simulate and present the run

use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::algorithm::cycle::CycleStrategy;
use crate::algorithm::search::{PathSearch, SearchConfig};
use crate::algorithm::simulator::{Run, simulate};
use crate::io::animation::export_run_gif;
use crate::io::configuration::{
    DEFAULT_LEVEL, DEFAULT_REPLAY_DELAY_MS, DEFAULT_SEARCH_ATTEMPTS, DEFAULT_SEED,
    GIF_FRAME_DELAY_MS, SEARCH_MOVES_PER_ATTEMPT,
};
use crate::io::error::{GameError, Result, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::session::controller::{Command, Mode, Session};
use crate::spatial::direction::{Direction, Position};
use crate::spatial::grid::Board;
use crate::spatial::level::{EdgeRule, Level};

/// One arrow given on the command line as `ROW,COL,DIRECTION`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Cell the arrow leaves
    pub position: Position,
    /// Arrow direction
    pub direction: Direction,
}

impl FromStr for Placement {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let (position, direction) = s
            .rsplit_once(',')
            .ok_or_else(|| invalid_parameter("place", &s, &"expected ROW,COL,DIRECTION"))?;
        Ok(Self {
            position: position.parse()?,
            direction: direction.parse()?,
        })
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.position.row, self.position.col, self.direction
        )
    }
}

#[derive(Parser)]
#[command(name = "arrowpath")]
#[command(
    author,
    version,
    about = "Simulate the diamond's path through a board of toggling arrows"
)]
/// Command-line arguments for the arrow-path simulator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Built-in level to load (classic, open, corridor)
    #[arg(short, long, default_value = DEFAULT_LEVEL)]
    pub level: String,

    /// Override the level's arrow budget
    #[arg(short, long)]
    pub arrows: Option<usize>,

    /// Place an arrow, as ROW,COL,DIRECTION; repeatable, applied in order
    #[arg(short, long = "place", value_name = "ROW,COL,DIR")]
    pub placements: Vec<Placement>,

    /// Let neighbouring cells point at each other across the same edge
    #[arg(long)]
    pub per_side_edges: bool,

    /// Cycle detection strategy
    #[arg(short = 'c', long, value_enum, default_value_t = CycleStrategy::Signature)]
    pub strategy: CycleStrategy,

    /// Search for the layout with the longest finite path, optionally giving the attempt count
    #[arg(long, value_name = "ATTEMPTS", num_args = 0..=1)]
    pub search: Option<Option<usize>>,

    /// Random seed for reproducible search
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Replay the run step by step
    #[arg(short, long)]
    pub replay: bool,

    /// Delay between replayed steps in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_REPLAY_DELAY_MS)]
    pub delay: u64,

    /// Export the run as an animated GIF
    #[arg(short, long, value_name = "PATH")]
    pub gif: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Edge rule selected by the flags
    pub const fn edge_rule(&self) -> EdgeRule {
        if self.per_side_edges {
            EdgeRule::PerSide
        } else {
            EdgeRule::Shared
        }
    }
}

/// Orchestrates one invocation: board setup, optional search, simulation and output
pub struct GameRunner {
    cli: Cli,
    progress: ProgressManager,
}

impl GameRunner {
    /// Create a runner for the given arguments
    pub fn new(cli: Cli) -> Self {
        let progress = if cli.should_show_progress() {
            ProgressManager::new()
        } else {
            ProgressManager::hidden()
        };
        Self { cli, progress }
    }

    /// Load the level and apply the command-line placements
    ///
    /// # Errors
    ///
    /// Returns an error if the level is unknown or a placement is refused
    pub fn build_board(&self) -> Result<Board> {
        let mut level = Level::builtin(&self.cli.level)?.with_edge_rule(self.cli.edge_rule());
        if let Some(arrows) = self.cli.arrows {
            level = level.with_arrow_budget(arrows);
        }

        let mut board = Board::new(&level);
        for placement in &self.cli.placements {
            board.place_arrow(placement.position, placement.direction)?;
        }
        Ok(board)
    }

    /// Run the invocation end to end
    ///
    /// # Errors
    ///
    /// Returns an error if board setup, simulation, replay or export fails
    pub fn process(&mut self) -> Result<()> {
        let mut board = self.build_board()?;

        if let Some(attempts) = self.cli.search {
            let attempts = attempts.unwrap_or(DEFAULT_SEARCH_ATTEMPTS);
            if let Some(found) = self.search(&board, attempts)? {
                board = found;
            }
        }

        let run = simulate(&board, self.cli.strategy)?;
        self.report(&board, &run);

        if self.cli.replay {
            self.replay(board.clone())?;
        }

        if let Some(path) = &self.cli.gif {
            export_run_gif(&board, &run, path, GIF_FRAME_DELAY_MS)?;
            info!(path = %path.display(), "exported animation");
        }

        Ok(())
    }

    fn search(&mut self, board: &Board, attempts: usize) -> Result<Option<Board>> {
        if attempts == 0 {
            return Err(invalid_parameter(
                "search",
                &attempts,
                &"at least one attempt is required",
            ));
        }

        let config = SearchConfig {
            moves_per_attempt: SEARCH_MOVES_PER_ATTEMPT,
            strategy: self.cli.strategy,
        };
        let mut search = PathSearch::new(board, self.cli.seed, config);

        self.progress.start_search(attempts);
        for attempt in 1..=attempts {
            search.run_attempt()?;
            self.progress
                .update_search(attempt, search.best().map(|best| best.length));
        }
        self.progress.finish("search complete");

        Ok(search.best().map(|best| best.board.clone()))
    }

    fn replay(&mut self, board: Board) -> Result<()> {
        let mut session = Session::new(board, self.cli.strategy);
        session.apply(Command::StartRun)?;

        let frames = session.playback().map_or(0, |p| p.frame_count());
        self.progress.start_replay(frames);

        while session.mode() == Mode::Run {
            let snapshot = session.snapshot();
            let frame = session.playback().map_or(0, |p| p.frame());
            self.progress
                .update_replay(frame, snapshot.token, snapshot.paused);
            std::thread::sleep(Duration::from_millis(self.cli.delay));
            session.apply(Command::Tick)?;
        }

        let summary = session
            .last_run()
            .map_or_else(String::new, |run| run.verdict.to_string());
        self.progress.finish(&summary);
        Ok(())
    }

    // Verdicts are the product output of the tool
    #[allow(clippy::print_stdout)]
    fn report(&self, board: &Board, run: &Run) {
        println!(
            "level: {} ({}x{}), arrows: {} ({} used)",
            self.cli.level,
            board.rows(),
            board.cols(),
            board.remaining_arrows(),
            board.total_arrows() - board.remaining_arrows()
        );
        match run.verdict.path_length() {
            Some(length) => println!("moves: {length}"),
            None => println!("moves: infinity"),
        }
        println!("verdict: {}", run.verdict);

        if self.cli.search.is_some() {
            let placements: Vec<String> = board
                .placements()
                .into_iter()
                .map(|(position, direction)| {
                    format!(
                        "--place {}",
                        Placement {
                            position,
                            direction
                        }
                    )
                })
                .collect();
            println!("layout: {}", placements.join(" "));
        }
    }
}
