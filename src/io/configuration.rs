//! Game constants and runtime configuration defaults

// Level defaults
/// Level loaded when none is named
pub const DEFAULT_LEVEL: &str = "classic";
/// Arrows available on a built-in level unless overridden
pub const DEFAULT_ARROW_BUDGET: usize = 999;

// Search defaults
/// Fixed seed for reproducible search
pub const DEFAULT_SEED: u64 = 42;
/// Attempts made by `--search` when no count is given
pub const DEFAULT_SEARCH_ATTEMPTS: usize = 200;
/// Random editor gestures tried per search attempt
pub const SEARCH_MOVES_PER_ATTEMPT: usize = 64;

// Replay settings
/// Pause between replayed frames
pub const DEFAULT_REPLAY_DELAY_MS: u64 = 200;

// Animation export settings
/// Side length of one board cell in exported frames
pub const GIF_CELL_SIZE: u32 = 24;
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 200;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
/// The last frame is held this many frame delays
pub const FINAL_FRAME_HOLD: u32 = 5;

// Diagnostics
/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";
