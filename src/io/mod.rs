/// Animated GIF export of runs
pub mod animation;
/// Command-line interface and invocation orchestration
pub mod cli;
/// Game constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Diagnostic tracing setup
pub mod logging;
/// Terminal progress display
pub mod progress;
