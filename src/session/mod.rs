//! Session control between the engine and a presentation layer

/// Edit/run mode machine and command handling
pub mod controller;
/// Frame-by-frame replay of finished runs
pub mod playback;

pub use controller::{Command, Mode, Session};
