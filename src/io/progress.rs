//! Terminal progress display for path search and run replay

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

use crate::spatial::direction::Position;

static SEARCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Search: [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static REPLAY_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("◆◇ ")
});

/// Drives one progress bar at a time
///
/// A manager created with [`ProgressManager::hidden`] tracks positions without
/// drawing anything.
pub struct ProgressManager {
    bar: Option<ProgressBar>,
    hidden: bool,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a manager drawing to stderr
    pub const fn new() -> Self {
        Self {
            bar: None,
            hidden: false,
        }
    }

    /// Create a manager that never draws
    pub const fn hidden() -> Self {
        Self {
            bar: None,
            hidden: true,
        }
    }

    fn install(&mut self, length: usize, style: &ProgressStyle) -> &ProgressBar {
        let bar = ProgressBar::new(length as u64);
        if self.hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(style.clone());
        self.bar.insert(bar)
    }

    /// Begin tracking a search of `attempts` attempts
    pub fn start_search(&mut self, attempts: usize) {
        self.install(attempts, &SEARCH_STYLE)
            .set_message("no finite path yet");
    }

    /// Report a finished attempt and the longest path so far
    pub fn update_search(&self, attempt: usize, best: Option<usize>) {
        if let Some(bar) = &self.bar {
            bar.set_position(attempt as u64);
            match best {
                Some(length) => bar.set_message(format!("longest path {length}")),
                None => bar.set_message("no finite path yet"),
            }
        }
    }

    /// Begin tracking a replay of `frames` frames
    pub fn start_replay(&mut self, frames: usize) {
        // Frames are 0-indexed; the bar counts moves
        self.install(frames.saturating_sub(1), &REPLAY_STYLE)
            .set_prefix("◆ moves");
    }

    /// Report the frame being shown
    pub fn update_replay(&self, frame: usize, position: Option<Position>, paused: bool) {
        if let Some(bar) = &self.bar {
            bar.set_position(frame as u64);
            let at = position.map_or_else(String::new, |p| format!("at {p}"));
            if paused {
                bar.set_message(format!("{at} (paused)"));
            } else {
                bar.set_message(at);
            }
        }
    }

    /// Current bar position, if a bar is active
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(ProgressBar::position)
    }

    /// Finish the active bar with a closing message
    pub fn finish(&mut self, message: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(message.to_string());
        }
    }
}
