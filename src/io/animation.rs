//! Animated GIF export of a run replay

use image::{Delay, Frame, Rgba, RgbaImage};
use std::path::Path;

use crate::algorithm::simulator::Run;
use crate::io::configuration::{FINAL_FRAME_HOLD, GIF_CELL_SIZE, VIEWER_MIN_FRAME_DELAY_MS};
use crate::io::error::{GameError, Result};
use crate::session::playback::Playback;
use crate::spatial::direction::{Direction, Position};
use crate::spatial::grid::Board;
use crate::spatial::level::Role;

const BACKGROUND: Rgba<u8> = Rgba([250, 250, 245, 255]);
const GRID_LINE: Rgba<u8> = Rgba([60, 60, 60, 255]);
const START: Rgba<u8> = Rgba([150, 220, 150, 255]);
const GOAL_DARK: Rgba<u8> = Rgba([40, 40, 40, 255]);
const BLOCKED: Rgba<u8> = Rgba([170, 60, 60, 255]);
const ACTIVE_ARROW: Rgba<u8> = Rgba([220, 30, 30, 255]);
const INACTIVE_ARROW: Rgba<u8> = Rgba([150, 150, 150, 255]);
const TOKEN: Rgba<u8> = Rgba([0, 190, 210, 255]);

/// Render a run as an animated GIF, one frame per token position
///
/// Frame delays below what viewers support are raised to
/// [`VIEWER_MIN_FRAME_DELAY_MS`]; the last frame is held longer.
///
/// # Errors
///
/// Returns an error if:
/// - The run has an empty trace
/// - The parent directory or file cannot be created
/// - GIF encoding fails
pub fn export_run_gif(
    board: &Board,
    run: &Run,
    output_path: &Path,
    frame_delay_ms: u32,
) -> Result<()> {
    if run.trace.is_empty() {
        return Err(GameError::InvalidParameter {
            parameter: "run",
            value: String::new(),
            reason: "trace is empty".to_string(),
        });
    }

    let delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
    let frames = render_frames(board, run, delay_ms)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GameError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    let file = std::fs::File::create(output_path).map_err(|e| GameError::FileSystem {
        path: output_path.to_path_buf(),
        operation: "create file",
        source: e,
    })?;

    let mut encoder = image::codecs::gif::GifEncoder::new(file);
    encoder
        .encode_frames(frames)
        .map_err(|e| GameError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

/// Render every frame of a run's replay
///
/// # Errors
///
/// Returns `InvariantViolation` if the trace does not belong to `board`
pub fn render_frames(board: &Board, run: &Run, delay_ms: u32) -> Result<Vec<Frame>> {
    let mut playback = Playback::new(board, run.clone());
    let mut frames = Vec::with_capacity(playback.frame_count() + 1);

    loop {
        let image = render_frame(board, &playback);
        frames.push(Frame::from_parts(
            image,
            0,
            0,
            Delay::from_numer_denom_ms(delay_ms, 1),
        ));
        if !playback.advance()? {
            break;
        }
    }

    // Final frame displays longer for better visibility
    if let Some(last) = frames.last().map(|f| f.buffer().clone()) {
        frames.push(Frame::from_parts(
            last,
            0,
            0,
            Delay::from_numer_denom_ms(delay_ms * FINAL_FRAME_HOLD, 1),
        ));
    }

    Ok(frames)
}

/// Draw the board as it stands at the playback's current frame
pub fn render_frame(board: &Board, playback: &Playback) -> RgbaImage {
    let cell = GIF_CELL_SIZE;
    let width = board.cols() as u32 * cell + 1;
    let height = board.rows() as u32 * cell + 1;
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);

    for position in board.positions() {
        let (x0, y0) = origin(position);
        match board.role(position) {
            Some(Role::Start) => fill_rect(&mut img, x0 + 1, y0 + 1, cell - 1, cell - 1, START),
            Some(Role::Blocked) => {
                fill_rect(&mut img, x0 + 1, y0 + 1, cell - 1, cell - 1, BLOCKED);
            }
            Some(Role::Goal) => {
                for dy in 1..cell {
                    for dx in 1..cell {
                        if ((dx / 4) + (dy / 4)) % 2 == 0 {
                            paint(&mut img, x0 + dx, y0 + dy, GOAL_DARK);
                        }
                    }
                }
            }
            Some(Role::Empty) | None => {}
        }
    }

    for i in 0..=board.rows() as u32 {
        fill_rect(&mut img, 0, i * cell, width, 1, GRID_LINE);
    }
    for j in 0..=board.cols() as u32 {
        fill_rect(&mut img, j * cell, 0, 1, height, GRID_LINE);
    }

    let switches = playback.switches();
    for position in board.positions() {
        let slots = board.arrows_at(position);
        let active = match switches.flag(position) {
            Some(flag) => slots.select(flag),
            None => slots.older(),
        };
        for direction in slots.iter() {
            let color = if Some(direction) == active {
                ACTIVE_ARROW
            } else {
                INACTIVE_ARROW
            };
            draw_arrow(&mut img, position, direction, color);
        }
    }

    if let Some(position) = playback.position() {
        let (x0, y0) = origin(position);
        let centre = cell / 2;
        let radius = cell / 4;
        for dy in 0..cell {
            for dx in 0..cell {
                if dx.abs_diff(centre) + dy.abs_diff(centre) <= radius {
                    paint(&mut img, x0 + dx, y0 + dy, TOKEN);
                }
            }
        }
    }

    img
}

const fn origin(position: Position) -> (u32, u32) {
    (
        position.col as u32 * GIF_CELL_SIZE,
        position.row as u32 * GIF_CELL_SIZE,
    )
}

// Arrows sit on the edge they cross, as a small block nudged outward
fn draw_arrow(img: &mut RgbaImage, position: Position, direction: Direction, color: Rgba<u8>) {
    let (x0, y0) = origin(position);
    let cell = GIF_CELL_SIZE;
    let half = cell / 2;
    let size = (cell / 6).max(2);
    let (x, y) = match direction {
        Direction::Up => (x0 + half - size / 2, y0.saturating_sub(size / 2)),
        Direction::Down => (x0 + half - size / 2, y0 + cell - size / 2),
        Direction::Left => (x0.saturating_sub(size / 2), y0 + half - size / 2),
        Direction::Right => (x0 + cell - size / 2, y0 + half - size / 2),
    };
    fill_rect(img, x, y, size, size, color);
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
    for dy in 0..height {
        for dx in 0..width {
            paint(img, x + dx, y + dy, color);
        }
    }
}

fn paint(img: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    if let Some(pixel) = img.get_pixel_mut_checked(x, y) {
        *pixel = color;
    }
}
