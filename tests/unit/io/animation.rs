//! Tests for animated GIF export of runs

#[cfg(test)]
mod tests {
    use arrowpath::GameError;
    use arrowpath::algorithm::cycle::CycleStrategy;
    use arrowpath::algorithm::simulator::{Run, Verdict, simulate};
    use arrowpath::io::animation::{export_run_gif, render_frame, render_frames};
    use arrowpath::io::configuration::{FINAL_FRAME_HOLD, GIF_CELL_SIZE};
    use arrowpath::session::playback::Playback;
    use arrowpath::spatial::direction::{Direction, Position};
    use arrowpath::spatial::grid::Board;
    use arrowpath::spatial::level::Level;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba};
    use std::fs::File;
    use std::io::BufReader;

    fn classic_run() -> (Board, Run) {
        let mut board = Board::new(&Level::builtin("classic").expect("builtin level"));
        for (col, direction) in [(0, Direction::Right), (1, Direction::Down)] {
            board
                .place_arrow(Position::new(0, col), direction)
                .expect("legal placement");
        }
        let run = simulate(&board, CycleStrategy::Signature).expect("run completes");
        (board, run)
    }

    // Tests frame dimensions follow the board and cell size
    // Verified by dropping the closing grid line
    #[test]
    fn test_render_frame_dimensions() {
        let (board, run) = classic_run();
        let playback = Playback::new(&board, run);
        let frame = render_frame(&board, &playback);

        assert_eq!(frame.width(), 5 * GIF_CELL_SIZE + 1);
        assert_eq!(frame.height(), 3 * GIF_CELL_SIZE + 1);
    }

    // Tests the token is drawn on the current cell
    // Verified by drawing the token at the goal
    #[test]
    fn test_render_frame_token() {
        let (board, run) = classic_run();
        let mut playback = Playback::new(&board, run);
        let centre = GIF_CELL_SIZE / 2;
        let token = Rgba([0, 190, 210, 255]);

        let first = render_frame(&board, &playback);
        assert_eq!(first.get_pixel(centre, centre), &token);

        playback.advance().expect("frame advances");
        let second = render_frame(&board, &playback);
        assert_ne!(second.get_pixel(centre, centre), &token);
        assert_eq!(second.get_pixel(GIF_CELL_SIZE + centre, centre), &token);
    }

    // Tests one frame per trace entry plus a held final frame
    // Verified by omitting the final hold frame
    #[test]
    fn test_render_frames_count() {
        let (board, run) = classic_run();
        assert_eq!(
            run.verdict,
            Verdict::Stuck {
                at: Position::new(1, 1),
                steps: 2
            }
        );

        let frames = render_frames(&board, &run, 100).expect("frames render");
        assert_eq!(frames.len(), run.trace.len() + 1);

        let (numer, denom) = frames
            .last()
            .expect("final frame")
            .delay()
            .numer_denom_ms();
        assert_eq!(numer / denom, 100 * FINAL_FRAME_HOLD);
    }

    // Tests export writes a decodable animation
    // Verified by writing a single still frame
    #[test]
    fn test_export_run_gif() {
        let (board, run) = classic_run();
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("runs").join("classic.gif");

        export_run_gif(&board, &run, &path, 10).expect("export succeeds");

        let file = File::open(&path).expect("gif written");
        let decoder = GifDecoder::new(BufReader::new(file)).expect("valid gif");
        let frames = decoder.into_frames().collect_frames().expect("frames decode");
        assert_eq!(frames.len(), run.trace.len() + 1);
    }

    // Tests export refuses a run without positions
    // Verified by encoding an empty animation
    #[test]
    fn test_export_empty_trace() {
        let (board, _) = classic_run();
        let run = Run {
            trace: Vec::new(),
            verdict: Verdict::Stuck {
                at: board.start(),
                steps: 0,
            },
        };
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("empty.gif");

        assert!(matches!(
            export_run_gif(&board, &run, &path, 100),
            Err(GameError::InvalidParameter { .. })
        ));
        assert!(!path.exists());
    }
}
