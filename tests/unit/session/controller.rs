//! Tests for the edit/run mode machine and its command surface

#[cfg(test)]
mod tests {
    use arrowpath::GameError;
    use arrowpath::algorithm::cycle::CycleStrategy;
    use arrowpath::algorithm::simulator::Verdict;
    use arrowpath::io::error::PlacementRefusal;
    use arrowpath::session::{Command, Mode, Session};
    use arrowpath::spatial::direction::{Direction, Position};
    use arrowpath::spatial::grid::Board;
    use arrowpath::spatial::level::{Level, Role};

    fn session() -> Session {
        let board = Board::new(&Level::builtin("classic").expect("builtin level"));
        Session::new(board, CycleStrategy::Signature)
    }

    // Stuck at (1, 1) after two moves
    fn session_with_path() -> Session {
        let mut session = session();
        session
            .apply(Command::PlaceArrow(Position::new(0, 0), Direction::Right))
            .expect("legal placement");
        session
            .apply(Command::PlaceArrow(Position::new(0, 1), Direction::Down))
            .expect("legal placement");
        session
    }

    // Tests a new session starts editing at the top-left cell
    // Verified by starting in run mode
    #[test]
    fn test_new_session() {
        let session = session();
        assert_eq!(session.mode(), Mode::Edit);
        assert_eq!(session.cursor(), Position::new(0, 0));
        assert!(session.playback().is_none());
        assert!(session.last_run().is_none());
    }

    // Tests the cursor moves within the board and stops at its edges
    // Verified by letting the cursor wrap
    #[test]
    fn test_move_cursor_clamps() {
        let mut session = session();
        session
            .apply(Command::MoveCursor(Direction::Up))
            .expect("edit command");
        assert_eq!(session.cursor(), Position::new(0, 0));

        for _ in 0..10 {
            session
                .apply(Command::MoveCursor(Direction::Right))
                .expect("edit command");
        }
        assert_eq!(session.cursor(), Position::new(0, 4));
    }

    // Tests run commands are refused while editing
    // Verified by ignoring the mode check
    #[test]
    fn test_run_commands_refused_in_edit() {
        let mut session = session();
        for command in [
            Command::Tick,
            Command::StopRun,
            Command::PauseRun,
            Command::ResumeRun,
        ] {
            let result = session.apply(command);
            assert!(
                matches!(result, Err(GameError::WrongMode { mode: Mode::Edit, .. })),
                "{command:?}"
            );
        }
        assert_eq!(session.mode(), Mode::Edit);
    }

    // Tests edit commands are refused while a run is showing
    // Verified by letting placements through during replay
    #[test]
    fn test_edit_commands_refused_in_run() {
        let mut session = session_with_path();
        session.apply(Command::StartRun).expect("run starts");
        assert_eq!(session.mode(), Mode::Run);

        let before = session.board().placements();
        let result = session.apply(Command::PlaceArrow(Position::new(1, 1), Direction::Left));
        assert!(matches!(
            result,
            Err(GameError::WrongMode {
                command: "place-arrow",
                mode: Mode::Run
            })
        ));
        assert!(session.apply(Command::ResetGrid).is_err());
        assert!(session.apply(Command::StartRun).is_err());
        assert_eq!(session.board().placements(), before);
    }

    // Tests refused placements leave the board unchanged
    // Verified by spending an arrow before validation
    #[test]
    fn test_refused_placement() {
        let mut session = session();
        let result = session.apply(Command::PlaceArrow(Position::new(0, 2), Direction::Down));
        assert!(matches!(
            result,
            Err(GameError::InvalidPlacement {
                reason: PlacementRefusal::PointsIntoBlocked,
                ..
            })
        ));
        assert_eq!(session.board().arrow_count(), 0);
        assert_eq!(
            session.board().remaining_arrows(),
            session.board().total_arrows()
        );
    }

    // Tests the press gesture acts at the cursor and remove frees the arrow
    // Verified by pressing at the top-left cell regardless of the cursor
    #[test]
    fn test_press_and_remove() {
        let mut session = session();
        session
            .apply(Command::MoveCursor(Direction::Down))
            .expect("edit command");
        session
            .apply(Command::PressArrow(Direction::Right))
            .expect("legal gesture");
        assert!(
            session
                .board()
                .arrows_at(Position::new(1, 0))
                .contains(Direction::Right)
        );

        session
            .apply(Command::RemoveArrow(Position::new(1, 0), Direction::Right))
            .expect("edit command");
        assert_eq!(session.board().arrow_count(), 0);

        session
            .apply(Command::RemoveArrow(Position::new(1, 0), Direction::Right))
            .expect("removing an absent arrow is a no-op");
    }

    // Tests ticking replays the run and returns to editing at the end
    // Verified by leaving run mode on the last frame instead of after it
    #[test]
    fn test_run_to_completion() {
        let mut session = session_with_path();
        session.apply(Command::StartRun).expect("run starts");
        assert_eq!(session.snapshot().token, Some(Position::new(0, 0)));

        session.apply(Command::Tick).expect("tick");
        session.apply(Command::Tick).expect("tick");
        assert_eq!(session.mode(), Mode::Run);
        assert_eq!(session.snapshot().token, Some(Position::new(1, 1)));

        session.apply(Command::Tick).expect("tick");
        assert_eq!(session.mode(), Mode::Edit);
        assert_eq!(
            session.last_run().map(|run| run.verdict),
            Some(Verdict::Stuck {
                at: Position::new(1, 1),
                steps: 2
            })
        );
        assert_eq!(session.snapshot().token, None);
    }

    // Tests pause holds the frame and stop abandons the run
    // Verified by recording abandoned runs as finished
    #[test]
    fn test_pause_and_stop() {
        let mut session = session_with_path();
        session.apply(Command::StartRun).expect("run starts");
        session.apply(Command::PauseRun).expect("run command");
        session.apply(Command::Tick).expect("tick");

        let snapshot = session.snapshot();
        assert!(snapshot.paused);
        assert_eq!(snapshot.token, Some(Position::new(0, 0)));

        session.apply(Command::ResumeRun).expect("run command");
        session.apply(Command::Tick).expect("tick");
        assert_eq!(session.snapshot().token, Some(Position::new(0, 1)));

        session.apply(Command::StopRun).expect("run command");
        assert_eq!(session.mode(), Mode::Edit);
        assert!(session.last_run().is_none());
    }

    // Tests preview reports the verdict without entering run mode
    // Verified by starting a playback from preview
    #[test]
    fn test_preview() {
        let session = session_with_path();
        assert_eq!(
            session.preview().ok(),
            Some(Verdict::Stuck {
                at: Position::new(1, 1),
                steps: 2
            })
        );
        assert_eq!(session.mode(), Mode::Edit);
    }

    // Tests snapshots describe roles, arrows and junction state
    // Verified by reading junction state from the board during replay
    #[test]
    fn test_snapshot_cells() {
        let mut session = session();
        session
            .apply(Command::PlaceArrow(Position::new(0, 0), Direction::Down))
            .expect("legal placement");
        session
            .apply(Command::PlaceArrow(Position::new(0, 0), Direction::Right))
            .expect("legal placement");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.rows, 3);
        assert_eq!(snapshot.cols, 5);
        assert_eq!(snapshot.cells.len(), 15);
        assert_eq!(snapshot.remaining_arrows, snapshot.total_arrows - 2);

        let start = snapshot.cells.first().expect("start cell");
        assert_eq!(start.role, Role::Start);
        assert_eq!(start.arrows, vec![Direction::Down, Direction::Right]);
        assert_eq!(start.active, Some(Direction::Right));

        let blocked = snapshot
            .cells
            .iter()
            .find(|cell| cell.position == Position::new(1, 2))
            .expect("blocked cell");
        assert_eq!(blocked.role, Role::Blocked);

        session.apply(Command::StartRun).expect("run starts");
        session.apply(Command::Tick).expect("tick");
        let replaying = session.snapshot();
        assert_eq!(replaying.mode, Mode::Run);
        let start = replaying.cells.first().expect("start cell");
        assert_eq!(start.active, Some(Direction::Down));
        assert_eq!(
            session.board().switches().flag(Position::new(0, 0)),
            Some(true)
        );
    }

    // Tests reset clears every arrow and refunds the budget
    // Verified by leaving junction flags installed
    #[test]
    fn test_reset_grid() {
        let mut session = session_with_path();
        session.apply(Command::ResetGrid).expect("edit command");
        assert_eq!(session.board().arrow_count(), 0);
        assert_eq!(session.board().switches().dual_count(), 0);
        assert_eq!(
            session.board().remaining_arrows(),
            session.board().total_arrows()
        );
    }

    // Tests command names and modes
    // Verified by swapping the mode of tick
    #[test]
    fn test_command_metadata() {
        assert_eq!(Command::Tick.name(), "tick");
        assert_eq!(Command::Tick.mode(), Mode::Run);
        assert_eq!(Command::StartRun.mode(), Mode::Edit);
        assert_eq!(Command::PressArrow(Direction::Up).name(), "press-arrow");
        assert_eq!(Mode::Run.to_string(), "run");
    }
}
