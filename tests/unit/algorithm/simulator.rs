//! Tests for token stepping, verdicts and the incremental run state machine

#[cfg(test)]
mod tests {
    use arrowpath::algorithm::cycle::{CycleStrategy, LoopMetrics};
    use arrowpath::algorithm::simulator::{
        Advance, SimState, Simulation, Token, Verdict, simulate,
    };
    use arrowpath::spatial::direction::{Direction, Position};
    use arrowpath::spatial::grid::Board;
    use arrowpath::spatial::level::{EdgeRule, Level};

    fn board(layout: &str, edge_rule: EdgeRule, arrows: &[(usize, usize, Direction)]) -> Board {
        let level = Level::parse("test", layout, 99, edge_rule).expect("valid layout");
        let mut board = Board::new(&level);
        for &(row, col, direction) in arrows {
            board
                .place_arrow(Position::new(row, col), direction)
                .expect("legal placement");
        }
        board
    }

    const SQUARE: &str = "S..\n...\n..G";

    // Tests shortest-path arrows on every cell reach the goal in four moves
    // Verified by counting the goal lookup as a move
    #[test]
    fn test_shortest_path_reaches_goal() {
        let board = board(
            SQUARE,
            EdgeRule::Shared,
            &[
                (0, 0, Direction::Right),
                (0, 1, Direction::Right),
                (0, 2, Direction::Down),
                (1, 0, Direction::Down),
                (1, 1, Direction::Down),
                (1, 2, Direction::Down),
                (2, 0, Direction::Right),
                (2, 1, Direction::Right),
            ],
        );
        let run = simulate(&board, CycleStrategy::Signature).expect("run completes");

        assert_eq!(run.verdict, Verdict::Reached { length: 4 });
        assert_eq!(run.trace.len(), 5);
        assert_eq!(run.trace.first().copied(), Some(board.start()));
        assert_eq!(run.trace.last().copied(), Some(board.goal()));
    }

    // Tests a start cell without arrows is stuck after zero moves
    // Verified by reporting the goal as the stuck cell
    #[test]
    fn test_stuck_at_start() {
        let board = board(SQUARE, EdgeRule::Shared, &[]);
        let run = simulate(&board, CycleStrategy::Signature).expect("run completes");
        assert_eq!(
            run.verdict,
            Verdict::Stuck {
                at: Position::new(0, 0),
                steps: 0
            }
        );
        assert_eq!(run.trace, vec![Position::new(0, 0)]);
    }

    // Tests an arrow into an empty neighbour is stuck after one move
    // Verified by reporting the cell before the move
    #[test]
    fn test_stuck_after_one_move() {
        let board = board(SQUARE, EdgeRule::Shared, &[(0, 0, Direction::Right)]);
        let run = simulate(&board, CycleStrategy::Signature).expect("run completes");
        assert_eq!(
            run.verdict,
            Verdict::Stuck {
                at: Position::new(0, 1),
                steps: 1
            }
        );
    }

    // Tests two cells pointing at each other loop with period two from the start
    // Verified by recording the start state after the first move
    #[test]
    fn test_facing_arrows_cycle() {
        let board = board(
            "S.G",
            EdgeRule::PerSide,
            &[(0, 0, Direction::Right), (0, 1, Direction::Left)],
        );
        let run = simulate(&board, CycleStrategy::Signature).expect("run completes");
        assert_eq!(
            run.verdict,
            Verdict::Cycle {
                metrics: Some(LoopMetrics {
                    loop_length: 2,
                    preamble_length: 0
                })
            }
        );
        assert_eq!(
            run.trace,
            vec![Position::new(0, 0), Position::new(0, 1), Position::new(0, 0)]
        );
    }

    // Tests a junction sends the token round a loop once, then out to the goal
    // Verified by toggling the junction before the move instead of after
    #[test]
    fn test_junction_breaks_loop() {
        let board = board(
            SQUARE,
            EdgeRule::Shared,
            &[
                (0, 0, Direction::Right),
                (0, 1, Direction::Down),
                (1, 1, Direction::Down),
                (1, 1, Direction::Left),
                (1, 0, Direction::Up),
                (2, 1, Direction::Right),
            ],
        );
        let run = simulate(&board, CycleStrategy::Signature).expect("run completes");

        assert_eq!(run.verdict, Verdict::Reached { length: 8 });
        let expected = [
            (0, 0),
            (0, 1),
            (1, 1),
            (1, 0),
            (0, 0),
            (0, 1),
            (1, 1),
            (2, 1),
            (2, 2),
        ]
        .map(|(row, col)| Position::new(row, col));
        assert_eq!(run.trace, expected.to_vec());
    }

    // Tests simulation leaves the board's junction state untouched
    // Verified by toggling the board's switches during the run
    #[test]
    fn test_simulation_does_not_mutate_board() {
        let board = board(
            SQUARE,
            EdgeRule::Shared,
            &[
                (0, 0, Direction::Right),
                (0, 1, Direction::Down),
                (1, 1, Direction::Down),
                (1, 1, Direction::Left),
                (1, 0, Direction::Up),
                (2, 1, Direction::Right),
            ],
        );
        let before = board.switches().clone();
        let first = simulate(&board, CycleStrategy::Signature).expect("run completes");
        let second = simulate(&board, CycleStrategy::Signature).expect("run completes");

        assert_eq!(board.switches(), &before);
        assert_eq!(first, second);
    }

    // Tests a token toggles the junction it leaves, after moving
    // Verified by toggling the destination cell
    #[test]
    fn test_token_toggles_exited_junction() {
        let board = board(
            SQUARE,
            EdgeRule::Shared,
            &[(0, 0, Direction::Down), (0, 0, Direction::Right)],
        );
        let mut token = Token::new(&board);
        assert_eq!(token.switches().flag(board.start()), Some(true));

        assert_eq!(token.advance(&board).ok(), Some(Advance::Moved));
        assert_eq!(token.position(), Position::new(0, 1));
        assert_eq!(token.steps(), 1);
        assert_eq!(token.switches().flag(board.start()), Some(false));

        assert_eq!(token.advance(&board).ok(), Some(Advance::DeadEnd));
        assert_eq!(token.steps(), 1);
    }

    // Tests incremental stepping walks through the state machine to a terminal state
    // Verified by continuing to move after reaching the goal
    #[test]
    fn test_incremental_stepping() {
        let board = board(
            "SG",
            EdgeRule::Shared,
            &[(0, 0, Direction::Right)],
        );
        let mut simulation =
            Simulation::new(&board, CycleStrategy::Signature).expect("simulation starts");
        assert_eq!(simulation.state(), SimState::Running);
        assert_eq!(simulation.trace(), &[board.start()]);

        assert_eq!(simulation.step().ok(), Some(SimState::Running));
        assert_eq!(simulation.token().position(), board.goal());
        assert_eq!(simulation.step().ok(), Some(SimState::ReachedGoal));
        assert_eq!(simulation.step().ok(), Some(SimState::ReachedGoal));
        assert_eq!(simulation.verdict(), Some(Verdict::Reached { length: 1 }));

        let run = simulation.into_run().expect("finished run");
        assert_eq!(run.trace.len(), 2);
    }

    // Tests stopping early ends the run without a verdict
    // Verified by letting stop overwrite a terminal state
    #[test]
    fn test_stop_early() {
        let board = board(
            "S.G",
            EdgeRule::PerSide,
            &[(0, 0, Direction::Right), (0, 1, Direction::Left)],
        );
        let mut simulation =
            Simulation::new(&board, CycleStrategy::Signature).expect("simulation starts");
        assert_eq!(simulation.step().ok(), Some(SimState::Running));
        simulation.stop();

        assert_eq!(simulation.state(), SimState::StoppedEarly);
        assert!(simulation.state().is_terminal());
        assert_eq!(simulation.step().ok(), Some(SimState::StoppedEarly));
        assert_eq!(simulation.trace().len(), 2);
        assert!(simulation.into_run().is_none());
    }

    // Tests verdict helpers and messages
    // Verified by reporting a path length for stuck runs
    #[test]
    fn test_verdict_helpers() {
        let reached = Verdict::Reached { length: 3 };
        let stuck = Verdict::Stuck {
            at: Position::new(1, 2),
            steps: 2,
        };
        let looping = Verdict::Cycle { metrics: None };
        let measured = Verdict::Cycle {
            metrics: Some(LoopMetrics {
                loop_length: 4,
                preamble_length: 1,
            }),
        };

        assert_eq!(reached.path_length(), Some(3));
        assert_eq!(stuck.path_length(), None);
        assert!(looping.same_kind(&measured));
        assert!(!reached.same_kind(&stuck));

        assert_eq!(reached.to_string(), "reached goal in 3 moves");
        assert_eq!(stuck.to_string(), "stuck at (1, 2) after 2 moves");
        assert_eq!(looping.to_string(), "infinite loop");
        assert_eq!(measured.to_string(), "infinite loop of 4 moves after 1 moves");
    }
}
