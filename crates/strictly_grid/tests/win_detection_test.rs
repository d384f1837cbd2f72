//! Property tests: the move-local win check agrees with a full board scan.

use proptest::prelude::*;
use proptest::sample::Index;
use strictly_grid::rules::{check_winner, completes_line};
use strictly_grid::{BoardSize, GameState, Outcome, Phase, Square};

proptest! {
    #[test]
    fn local_check_matches_full_scan(n in 1usize..=5, picks in prop::collection::vec(any::<Index>(), 0..25)) {
        let mut state = GameState::new(BoardSize::new(n).unwrap());

        for pick in picks {
            if state.phase() == Phase::Finished {
                break;
            }
            let empty = state.board().empty_positions();
            let pos = *pick.get(&empty);
            let mark = state.current_mark();

            let report = state
                .place(pos.row() as i64, pos.col() as i64)
                .expect("empty in-range cell is legal");

            let local = completes_line(state.board(), pos, mark);
            let scanned = check_winner(state.board());
            prop_assert_eq!(local, scanned == Some(mark));
            prop_assert_eq!(report.outcome.and_then(|o| o.winner()), scanned);
            if report.outcome == Some(Outcome::Draw) {
                prop_assert!(state.board().is_full());
                prop_assert_eq!(scanned, None);
            }
        }
    }

    #[test]
    fn rejected_moves_leave_board_unchanged(n in 1usize..=5, row in -3i64..8, col in -3i64..8) {
        let mut state = GameState::new(BoardSize::new(n).unwrap());
        // Occupy the cell so in-range coordinates are rejected as occupied.
        if let Ok(report) = state.place(row, col) {
            prop_assert_eq!(state.board().squares().iter().filter(|s| **s != Square::Empty).count(), 1);
            prop_assert_eq!(report.placed.row as i64, row);
            if state.phase() == Phase::Finished {
                return Ok(());
            }
        }

        let before = state.clone();
        prop_assert!(state.place(row, col).is_err());
        prop_assert_eq!(state, before);
    }
}
