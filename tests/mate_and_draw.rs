use panterfish::board::{Board, Game};
use panterfish::search::Searcher;
use panterfish::{MATE_LOWER, MATE_UPPER};

#[test]
fn missing_king_is_terminal_everywhere() {
    // White to move without a king: the game is already lost.
    let (b, _) = Board::from_fen("8/8/8/8/8/8/8/k6Q w - - 0 1").expect("valid fen");
    assert!(b.score() <= -MATE_LOWER);
    let mut s = Searcher::default();
    for depth in [0, 1, 3] {
        for gamma in [-MATE_UPPER, 0, MATE_UPPER] {
            for can_null in [false, true] {
                assert_eq!(s.bound(&b, gamma, depth, can_null), -MATE_UPPER);
            }
        }
    }
}

#[test]
fn checkmate_is_a_bounded_loss() {
    // Black king on g8 is mated by the rook on a8.
    let (b, white) = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").expect("valid fen");
    assert!(!white);
    for gamma in [0, 100] {
        let mut s = Searcher::default();
        assert_eq!(s.bound(&b, gamma, 2, false), -MATE_LOWER);
    }
}

#[test]
fn stalemate_is_a_draw() {
    // Black king on h8 has no safe square but is not attacked.
    let (b, _) = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("valid fen");
    for gamma in [-100, 0] {
        let mut s = Searcher::default();
        let r = s.bound(&b, gamma, 2, false);
        assert_eq!(r, 0, "gamma {gamma}");
    }
}

#[test]
fn quiescence_skips_mate_check() {
    // At depth 0 a mated side just stands pat.
    let (b, _) = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").expect("valid fen");
    let mut s = Searcher::default();
    let r = s.bound(&b, -MATE_LOWER, 0, true);
    assert_eq!(r, b.score());
}

#[test]
fn repeated_position_scores_zero() {
    let mut game = Game::startpos();
    game.make_move_uci("g1f3").unwrap();
    let pos = *game.board();
    let mut s = Searcher::default();
    s.set_history(vec![pos]);
    for gamma in [-50, 0, 1, 50] {
        assert_eq!(s.bound(&pos, gamma, 2, true), 0, "gamma {gamma}");
    }
}

#[test]
fn repetition_ignored_at_root_and_in_quiescence() {
    let mut game = Game::startpos();
    game.make_move_uci("e2e4").unwrap();
    let pos = *game.board();

    let mut with = Searcher::default();
    with.set_history(vec![pos]);
    let mut without = Searcher::default();
    for gamma in [-200, -40, 0, 40, 200] {
        assert_eq!(with.bound(&pos, gamma, 0, true), without.bound(&pos, gamma, 0, true));
        assert_eq!(with.bound(&pos, gamma, 2, false), without.bound(&pos, gamma, 2, false));
    }
}

#[test]
fn search_from_repeated_start_still_moves() {
    // After a knight shuffle the start position recurs. The root itself is never
    // scored as a repetition, so the search still produces a move.
    let moves: Vec<String> = ["g1f3", "g8f6", "f3g1", "f6g8"].iter().map(|s| s.to_string()).collect();
    let game = Game::set_from_start_and_moves(&moves).unwrap();
    assert_eq!(game.board(), &Board::initial());
    let mut s = Searcher::default();
    let best = s.search(game.positions()).max_depth(3).filter_map(|i| i.best_move).last();
    assert!(best.is_some());
}
