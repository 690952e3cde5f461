//! Game rules exercised through the public API.

use chess_engine::{
    san_to_move, CandidateMove, Color, DrawReason, GameResult, MoveError, Piece, Position, Square,
};
use proptest::prelude::*;

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

fn play_san(position: &mut Position, moves: &[&str]) {
    for san in moves {
        let m = san_to_move(position, san).unwrap_or_else(|e| panic!("{}: {}", san, e));
        position.apply(m).unwrap();
    }
}

#[test]
fn scholars_mate() {
    let mut position = Position::startpos();
    play_san(&mut position, &["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"]);
    assert!(position.is_checkmate());
    assert_eq!(position.result(), Some(GameResult::WhiteWins));
    assert!(position.is_game_over());
}

#[test]
fn en_passant_window_is_one_move() {
    let mut position = Position::startpos();
    play_san(&mut position, &["e4", "a6", "e5", "d5"]);
    assert_eq!(position.context().en_passant_square(), Some(sq("d6")));
    assert!(san_to_move(&position, "exd6").is_ok());

    play_san(&mut position, &["a3", "a5"]);
    assert_eq!(position.context().en_passant_square(), None);
    assert!(san_to_move(&position, "exd6").is_err());
}

#[test]
fn en_passant_exposing_king_is_illegal() {
    // Capturing en passant would open the fifth rank to the rook.
    let position = Position::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1").unwrap();
    assert!(!position.legal_moves().iter().any(|m| m.is_en_passant()));
}

#[test]
fn promotion_via_try_apply() {
    let mut position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let m = position
        .try_apply(CandidateMove::new(sq("a7"), sq("a8"), Piece::Pawn).promoting(Piece::Knight))
        .unwrap();
    assert_eq!(m.promotion(), Some(Piece::Knight));
    assert_eq!(position.piece_at(sq("a8")), Some((Piece::Knight, Color::White)));
    assert_eq!(position.board().pieces(Piece::Pawn, Color::White).count(), 0);

    position.undo();
    assert_eq!(position.piece_at(sq("a7")), Some((Piece::Pawn, Color::White)));
    assert_eq!(position.piece_at(sq("a8")), None);
}

#[test]
fn king_cannot_step_into_check() {
    let mut position = Position::from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1").unwrap();
    assert_eq!(
        position.try_apply(CandidateMove::new(Square::E1, Square::D1, Piece::King)),
        Err(MoveError::LeavesKingInCheck("e1d1".into()))
    );
    assert!(position
        .try_apply(CandidateMove::new(Square::E1, sq("d2"), Piece::King))
        .is_ok());
}

#[test]
fn fifty_move_clock_reaches_draw() {
    let mut position = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 98 60").unwrap();
    play_san(&mut position, &["Ra2"]);
    assert!(!position.is_draw());
    play_san(&mut position, &["Kd7"]);
    assert_eq!(position.context().halfmove_clock(), 100);
    assert_eq!(position.result(), Some(GameResult::Draw(DrawReason::FiftyMoveRule)));
}

#[test]
fn mate_outranks_fifty_move_rule() {
    let mut position = Position::from_fen("6k1/5ppp/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
    play_san(&mut position, &["Ra8#"]);
    assert_eq!(position.context().halfmove_clock(), 100);
    assert_eq!(position.result(), Some(GameResult::WhiteWins));
    assert!(!position.is_draw());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn undo_restores_random_lines(choices in prop::collection::vec(any::<prop::sample::Index>(), 1..40)) {
        let mut position = Position::startpos();
        let original = position.clone();
        let mut played = 0;

        for choice in &choices {
            let moves = position.legal_moves();
            if moves.is_empty() {
                break;
            }
            position.apply(moves[choice.index(moves.len())]).unwrap();
            prop_assert!(position.is_valid());
            played += 1;
        }

        prop_assert_eq!(position.ply(), played);
        while position.undo().is_some() {}
        prop_assert_eq!(&position, &original);
        prop_assert_eq!(position.repetitions().len(), 1);
        prop_assert_eq!(position.repetition_count(), 1);
    }
}
