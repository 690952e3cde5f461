//! Static evaluation.
//!
//! Scores are in centipawns from White's point of view: positive favors
//! White, negative favors Black.

use chess_core::{Color, Piece, Square};
use chess_engine::Position;

use crate::EvalConfig;

/// Score of a position where White is checkmated is `-MATE_SCORE`; where
/// Black is checkmated, `MATE_SCORE`.
pub const MATE_SCORE: i32 = 1_000_000;

/// Material in centipawns, indexed by [`Piece::index`]. Kings are never
/// counted.
const MATERIAL: [i32; 6] = [100, 300, 300, 500, 900, 0];

// Piece-square tables from White's side, rank 8 first and a-file first.
#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  10,   5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      5,  10,  10, -20, -20,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10,  10,  10,  10,  10,   5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

const PIECE_SQUARE: [&[i32; 64]; 6] = [
    &PAWN_PST,
    &KNIGHT_PST,
    &BISHOP_PST,
    &ROOK_PST,
    &QUEEN_PST,
    &KING_PST,
];

/// Positional bonus for `piece` of `color` standing on `sq`.
///
/// Black reads the same tables flipped top to bottom.
pub fn piece_square_value(piece: Piece, color: Color, sq: Square) -> i32 {
    let row = match color {
        Color::White => 7 - sq.row(),
        Color::Black => sq.row(),
    };
    PIECE_SQUARE[piece.index()][row as usize * 8 + sq.col() as usize]
}

/// Material plus piece-square score of one side, before applying its sign.
fn placement_score(position: &Position, color: Color) -> i32 {
    let board = position.board();
    Piece::ALL
        .iter()
        .map(|&piece| {
            board
                .pieces(piece, color)
                .into_iter()
                .map(|sq| MATERIAL[piece.index()] + piece_square_value(piece, color, sq))
                .sum::<i32>()
        })
        .sum()
}

/// Evaluates `position` without searching.
///
/// Mated positions score `∓MATE_SCORE` and drawn positions score zero.
/// Otherwise the score is material, piece-square bonuses, a tempo bonus for
/// the side to move and a mobility term comparing pseudo-legal move counts.
pub fn evaluate(position: &Position, config: &EvalConfig) -> i32 {
    if position.is_checkmate() {
        return -position.side_to_move().sign() * MATE_SCORE;
    }
    if position.is_draw() {
        return 0;
    }

    let mut score =
        placement_score(position, Color::White) - placement_score(position, Color::Black);

    score += position.side_to_move().sign() * config.tempo;

    if config.mobility_weight != 0 {
        let white = position.pseudo_legal_moves_for(Color::White).len() as i32;
        let black = position.pseudo_legal_moves_for(Color::Black).len() as i32;
        score += config.mobility_weight * (white - black);
    }

    score
}

/// Whether `score` is a forced-mate score rather than a material estimate.
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(fen: &str) -> i32 {
        evaluate(&Position::from_fen(fen).unwrap(), &EvalConfig::default())
    }

    /// Flips the board top to bottom and swaps colors, castling rights and
    /// the en passant rank included.
    fn mirror(fen: &str) -> String {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let placement: Vec<String> = fields[0]
            .split('/')
            .rev()
            .map(|rank| {
                rank.chars()
                    .map(|c| {
                        if c.is_ascii_uppercase() {
                            c.to_ascii_lowercase()
                        } else {
                            c.to_ascii_uppercase()
                        }
                    })
                    .collect()
            })
            .collect();
        let side = if fields[1] == "w" { "b" } else { "w" };
        let castling: String = if fields[2] == "-" {
            "-".to_string()
        } else {
            "KQkq"
                .chars()
                .filter(|c| {
                    let swapped = if c.is_ascii_uppercase() {
                        c.to_ascii_lowercase()
                    } else {
                        c.to_ascii_uppercase()
                    };
                    fields[2].contains(swapped)
                })
                .collect()
        };
        let en_passant = match fields[3].as_bytes() {
            [file, b'6'] => format!("{}3", *file as char),
            [file, b'3'] => format!("{}6", *file as char),
            _ => "-".to_string(),
        };
        format!(
            "{} {} {} {} 0 1",
            placement.join("/"),
            side,
            castling,
            en_passant
        )
    }

    #[test]
    fn startpos_is_worth_the_tempo() {
        assert_eq!(eval(chess_core::FenRecord::STARTPOS), 15);
        assert_eq!(
            eval("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1"),
            -15
        );
    }

    #[test]
    fn checkmate_scores_mate() {
        let fools = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        assert_eq!(eval(fools), -MATE_SCORE);
        assert!(is_mate_score(eval(fools)));

        assert_eq!(eval("R5k1/5ppp/8/8/8/8/8/4K3 b - - 1 1"), MATE_SCORE);
    }

    #[test]
    fn stalemate_scores_zero() {
        assert_eq!(eval("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"), 0);
    }

    #[test]
    fn material_dominates() {
        let up_a_queen = eval("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
        assert!(up_a_queen > 800, "{}", up_a_queen);
        assert!(!is_mate_score(up_a_queen));
    }

    #[test]
    fn mirrored_positions_score_opposite() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w - - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/3QK3 b - - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "r3k3/8/8/3pP3/8/8/8/4K2R w Kq d6 0 1",
        ] {
            assert_eq!(eval(fen), -eval(&mirror(fen)), "{}", fen);
        }
    }

    #[test]
    fn tables_mirror_for_black() {
        let e2 = Square::from_algebraic("e2").unwrap();
        let e7 = Square::from_algebraic("e7").unwrap();
        assert_eq!(
            piece_square_value(Piece::Pawn, Color::White, e2),
            piece_square_value(Piece::Pawn, Color::Black, e7)
        );
        assert_eq!(piece_square_value(Piece::Pawn, Color::White, e2), -20);
        assert_eq!(piece_square_value(Piece::King, Color::White, Square::G1), 30);
        assert_eq!(piece_square_value(Piece::King, Color::Black, Square::G8), 30);
    }

    #[test]
    fn castling_rights_do_not_tilt_mobility() {
        let config = EvalConfig {
            tempo: 0,
            mobility_weight: 1,
        };
        let castling = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(evaluate(&castling, &config), 0);
    }

    #[test]
    fn mobility_weight_counts_pseudo_legal_moves() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let still = EvalConfig {
            tempo: 0,
            mobility_weight: 0,
        };
        let mobile = EvalConfig {
            tempo: 0,
            mobility_weight: 2,
        };
        let white = position.pseudo_legal_moves_for(Color::White).len() as i32;
        let black = position.pseudo_legal_moves_for(Color::Black).len() as i32;
        assert_eq!(
            evaluate(&position, &mobile) - evaluate(&position, &still),
            2 * (white - black)
        );
    }
}
