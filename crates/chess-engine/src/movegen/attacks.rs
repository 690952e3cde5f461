//! Attack detection by ray casting from the target square.

use chess_core::{Color, Piece};

use crate::{Bitboard, Board, Direction};

/// Whether any piece of `by` attacks a square in `target`.
///
/// Walks the eight rays outward from the target; the first piece met on a
/// ray attacks it only if it is an enemy that moves along that ray (a king
/// only at distance one). Knights and pawns are probed by their leaps.
pub fn is_square_attacked(board: &Board, target: Bitboard, by: Color) -> bool {
    let occupied = board.occupied();
    let attackers = board.side(by);

    for dir in Direction::ALL {
        for n in 1..=7 {
            let ray = target.shift(dir, n);
            if ray.is_empty() {
                break;
            }
            if !ray.intersects(occupied) {
                continue;
            }
            let hit = match attackers.piece_at(ray) {
                Some(Piece::Queen) => true,
                Some(Piece::Rook) => !dir.is_diagonal(),
                Some(Piece::Bishop) => dir.is_diagonal(),
                Some(Piece::King) => n == 1,
                _ => false,
            };
            if hit {
                return true;
            }
            break;
        }
    }

    let pawn_origins = match by {
        Color::White => target.down_left(1) | target.down_right(1),
        Color::Black => target.up_left(1) | target.up_right(1),
    };
    if pawn_origins.intersects(attackers.get(Piece::Pawn)) {
        return true;
    }

    target.knight_targets().intersects(attackers.get(Piece::Knight))
}

/// Whether `color`'s king is attacked by the other side.
pub fn is_king_attacked(board: &Board, color: Color) -> bool {
    let king = board.pieces(Piece::King, color);
    king.is_not_empty() && is_square_attacked(board, king, color.opposite())
}
