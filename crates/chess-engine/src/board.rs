//! Both sides' pieces together.

use chess_core::{CastleSide, Color, Piece, Square};

use crate::{Bitboard, CandidateMove, MoveKind, PartialBoard};

/// Piece placement for both colors.
///
/// `Board` is `Copy`, so the legality filter can play a move on a scratch
/// value without touching the position it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    sides: [PartialBoard; 2],
}

impl Board {
    pub const fn new(white: PartialBoard, black: PartialBoard) -> Self {
        Board {
            sides: [white, black],
        }
    }

    #[inline]
    pub fn side(&self, color: Color) -> &PartialBoard {
        &self.sides[color.index()]
    }

    #[inline]
    pub fn side_mut(&mut self, color: Color) -> &mut PartialBoard {
        &mut self.sides[color.index()]
    }

    #[inline]
    pub fn pieces(&self, piece: Piece, color: Color) -> Bitboard {
        self.side(color).get(piece)
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.sides[0].all_mask() | self.sides[1].all_mask()
    }

    /// Piece and owner on a single-square mask.
    pub fn piece_at(&self, mask: Bitboard) -> Option<(Piece, Color)> {
        Color::ALL
            .into_iter()
            .find_map(|color| self.side(color).piece_at(mask).map(|p| (p, color)))
    }

    /// The square of `color`'s king, if it has exactly one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(Piece::King, color).to_square()
    }

    /// Square of the pawn taken by an en passant capture landing on `to`.
    pub(crate) fn en_passant_victim(mover: Color, to: Bitboard) -> Bitboard {
        match mover {
            Color::White => to.down(1),
            Color::Black => to.up(1),
        }
    }

    /// Rook origin and destination masks for a castling move of `color`.
    pub(crate) fn castling_rook(color: Color, side: CastleSide) -> (Bitboard, Bitboard) {
        let row = color.home_row() as i32;
        let at = |col: u8| Bitboard::from_position(col as i32, row).unwrap_or_default();
        (at(side.rook_origin_col()), at(side.rook_target_col()))
    }

    /// Moves pieces for `mv` played by `mover`, returning what was captured.
    ///
    /// Only piece placement changes here; clocks, rights and side to move
    /// belong to the position.
    pub(crate) fn play(&mut self, mover: Color, mv: &CandidateMove) -> Option<Piece> {
        let from = mv.from_mask();
        let to = mv.to_mask();
        let them = mover.opposite();

        let victim_square = match mv.kind() {
            MoveKind::EnPassant => Self::en_passant_victim(mover, to),
            _ => to,
        };
        let captured = self.side_mut(them).clear_all(victim_square);

        let ours = self.side_mut(mover);
        match mv.kind() {
            MoveKind::Promotion(promoted) => ours.promote(from, to, promoted),
            MoveKind::Castle(side) => {
                ours.relocate(Piece::King, from, to);
                let (rook_from, rook_to) = Self::castling_rook(mover, side);
                ours.relocate(Piece::Rook, rook_from, rook_to);
            }
            _ => ours.relocate(mv.piece(), from, to),
        }
        captured
    }

    /// Reverses [`Board::play`].
    pub(crate) fn unplay(&mut self, mover: Color, mv: &CandidateMove, captured: Option<Piece>) {
        let from = mv.from_mask();
        let to = mv.to_mask();

        let ours = self.side_mut(mover);
        match mv.kind() {
            MoveKind::Promotion(promoted) => {
                *ours.get_mut(promoted) &= !to;
                ours.put(Piece::Pawn, from);
            }
            MoveKind::Castle(side) => {
                ours.relocate(Piece::King, to, from);
                let (rook_from, rook_to) = Self::castling_rook(mover, side);
                ours.relocate(Piece::Rook, rook_to, rook_from);
            }
            _ => ours.relocate(mv.piece(), to, from),
        }

        if let Some(piece) = captured {
            let victim_square = match mv.kind() {
                MoveKind::EnPassant => Self::en_passant_victim(mover, to),
                _ => to,
            };
            self.side_mut(mover.opposite()).put(piece, victim_square);
        }
    }

    /// Visual 8x8 grid indexed `[row][col]`.
    pub fn grid(&self) -> [[Option<(Piece, Color)>; 8]; 8] {
        let mut grid = [[None; 8]; 8];
        for color in Color::ALL {
            for piece in Piece::ALL {
                for sq in self.pieces(piece, color) {
                    grid[sq.row() as usize][sq.col() as usize] = Some((piece, color));
                }
            }
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn board() -> Board {
        let mut white = PartialBoard::EMPTY;
        white.put(Piece::King, Bitboard::from_square(Square::E1));
        white.put(Piece::Rook, Bitboard::from_square(Square::H1));
        white.put(Piece::Pawn, Bitboard::from_square(sq("e5")));
        let mut black = PartialBoard::EMPTY;
        black.put(Piece::King, Bitboard::from_square(Square::E8));
        black.put(Piece::Pawn, Bitboard::from_square(sq("d5")));
        Board::new(white, black)
    }

    #[test]
    fn play_and_unplay_en_passant() {
        let original = board();
        let mut b = original;
        let mv = CandidateMove::with(sq("e5"), sq("d6"), Piece::Pawn, MoveKind::EnPassant, true);
        let captured = b.play(Color::White, &mv);
        assert_eq!(captured, Some(Piece::Pawn));
        assert_eq!(b.pieces(Piece::Pawn, Color::Black), Bitboard::EMPTY);
        assert_eq!(b.piece_at(Bitboard::from_square(sq("d6"))), Some((Piece::Pawn, Color::White)));

        b.unplay(Color::White, &mv, captured);
        assert_eq!(b, original);
    }

    #[test]
    fn play_and_unplay_castling() {
        let original = board();
        let mut b = original;
        let mv = CandidateMove::with(
            Square::E1,
            Square::G1,
            Piece::King,
            MoveKind::Castle(CastleSide::Kingside),
            false,
        );
        assert_eq!(b.play(Color::White, &mv), None);
        assert_eq!(b.king_square(Color::White), Some(Square::G1));
        assert_eq!(b.piece_at(Bitboard::from_square(Square::F1)), Some((Piece::Rook, Color::White)));

        b.unplay(Color::White, &mv, None);
        assert_eq!(b, original);
    }

    #[test]
    fn grid_places_pieces() {
        let grid = board().grid();
        assert_eq!(grid[0][4], Some((Piece::King, Color::White)));
        assert_eq!(grid[4][3], Some((Piece::Pawn, Color::Black)));
        assert_eq!(grid[3][3], None);
    }
}
