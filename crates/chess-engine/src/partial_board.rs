//! One side's pieces.

use chess_core::Piece;

use crate::Bitboard;

/// Six pairwise-disjoint bitboards holding the pieces of one color, indexed by [`Piece`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PartialBoard {
    pieces: [Bitboard; 6],
}

impl PartialBoard {
    pub const EMPTY: PartialBoard = PartialBoard {
        pieces: [Bitboard::EMPTY; 6],
    };

    #[inline]
    pub fn get(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, piece: Piece) -> &mut Bitboard {
        &mut self.pieces[piece.index()]
    }

    /// Every square occupied by this side.
    #[inline]
    pub fn all_mask(&self) -> Bitboard {
        self.pieces
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb)
    }

    /// Sum of piece values, king excluded.
    pub fn material_value(&self) -> u32 {
        Piece::ALL
            .iter()
            .filter(|&&p| p != Piece::King)
            .map(|&p| self.get(p).count() * p.value())
            .sum()
    }

    /// The piece on `mask`, if any. `mask` is expected to hold a single square.
    pub fn piece_at(&self, mask: Bitboard) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .find(|&p| self.get(p).intersects(mask))
    }

    /// Adds `mask` to `piece`'s set.
    #[inline]
    pub fn put(&mut self, piece: Piece, mask: Bitboard) {
        *self.get_mut(piece) |= mask;
    }

    /// Moves `piece` from `from` to `to`.
    #[inline]
    pub fn relocate(&mut self, piece: Piece, from: Bitboard, to: Bitboard) {
        let bb = self.get_mut(piece);
        *bb = (*bb & !from) | to;
    }

    /// Removes whatever stands on `mask` and reports what it was.
    pub fn clear_all(&mut self, mask: Bitboard) -> Option<Piece> {
        let mut removed = None;
        for piece in Piece::ALL {
            let bb = self.get_mut(piece);
            if bb.intersects(mask) {
                *bb &= !mask;
                removed = Some(piece);
            }
        }
        removed
    }

    /// Replaces the pawn on `from` with `promoted` on `to`.
    #[inline]
    pub fn promote(&mut self, from: Bitboard, to: Bitboard, promoted: Piece) {
        *self.get_mut(Piece::Pawn) &= !from;
        self.put(promoted, to);
    }

    /// True when no square holds two pieces.
    pub fn is_disjoint(&self) -> bool {
        let total: u32 = self.pieces.iter().map(|bb| bb.count()).sum();
        total == self.all_mask().count()
    }
}
