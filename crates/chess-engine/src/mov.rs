//! Move representation.
//!
//! Moves come in two flavours. A [`CandidateMove`] only describes geometry
//! and may leave the mover's king in check. A [`LegalMove`] can only be
//! produced by the legality filter in [`crate::Position::legal_moves`] and
//! additionally knows what it captures and whether it gives check, which is
//! what [`crate::Position::apply`] requires.

use chess_core::{CastleSide, Piece, Square};
use std::fmt;
use std::ops::Deref;

use crate::Bitboard;

/// What kind of move a candidate is, beyond its origin and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    /// Pawn advance of two squares from its starting row.
    DoublePush,
    Castle(CastleSide),
    EnPassant,
    Promotion(Piece),
}

/// A pseudo-legal move.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateMove {
    from: Square,
    to: Square,
    piece: Piece,
    kind: MoveKind,
    capture: bool,
}

impl CandidateMove {
    /// A plain move of `piece`. Pass it to [`crate::Position::try_apply`] to
    /// have it matched against the position's own moves.
    pub const fn new(from: Square, to: Square, piece: Piece) -> Self {
        CandidateMove {
            from,
            to,
            piece,
            kind: MoveKind::Quiet,
            capture: false,
        }
    }

    pub(crate) const fn with(
        from: Square,
        to: Square,
        piece: Piece,
        kind: MoveKind,
        capture: bool,
    ) -> Self {
        CandidateMove {
            from,
            to,
            piece,
            kind,
            capture,
        }
    }

    /// Same move, promoting to `piece`.
    pub const fn promoting(mut self, piece: Piece) -> Self {
        self.kind = MoveKind::Promotion(piece);
        self
    }

    #[inline]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[inline]
    pub const fn from_mask(&self) -> Bitboard {
        Bitboard::from_square(self.from)
    }

    #[inline]
    pub const fn to_mask(&self) -> Bitboard {
        Bitboard::from_square(self.to)
    }

    #[inline]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.capture
    }

    #[inline]
    pub const fn is_castling(&self) -> bool {
        matches!(self.kind, MoveKind::Castle(_))
    }

    #[inline]
    pub const fn castle_side(&self) -> Option<CastleSide> {
        match self.kind {
            MoveKind::Castle(side) => Some(side),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    #[inline]
    pub const fn is_double_push(&self) -> bool {
        matches!(self.kind, MoveKind::DoublePush)
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        matches!(self.kind, MoveKind::Promotion(_))
    }

    #[inline]
    pub const fn promotion(&self) -> Option<Piece> {
        match self.kind {
            MoveKind::Promotion(piece) => Some(piece),
            _ => None,
        }
    }

    /// Coordinate notation such as "e2e4" or "e7e8q".
    pub fn to_coordinate(&self) -> String {
        match self.promotion() {
            Some(piece) => format!(
                "{}{}{}",
                self.from,
                self.to,
                piece.to_fen_char(chess_core::Color::Black)
            ),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// True when `other` names the same squares and promotion piece.
    pub fn same_squares(&self, other: &CandidateMove) -> bool {
        self.from == other.from && self.to == other.to && self.promotion() == other.promotion()
    }
}

impl fmt::Debug for CandidateMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CandidateMove({})", self.to_coordinate())
    }
}

impl fmt::Display for CandidateMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_coordinate())
    }
}

/// A move checked against the position it was generated for.
///
/// Carries that position's key; [`crate::Position::apply`] refuses it
/// anywhere else.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegalMove {
    candidate: CandidateMove,
    captured: Option<Piece>,
    check: bool,
    position_key: u64,
}

impl LegalMove {
    pub(crate) const fn new(
        candidate: CandidateMove,
        captured: Option<Piece>,
        check: bool,
        position_key: u64,
    ) -> Self {
        LegalMove {
            candidate,
            captured,
            check,
            position_key,
        }
    }

    #[inline]
    pub const fn candidate(&self) -> CandidateMove {
        self.candidate
    }

    /// Kind of the piece taken by this move.
    #[inline]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// Whether the move leaves the opponent in check.
    #[inline]
    pub const fn is_check(&self) -> bool {
        self.check
    }

    /// Key of the position the move was validated in.
    #[inline]
    pub const fn position_key(&self) -> u64 {
        self.position_key
    }
}

impl Deref for LegalMove {
    type Target = CandidateMove;

    fn deref(&self) -> &CandidateMove {
        &self.candidate
    }
}

impl fmt::Debug for LegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LegalMove({})", self.to_coordinate())
    }
}

impl fmt::Display for LegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_coordinate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn coordinate_notation() {
        let push = CandidateMove::new(sq("e2"), sq("e4"), Piece::Pawn);
        assert_eq!(push.to_coordinate(), "e2e4");

        let promo = CandidateMove::new(sq("e7"), sq("e8"), Piece::Pawn).promoting(Piece::Queen);
        assert_eq!(promo.to_coordinate(), "e7e8q");
        assert!(promo.is_promotion());
        assert_eq!(promo.promotion(), Some(Piece::Queen));
    }

    #[test]
    fn flags_follow_kind() {
        let castle = CandidateMove::with(
            sq("e1"),
            sq("g1"),
            Piece::King,
            MoveKind::Castle(CastleSide::Kingside),
            false,
        );
        assert!(castle.is_castling());
        assert!(!castle.is_capture());
        assert_eq!(castle.castle_side(), Some(CastleSide::Kingside));

        let ep = CandidateMove::with(sq("e5"), sq("d6"), Piece::Pawn, MoveKind::EnPassant, true);
        assert!(ep.is_en_passant());
        assert!(ep.is_capture());
        assert_eq!(ep.to_mask(), Bitboard::from_square(sq("d6")));
    }

    #[test]
    fn legal_move_exposes_candidate() {
        let capture = CandidateMove::with(sq("d1"), sq("d8"), Piece::Queen, MoveKind::Quiet, true);
        let legal = LegalMove::new(capture, Some(Piece::Queen), true, 42);
        assert_eq!(legal.candidate(), capture);
        assert_eq!(legal.position_key(), 42);
        assert_eq!(legal.captured(), Some(Piece::Queen));
        assert!(legal.is_check());
        assert!(legal.is_capture());
        assert!(legal.same_squares(&CandidateMove::new(sq("d1"), sq("d8"), Piece::Queen)));
    }
}
