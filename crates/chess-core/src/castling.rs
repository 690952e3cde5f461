//! Castling rights.

use crate::Color;

/// Which wing a castling move goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// Column the king lands on.
    #[inline]
    pub const fn king_target_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    /// Column the rook starts on.
    #[inline]
    pub const fn rook_origin_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    /// Column the rook lands on.
    #[inline]
    pub const fn rook_target_col(self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }
}

/// The four castling rights packed into one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const fn flag(color: Color, side: CastleSide) -> u8 {
        let shift = match side {
            CastleSide::Kingside => 0,
            CastleSide::Queenside => 1,
        };
        1 << (color.index() as u8 * 2 + shift)
    }

    /// Builds rights from the four booleans, White kingside first.
    pub const fn from_flags(
        white_kingside: bool,
        white_queenside: bool,
        black_kingside: bool,
        black_queenside: bool,
    ) -> Self {
        CastlingRights(
            white_kingside as u8
                | (white_queenside as u8) << 1
                | (black_kingside as u8) << 2
                | (black_queenside as u8) << 3,
        )
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    #[inline]
    pub fn insert(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::flag(color, side);
    }

    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    /// Drops both rights of one side.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, CastleSide::Kingside);
        self.remove(color, CastleSide::Queenside);
    }

    /// Raw flags (bit 0 = White kingside ... bit 3 = Black queenside).
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// FEN castling field, "-" when no rights remain.
    pub fn to_fen(self) -> String {
        let mut s = String::new();
        for (color, side, c) in [
            (Color::White, CastleSide::Kingside, 'K'),
            (Color::White, CastleSide::Queenside, 'Q'),
            (Color::Black, CastleSide::Kingside, 'k'),
            (Color::Black, CastleSide::Queenside, 'q'),
        ] {
            if self.has(color, side) {
                s.push(c);
            }
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_independent() {
        let mut rights = CastlingRights::ALL;
        rights.remove(Color::White, CastleSide::Kingside);
        assert!(!rights.has(Color::White, CastleSide::Kingside));
        assert!(rights.has(Color::White, CastleSide::Queenside));
        assert!(rights.has(Color::Black, CastleSide::Kingside));

        rights.remove_color(Color::Black);
        assert_eq!(rights.to_fen(), "Q");
    }

    #[test]
    fn from_flags_matches_insert() {
        let mut rights = CastlingRights::NONE;
        rights.insert(Color::Black, CastleSide::Queenside);
        assert_eq!(rights, CastlingRights::from_flags(false, false, false, true));
        assert_eq!(CastlingRights::NONE.to_fen(), "-");
        assert_eq!(CastlingRights::ALL.to_fen(), "KQkq");
    }
}
