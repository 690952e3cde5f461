//! Piece kinds and their material values.

use crate::Color;

/// The six kinds of chess pieces. An empty square is `Option::<Piece>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// All piece kinds, in table order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Promotion targets, strongest first.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    /// Stands in for "infinite" when a king has to carry a value.
    pub const KING_VALUE: u32 = 9_999_999;

    const VALUES: [u32; 6] = [1, 3, 3, 5, 9, Self::KING_VALUE];
    const LETTERS: [char; 6] = ['p', 'n', 'b', 'r', 'q', 'k'];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Material value in pawns. The king's value is never summed into material.
    #[inline]
    pub const fn value(self) -> u32 {
        Self::VALUES[self as usize]
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = Self::LETTERS[self as usize];
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN letter into a piece and its color.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match Self::from_letter(c) {
            Some(piece) => Some((piece, color)),
            None => None,
        }
    }

    /// Parses a piece letter in either case.
    pub const fn from_letter(c: char) -> Option<Piece> {
        match c.to_ascii_lowercase() {
            'p' => Some(Piece::Pawn),
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }

    /// Letter used in algebraic notation (`None` for pawns).
    pub const fn san_char(self) -> Option<char> {
        match self {
            Piece::Pawn => None,
            _ => Some(Self::LETTERS[self as usize].to_ascii_uppercase()),
        }
    }

    /// Bishops, rooks and queens.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values() {
        let values: Vec<u32> = Piece::ALL.iter().map(|p| p.value()).collect();
        assert_eq!(values, vec![1, 3, 3, 5, 9, Piece::KING_VALUE]);
    }

    #[test]
    fn fen_letters() {
        assert_eq!(Piece::Pawn.to_fen_char(Color::White), 'P');
        assert_eq!(Piece::Knight.to_fen_char(Color::Black), 'n');
        assert_eq!(Piece::from_fen_char('Q'), Some((Piece::Queen, Color::White)));
        assert_eq!(Piece::from_fen_char('k'), Some((Piece::King, Color::Black)));
        assert_eq!(Piece::from_fen_char('x'), None);
    }

    #[test]
    fn san_letters() {
        assert_eq!(Piece::Pawn.san_char(), None);
        assert_eq!(Piece::Knight.san_char(), Some('N'));
        assert_eq!(Piece::King.san_char(), Some('K'));
    }

    #[test]
    fn promotions_exclude_pawn_and_king() {
        assert!(!Piece::PROMOTIONS.contains(&Piece::Pawn));
        assert!(!Piece::PROMOTIONS.contains(&Piece::King));
        assert_eq!(Piece::PROMOTIONS[0], Piece::Queen);
    }
}
