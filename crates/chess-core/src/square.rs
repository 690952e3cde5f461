//! Board coordinates.
//!
//! Columns (files) and rows (ranks) are numbered from 0. A square's bit index
//! mirrors the file inside each rank byte: `index = row * 8 + (7 - col)`, so
//! a1 is bit 7, h1 is bit 0, a8 is bit 63 and h8 is bit 56.

use std::fmt;

/// A column of the board, a through h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Parses 'a'..='h' (either case).
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        if c >= 'a' && c <= 'h' {
            Self::from_index(c as u8 - b'a')
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A row of the board, 1 through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Parses '1'..='8'.
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        if c >= '1' && c <= '8' {
            Self::from_index(c as u8 - b'1')
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// One of the 64 squares, stored as its bit index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square(u8);

impl Square {
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(rank.index() * 8 + (7 - file.index()))
    }

    /// Builds a square from a column and row, or `None` when either is off the board.
    #[inline]
    pub const fn from_coords(col: u8, row: u8) -> Option<Self> {
        if col < 8 && row < 8 {
            Some(Square(row * 8 + (7 - col)))
        } else {
            None
        }
    }

    /// Builds a square from its bit index (0-63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Parses algebraic notation such as "e4".
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = match File::from_char(bytes[0] as char) {
            Some(f) => f,
            None => return None,
        };
        let rank = match Rank::from_char(bytes[1] as char) {
            Some(r) => r,
            None => return None,
        };
        Some(Square::new(file, rank))
    }

    /// Bit index inside a 64-bit mask.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn col(self) -> u8 {
        7 - self.0 % 8
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    pub const fn file(self) -> File {
        File::ALL[self.col() as usize]
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[self.row() as usize]
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    /// Single-bit mask of this square.
    #[inline]
    pub const fn mask(self) -> u64 {
        1u64 << self.0
    }

    pub const A1: Square = Square::new(File::A, Rank::R1);
    pub const B1: Square = Square::new(File::B, Rank::R1);
    pub const C1: Square = Square::new(File::C, Rank::R1);
    pub const D1: Square = Square::new(File::D, Rank::R1);
    pub const E1: Square = Square::new(File::E, Rank::R1);
    pub const F1: Square = Square::new(File::F, Rank::R1);
    pub const G1: Square = Square::new(File::G, Rank::R1);
    pub const H1: Square = Square::new(File::H, Rank::R1);
    pub const A8: Square = Square::new(File::A, Rank::R8);
    pub const B8: Square = Square::new(File::B, Rank::R8);
    pub const C8: Square = Square::new(File::C, Rank::R8);
    pub const D8: Square = Square::new(File::D, Rank::R8);
    pub const E8: Square = Square::new(File::E, Rank::R8);
    pub const F8: Square = Square::new(File::F, Rank::R8);
    pub const G8: Square = Square::new(File::G, Rank::R8);
    pub const H8: Square = Square::new(File::H, Rank::R8);
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
