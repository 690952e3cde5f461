//! Bitboard representation and operations.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the
//! chess board. Bit `row * 8 + (7 - col)` holds the square at `(col, row)`,
//! so each rank occupies one byte with the a-file in its highest bit.

use chess_core::Square;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};
use thiserror::Error;

/// Errors raised when converting coordinates into masks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("position ({col}, {row}) is off the board")]
    OutOfRange { col: i32, row: i32 },
}

/// One of the eight ray directions. "Left" is toward the a-file and "up" toward rank 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::UpLeft | Direction::UpRight | Direction::DownLeft | Direction::DownRight
        )
    }
}

/// A 64-bit set of squares.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    pub const FILE_A: Bitboard = Bitboard(0x8080_8080_8080_8080);
    pub const FILE_H: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00FF);
    pub const RANK_8: Bitboard = Bitboard(0xFF00_0000_0000_0000);

    #[inline]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(sq.mask())
    }

    /// Single-square mask for `(col, row)`; fails when either coordinate is outside `0..=7`.
    pub fn from_position(col: i32, row: i32) -> Result<Self, BoardError> {
        if !(0..8).contains(&col) || !(0..8).contains(&row) {
            return Err(BoardError::OutOfRange { col, row });
        }
        Ok(Bitboard(1u64 << (row * 8 + (7 - col))))
    }

    /// `(col, row)` of every set bit, least significant bit first.
    pub fn positions(self) -> Vec<(u8, u8)> {
        self.into_iter().map(|sq| (sq.col(), sq.row())).collect()
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & sq.mask() != 0
    }

    /// True when the two sets share at least one square.
    #[inline]
    pub const fn intersects(self, other: Bitboard) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= sq.mask();
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !sq.mask();
    }

    /// The square of a single-bit mask. `None` if the mask is empty or holds several squares.
    #[inline]
    pub fn to_square(self) -> Option<Square> {
        if self.count() == 1 {
            Square::from_index(self.0.trailing_zeros() as u8)
        } else {
            None
        }
    }

    /// Pops and returns the least significant bit.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Square::from_index(index)
    }

    /// Iterates the set squares as single-bit masks, least significant first.
    #[inline]
    pub fn singles(self) -> impl Iterator<Item = Bitboard> {
        self.into_iter().map(Bitboard::from_square)
    }

    /// Applies `f` to every rank byte on its own so nothing spills into a neighbouring rank.
    #[inline]
    fn map_ranks(self, f: impl Fn(u8) -> u8) -> Bitboard {
        Bitboard(u64::from_le_bytes(self.0.to_le_bytes().map(f)))
    }

    /// Moves every square `n` ranks toward rank 8.
    #[inline]
    pub fn up(self, n: u32) -> Bitboard {
        Bitboard(self.0.checked_shl(8 * n).unwrap_or(0))
    }

    /// Moves every square `n` ranks toward rank 1.
    #[inline]
    pub fn down(self, n: u32) -> Bitboard {
        Bitboard(self.0.checked_shr(8 * n).unwrap_or(0))
    }

    /// Moves every square `n` files toward the a-file.
    #[inline]
    pub fn left(self, n: u32) -> Bitboard {
        self.map_ranks(|rank| rank.checked_shl(n).unwrap_or(0))
    }

    /// Moves every square `n` files toward the h-file.
    #[inline]
    pub fn right(self, n: u32) -> Bitboard {
        self.map_ranks(|rank| rank.checked_shr(n).unwrap_or(0))
    }

    #[inline]
    pub fn up_left(self, n: u32) -> Bitboard {
        self.left(n).up(n)
    }

    #[inline]
    pub fn up_right(self, n: u32) -> Bitboard {
        self.right(n).up(n)
    }

    #[inline]
    pub fn down_left(self, n: u32) -> Bitboard {
        self.left(n).down(n)
    }

    #[inline]
    pub fn down_right(self, n: u32) -> Bitboard {
        self.right(n).down(n)
    }

    /// Moves every square `n` steps along `dir`.
    #[inline]
    pub fn shift(self, dir: Direction, n: u32) -> Bitboard {
        match dir {
            Direction::Up => self.up(n),
            Direction::Down => self.down(n),
            Direction::Left => self.left(n),
            Direction::Right => self.right(n),
            Direction::UpLeft => self.up_left(n),
            Direction::UpRight => self.up_right(n),
            Direction::DownLeft => self.down_left(n),
            Direction::DownRight => self.down_right(n),
        }
    }

    /// The eight knight leaps, each applied to the whole set.
    pub fn knight_leaps(self) -> [Bitboard; 8] {
        [
            self.left(1).up(2),
            self.right(1).up(2),
            self.left(1).down(2),
            self.right(1).down(2),
            self.up(1).left(2),
            self.up(1).right(2),
            self.down(1).left(2),
            self.down(1).right(2),
        ]
    }

    /// Union of all knight leaps.
    pub fn knight_targets(self) -> Bitboard {
        self.knight_leaps()
            .into_iter()
            .fold(Bitboard::EMPTY, |acc, bb| acc | bb)
    }

    /// Union of the eight one-step king moves.
    pub fn king_targets(self) -> Bitboard {
        Direction::ALL
            .into_iter()
            .fold(Bitboard::EMPTY, |acc, dir| acc | self.shift(dir, 1))
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline]
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#018x})", self.0)?;
        for row in (0..8).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..8 {
                let bit = row * 8 + (7 - col);
                if (self.0 >> bit) & 1 == 1 {
                    write!(f, "X ")?;
                } else {
                    write!(f, ". ")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

/// Iterator over set squares in a bitboard.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count() as usize;
        (count, Some(count))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(col: i32, row: i32) -> Bitboard {
        Bitboard::from_position(col, row).unwrap()
    }

    #[test]
    fn corner_bits() {
        assert_eq!(at(0, 0).0, 1 << 7);
        assert_eq!(at(7, 0).0, 1);
        assert_eq!(at(0, 7).0, 1 << 63);
        assert_eq!(at(7, 7).0, 1 << 56);
        assert_eq!(at(0, 0), Bitboard::from_square(Square::A1));
    }

    #[test]
    fn out_of_range_positions_fail() {
        for (col, row) in [(-1, 0), (0, -1), (8, 0), (0, 8), (9, 9)] {
            assert_eq!(
                Bitboard::from_position(col, row),
                Err(BoardError::OutOfRange { col, row })
            );
        }
    }

    #[test]
    fn positions_are_lsb_first() {
        let bb = at(0, 0) | at(7, 0) | at(3, 5);
        assert_eq!(bb.positions(), vec![(7, 0), (0, 0), (3, 5)]);
        assert!(Bitboard::EMPTY.positions().is_empty());
    }

    #[test]
    fn edges_drop_bits() {
        assert_eq!(Bitboard::FILE_A.left(1), Bitboard::EMPTY);
        assert_eq!(Bitboard::FILE_H.right(1), Bitboard::EMPTY);
        assert_eq!(Bitboard::RANK_8.up(1), Bitboard::EMPTY);
        assert_eq!(Bitboard::RANK_1.down(1), Bitboard::EMPTY);
        assert_eq!(at(1, 3).left(2), Bitboard::EMPTY);
        assert_eq!(at(3, 3).up(8), Bitboard::EMPTY);
    }

    #[test]
    fn shifts_move_whole_sets() {
        assert_eq!(Bitboard::FILE_H.left(7), Bitboard::FILE_A);
        assert_eq!(Bitboard::RANK_1.up(7), Bitboard::RANK_8);
        assert_eq!(at(4, 1).up_left(1), at(3, 2));
        assert_eq!(at(4, 1).down_right(1), at(5, 0));
        assert_eq!(at(4, 4).shift(Direction::DownLeft, 3), at(1, 1));
    }

    #[test]
    fn knight_leaps_from_corner_and_centre() {
        assert_eq!(at(0, 0).knight_targets(), at(1, 2) | at(2, 1));
        assert_eq!(at(4, 4).knight_targets().count(), 8);
        assert_eq!(at(7, 7).knight_targets(), at(6, 5) | at(5, 6));
    }

    #[test]
    fn king_targets_count() {
        assert_eq!(at(0, 0).king_targets().count(), 3);
        assert_eq!(at(4, 4).king_targets().count(), 8);
    }

    #[test]
    fn iteration_and_pop() {
        let mut bb = at(7, 0) | at(6, 0);
        assert_eq!(bb.pop_lsb(), Some(Square::H1));
        assert_eq!(bb.pop_lsb(), Square::from_algebraic("g1"));
        assert_eq!(bb.pop_lsb(), None);
        assert_eq!(Bitboard::RANK_1.into_iter().count(), 8);
        assert_eq!(at(2, 2).to_square(), Square::from_algebraic("c3"));
        assert_eq!(Bitboard::RANK_1.to_square(), None);
    }

    proptest! {
        #[test]
        fn position_bijection(col in 0i32..8, row in 0i32..8) {
            let bb = Bitboard::from_position(col, row).unwrap();
            prop_assert_eq!(bb.count(), 1);
            prop_assert_eq!(bb.positions(), vec![(col as u8, row as u8)]);
        }

        #[test]
        fn union_roundtrip(bits in any::<u64>()) {
            let bb = Bitboard(bits);
            let rebuilt = bb
                .positions()
                .into_iter()
                .map(|(c, r)| Bitboard::from_position(c as i32, r as i32).unwrap())
                .fold(Bitboard::EMPTY, |acc, b| acc | b);
            prop_assert_eq!(rebuilt, bb);
        }

        #[test]
        fn horizontal_shifts_never_wrap(bits in any::<u64>(), n in 1u32..8) {
            let bb = Bitboard(bits);
            for (col, row) in bb.left(n).positions() {
                prop_assert!(bb.contains(Square::from_coords(col + n as u8, row).unwrap()));
            }
            for (col, row) in bb.right(n).positions() {
                prop_assert!(col >= n as u8);
                prop_assert!(bb.contains(Square::from_coords(col - n as u8, row).unwrap()));
            }
            prop_assert_eq!(bb.left(n).count() + (bb & left_edge(n)).count(), bb.count());
        }
    }

    /// Squares whose column is below `n`, which fall off a left shift by `n`.
    fn left_edge(n: u32) -> Bitboard {
        (0..n as i32)
            .flat_map(|col| (0..8).map(move |row| at(col, row)))
            .fold(Bitboard::EMPTY, |acc, b| acc | b)
    }
}
