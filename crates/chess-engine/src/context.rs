//! Per-ply game state that is not piece placement.

use std::cell::Cell;

use chess_core::{CastlingRights, Color, Square};

use crate::{Bitboard, DrawReason};

/// Memoized facts about one position. A new, empty set is created for every
/// position produced by a move; undo restores the previous set unchanged.
#[derive(Debug, Clone, Default)]
pub(crate) struct Derived {
    pub(crate) in_check: Cell<Option<bool>>,
    pub(crate) mated: Cell<Option<bool>>,
    pub(crate) draw: Cell<Option<Option<DrawReason>>>,
}

/// Returns the cached value or computes and stores it.
pub(crate) fn memo<T: Copy>(cell: &Cell<Option<T>>, compute: impl FnOnce() -> T) -> T {
    if let Some(value) = cell.get() {
        return value;
    }
    let value = compute();
    cell.set(Some(value));
    value
}

/// Side to move, castling rights, en passant target and clocks.
#[derive(Debug, Clone)]
pub struct Context {
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Bitboard,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) derived: Derived,
}

impl Context {
    pub(crate) fn new(
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        Context {
            side_to_move,
            castling,
            en_passant: en_passant.map_or(Bitboard::EMPTY, Bitboard::from_square),
            halfmove_clock,
            fullmove_number,
            derived: Derived::default(),
        }
    }

    /// Copy of the state with nothing memoized, the starting point for the next ply.
    pub(crate) fn successor(&self) -> Context {
        Context {
            derived: Derived::default(),
            ..self.clone()
        }
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Target square mask for an en passant capture; empty when there is none.
    #[inline]
    pub fn en_passant(&self) -> Bitboard {
        self.en_passant
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant.to_square()
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }
}

/// Memoized values are derived data and do not take part in equality.
impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
    }
}

impl Eq for Context {}
