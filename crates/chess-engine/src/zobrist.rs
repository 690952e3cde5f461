//! Zobrist hashing for position identification.
//!
//! A key is the XOR of random numbers for:
//! - each piece on each square (12 pieces x 64 squares)
//! - Black to move
//! - each castling right held
//! - the file of the en passant target

use chess_core::{Color, Piece, Square};

use crate::{Board, Context};

const PIECE_KEYS: usize = 6 * 2 * 64;
const SIDE_KEY: usize = PIECE_KEYS;
const CASTLING_KEYS: usize = SIDE_KEY + 1;
const EN_PASSANT_KEYS: usize = CASTLING_KEYS + 4;
const KEY_COUNT: usize = EN_PASSANT_KEYS + 8;

/// One flat table of random keys: pieces by `(piece, color, square)`, then
/// Black to move, the four castling rights and the eight en passant files.
struct ZobristKeys {
    keys: [u64; KEY_COUNT],
}

impl ZobristKeys {
    /// Fills the table with splitmix64 output from a fixed seed.
    const fn generate(seed: u64) -> Self {
        let mut keys = [0u64; KEY_COUNT];
        let mut state = seed;
        let mut i = 0;
        while i < KEY_COUNT {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            keys[i] = z ^ (z >> 31);
            i += 1;
        }
        ZobristKeys { keys }
    }

    #[inline]
    fn piece(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.keys[(piece.index() * 2 + color.index()) * 64 + square.index() as usize]
    }

    #[inline]
    fn black_to_move(&self) -> u64 {
        self.keys[SIDE_KEY]
    }

    /// Key of castling flag `bit` of [`chess_core::CastlingRights::raw`].
    #[inline]
    fn castling(&self, bit: usize) -> u64 {
        self.keys[CASTLING_KEYS + bit]
    }

    #[inline]
    fn en_passant(&self, col: u8) -> u64 {
        self.keys[EN_PASSANT_KEYS + col as usize]
    }
}

static ZOBRIST: ZobristKeys = ZobristKeys::generate(0x5EED_C0DE_2B1D_0001);

/// Hash of piece placement alone.
pub fn board_hash(board: &Board) -> u64 {
    let mut hash = 0;
    for color in Color::ALL {
        for piece in Piece::ALL {
            for sq in board.pieces(piece, color) {
                hash ^= ZOBRIST.piece(piece, color, sq);
            }
        }
    }
    hash
}

/// Placement plus side to move, castling rights and en passant file.
///
/// Two positions with equal keys are the same position for repetition
/// purposes.
pub fn position_key(board: &Board, context: &Context) -> u64 {
    let mut hash = board_hash(board);
    if context.side_to_move() == Color::Black {
        hash ^= ZOBRIST.black_to_move();
    }
    let rights = context.castling().raw();
    for bit in 0..4 {
        if rights & (1 << bit) != 0 {
            hash ^= ZOBRIST.castling(bit);
        }
    }
    if let Some(ep) = context.en_passant_square() {
        hash ^= ZOBRIST.en_passant(ep.col());
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn keys_are_nonzero_and_distinct() {
        let mut keys = ZOBRIST.keys.to_vec();
        assert!(keys.iter().all(|&k| k != 0));
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), KEY_COUNT);

        let a1 = ZOBRIST.piece(Piece::Pawn, Color::White, Square::A1);
        assert_ne!(a1, ZOBRIST.piece(Piece::Pawn, Color::Black, Square::A1));
        assert_ne!(ZOBRIST.castling(3), ZOBRIST.en_passant(0));
    }

    #[test]
    fn side_to_move_changes_key_not_board_hash() {
        let white = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let black = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(white.board_hash(), black.board_hash());
        assert_ne!(white.key(), black.key());
    }

    #[test]
    fn castling_and_en_passant_change_key() {
        let plain = Position::from_fen("r3k3/8/8/3pP3/8/8/8/4K3 w - - 0 1").unwrap();
        let rights = Position::from_fen("r3k3/8/8/3pP3/8/8/8/4K3 w q - 0 1").unwrap();
        let ep = Position::from_fen("r3k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_ne!(plain.key(), rights.key());
        assert_ne!(plain.key(), ep.key());
        assert_eq!(plain.board_hash(), ep.board_hash());
    }
}
