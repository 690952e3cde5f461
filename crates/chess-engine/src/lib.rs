//! Bitboard chess engine core.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets with edge-safe directional shifts
//! - [`PartialBoard`] and [`Board`] - piece placement per side
//! - [`CandidateMove`] and [`LegalMove`] - unchecked and validated moves
//! - [`Position`] - the game state machine with apply, undo, check, mate,
//!   and draw detection
//! - Per-piece move generation, perft, and SAN notation
//!
//! # Architecture
//!
//! Each side holds six bitboards, one per piece kind. Squares map to bits as
//! `row * 8 + (7 - col)`. Moves are generated per piece kind, filtered for
//! legality on a scratch copy of the board, and applied in place with an
//! undo stack so search can walk the tree without cloning positions.
//!
//! # Example
//!
//! ```
//! use chess_engine::{san_to_move, Position};
//!
//! let mut position = Position::startpos();
//! assert_eq!(position.legal_moves().len(), 20);
//!
//! let e4 = san_to_move(&position, "e4").unwrap();
//! position.apply(e4).unwrap();
//! assert_eq!(
//!     position.to_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! position.undo();
//! ```

mod bitboard;
mod board;
mod context;
mod history;
mod mov;
pub mod movegen;
mod outcome;
mod partial_board;
mod position;
pub mod san;
mod zobrist;

pub use bitboard::{Bitboard, BoardError, Direction};
pub use board::Board;
pub use context::Context;
pub use history::RepetitionTable;
pub use mov::{CandidateMove, LegalMove, MoveKind};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{is_king_attacked, is_square_attacked, MoveList};
pub use outcome::{DrawReason, GameResult};
pub use partial_board::PartialBoard;
pub use position::{MoveError, Position, PositionError};
pub use san::{line_to_san, move_to_san, san_to_move, SanError};
pub use zobrist::{board_hash, position_key};

pub use chess_core::{CastleSide, CastlingRights, Color, FenError, FenRecord, File, Piece, Rank, Square};
