//! Core types for chess.
//!
//! This crate provides the value types shared by the engine and the search:
//! - [`Piece`] and [`Color`]
//! - [`Square`], [`File`], and [`Rank`] using the mirrored-file bit layout
//! - [`CastlingRights`] and [`CastleSide`]
//! - FEN parsing and serialization via [`FenRecord`]

mod castling;
mod color;
mod fen;
mod piece;
mod square;

pub use castling::{CastleSide, CastlingRights};
pub use color::Color;
pub use fen::{FenError, FenRecord, Placement};
pub use piece::Piece;
pub use square::{File, Rank, Square};
