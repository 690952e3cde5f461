//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{CastleSide, CastlingRights, Color, Piece, Square};

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 to 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Piece grid indexed `[row][col]`, row 0 being White's back rank.
pub type Placement = [[Option<(Piece, Color)>; 8]; 8];

/// A decoded FEN record.
///
/// The record only checks syntax. Whether the placement is a playable
/// position (one king per side and so on) is decided by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenRecord {
    pub placement: Placement,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenRecord {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string. The two clock fields may be omitted and default to `0 1`.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&parts.len()) {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3])?;

        let halfmove_clock = match parts.get(4) {
            Some(s) => s
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(s.to_string()))?,
            None => 0,
        };
        let fullmove_number = match parts.get(5) {
            Some(s) => s
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| FenError::InvalidFullmoveNumber(s.to_string()))?,
            None => 1,
        };

        Ok(FenRecord {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<Placement, FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut grid: Placement = [[None; 8]; 8];
        for (i, rank) in ranks.iter().enumerate() {
            let row = 7 - i;
            let mut col = 0usize;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    col += skip as usize;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if col < 8 {
                        grid[row][col] = Some(piece);
                    }
                    col += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        row + 1
                    )));
                }
            }
            if col != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    row + 1,
                    col
                )));
            }
        }
        Ok(grid)
    }

    fn parse_castling(castling: &str) -> Result<CastlingRights, FenError> {
        let mut rights = CastlingRights::NONE;
        if castling == "-" {
            return Ok(rights);
        }
        for c in castling.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::Kingside),
                'Q' => (Color::White, CastleSide::Queenside),
                'k' => (Color::Black, CastleSide::Kingside),
                'q' => (Color::Black, CastleSide::Queenside),
                _ => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}'",
                        c
                    )))
                }
            };
            rights.insert(color, side);
        }
        Ok(rights)
    }

    fn parse_en_passant(ep: &str) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }
        match Square::from_algebraic(ep) {
            Some(sq) if sq.row() == 2 || sq.row() == 5 => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    /// Serializes the placement field.
    pub fn placement_to_fen(placement: &Placement) -> String {
        let mut out = String::new();
        for row in (0..8).rev() {
            let mut empty = 0;
            for cell in &placement[row] {
                match cell {
                    Some((piece, color)) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.to_fen_char(*color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if row > 0 {
                out.push('/');
            }
        }
        out
    }

    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            Self::placement_to_fen(&self.placement),
            match self.side_to_move {
                Color::White => 'w',
                Color::Black => 'b',
            },
            self.castling.to_fen(),
            self.en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl FromStr for FenRecord {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}
