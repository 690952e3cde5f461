//! How a game ends.

use std::fmt;

use chess_core::Color;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw(DrawReason),
}

impl GameResult {
    /// The result when `color` has been checkmated.
    pub const fn mated(color: Color) -> Self {
        match color {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        }
    }

    /// The winning side, if any.
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw(_) => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "1-0"),
            GameResult::BlackWins => write!(f, "0-1"),
            GameResult::Draw(_) => write!(f, "1/2-1/2"),
        }
    }
}

/// Why a game was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// No legal move while not in check.
    Stalemate,
    /// A hundred half-moves without a capture or pawn move.
    FiftyMoveRule,
    /// The same position for the third time.
    ThreefoldRepetition,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::FiftyMoveRule => "fifty-move rule",
            DrawReason::ThreefoldRepetition => "threefold repetition",
        };
        f.write_str(reason)
    }
}
