//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"

use crate::{LegalMove, Position};
use chess_core::{CastleSide, File, Piece, Rank, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanError {
    #[error("empty SAN string")]
    Empty,
    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),
    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Converts a move to SAN. `position` is the state before the move.
pub fn move_to_san(position: &Position, m: LegalMove) -> String {
    let mut san = match m.castle_side() {
        Some(CastleSide::Kingside) => "O-O".to_string(),
        Some(CastleSide::Queenside) => "O-O-O".to_string(),
        None => describe(position, m),
    };

    if m.is_check() {
        let mut next = position.clone();
        let mate = next.apply(m).is_ok() && next.is_checkmate();
        san.push(if mate { '#' } else { '+' });
    }
    san
}

fn describe(position: &Position, m: LegalMove) -> String {
    let mut san = String::new();
    let piece = m.piece();

    if let Some(letter) = piece.san_char() {
        san.push(letter);
        san.push_str(&disambiguation(position, m));
    }

    if m.is_capture() {
        if piece == Piece::Pawn {
            san.push(m.from().file().to_char());
        }
        san.push('x');
    }

    san.push_str(&m.to().to_algebraic());

    if let Some(promoted) = m.promotion().and_then(Piece::san_char) {
        san.push('=');
        san.push(promoted);
    }
    san
}

/// File, rank, or both of the origin, whichever first tells `m` apart from
/// other moves of the same piece kind to the same square.
fn disambiguation(position: &Position, m: LegalMove) -> String {
    let from = m.from();
    let rivals: Vec<Square> = position
        .legal_moves()
        .iter()
        .filter(|o| o.to() == m.to() && o.piece() == m.piece() && o.from() != from)
        .map(|o| o.from())
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != from.file()) {
        from.file().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        from.rank().to_string()
    } else {
        from.to_algebraic()
    }
}

/// Renders a line of moves starting from `position`.
///
/// Stops early if a move does not apply, which only happens when the line
/// was produced for a different position.
pub fn line_to_san(position: &Position, line: &[LegalMove]) -> Vec<String> {
    let mut scratch = position.clone();
    let mut out = Vec::with_capacity(line.len());
    for &m in line {
        let san = move_to_san(&scratch, m);
        if scratch.apply(m).is_err() {
            break;
        }
        out.push(san);
    }
    out
}

/// Parses a SAN string and returns the matching legal move.
pub fn san_to_move(position: &Position, san: &str) -> Result<LegalMove, SanError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(SanError::Empty);
    }

    let san = san.trim_end_matches(&['#', '+', '!', '?'][..]);

    match san {
        "O-O" | "0-0" => return find_castling_move(position, CastleSide::Kingside),
        "O-O-O" | "0-0-0" => return find_castling_move(position, CastleSide::Queenside),
        _ => {}
    }

    let parsed = parse_san_components(san)?;
    find_matching_move(position, &parsed, san)
}

#[derive(Debug)]
struct ParsedSan {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to_square: Square,
    promotion: Option<Piece>,
}

fn parse_san_components(san: &str) -> Result<ParsedSan, SanError> {
    let mut rest = san;

    let piece = match rest.chars().next() {
        Some(c) if c.is_ascii_uppercase() => {
            let piece = Piece::from_letter(c)
                .filter(|&p| p != Piece::Pawn)
                .ok_or_else(|| SanError::InvalidFormat(format!("invalid piece character: {}", c)))?;
            rest = &rest[1..];
            piece
        }
        Some(_) => Piece::Pawn,
        None => return Err(SanError::Empty),
    };

    let (body, promotion) = match rest.split_once('=') {
        Some((body, promo)) => {
            let mut chars = promo.chars();
            let promoted = match (chars.next(), chars.next()) {
                (Some(c), None) => Piece::from_letter(c)
                    .filter(|p| Piece::PROMOTIONS.contains(p))
                    .ok_or_else(|| SanError::InvalidFormat(format!("invalid promotion piece: {}", promo)))?,
                _ => return Err(SanError::InvalidFormat(format!("invalid promotion: {}", san))),
            };
            (body, Some(promoted))
        }
        None => (rest, None),
    };

    let chars: Vec<char> = body.chars().filter(|&c| c != 'x').collect();
    if chars.len() < 2 {
        return Err(SanError::InvalidFormat(format!("too short: {}", san)));
    }
    let (disambig, dest) = chars.split_at(chars.len() - 2);

    let to_file = File::from_char(dest[0])
        .filter(|_| dest[0].is_ascii_lowercase())
        .ok_or_else(|| SanError::InvalidFormat(format!("invalid file: {}", san)))?;
    let to_rank = Rank::from_char(dest[1])
        .ok_or_else(|| SanError::InvalidFormat(format!("invalid rank: {}", san)))?;

    let (from_file, from_rank) = parse_disambiguation(disambig, san)?;

    Ok(ParsedSan {
        piece,
        from_file,
        from_rank,
        to_square: Square::new(to_file, to_rank),
        promotion,
    })
}

fn parse_disambiguation(chars: &[char], san: &str) -> Result<(Option<File>, Option<Rank>), SanError> {
    let invalid = || SanError::InvalidFormat(format!("invalid disambiguation: {}", san));
    match *chars {
        [] => Ok((None, None)),
        [c] => match (File::from_char(c), Rank::from_char(c)) {
            (Some(file), _) => Ok((Some(file), None)),
            (None, Some(rank)) => Ok((None, Some(rank))),
            _ => Err(invalid()),
        },
        [f, r] => {
            let file = File::from_char(f).ok_or_else(invalid)?;
            let rank = Rank::from_char(r).ok_or_else(invalid)?;
            Ok((Some(file), Some(rank)))
        }
        _ => Err(invalid()),
    }
}

fn find_castling_move(position: &Position, side: CastleSide) -> Result<LegalMove, SanError> {
    position
        .legal_moves()
        .into_iter()
        .find(|m| m.castle_side() == Some(side))
        .ok_or_else(|| {
            let name = match side {
                CastleSide::Kingside => "O-O",
                CastleSide::Queenside => "O-O-O",
            };
            SanError::NoMatchingMove(name.to_string())
        })
}

fn find_matching_move(position: &Position, parsed: &ParsedSan, san: &str) -> Result<LegalMove, SanError> {
    let matching: Vec<LegalMove> = position
        .legal_moves()
        .into_iter()
        .filter(|m| {
            m.to() == parsed.to_square
                && m.piece() == parsed.piece
                && !m.is_castling()
                && parsed.from_file.map_or(true, |f| m.from().file() == f)
                && parsed.from_rank.map_or(true, |r| m.from().rank() == r)
                && m.promotion() == parsed.promotion
        })
        .collect();

    match matching.as_slice() {
        [] => Err(SanError::NoMatchingMove(san.to_string())),
        [m] => Ok(*m),
        _ => Err(SanError::AmbiguousMove(san.to_string())),
    }
}
