//! Move ordering heuristic.
//!
//! Promotions are tried first, then checks, then captures by the value of
//! the captured piece. Searching likely-best moves early closes the
//! alpha-beta window sooner.

use chess_engine::{LegalMove, MoveList};

const PROMOTION_BONUS: i32 = 100;
const CHECK_BONUS: i32 = 10;

/// Heuristic priority of a move. Higher is searched earlier.
///
/// Any promotion outranks any non-promotion, any check outranks any quiet
/// or capturing non-check, and captures rank by the captured piece's value.
pub fn ordering_score(m: &LegalMove) -> i32 {
    let mut score = 0;
    if m.is_promotion() {
        score += PROMOTION_BONUS;
    }
    if m.is_check() {
        score += CHECK_BONUS;
    }
    if let Some(captured) = m.captured() {
        score += captured.value() as i32;
    }
    score
}

/// Sorts `moves` by [`ordering_score`], highest first. Ties keep their
/// generation order.
pub fn order_moves(moves: &mut MoveList<LegalMove>) {
    moves.sort_by_key_desc(ordering_score);
}
