//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree to a fixed depth,
//! which can be compared against published values.

use crate::Position;

/// Counts the leaf nodes at `depth`, walking the tree with apply and undo.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in moves {
        position
            .apply(m)
            .unwrap_or_else(|e| panic!("generated move {m} was rejected: {e}"));
        nodes += perft(position, depth - 1);
        position.undo();
    }
    nodes
}

/// Perft split by root move, sorted by coordinate notation.
/// Useful for finding which move has an incorrect count.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let moves = position.legal_moves();
    let mut results = Vec::with_capacity(moves.len());

    for m in moves {
        position
            .apply(m)
            .unwrap_or_else(|e| panic!("generated move {m} was rejected: {e}"));
        let nodes = if depth > 1 {
            perft(position, depth - 1)
        } else {
            1
        };
        position.undo();
        results.push((m.to_coordinate(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
