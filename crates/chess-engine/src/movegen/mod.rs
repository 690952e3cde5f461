//! Pseudo-legal move generation.
//!
//! Every piece kind has its own generator with the [`MoveGenerator`]
//! signature; [`GENERATORS`] dispatches on [`Piece::index`]. Generators only
//! look at geometry and occupancy. Whether a move leaves the king in check
//! is decided by the legality filter in [`crate::Position::legal_moves`].

mod attacks;
pub mod perft;

use chess_core::{CastleSide, CastlingRights, Color, Piece, Square};

use crate::{Bitboard, Board, CandidateMove, Direction, MoveKind};

pub use attacks::{is_king_attacked, is_square_attacked};

/// A growable list of moves.
#[derive(Clone, PartialEq, Eq)]
pub struct MoveList<M> {
    moves: Vec<M>,
}

impl<M: Copy> MoveList<M> {
    /// Room for the largest move count of any reachable position.
    pub const TYPICAL_CAPACITY: usize = 256;

    #[inline]
    pub fn new() -> Self {
        MoveList {
            moves: Vec::with_capacity(Self::TYPICAL_CAPACITY),
        }
    }

    #[inline]
    pub fn push(&mut self, m: M) {
        self.moves.push(m);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[M] {
        &self.moves
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.moves.iter()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&M) -> bool,
    {
        self.moves.retain(f);
    }

    /// Stable sort, highest key first.
    pub fn sort_by_key_desc<K: Ord, F: FnMut(&M) -> K>(&mut self, mut key: F) {
        self.moves.sort_by_key(|m| std::cmp::Reverse(key(m)));
    }

    pub fn into_vec(self) -> Vec<M> {
        self.moves
    }
}

impl<M: Copy> Default for MoveList<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> std::ops::Index<usize> for MoveList<M> {
    type Output = M;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.moves[index]
    }
}

impl<'a, M> IntoIterator for &'a MoveList<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl<M> IntoIterator for MoveList<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<M: Copy> FromIterator<M> for MoveList<M> {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        MoveList {
            moves: iter.into_iter().collect(),
        }
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for MoveList<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.moves.iter()).finish()
    }
}

/// Signature shared by the per-piece generators. The bitboard argument is
/// the en passant target (empty when there is none).
pub type MoveGenerator = fn(&Board, Color, Bitboard, &mut MoveList<CandidateMove>);

/// Generators indexed by [`Piece::index`].
pub const GENERATORS: [MoveGenerator; 6] = [
    pawn_moves,
    knight_moves,
    bishop_moves,
    rook_moves,
    queen_moves,
    king_moves,
];

/// Every pseudo-legal move for `us`, castling included.
pub fn pseudo_legal_moves(
    board: &Board,
    us: Color,
    en_passant: Bitboard,
    castling: CastlingRights,
) -> MoveList<CandidateMove> {
    let mut moves = MoveList::new();
    for piece in Piece::ALL {
        GENERATORS[piece.index()](board, us, en_passant, &mut moves);
    }
    castling_moves(board, us, castling, &mut moves);
    moves
}

fn push_move(
    moves: &mut MoveList<CandidateMove>,
    from: Square,
    to: Bitboard,
    piece: Piece,
    kind: MoveKind,
    capture: bool,
) {
    if let Some(to) = to.to_square() {
        moves.push(CandidateMove::with(from, to, piece, kind, capture));
    }
}

/// Pushes a pawn move, expanding it into the four promotions on the last row.
fn push_pawn_move(
    moves: &mut MoveList<CandidateMove>,
    us: Color,
    from: Square,
    to: Bitboard,
    capture: bool,
) {
    let Some(target) = to.to_square() else {
        return;
    };
    if target.row() == us.promotion_row() {
        for promoted in Piece::PROMOTIONS {
            moves.push(CandidateMove::with(
                from,
                target,
                Piece::Pawn,
                MoveKind::Promotion(promoted),
                capture,
            ));
        }
    } else {
        moves.push(CandidateMove::with(from, target, Piece::Pawn, MoveKind::Quiet, capture));
    }
}

/// Pawn pushes, double pushes, captures, en passant and promotions.
pub fn pawn_moves(board: &Board, us: Color, en_passant: Bitboard, moves: &mut MoveList<CandidateMove>) {
    let occupied = board.occupied();
    let theirs = board.side(us.opposite()).all_mask();
    let (forward, captures) = match us {
        Color::White => (Direction::Up, [Direction::UpLeft, Direction::UpRight]),
        Color::Black => (Direction::Down, [Direction::DownLeft, Direction::DownRight]),
    };

    for from in board.pieces(Piece::Pawn, us) {
        assert!(
            from.row() != us.promotion_row(),
            "{} pawn on {} has already reached its last row",
            us,
            from
        );
        let origin = Bitboard::from_square(from);

        let one = origin.shift(forward, 1);
        if one.is_not_empty() && !one.intersects(occupied) {
            push_pawn_move(moves, us, from, one, false);

            let two = origin.shift(forward, 2);
            if from.row() == us.pawn_start_row() && !two.intersects(occupied) {
                push_move(moves, from, two, Piece::Pawn, MoveKind::DoublePush, false);
            }
        }

        for dir in captures {
            let target = origin.shift(dir, 1);
            if target.intersects(theirs) {
                push_pawn_move(moves, us, from, target, true);
            } else if target.is_not_empty() && target == en_passant {
                push_move(moves, from, target, Piece::Pawn, MoveKind::EnPassant, true);
            }
        }
    }
}

/// Pushes a single-step move unless the target is off the board or ours.
fn push_step(
    board: &Board,
    us: Color,
    moves: &mut MoveList<CandidateMove>,
    from: Square,
    target: Bitboard,
    piece: Piece,
) {
    if target.is_empty() || target.intersects(board.side(us).all_mask()) {
        return;
    }
    let capture = target.intersects(board.side(us.opposite()).all_mask());
    push_move(moves, from, target, piece, MoveKind::Quiet, capture);
}

pub fn knight_moves(board: &Board, us: Color, _: Bitboard, moves: &mut MoveList<CandidateMove>) {
    for from in board.pieces(Piece::Knight, us) {
        for target in Bitboard::from_square(from).knight_leaps() {
            push_step(board, us, moves, from, target, Piece::Knight);
        }
    }
}

/// King single steps. Castling is produced by [`castling_moves`].
pub fn king_moves(board: &Board, us: Color, _: Bitboard, moves: &mut MoveList<CandidateMove>) {
    for from in board.pieces(Piece::King, us) {
        let origin = Bitboard::from_square(from);
        for dir in Direction::ALL {
            push_step(board, us, moves, from, origin.shift(dir, 1), Piece::King);
        }
    }
}

/// Walks each direction up to seven steps, stopping at the first occupied square.
fn slide(
    board: &Board,
    us: Color,
    piece: Piece,
    directions: &[Direction],
    moves: &mut MoveList<CandidateMove>,
) {
    let ours = board.side(us).all_mask();
    let theirs = board.side(us.opposite()).all_mask();

    for from in board.pieces(piece, us) {
        let origin = Bitboard::from_square(from);
        for &dir in directions {
            for n in 1..=7 {
                let target = origin.shift(dir, n);
                if target.is_empty() || target.intersects(ours) {
                    break;
                }
                let capture = target.intersects(theirs);
                push_move(moves, from, target, piece, MoveKind::Quiet, capture);
                if capture {
                    break;
                }
            }
        }
    }
}

pub fn bishop_moves(board: &Board, us: Color, _: Bitboard, moves: &mut MoveList<CandidateMove>) {
    slide(board, us, Piece::Bishop, &Direction::DIAGONAL, moves);
}

pub fn rook_moves(board: &Board, us: Color, _: Bitboard, moves: &mut MoveList<CandidateMove>) {
    slide(board, us, Piece::Rook, &Direction::ORTHOGONAL, moves);
}

pub fn queen_moves(board: &Board, us: Color, _: Bitboard, moves: &mut MoveList<CandidateMove>) {
    slide(board, us, Piece::Queen, &Direction::ALL, moves);
}

/// Castling candidates: the right is still held, king and rook stand on
/// their home squares and every square between them is empty. Whether the
/// king is in check or crosses an attacked square is left to the filter.
pub fn castling_moves(
    board: &Board,
    us: Color,
    rights: CastlingRights,
    moves: &mut MoveList<CandidateMove>,
) {
    let row = us.home_row();
    let Some(king_home) = Square::from_coords(4, row) else {
        return;
    };
    if !board.pieces(Piece::King, us).contains(king_home) {
        return;
    }
    let occupied = board.occupied();

    for side in CastleSide::ALL {
        if !rights.has(us, side) {
            continue;
        }
        let rook_col = side.rook_origin_col();
        let rook_home = Square::from_coords(rook_col, row);
        if !rook_home.is_some_and(|sq| board.pieces(Piece::Rook, us).contains(sq)) {
            continue;
        }
        let (lo, hi) = (rook_col.min(4) + 1, rook_col.max(4));
        let blocked = (lo..hi)
            .filter_map(|col| Square::from_coords(col, row))
            .any(|sq| occupied.contains(sq));
        if blocked {
            continue;
        }
        if let Some(target) = Square::from_coords(side.king_target_col(), row) {
            moves.push(CandidateMove::with(
                king_home,
                target,
                Piece::King,
                MoveKind::Castle(side),
                false,
            ));
        }
    }
}
