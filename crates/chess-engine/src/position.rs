//! Chess position: placement, context, history and repetition bookkeeping.

use chess_core::{CastleSide, Color, FenError, FenRecord, Piece, Square};
use thiserror::Error;
use tracing::debug;

use crate::context::memo;
use crate::history::{RepetitionTable, UndoRecord};
use crate::movegen::{self, is_king_attacked, is_square_attacked, MoveList};
use crate::zobrist;
use crate::{Bitboard, Board, CandidateMove, Context, DrawReason, GameResult, LegalMove, MoveKind, PartialBoard};

/// Reasons a piece placement cannot be played from.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{color} must have exactly one king, found {count}")]
    KingCount { color: Color, count: u32 },

    #[error("{color} pawn on its back rank at {square}")]
    PawnOnBackRank { color: Color, square: Square },

    #[error("{0} is in check but it is not their move")]
    OpponentInCheck(Color),
}

/// Reasons a move cannot be applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("no {color} piece on {square}")]
    NoPieceAtOrigin { color: Color, square: Square },

    #[error("{0} is not a move of the piece on its origin square")]
    NotPseudoLegal(String),

    #[error("{0} would leave the king in check")]
    LeavesKingInCheck(String),

    #[error("{0} castles out of or through check")]
    CastlingThroughCheck(String),

    #[error("{0} was validated in a different position")]
    StaleMove(String),
}

/// A game in progress.
///
/// Mutated in place by [`Position::apply`] and restored exactly by
/// [`Position::undo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    context: Context,
    key: u64,
    history: Vec<UndoRecord>,
    repetitions: RepetitionTable,
}

impl Position {
    /// The standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenRecord::STARTPOS).expect("STARTPOS is valid")
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Self::from_record(&FenRecord::parse(fen)?)
    }

    /// Builds a position from decoded FEN fields, rejecting unplayable placements.
    pub fn from_record(record: &FenRecord) -> Result<Self, PositionError> {
        let mut sides = [PartialBoard::EMPTY; 2];
        for (row, cells) in record.placement.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Some((piece, color)) = *cell {
                    let sq = Bitboard::from_position(col as i32, row as i32)
                        .unwrap_or_else(|e| panic!("placement grid is 8x8: {e}"));
                    sides[color.index()].put(piece, sq);
                }
            }
        }
        let board = Board::new(sides[0], sides[1]);
        let context = Context::new(
            record.side_to_move,
            record.castling,
            record.en_passant,
            record.halfmove_clock,
            record.fullmove_number,
        );

        Self::validate(&board, &context)?;

        let key = zobrist::position_key(&board, &context);
        let mut repetitions = RepetitionTable::new();
        repetitions.increment(key);

        Ok(Position {
            board,
            context,
            key,
            history: Vec::new(),
            repetitions,
        })
    }

    fn validate(board: &Board, context: &Context) -> Result<(), PositionError> {
        for color in Color::ALL {
            let count = board.pieces(Piece::King, color).count();
            if count != 1 {
                return Err(PositionError::KingCount { color, count });
            }
            let back_ranks = Bitboard::RANK_1 | Bitboard::RANK_8;
            if let Some(square) = (board.pieces(Piece::Pawn, color) & back_ranks).into_iter().next() {
                return Err(PositionError::PawnOnBackRank { color, square });
            }
        }
        let waiting = context.side_to_move().opposite();
        if is_king_attacked(board, waiting) {
            return Err(PositionError::OpponentInCheck(waiting));
        }
        Ok(())
    }

    /// The decoded FEN fields of the current position.
    pub fn to_record(&self) -> FenRecord {
        FenRecord {
            placement: self.grid(),
            side_to_move: self.context.side_to_move(),
            castling: self.context.castling(),
            en_passant: self.context.en_passant_square(),
            halfmove_clock: self.context.halfmove_clock(),
            fullmove_number: self.context.fullmove_number(),
        }
    }

    pub fn to_fen(&self) -> String {
        self.to_record().to_fen()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn context(&self) -> &Context {
        &self.context
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.context.side_to_move()
    }

    /// Piece and owner on `sq`.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.board.piece_at(Bitboard::from_square(sq))
    }

    /// Visual 8x8 grid indexed `[row][col]`, row 0 being White's back rank.
    pub fn grid(&self) -> [[Option<(Piece, Color)>; 8]; 8] {
        self.board.grid()
    }

    /// Hash of the piece placement alone.
    pub fn board_hash(&self) -> u64 {
        zobrist::board_hash(&self.board)
    }

    /// Position key used for repetition detection and search caching.
    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// How many times the current position has occurred in this game line.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.count(self.key)
    }

    pub fn repetitions(&self) -> &RepetitionTable {
        &self.repetitions
    }

    /// Number of moves applied since construction.
    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Moves applied since construction, oldest first.
    pub fn moves_played(&self) -> impl Iterator<Item = LegalMove> + '_ {
        self.history.iter().map(|record| record.mv)
    }

    /// Material of `color` in pawns.
    pub fn material(&self, color: Color) -> u32 {
        self.board.side(color).material_value()
    }

    /// White material minus Black material, in pawns.
    pub fn material_balance(&self) -> i32 {
        self.material(Color::White) as i32 - self.material(Color::Black) as i32
    }

    /// Moves for the side to move that obey piece geometry, king safety aside.
    pub fn pseudo_legal_moves(&self) -> MoveList<CandidateMove> {
        movegen::pseudo_legal_moves(
            &self.board,
            self.side_to_move(),
            self.context.en_passant(),
            self.context.castling(),
        )
    }

    /// Piece moves `color` would have if it were its turn, king safety
    /// aside. Castling and en passant are never included, so both sides are
    /// counted the same way whoever is to move.
    pub fn pseudo_legal_moves_for(&self, color: Color) -> MoveList<CandidateMove> {
        movegen::pseudo_legal_moves(
            &self.board,
            color,
            Bitboard::EMPTY,
            chess_core::CastlingRights::NONE,
        )
    }

    /// Plays `mv` on a scratch board and keeps it only if the mover's king is safe.
    fn legalize(&self, mv: &CandidateMove) -> Result<LegalMove, MoveError> {
        let us = self.side_to_move();
        let them = us.opposite();

        if let MoveKind::Castle(side) = mv.kind() {
            if self.is_in_check() || self.castling_path_attacked(us, side) {
                return Err(MoveError::CastlingThroughCheck(mv.to_coordinate()));
            }
        }

        let mut scratch = self.board;
        let captured = scratch.play(us, mv);
        if is_king_attacked(&scratch, us) {
            return Err(MoveError::LeavesKingInCheck(mv.to_coordinate()));
        }
        let check = is_king_attacked(&scratch, them);
        Ok(LegalMove::new(*mv, captured, check, self.key))
    }

    /// Whether the square the king crosses while castling is attacked.
    fn castling_path_attacked(&self, us: Color, side: CastleSide) -> bool {
        let crossed = Bitboard::from_position(side.rook_target_col() as i32, us.home_row() as i32)
            .unwrap_or_default();
        is_square_attacked(&self.board, crossed, us.opposite())
    }

    /// All legal moves for the side to move. The position is not modified.
    pub fn legal_moves(&self) -> MoveList<LegalMove> {
        self.pseudo_legal_moves()
            .iter()
            .filter_map(|mv| self.legalize(mv).ok())
            .collect()
    }

    /// Whether the side to move has any legal move.
    pub fn has_legal_move(&self) -> bool {
        self.pseudo_legal_moves()
            .iter()
            .any(|mv| self.legalize(mv).is_ok())
    }

    pub fn is_in_check(&self) -> bool {
        memo(&self.context.derived.in_check, || {
            is_king_attacked(&self.board, self.side_to_move())
        })
    }

    pub fn is_checkmate(&self) -> bool {
        memo(&self.context.derived.mated, || {
            self.is_in_check() && !self.has_legal_move()
        })
    }

    pub fn is_stalemate(&self) -> bool {
        self.draw_reason() == Some(DrawReason::Stalemate)
    }

    /// Why the position is drawn, if it is. A checkmate is never a draw.
    pub fn draw_reason(&self) -> Option<DrawReason> {
        memo(&self.context.derived.draw, || {
            if self.is_checkmate() {
                None
            } else if self.context.halfmove_clock() >= 100 {
                Some(DrawReason::FiftyMoveRule)
            } else if self.repetition_count() >= 3 {
                Some(DrawReason::ThreefoldRepetition)
            } else if !self.is_in_check() && !self.has_legal_move() {
                Some(DrawReason::Stalemate)
            } else {
                None
            }
        })
    }

    pub fn is_draw(&self) -> bool {
        self.draw_reason().is_some()
    }

    /// `None` while the game is still going.
    pub fn result(&self) -> Option<GameResult> {
        if self.is_checkmate() {
            Some(GameResult::mated(self.side_to_move()))
        } else {
            self.draw_reason().map(GameResult::Draw)
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.result().is_some()
    }

    /// Plays a validated move.
    ///
    /// The move must have been validated in a position with the same key,
    /// the origin must still hold the moving piece and the mover's king must
    /// be safe afterwards; otherwise the position is left untouched.
    pub fn apply(&mut self, mv: LegalMove) -> Result<(), MoveError> {
        let us = self.side_to_move();
        let them = us.opposite();

        if !self.board.pieces(mv.piece(), us).contains(mv.from()) {
            debug!(mv = %mv, side = %us, "rejected move: origin does not hold the piece");
            return Err(MoveError::NoPieceAtOrigin {
                color: us,
                square: mv.from(),
            });
        }
        if mv.position_key() != self.key {
            debug!(mv = %mv, side = %us, "rejected move: validated in another position");
            return Err(MoveError::StaleMove(mv.to_coordinate()));
        }

        let captured = self.board.play(us, &mv);
        debug_assert!(
            self.board.side(us).is_disjoint(),
            "{mv} stacked two {us} pieces on {}",
            mv.to()
        );
        if is_king_attacked(&self.board, us) {
            self.board.unplay(us, &mv, captured);
            debug!(mv = %mv, side = %us, "rejected move: king left in check");
            return Err(MoveError::LeavesKingInCheck(mv.to_coordinate()));
        }

        let mut next = self.context.successor();

        if mv.piece() == Piece::King {
            next.castling.remove_color(us);
        }
        for side in CastleSide::ALL {
            let corner = |color: Color| Square::from_coords(side.rook_origin_col(), color.home_row());
            if mv.piece() == Piece::Rook && corner(us) == Some(mv.from()) {
                next.castling.remove(us, side);
            }
            if captured.is_some() && corner(them) == Some(mv.to()) {
                next.castling.remove(them, side);
            }
        }

        next.en_passant = if mv.is_double_push() {
            Board::en_passant_victim(us, mv.to_mask())
        } else {
            Bitboard::EMPTY
        };

        if captured.is_some() || mv.piece() == Piece::Pawn {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock += 1;
        }
        if us == Color::Black {
            next.fullmove_number += 1;
        }
        next.side_to_move = them;

        let previous = std::mem::replace(&mut self.context, next);
        let previous_key = self.key;
        self.key = zobrist::position_key(&self.board, &self.context);
        self.repetitions.increment(self.key);
        self.history.push(UndoRecord {
            mv,
            captured,
            context: previous,
            key: previous_key,
        });
        Ok(())
    }

    /// Validates an unchecked move against the position and plays it.
    ///
    /// The move is matched by origin, destination and promotion piece, so
    /// callers only need to fill in those. Nothing changes on error.
    pub fn try_apply(&mut self, candidate: CandidateMove) -> Result<LegalMove, MoveError> {
        let us = self.side_to_move();
        if !self.board.side(us).all_mask().contains(candidate.from()) {
            debug!(mv = %candidate, side = %us, "rejected move: empty origin");
            return Err(MoveError::NoPieceAtOrigin {
                color: us,
                square: candidate.from(),
            });
        }

        let generated = self
            .pseudo_legal_moves()
            .into_iter()
            .find(|mv| mv.same_squares(&candidate))
            .ok_or_else(|| MoveError::NotPseudoLegal(candidate.to_coordinate()))?;

        let legal = self.legalize(&generated).inspect_err(|e| {
            debug!(mv = %candidate, error = %e, "rejected move");
        })?;
        self.apply(legal)?;
        Ok(legal)
    }

    /// Takes back the last move and returns it, or `None` at the root.
    pub fn undo(&mut self) -> Option<LegalMove> {
        let record = self.history.pop()?;
        self.repetitions.decrement(self.key);
        let mover = record.context.side_to_move();
        self.board.unplay(mover, &record.mv, record.captured);
        self.context = record.context;
        self.key = record.key;
        Some(record.mv)
    }

    /// Checks the structural invariants: one king each, no overlapping
    /// pieces, no pawn on a back rank and the side not to move not in check.
    pub fn is_valid(&self) -> bool {
        let white = self.board.side(Color::White);
        let black = self.board.side(Color::Black);
        white.is_disjoint()
            && black.is_disjoint()
            && !white.all_mask().intersects(black.all_mask())
            && Self::validate(&self.board, &self.context).is_ok()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
