//! Alpha-beta search.
//!
//! White maximizes and Black minimizes the White-positive evaluation, so a
//! single routine serves both sides by flipping which window edge it moves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chess_core::Color;
use chess_engine::{LegalMove, Position};
use tracing::debug;

use crate::cache::{Bound, CacheEntry, TranspositionCache};
use crate::evaluation::{evaluate, MATE_SCORE};
use crate::ordering::order_moves;
use crate::{EvalConfig, SearchConfig};

/// Wider than any evaluation, mates included.
const INFINITY: i32 = MATE_SCORE + 1;

/// Shared flag that asks a running search to stop.
///
/// Clones refer to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// White-positive centipawns, or `±MATE_SCORE` for a forced mate.
    pub evaluation: i32,
    /// Principal line, starting with the best move at the root.
    pub line: Vec<LegalMove>,
    /// Nodes visited since the search started.
    pub nodes: u64,
    pub elapsed: Duration,
    /// Deepest fully searched depth.
    pub depth: u32,
    /// Whether the search stopped early because it was cancelled.
    pub cancelled: bool,
}

impl SearchReport {
    pub fn best_move(&self) -> Option<LegalMove> {
        self.line.first().copied()
    }
}

/// Value of a subtree and the line that reaches it.
struct Node {
    value: i32,
    line: Vec<LegalMove>,
}

impl Node {
    fn leaf(value: i32) -> Self {
        Node {
            value,
            line: Vec::new(),
        }
    }

    fn prepend(self, mv: LegalMove) -> Self {
        let mut line = Vec::with_capacity(self.line.len() + 1);
        line.push(mv);
        line.extend(self.line);
        Node {
            value: self.value,
            line,
        }
    }
}

type ProgressFn = Box<dyn FnMut(u64, Duration) + Send>;

/// Search state: configuration, transposition cache and statistics.
pub struct Searcher {
    config: SearchConfig,
    cache: TranspositionCache,
    token: CancellationToken,
    on_progress: Option<ProgressFn>,
    nodes: u64,
    started: Instant,
    cancelled: bool,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Searcher {
            cache: TranspositionCache::new(config.cache_capacity),
            config,
            token: CancellationToken::new(),
            on_progress: None,
            nodes: 0,
            started: Instant::now(),
            cancelled: false,
        }
    }

    /// Stops searching once `token` is cancelled.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Calls `f` with the node count and elapsed time every
    /// `progress_interval` nodes.
    pub fn with_progress(mut self, f: impl FnMut(u64, Duration) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &TranspositionCache {
        &self.cache
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches `position` to exactly `depth` plies.
    ///
    /// The position is cloned; the caller's copy is never touched.
    pub fn search(&mut self, position: &Position, depth: u32) -> SearchReport {
        self.reset();
        let mut root = position.clone();
        self.search_depth(&mut root, depth)
    }

    /// Searches depth 1, 2, ... up to `max_depth`, calling `on_depth` after
    /// each completed iteration.
    ///
    /// When cancelled, returns the last completed iteration with
    /// `cancelled` set.
    pub fn iterate(
        &mut self,
        position: &Position,
        max_depth: u32,
        mut on_depth: impl FnMut(&SearchReport),
    ) -> SearchReport {
        self.reset();
        let mut root = position.clone();

        let first = max_depth.min(1);
        let mut completed = self.search_depth(&mut root, first);
        if completed.cancelled {
            return completed;
        }
        on_depth(&completed);

        for depth in first + 1..=max_depth {
            let report = self.search_depth(&mut root, depth);
            if report.cancelled {
                completed.cancelled = true;
                completed.nodes = report.nodes;
                completed.elapsed = report.elapsed;
                return completed;
            }
            on_depth(&report);
            completed = report;
        }
        completed
    }

    /// Runs the configured search: iterative or fixed depth.
    pub fn run(&mut self, position: &Position, mut on_depth: impl FnMut(&SearchReport)) -> SearchReport {
        let depth = self.config.depth;
        if self.config.iterative {
            self.iterate(position, depth, on_depth)
        } else {
            let report = self.search(position, depth);
            if !report.cancelled {
                on_depth(&report);
            }
            report
        }
    }

    fn reset(&mut self) {
        self.nodes = 0;
        self.started = Instant::now();
        self.cancelled = false;
    }

    fn search_depth(&mut self, root: &mut Position, depth: u32) -> SearchReport {
        self.cache.clear();
        let node = self.alpha_beta(root, depth, -INFINITY, INFINITY);

        if self.cancelled {
            return SearchReport {
                evaluation: evaluate(root, &self.config.eval),
                line: Vec::new(),
                nodes: self.nodes,
                elapsed: self.started.elapsed(),
                depth: 0,
                cancelled: true,
            };
        }

        debug!(depth, evaluation = node.value, nodes = self.nodes, "depth completed");
        SearchReport {
            evaluation: node.value,
            line: node.line,
            nodes: self.nodes,
            elapsed: self.started.elapsed(),
            depth,
            cancelled: false,
        }
    }

    fn interrupted(&mut self) -> bool {
        if !self.cancelled && self.token.is_cancelled() {
            self.cancelled = true;
        }
        self.cancelled
    }

    fn visit(&mut self) {
        self.nodes += 1;
        let interval = self.config.progress_interval;
        if interval > 0 && self.nodes.is_multiple_of(interval) {
            if let Some(report) = self.on_progress.as_mut() {
                report(self.nodes, self.started.elapsed());
            }
        }
    }

    fn alpha_beta(&mut self, position: &mut Position, depth: u32, mut alpha: i32, mut beta: i32) -> Node {
        if self.interrupted() {
            return Node::leaf(0);
        }
        self.visit();

        if depth == 0 || position.is_checkmate() || position.is_draw() {
            return Node::leaf(evaluate(position, &self.config.eval));
        }

        let key = position.key();
        if self.config.transposition_cache {
            if let Some(hit) = self.cache.probe(key, depth).and_then(|e| e.cutoff(alpha, beta)) {
                return Node {
                    value: hit.value,
                    line: hit.line.clone(),
                };
            }
        }

        let (alpha_in, beta_in) = (alpha, beta);
        let maximizing = position.side_to_move() == Color::White;
        let mut best = Node::leaf(if maximizing { -INFINITY } else { INFINITY });

        let mut moves = position.legal_moves();
        order_moves(&mut moves);

        for mv in moves {
            position
                .apply(mv)
                .unwrap_or_else(|e| panic!("generated move {mv} was rejected: {e}"));
            let child = self.alpha_beta(position, depth - 1, alpha, beta);
            position.undo();

            if self.cancelled {
                return best;
            }

            if maximizing {
                if child.value > best.value {
                    best = child.prepend(mv);
                }
                alpha = alpha.max(best.value);
            } else {
                if child.value < best.value {
                    best = child.prepend(mv);
                }
                beta = beta.min(best.value);
            }

            if alpha >= beta {
                break;
            }
        }

        if self.config.transposition_cache {
            let bound = if best.value <= alpha_in {
                Bound::Upper
            } else if best.value >= beta_in {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.cache.store(
                key,
                depth,
                CacheEntry {
                    value: best.value,
                    bound,
                    line: best.line.clone(),
                },
            );
        }

        best
    }
}

/// Unpruned minimax to `depth` plies with the same evaluation as
/// [`Searcher`]. Exponentially slower; useful as a reference.
pub fn minimax(position: &Position, depth: u32, config: &EvalConfig) -> i32 {
    fn walk(position: &mut Position, depth: u32, config: &EvalConfig) -> i32 {
        if depth == 0 || position.is_checkmate() || position.is_draw() {
            return evaluate(position, config);
        }

        let maximizing = position.side_to_move() == Color::White;
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        for mv in position.legal_moves() {
            position
                .apply(mv)
                .unwrap_or_else(|e| panic!("generated move {mv} was rejected: {e}"));
            let value = walk(position, depth - 1, config);
            position.undo();
            best = if maximizing {
                best.max(value)
            } else {
                best.min(value)
            };
        }
        best
    }

    walk(&mut position.clone(), depth, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(depth: u32) -> SearchConfig {
        SearchConfig {
            depth,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn depth_zero_is_static_evaluation() {
        let position = Position::startpos();
        let report = Searcher::new(config(0)).search(&position, 0);
        assert_eq!(report.evaluation, evaluate(&position, &EvalConfig::default()));
        assert!(report.line.is_empty());
        assert_eq!(report.nodes, 1);
        assert_eq!(report.depth, 0);
    }

    #[test]
    fn finished_game_has_empty_line() {
        let mated =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let report = Searcher::new(config(3)).search(&mated, 3);
        assert_eq!(report.evaluation, -MATE_SCORE);
        assert!(report.best_move().is_none());
    }

    #[test]
    fn line_length_matches_depth() {
        let position = Position::startpos();
        let report = Searcher::new(config(3)).search(&position, 3);
        assert_eq!(report.line.len(), 3);
        assert_eq!(report.depth, 3);
        assert!(!report.cancelled);
    }

    #[test]
    fn search_leaves_position_untouched() {
        let position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let before = position.clone();
        Searcher::new(config(2)).search(&position, 2);
        assert_eq!(position, before);
    }

    #[test]
    fn cache_cleared_per_search() {
        let position = Position::startpos();
        let mut searcher = Searcher::new(config(3));
        searcher.search(&position, 3);
        let after_first = searcher.cache().len();
        assert!(after_first > 0);
        searcher.search(&position, 3);
        assert_eq!(searcher.cache().len(), after_first);
    }

    #[test]
    fn cache_disabled_stores_nothing() {
        let mut searcher = Searcher::new(SearchConfig {
            transposition_cache: false,
            ..config(2)
        });
        searcher.search(&Position::startpos(), 2);
        assert!(searcher.cache().is_empty());
    }

    #[test]
    fn progress_called_every_interval() {
        use std::sync::atomic::AtomicU64;

        let calls = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&calls);
        let mut searcher = Searcher::new(SearchConfig {
            progress_interval: 10,
            ..config(3)
        })
        .with_progress(move |nodes, _| {
            assert_eq!(nodes % 10, 0);
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let report = searcher.search(&Position::startpos(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), report.nodes / 10);
    }

    #[test]
    fn cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let mut searcher = Searcher::new(config(4)).with_token(token);
        let report = searcher.search(&Position::startpos(), 4);
        assert!(report.cancelled);
        assert_eq!(report.nodes, 0);
        assert_eq!(report.depth, 0);
        assert!(report.line.is_empty());
    }

    #[test]
    fn iterate_reports_each_depth() {
        let mut depths = Vec::new();
        let report = Searcher::new(config(3)).iterate(&Position::startpos(), 3, |r| depths.push(r.depth));
        assert_eq!(depths, vec![1, 2, 3]);
        assert_eq!(report.depth, 3);
    }

    #[test]
    fn minimax_matches_search_at_depth_two() {
        let position = Position::startpos();
        let eval = EvalConfig::default();
        let report = Searcher::new(config(2)).search(&position, 2);
        assert_eq!(report.evaluation, minimax(&position, 2, &eval));
    }
}
