//! Static evaluation and alpha-beta search.
//!
//! This crate provides:
//! - [`evaluate`] - White-positive centipawn evaluation
//! - [`order_moves`] - promotion, check and capture ordering
//! - [`Searcher`] - alpha-beta with a [`TranspositionCache`] and
//!   cancellation, plus the [`minimax`] reference search
//! - [`spawn_search`] - a background search that streams [`SearchEvent`]s
//! - [`SearchConfig`] - settings loaded from TOML
//!
//! # Example
//!
//! ```
//! use chess_engine::Position;
//! use chess_search::{SearchConfig, Searcher, MATE_SCORE};
//!
//! let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
//! let report = Searcher::new(SearchConfig::default()).search(&position, 1);
//! assert_eq!(report.evaluation, MATE_SCORE);
//! assert_eq!(report.best_move().unwrap().to_coordinate(), "a1a8");
//! ```

mod cache;
mod config;
mod evaluation;
mod ordering;
mod search;
mod worker;

pub use cache::{Bound, CacheEntry, TranspositionCache};
pub use config::{ConfigError, EvalConfig, SearchConfig};
pub use evaluation::{evaluate, is_mate_score, piece_square_value, MATE_SCORE};
pub use ordering::{order_moves, ordering_score};
pub use search::{minimax, CancellationToken, SearchReport, Searcher};
pub use worker::{spawn_search, SearchEvent, SearchHandle};
