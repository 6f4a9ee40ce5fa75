//! Minimax agent for Chain Reaction.
//!
//! Alpha-beta search over any `engine-core`
//! [`PropagationEngine`](engine_core::PropagationEngine), scored at the
//! horizon by a [`MinimaxScorer`].
//!
//! The agent plays an immediately winning move when it has one. Otherwise it
//! scores every legal move, keeps the best `samples` of them with a positive
//! score, and picks one at random with weights [`RANK_WEIGHTS`] by rank. When
//! no more than one move qualifies the best move is played.
//!
//! ```rust
//! use std::sync::Arc;
//! use engine_core::{Board, BoardGeometry, Player, ReferenceEngine};
//! use minimax::{MinimaxConfig, MinimaxSearch, PositionalHeuristic};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let engine = ReferenceEngine::new(Arc::new(BoardGeometry::new(5, 5).unwrap()));
//! let mut search =
//!     MinimaxSearch::new(&engine, &PositionalHeuristic, MinimaxConfig::default()).unwrap();
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(7);
//! let result = search.run(&Board::empty(25), Player::First, &mut rng).unwrap();
//! assert!(result.cell < 25);
//! ```

pub mod config;
pub mod heuristic;
pub mod search;

pub use config::{ConfigError, MinimaxConfig, RECOMMENDED_MAX_DEPTH};
pub use heuristic::{MaterialHeuristic, MinimaxScorer, PositionalHeuristic};
pub use search::{
    choose_move, MinimaxSearch, ScoredMove, SearchError, SearchResult, SearchStats, RANK_WEIGHTS,
    WIN_SCORE,
};
