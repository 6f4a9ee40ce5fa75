//! Monte Carlo Tree Search (MCTS) agent for Chain Reaction.
//!
//! This crate provides a UCT search with random rollouts that works with any
//! `engine-core` [`PropagationEngine`](engine_core::PropagationEngine).
//!
//! # Overview
//!
//! MCTS builds a search tree by repeating four phases until a wall-clock
//! budget is spent:
//!
//! 1. **Selection**: descend fully expanded nodes by UCT score
//! 2. **Expansion**: pop one untried move (last in, first out) and add its child
//! 3. **Simulation**: play uniformly random moves until the game ends
//! 4. **Backpropagation**: every node on the path gains a visit, and +1 or -1
//!    depending on whether its player to move won the playout
//!
//! The chosen move is the root child with the best mean reward.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use engine_core::{Board, BoardGeometry, Player, ReferenceEngine};
//! use mcts::{run_mcts, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let geometry = Arc::new(BoardGeometry::new(4, 4).unwrap());
//! let engine = ReferenceEngine::new(geometry);
//! let board = Board::empty(16);
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = run_mcts(
//!     &engine,
//!     MctsConfig::default().with_iterations(100),
//!     &board,
//!     Player::First,
//!     &mut rng,
//! )
//! .unwrap();
//!
//! println!("Best cell: {}", result.cell);
//! println!("Value: {}", result.value);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `time_limit`: wall-clock budget per decision (default: 1s)
//! - `c_param`: exploration constant for UCT (default: 1.5)
//! - `log_base`: base of the logarithm in the exploration term (default: 10)
//! - `min_iterations` / `max_iterations`: bounds on the number of cycles
//! - `max_rollout_plies`: rollouts longer than this count as draws

pub mod config;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{ConfigError, MctsConfig};
pub use node::{MctsNode, NodeId};
pub use search::{best_move, rollout, run_mcts, MctsSearch, SearchError, SearchResult, SearchStats};
pub use tree::{MctsTree, TreeStats};
