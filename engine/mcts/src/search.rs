//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: descend fully expanded nodes by UCT score
//! 2. Expansion: pop one untried move and add its child
//! 3. Simulation: random playout from the new child
//! 4. Backpropagation: update visit counts and scores up to the root
//!
//! The loop runs until the time budget is spent (after at least
//! `min_iterations` cycles) and the clock is only read between cycles.

use std::time::{Duration, Instant};

use engine_core::{Board, Player, PropagationEngine};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{ConfigError, MctsConfig};
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Invalid search configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Board has {board} cells but the engine expects {expected}")]
    ShapeMismatch { board: usize, expected: usize },
}

/// Counters collected during one search.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Select/expand/simulate/backpropagate cycles
    pub iterations: u32,
    /// Nodes in the tree at the end of the search
    pub nodes: usize,
    /// Cycles that ended on a terminal node
    pub terminal_hits: u32,
    /// Rollouts that hit the ply cap or a position without moves
    pub draws: u32,
    /// Random moves played during rollouts
    pub rollout_plies: u64,
    /// Depth of the deepest node
    pub max_depth: u32,
    /// Wall-clock time of the whole search (microseconds)
    pub total_time_us: u64,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best cell to play
    pub cell: usize,

    /// Exploitation score of the chosen child, in [-1, 1]
    pub value: f64,

    /// Number of iterations performed
    pub iterations: u32,

    pub stats: SearchStats,
}

/// MCTS search state.
pub struct MctsSearch<'a, E: PropagationEngine + ?Sized> {
    tree: MctsTree,
    engine: &'a E,
    config: MctsConfig,
    stats: SearchStats,
}

impl<'a, E: PropagationEngine + ?Sized> MctsSearch<'a, E> {
    /// Create a new MCTS search for `player` to move on `board`.
    pub fn new(
        engine: &'a E,
        config: MctsConfig,
        board: Board,
        player: Player,
    ) -> Result<Self, SearchError> {
        config.validate()?;

        let expected = engine.geometry().len();
        if board.len() != expected {
            return Err(SearchError::ShapeMismatch {
                board: board.len(),
                expected,
            });
        }

        let tree = MctsTree::new(board, player);
        if tree.get(tree.root()).untried.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        Ok(Self {
            tree,
            engine,
            config,
            stats: SearchStats::default(),
        })
    }

    /// Run the search until the budget is spent.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        let start = Instant::now();

        while self.should_continue(start.elapsed()) {
            self.simulate(rng);
            self.stats.iterations += 1;
        }

        let (cell, value) = self.tree.best_action().ok_or(SearchError::NoLegalMoves)?;

        let tree_stats = self.tree.stats();
        self.stats.nodes = tree_stats.total_nodes;
        self.stats.max_depth = tree_stats.max_depth;
        self.stats.total_time_us = start.elapsed().as_micros() as u64;

        debug!(
            player = self.tree.get(self.tree.root()).player.id(),
            cell,
            value = format!("{:.3}", value),
            iterations = self.stats.iterations,
            nodes = self.stats.nodes,
            max_depth = self.stats.max_depth,
            terminal_hits = self.stats.terminal_hits,
            elapsed_ms = self.stats.total_time_us / 1000,
            "MCTS search complete"
        );

        Ok(SearchResult {
            cell: cell as usize,
            value,
            iterations: self.stats.iterations,
            stats: self.stats.clone(),
        })
    }

    fn should_continue(&self, elapsed: Duration) -> bool {
        let done = self.stats.iterations;
        if done < self.config.min_iterations {
            return true;
        }
        if self.config.max_iterations.is_some_and(|max| done >= max) {
            return false;
        }
        elapsed < self.config.time_limit
    }

    /// Run a single cycle (select/expand -> simulate -> backpropagate).
    fn simulate(&mut self, rng: &mut ChaCha20Rng) {
        let leaf_id = self.select();
        let leaf = self.tree.get(leaf_id);

        let winner = match &leaf.board {
            // The stored player already encodes the result of a terminal node
            None => {
                self.stats.terminal_hits += 1;
                Some(leaf.player)
            }
            Some(board) => {
                let (winner, plies) = rollout(
                    self.engine,
                    board.clone(),
                    leaf.player,
                    self.config.max_rollout_plies,
                    rng,
                );
                self.stats.rollout_plies += u64::from(plies);
                if winner.is_none() {
                    self.stats.draws += 1;
                }
                winner
            }
        };

        self.tree.backpropagate(leaf_id, winner);

        trace!(
            leaf = leaf_id.0,
            winner = winner.map(|p| p.id()),
            "MCTS simulation complete"
        );
    }

    /// Walk down the tree and return the node to simulate from: a freshly
    /// expanded child, a terminal node or a dead end with no moves.
    fn select(&mut self) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);

            if node.is_terminal() {
                return current;
            }
            if !node.is_fully_expanded() {
                return self.expand_node(current);
            }

            match self
                .tree
                .select_child(current, self.config.c_param, self.config.log_base)
            {
                Some(child_id) => current = child_id,
                None => return current,
            }
        }
    }

    /// Expand the most recently listed untried move of `node_id`.
    fn expand_node(&mut self, node_id: NodeId) -> NodeId {
        let node = self.tree.get_mut(node_id);
        let Some(cell) = node.untried.pop() else {
            return node_id;
        };
        let player = node.player;

        let Some(board) = self.tree.get(node_id).board.as_ref() else {
            return node_id;
        };
        let (next, game_over) = self.engine.apply_view(board, cell as usize, player);
        let child_board = (!game_over).then_some(next);

        self.tree
            .add_child(node_id, cell, child_board, player.opponent())
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }
}

/// Play uniformly random moves from `board` until someone wins.
///
/// Returns the winner (None for a draw: the ply cap was reached or the mover
/// had no legal move) and the number of plies played.
pub fn rollout<E: PropagationEngine + ?Sized>(
    engine: &E,
    mut board: Board,
    mut player: Player,
    max_plies: u32,
    rng: &mut ChaCha20Rng,
) -> (Option<Player>, u32) {
    for ply in 0..max_plies {
        let moves = engine.valid_moves(&board, player);
        let Some(&cell) = moves.choose(rng) else {
            return (None, ply);
        };
        if engine.apply(&mut board, cell, player) {
            return (Some(player), ply + 1);
        }
        player = player.opponent();
    }
    (None, max_plies)
}

/// Convenience function to run a single MCTS search.
pub fn run_mcts<E: PropagationEngine + ?Sized>(
    engine: &E,
    config: MctsConfig,
    board: &Board,
    player: Player,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(engine, config, board.clone(), player)?;
    search.run(rng)
}

/// Pick a move for `player` within `time_limit_secs` using exploration
/// constant `c_param`.
pub fn best_move<E: PropagationEngine + ?Sized>(
    engine: &E,
    board: &Board,
    player: Player,
    time_limit_secs: f64,
    c_param: f64,
    rng: &mut ChaCha20Rng,
) -> Result<usize, SearchError> {
    let config = MctsConfig::from_secs(time_limit_secs, c_param)?;
    run_mcts(engine, config, board, player, rng).map(|result| result.cell)
}
