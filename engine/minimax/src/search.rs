//! Depth-limited alpha-beta search.
//!
//! The root player's moves are scored one by one with a minimizer search,
//! carrying the best score so far as the alpha bound of the next move. The
//! final choice is a rank-weighted sample among the best positive moves.
//!
//! Scores are always from the root player's point of view. A move that wins
//! outright is worth [`WIN_SCORE`] and a reply that wins outright for the
//! opponent is worth `-WIN_SCORE`; both short-circuit the node.

use std::time::Instant;

use engine_core::{Board, Player, PropagationEngine};
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{ConfigError, MinimaxConfig};
use crate::heuristic::{MinimaxScorer, PositionalHeuristic};

/// Score of a decided game.
pub const WIN_SCORE: i32 = 10_000;

/// Sampling weight by rank among the candidate moves. Ranks past the end
/// weigh 1.
pub const RANK_WEIGHTS: [u32; 5] = [6, 4, 2, 1, 1];

/// Sampling weights for the first `n` ranks.
fn rank_weights(n: usize) -> impl Iterator<Item = u32> {
    (0..n).map(|rank| RANK_WEIGHTS.get(rank).copied().unwrap_or(1))
}

/// Errors that can occur during minimax search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Invalid search configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Board has {board} cells but the engine expects {expected}")]
    ShapeMismatch { board: usize, expected: usize },

    /// Propagated from `WeightedIndex`. Every rank weight is positive and
    /// sampling only runs with at least two candidates, so a search never
    /// reports it.
    #[error("Move sampling failed: {0}")]
    Sampling(#[from] WeightedError),
}

/// A root move and its search score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub cell: usize,
    pub score: i32,
}

/// Counters collected during one search.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Positions generated by applying a move
    pub nodes: u64,
    /// Heuristic evaluations
    pub evaluations: u64,
    /// Nodes abandoned because alpha met beta
    pub cutoffs: u64,
    /// Wall-clock time of the whole search (microseconds)
    pub total_time_us: u64,
}

/// Result of a minimax search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen cell
    pub cell: usize,

    /// Score of the chosen cell
    pub score: i32,

    /// The chosen move wins on the spot; no other move was compared
    pub immediate_win: bool,

    /// Every scored root move, best first. Stops at the winning move when
    /// `immediate_win` is set.
    pub scored_moves: Vec<ScoredMove>,

    pub stats: SearchStats,
}

/// Minimax search state.
pub struct MinimaxSearch<'a, E: PropagationEngine + ?Sized, S: MinimaxScorer + ?Sized> {
    engine: &'a E,
    scorer: &'a S,
    config: MinimaxConfig,
    stats: SearchStats,
}

impl<'a, E, S> MinimaxSearch<'a, E, S>
where
    E: PropagationEngine + ?Sized,
    S: MinimaxScorer + ?Sized,
{
    pub fn new(engine: &'a E, scorer: &'a S, config: MinimaxConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            engine,
            scorer,
            config,
            stats: SearchStats::default(),
        })
    }

    /// Choose a move for `player` on `board`.
    pub fn run(
        &mut self,
        board: &Board,
        player: Player,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult, SearchError> {
        let expected = self.engine.geometry().len();
        if board.len() != expected {
            return Err(SearchError::ShapeMismatch {
                board: board.len(),
                expected,
            });
        }

        let start = Instant::now();
        self.stats = SearchStats::default();

        let moves = self.engine.valid_moves(board, player);
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let mut alpha = -WIN_SCORE;
        let mut scored_moves = Vec::with_capacity(moves.len());

        for cell in moves {
            let (next, game_over) = self.engine.apply_view(board, cell, player);
            self.stats.nodes += 1;

            if game_over {
                scored_moves.push(ScoredMove {
                    cell,
                    score: WIN_SCORE,
                });
                scored_moves.sort_by(|a, b| b.score.cmp(&a.score));
                return Ok(self.finish(start, player, cell, WIN_SCORE, true, scored_moves));
            }

            let score = self.minimizer(&next, player, alpha, WIN_SCORE, self.config.depth - 1);
            alpha = alpha.max(score);
            scored_moves.push(ScoredMove { cell, score });
        }

        // Stable sort keeps ascending cell order among equal scores
        scored_moves.sort_by(|a, b| b.score.cmp(&a.score));
        let best = scored_moves[0];

        let candidates: Vec<ScoredMove> = scored_moves
            .iter()
            .take(self.config.samples)
            .filter(|m| m.score > 0)
            .copied()
            .collect();

        let chosen = if best.score == WIN_SCORE || candidates.len() <= 1 {
            best
        } else {
            let dist = WeightedIndex::new(rank_weights(candidates.len()))?;
            candidates[dist.sample(rng)]
        };

        Ok(self.finish(start, player, chosen.cell, chosen.score, false, scored_moves))
    }

    fn finish(
        &mut self,
        start: Instant,
        player: Player,
        cell: usize,
        score: i32,
        immediate_win: bool,
        scored_moves: Vec<ScoredMove>,
    ) -> SearchResult {
        self.stats.total_time_us = start.elapsed().as_micros() as u64;

        debug!(
            player = player.id(),
            cell,
            score,
            immediate_win,
            nodes = self.stats.nodes,
            evaluations = self.stats.evaluations,
            cutoffs = self.stats.cutoffs,
            elapsed_ms = self.stats.total_time_us / 1000,
            "Minimax search complete"
        );

        SearchResult {
            cell,
            score,
            immediate_win,
            scored_moves,
            stats: self.stats.clone(),
        }
    }

    /// Opponent to move. Returns the lowest score the opponent can force,
    /// `-WIN_SCORE` if they can win outright and `WIN_SCORE` if they have no
    /// move at all.
    pub(crate) fn minimizer(
        &mut self,
        board: &Board,
        player: Player,
        alpha: i32,
        mut beta: i32,
        depth: u32,
    ) -> i32 {
        let enemy = player.opponent();
        let mut score = WIN_SCORE;

        for cell in self.engine.valid_moves(board, enemy) {
            let (next, game_over) = self.engine.apply_view(board, cell, enemy);
            self.stats.nodes += 1;
            if game_over {
                return -WIN_SCORE;
            }

            let child = if depth > 0 {
                self.maximizer(&next, player, alpha, beta, depth)
            } else {
                self.stats.evaluations += 1;
                self.scorer.score(self.engine.geometry(), &next, player)
            };

            score = score.min(child);
            beta = beta.min(score);
            if alpha >= beta {
                self.stats.cutoffs += 1;
                trace!(depth, alpha, beta, "Minimizer cutoff");
                break;
            }
        }

        score
    }

    /// Root player to move. Returns the highest score they can force,
    /// `WIN_SCORE` if they can win outright and `-WIN_SCORE` if they have no
    /// move at all.
    pub(crate) fn maximizer(
        &mut self,
        board: &Board,
        player: Player,
        mut alpha: i32,
        beta: i32,
        depth: u32,
    ) -> i32 {
        let mut score = -WIN_SCORE;

        for cell in self.engine.valid_moves(board, player) {
            let (next, game_over) = self.engine.apply_view(board, cell, player);
            self.stats.nodes += 1;
            if game_over {
                return WIN_SCORE;
            }

            score = score.max(self.minimizer(&next, player, alpha, beta, depth - 1));
            alpha = alpha.max(score);
            if alpha >= beta {
                self.stats.cutoffs += 1;
                trace!(depth, alpha, beta, "Maximizer cutoff");
                break;
            }
        }

        score
    }

    /// Counters of the last run.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

/// Pick a move for `player` searching `depth` max/min round trips and
/// sampling among the `samples` best moves, using [`PositionalHeuristic`].
pub fn choose_move<E: PropagationEngine + ?Sized>(
    engine: &E,
    board: &Board,
    player: Player,
    depth: u32,
    samples: usize,
    rng: &mut ChaCha20Rng,
) -> Result<usize, SearchError> {
    let mut search = MinimaxSearch::new(
        engine,
        &PositionalHeuristic,
        MinimaxConfig::new(depth, samples),
    )?;
    search.run(board, player, rng).map(|result| result.cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::MaterialHeuristic;
    use engine_core::{BoardGeometry, ReferenceEngine};
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn engine(rows: usize, cols: usize) -> ReferenceEngine {
        ReferenceEngine::new(Arc::new(BoardGeometry::new(rows, cols).unwrap()))
    }

    /// Random mid-game positions where the rival owns at least one cell.
    fn contested_positions(engine: &ReferenceEngine, count: usize, seed: u64) -> Vec<(Board, Player)> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(count);

        while positions.len() < count {
            let mut board = Board::empty(engine.geometry().len());
            let mut player = Player::First;
            let mut over = false;
            for _ in 0..rng.gen_range(4..16) {
                let moves = engine.valid_moves(&board, player);
                let cell = *moves.choose(&mut rng).unwrap();
                over = engine.apply(&mut board, cell, player);
                player = player.opponent();
                if over {
                    break;
                }
            }
            if !over && board.territory(player.opponent()) > 0 {
                positions.push((board, player));
            }
        }
        positions
    }

    #[test]
    fn test_immediate_win_is_returned() {
        // Cell 8 is critical; exploding it captures the only rival cell 7
        let engine = engine(3, 3);
        let board = Board::from_cells(vec![0, 0, 0, 0, 0, 0, 0, -1, 1]);

        for seed in 0..5 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut search =
                MinimaxSearch::new(&engine, &PositionalHeuristic, MinimaxConfig::default())
                    .unwrap();
            let result = search.run(&board, Player::First, &mut rng).unwrap();

            assert_eq!(result.cell, 8);
            assert_eq!(result.score, WIN_SCORE);
            assert!(result.immediate_win);
            assert_eq!(result.scored_moves[0].cell, 8);
        }
    }

    #[test]
    fn test_minimizer_sees_losing_reply() {
        // After First stacks on 7, Second's critical corner 8 explodes into 7,
        // which explodes in turn and leaves First with nothing.
        let engine = engine(3, 3);
        let board = Board::from_cells(vec![0, 0, 0, 0, 0, 0, 0, 2, -1]);

        let mut search =
            MinimaxSearch::new(&engine, &PositionalHeuristic, MinimaxConfig::default()).unwrap();
        let score = search.minimizer(&board, Player::First, -WIN_SCORE, WIN_SCORE, 0);
        assert_eq!(score, -WIN_SCORE);
    }

    #[test]
    fn test_no_moves_bounds() {
        let engine = engine(2, 2);
        let mut search =
            MinimaxSearch::new(&engine, &MaterialHeuristic, MinimaxConfig::default()).unwrap();

        // Opponent without moves: the minimizer has nothing to lower
        let all_first = Board::from_cells(vec![1, 1, 1, 1]);
        assert_eq!(
            search.minimizer(&all_first, Player::First, -WIN_SCORE, WIN_SCORE, 0),
            WIN_SCORE
        );
        // Root player without moves: the maximizer has nothing to raise
        assert_eq!(
            search.maximizer(&all_first, Player::Second, -WIN_SCORE, WIN_SCORE, 1),
            -WIN_SCORE
        );
    }

    #[test]
    fn test_single_sample_is_deterministic() {
        let engine = engine(4, 4);
        let board = Board::from_cells(vec![1, 0, 0, -1, 0, 2, 0, 0, 0, 0, -2, 0, 1, 0, 0, -1]);
        let config = MinimaxConfig::default().with_samples(1);

        let mut picks = Vec::new();
        for seed in 0..5 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut search = MinimaxSearch::new(&engine, &PositionalHeuristic, config.clone()).unwrap();
            let result = search.run(&board, Player::First, &mut rng).unwrap();
            assert_eq!(result.cell, result.scored_moves[0].cell);
            picks.push(result.cell);
        }
        assert!(picks.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_sampled_move_is_a_top_candidate() {
        let engine = engine(4, 4);
        let board = Board::from_cells(vec![1, 0, 0, -1, 0, 2, 0, 0, 0, 0, -2, 0, 1, 0, 0, -1]);
        let config = MinimaxConfig::default().with_samples(3);

        for seed in 0..20 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut search = MinimaxSearch::new(&engine, &PositionalHeuristic, config.clone()).unwrap();
            let result = search.run(&board, Player::First, &mut rng).unwrap();

            let scores: Vec<i32> = result.scored_moves.iter().map(|m| m.score).collect();
            assert!(scores.windows(2).all(|w| w[0] >= w[1]), "sorted best first");

            let top: Vec<usize> = result.scored_moves.iter().take(3).map(|m| m.cell).collect();
            assert!(top.contains(&result.cell));
            if result.cell != result.scored_moves[0].cell {
                assert!(result.score > 0);
            }
        }
    }

    #[test]
    fn test_choose_move_contract() {
        let engine = engine(3, 3);
        let mut rng = ChaCha20Rng::seed_from_u64(9);

        let cell = choose_move(&engine, &Board::empty(9), Player::First, 1, 3, &mut rng).unwrap();
        assert!(cell < 9);

        let full = Board::from_cells(vec![-1; 9]);
        assert!(matches!(
            choose_move(&engine, &full, Player::First, 1, 3, &mut rng),
            Err(SearchError::NoLegalMoves)
        ));
        assert!(matches!(
            choose_move(&engine, &Board::empty(9), Player::First, 0, 3, &mut rng),
            Err(SearchError::Config(ConfigError::ZeroDepth))
        ));
        assert!(matches!(
            choose_move(&engine, &Board::empty(4), Player::First, 1, 3, &mut rng),
            Err(SearchError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_depth_two_counts_more_nodes() {
        let engine = engine(3, 3);
        let board = Board::from_cells(vec![1, 0, 0, 0, -1, 0, 0, 0, 0]);
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let mut shallow =
            MinimaxSearch::new(&engine, &PositionalHeuristic, MinimaxConfig::new(1, 1)).unwrap();
        let shallow_nodes = shallow.run(&board, Player::First, &mut rng).unwrap().stats.nodes;

        let mut deep =
            MinimaxSearch::new(&engine, &PositionalHeuristic, MinimaxConfig::new(2, 1)).unwrap();
        let deep_nodes = deep.run(&board, Player::First, &mut rng).unwrap().stats.nodes;

        assert!(deep_nodes > shallow_nodes);
    }

    #[test]
    fn test_chosen_move_is_legal_on_contested_boards() {
        let engine = engine(4, 4);
        let mut rng = ChaCha20Rng::seed_from_u64(23);

        for (board, player) in contested_positions(&engine, 30, 9) {
            let cell = choose_move(&engine, &board, player, 1, 3, &mut rng).unwrap();
            assert!(
                board.is_valid_move(cell, player),
                "{:?} chose rival cell {} on {:?}",
                player,
                cell,
                board.cells()
            );
        }
    }

    #[test]
    fn test_rank_weights_always_form_a_distribution() {
        assert_eq!(rank_weights(7).collect::<Vec<_>>(), vec![6, 4, 2, 1, 1, 1, 1]);
        for n in 2..=16 {
            assert!(rank_weights(n).all(|w| w > 0));
            assert!(WeightedIndex::new(rank_weights(n)).is_ok());
        }
    }
}
