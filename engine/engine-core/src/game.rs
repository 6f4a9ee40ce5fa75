//! Driver-owned game state.
//!
//! [`GameState`] tracks the board, the player to act and the winner. Agents
//! only ever read it; the driver applies their choices through [`GameState::play`]
//! or, for animated play, through [`GameState::start_move`] and
//! [`GameState::advance`].

use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use crate::board::{Board, Player};
use crate::geometry::BoardGeometry;
use crate::propagation::{Cascade, PropagationEngine};

/// Reasons a move is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Cell {cell} is outside the {rows}x{cols} board")]
    OutOfBounds { cell: usize, rows: usize, cols: usize },

    #[error("Cell {cell} is owned by {owner}")]
    OccupiedByOpponent { cell: usize, owner: Player },

    #[error("The game is already over")]
    GameOver,
}

/// Final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    /// The player to act had no legal move
    Draw,
}

/// One rendered layer of an animated move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFrame {
    /// Cells that exploded in this layer
    pub exploded: Vec<usize>,
    /// Whether the move ended the game during this layer
    pub game_over: bool,
}

#[derive(Debug, Clone)]
pub struct GameState {
    geometry: Arc<BoardGeometry>,
    board: Board,
    to_move: Player,
    winner: Option<Player>,
    moves_played: u32,
}

impl GameState {
    /// Empty board, [`Player::First`] to act.
    pub fn new(geometry: Arc<BoardGeometry>) -> Self {
        let board = Board::empty(geometry.len());
        Self {
            geometry,
            board,
            to_move: Player::First,
            winner: None,
            moves_played: 0,
        }
    }

    #[inline]
    pub fn geometry(&self) -> &Arc<BoardGeometry> {
        &self.geometry
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    #[inline]
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    #[inline]
    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }

    /// Legal moves for the player to act. Empty once the game is won.
    pub fn valid_moves(&self) -> Vec<usize> {
        if self.winner.is_some() {
            return Vec::new();
        }
        self.board.valid_moves(self.to_move)
    }

    pub fn has_legal_moves(&self) -> bool {
        self.winner.is_none()
            && (0..self.board.len()).any(|idx| self.board.is_valid_move(idx, self.to_move))
    }

    /// The result, once there is one.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.winner {
            Some(player) => Some(Outcome::Win(player)),
            None if !self.has_legal_moves() => Some(Outcome::Draw),
            None => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    fn check_move(&self, cell: usize) -> Result<(), MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if !self.geometry.contains(cell) {
            return Err(MoveError::OutOfBounds {
                cell,
                rows: self.geometry.rows(),
                cols: self.geometry.cols(),
            });
        }
        match self.board.owner(cell) {
            Some(owner) if owner != self.to_move => {
                Err(MoveError::OccupiedByOpponent { cell, owner })
            }
            _ => Ok(()),
        }
    }

    /// Apply `cell` for the player to act. Returns true if the move won the game.
    pub fn play<E>(&mut self, engine: &E, cell: usize) -> Result<bool, MoveError>
    where
        E: PropagationEngine + ?Sized,
    {
        self.check_move(cell)?;
        let game_over = engine.apply(&mut self.board, cell, self.to_move);
        self.finish_move(cell, game_over);
        Ok(game_over)
    }

    /// [`GameState::play`] addressed by row and column.
    pub fn play_at<E>(&mut self, engine: &E, row: usize, col: usize) -> Result<bool, MoveError>
    where
        E: PropagationEngine + ?Sized,
    {
        let cell = self
            .geometry
            .index(row, col)
            .ok_or(MoveError::OutOfBounds {
                cell: row.saturating_mul(self.geometry.cols()).saturating_add(col),
                rows: self.geometry.rows(),
                cols: self.geometry.cols(),
            })?;
        self.play(engine, cell)
    }

    /// Begin an animated move. Drive it with [`GameState::advance`].
    pub fn start_move(&self, cell: usize) -> Result<Cascade, MoveError> {
        self.check_move(cell)?;
        Ok(Cascade::start(&self.board, cell, self.to_move))
    }

    /// Process one layer of `cascade`. Once it settles the move is committed.
    ///
    /// A cascade that has already settled yields an empty frame and leaves the
    /// state untouched.
    pub fn advance(&mut self, cascade: &mut Cascade) -> AnimationFrame {
        if cascade.is_settled() {
            return AnimationFrame {
                exploded: Vec::new(),
                game_over: self.winner.is_some(),
            };
        }
        let step = cascade.step(&self.geometry, &mut self.board);
        if cascade.is_settled() {
            self.finish_move(cascade.origin(), step.game_over);
        }
        AnimationFrame {
            exploded: step.exploded,
            game_over: step.game_over,
        }
    }

    fn finish_move(&mut self, cell: usize, game_over: bool) {
        self.moves_played += 1;
        trace!(
            player = self.to_move.id(),
            cell,
            game_over,
            moves = self.moves_played,
            "Move committed"
        );
        if game_over {
            self.winner = Some(self.to_move);
        } else {
            self.to_move = self.to_move.opponent();
        }
    }
}
