//! Chain reaction propagation.
//!
//! Placing an orb on a cell adds one to its count. When the count reaches the
//! cell's capacity the cell explodes: it is emptied and every neighbor receives
//! one orb of the mover's color, possibly exploding in turn. Cascades are
//! processed breadth first through a FIFO work queue and always run to a stable
//! board or to the end of the game.
//!
//! Two forms of the same rule are provided:
//! - [`PropagationEngine::apply`] runs the whole cascade at once (used by the
//!   search agents thousands of times per decision).
//! - [`Cascade`] runs it one explosion wave per call, for animated play.
//!
//! Both go through [`place_orb`], so they agree on the final board and on the
//! game-over flag for identical inputs.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::board::{Board, Player};
use crate::fixed::FixedGridEngine;
use crate::geometry::BoardGeometry;

/// Errors raised while selecting or building a propagation backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Backend '{backend}' only supports {expected_rows}x{expected_cols} boards, got {rows}x{cols}")]
    UnsupportedShape {
        backend: &'static str,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("Unknown backend '{0}', expected 'reference' or 'fixed'")]
    UnknownBackend(String),
}

/// Capability interface for applying moves to a board.
///
/// Implementations must agree bit for bit with [`ReferenceEngine`]. Callers are
/// responsible for only passing valid moves (see [`Board::valid_moves`]); an
/// invalid move produces an unspecified board.
pub trait PropagationEngine: Send + Sync + fmt::Debug {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Geometry the engine was built for.
    fn geometry(&self) -> &BoardGeometry;

    /// Apply `cell` for `player` in place. Returns true if the move ended the game.
    fn apply(&self, board: &mut Board, cell: usize, player: Player) -> bool;

    /// Apply `cell` for `player` to a copy of `board`.
    fn apply_view(&self, board: &Board, cell: usize, player: Player) -> (Board, bool) {
        let mut next = board.clone();
        let game_over = self.apply(&mut next, cell, player);
        (next, game_over)
    }

    /// Cells `player` may play on `board`.
    fn valid_moves(&self, board: &Board, player: Player) -> Vec<usize> {
        board.valid_moves(player)
    }
}

/// Running ownership counters for one move.
///
/// `own` starts at the mover's territory and grows by one for every processed
/// orb placement; `rival` starts at the opponent's territory and shrinks on
/// every capture. The game is decided once `rival` reaches zero after more than
/// two ownership events, which keeps the opening moves (where the opponent may
/// simply not have played yet) from being declared a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipTally {
    own: usize,
    rival: usize,
}

impl OwnershipTally {
    /// Count the pre-move territories of `player` and their opponent.
    pub fn from_board(board: &Board, player: Player) -> Self {
        Self {
            own: board.territory(player),
            rival: board.territory(player.opponent()),
        }
    }

    #[inline]
    pub fn own(&self) -> usize {
        self.own
    }

    #[inline]
    pub fn rival(&self) -> usize {
        self.rival
    }

    /// Whether the mover has won.
    #[inline]
    pub fn is_decisive(&self) -> bool {
        self.own + self.rival > 2 && self.rival == 0
    }
}

/// Add one orb of `player` to `idx` and update the tally.
///
/// Returns true if the cell reached `capacity` and exploded (its stored value
/// is then zero). The caller is responsible for queuing the neighbors.
#[inline]
pub fn place_orb(
    board: &mut Board,
    idx: usize,
    capacity: usize,
    player: Player,
    tally: &mut OwnershipTally,
) -> bool {
    let sign = player.sign();
    let previous = board.get(idx);

    tally.own += 1;
    if previous * sign < 0 {
        tally.rival -= 1;
    }

    let orbs = previous.unsigned_abs() as usize + 1;
    board.set(idx, (orbs % capacity) as i8 * sign);
    orbs == capacity
}

/// Propagation over an arbitrary [`BoardGeometry`] using its neighbor table.
#[derive(Debug, Clone)]
pub struct ReferenceEngine {
    geometry: Arc<BoardGeometry>,
}

impl ReferenceEngine {
    pub fn new(geometry: Arc<BoardGeometry>) -> Self {
        Self { geometry }
    }
}

impl PropagationEngine for ReferenceEngine {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    fn apply(&self, board: &mut Board, cell: usize, player: Player) -> bool {
        let geometry = &*self.geometry;
        let mut tally = OwnershipTally::from_board(board, player);
        let mut work = VecDeque::with_capacity(board.len());
        work.push_back(cell);

        let mut game_over = false;
        while !game_over {
            let Some(idx) = work.pop_front() else {
                break;
            };
            let exploded = place_orb(board, idx, geometry.capacity(idx), player, &mut tally);
            game_over = tally.is_decisive();
            if exploded {
                work.extend(geometry.neighbors(idx).iter().copied());
            }
        }

        game_over
    }
}

/// Outcome of one wave of a [`Cascade`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeStep {
    /// Cells that exploded during this wave, in processing order
    pub exploded: Vec<usize>,
    /// Whether the move has ended the game
    pub game_over: bool,
}

/// A move applied one explosion wave at a time.
///
/// The pending wave is an ordered multiset: a cell hit by two exploding
/// neighbors appears twice and is incremented twice, exactly as the atomic
/// queue would process it. Ownership counters are carried across waves, and a
/// decisive placement stops the cascade mid-wave with the remaining entries
/// discarded.
///
/// ```
/// use engine_core::{Board, BoardGeometry, Cascade, Player};
///
/// let geometry = BoardGeometry::new(3, 3).unwrap();
/// let mut board = Board::from_cells(vec![1, 0, 0, 0, 0, 0, 0, 0, -1]);
/// let mut cascade = Cascade::start(&board, 0, Player::First);
///
/// let first = cascade.step(&geometry, &mut board);
/// assert_eq!(first.exploded, vec![0]);
/// assert_eq!(cascade.pending(), &[3, 1]);
///
/// let second = cascade.step(&geometry, &mut board);
/// assert!(second.exploded.is_empty());
/// assert!(cascade.is_settled());
/// assert_eq!(board.cells(), &[0, 1, 0, 1, 0, 0, 0, 0, -1]);
/// ```
#[derive(Debug, Clone)]
pub struct Cascade {
    origin: usize,
    player: Player,
    pending: Vec<usize>,
    tally: OwnershipTally,
    game_over: bool,
}

impl Cascade {
    /// Seed a cascade with `player` placing on `cell`.
    pub fn start(board: &Board, cell: usize, player: Player) -> Self {
        Self {
            origin: cell,
            player,
            pending: vec![cell],
            tally: OwnershipTally::from_board(board, player),
            game_over: false,
        }
    }

    /// Cell the move was played on.
    #[inline]
    pub fn origin(&self) -> usize {
        self.origin
    }

    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    /// Cells waiting to receive an orb in the next wave.
    #[inline]
    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    /// No wave left to process.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Process the pending wave and queue the next one.
    pub fn step(&mut self, geometry: &BoardGeometry, board: &mut Board) -> CascadeStep {
        let wave = std::mem::take(&mut self.pending);
        let mut next = Vec::new();
        let mut exploded = Vec::new();

        for idx in wave {
            if place_orb(board, idx, geometry.capacity(idx), self.player, &mut self.tally) {
                exploded.push(idx);
                next.extend_from_slice(geometry.neighbors(idx));
            }
            if self.tally.is_decisive() {
                self.game_over = true;
                next.clear();
                break;
            }
        }

        self.pending = next;
        CascadeStep {
            exploded,
            game_over: self.game_over,
        }
    }

    /// Run every remaining wave. Returns the game-over flag.
    pub fn finish(mut self, geometry: &BoardGeometry, board: &mut Board) -> bool {
        while !self.is_settled() {
            self.step(geometry, board);
        }
        self.game_over
    }
}

/// Selectable propagation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Any board shape, neighbor-table driven
    #[default]
    Reference,
    /// Fixed 9x6 board with hard-coded capacities
    FixedGrid,
}

impl Backend {
    /// Build the engine for `geometry`.
    pub fn build(
        self,
        geometry: Arc<BoardGeometry>,
    ) -> Result<Arc<dyn PropagationEngine>, EngineError> {
        Ok(match self {
            Backend::Reference => Arc::new(ReferenceEngine::new(geometry)),
            Backend::FixedGrid => Arc::new(FixedGridEngine::new(geometry)?),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Reference => "reference",
            Backend::FixedGrid => "fixed",
        }
    }
}

impl FromStr for Backend {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reference" | "ref" => Ok(Backend::Reference),
            "fixed" | "fixed-grid" => Ok(Backend::FixedGrid),
            other => Err(EngineError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(rows: usize, cols: usize) -> ReferenceEngine {
        ReferenceEngine::new(Arc::new(BoardGeometry::new(rows, cols).unwrap()))
    }

    #[test]
    fn test_place_orb_below_capacity() {
        let mut board = Board::from_cells(vec![0, 0, 0, 0]);
        let mut tally = OwnershipTally::from_board(&board, Player::Second);
        let exploded = place_orb(&mut board, 3, 2, Player::Second, &mut tally);
        assert!(!exploded);
        assert_eq!(board.get(3), -1);
        assert_eq!(tally.own(), 1);
        assert_eq!(tally.rival(), 0);
        assert!(!tally.is_decisive());
    }

    #[test]
    fn test_place_orb_capture_and_explode() {
        let mut board = Board::from_cells(vec![-1, 1, 0, 0]);
        let mut tally = OwnershipTally::from_board(&board, Player::First);
        assert_eq!((tally.own(), tally.rival()), (1, 1));

        let exploded = place_orb(&mut board, 0, 2, Player::First, &mut tally);
        assert!(exploded);
        assert_eq!(board.get(0), 0);
        assert_eq!((tally.own(), tally.rival()), (2, 0));
        assert!(!tally.is_decisive());
    }

    #[test]
    fn test_first_move_on_empty_board() {
        let engine = engine(3, 3);
        let mut board = Board::empty(9);
        let game_over = engine.apply(&mut board, 4, Player::First);
        assert!(!game_over);
        assert_eq!(board.get(4), 1);
        assert_eq!(board.territory(Player::First), 1);
    }

    #[test]
    fn test_apply_view_leaves_input_untouched() {
        let engine = engine(3, 3);
        let board = Board::from_cells(vec![1, 0, 0, 0, -1, 0, 0, 0, 0]);
        let snapshot = board.clone();

        let (next, game_over) = engine.apply_view(&board, 0, Player::First);

        assert_eq!(board, snapshot);
        assert!(!game_over);
        assert_eq!(next.cells(), &[0, 1, 0, 1, -1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_capture_ends_game_mid_cascade() {
        // 2x3 board, capacities:
        // [2][3][2]
        // [2][3][2]
        let engine = engine(2, 3);
        let mut board = Board::from_cells(vec![1, 2, 1, 1, -1, 0]);
        let game_over = engine.apply(&mut board, 0, Player::First);

        // 0 explodes into [3, 1], 3 into [0, 4], 1 into [4, 0, 2]; the first
        // orb reaching 4 captures the last rival cell and stops the queue.
        assert!(game_over);
        assert_eq!(board.cells(), &[1, 0, 1, 0, 2, 0]);
        assert_eq!(board.territory(Player::Second), 0);
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("reference".parse::<Backend>().unwrap(), Backend::Reference);
        assert_eq!("FIXED".parse::<Backend>().unwrap(), Backend::FixedGrid);
        assert!(matches!(
            "gpu".parse::<Backend>(),
            Err(EngineError::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_backend_build_checks_shape() {
        let small = Arc::new(BoardGeometry::new(4, 4).unwrap());
        assert!(Backend::Reference.build(Arc::clone(&small)).is_ok());
        assert!(matches!(
            Backend::FixedGrid.build(small),
            Err(EngineError::UnsupportedShape { .. })
        ));

        let standard = Arc::new(BoardGeometry::new(9, 6).unwrap());
        let engine = Backend::FixedGrid.build(standard).unwrap();
        assert_eq!(engine.name(), "fixed");
    }
}
