//! Specialized propagation for the standard 9x6 board.
//!
//! Capacities come from a constant table and neighbors are computed with
//! index arithmetic, so no neighbor table is touched on the hot path. The
//! work queue is a fixed ring buffer sized to hold any cascade on this board.

use std::sync::Arc;

use crate::board::{Board, Player};
use crate::geometry::BoardGeometry;
use crate::propagation::{place_orb, EngineError, OwnershipTally, PropagationEngine};

pub const FIXED_ROWS: usize = 9;
pub const FIXED_COLS: usize = 6;
pub const FIXED_CELLS: usize = FIXED_ROWS * FIXED_COLS;

#[rustfmt::skip]
const CAPACITY: [u8; FIXED_CELLS] = [
    2, 3, 3, 3, 3, 2,
    3, 4, 4, 4, 4, 3,
    3, 4, 4, 4, 4, 3,
    3, 4, 4, 4, 4, 3,
    3, 4, 4, 4, 4, 3,
    3, 4, 4, 4, 4, 3,
    3, 4, 4, 4, 4, 3,
    3, 4, 4, 4, 4, 3,
    2, 3, 3, 3, 3, 2,
];

/// Ring buffer length. An explosion moves its orbs into the queue, so queued
/// entries never exceed the orbs on a stable board plus the placed one.
const QUEUE_LEN: usize = FIXED_CELLS * 4;

/// Fixed-size FIFO of cell indices.
struct RingQueue {
    slots: [u8; QUEUE_LEN],
    head: usize,
    len: usize,
}

impl RingQueue {
    fn new() -> Self {
        Self {
            slots: [0; QUEUE_LEN],
            head: 0,
            len: 0,
        }
    }

    #[inline]
    fn push(&mut self, idx: usize) {
        debug_assert!(self.len < QUEUE_LEN, "cascade queue overflow");
        self.slots[(self.head + self.len) % QUEUE_LEN] = idx as u8;
        self.len += 1;
    }

    #[inline]
    fn pop(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let idx = self.slots[self.head] as usize;
        self.head = (self.head + 1) % QUEUE_LEN;
        self.len -= 1;
        Some(idx)
    }
}

/// Propagation engine for 9x6 boards only.
#[derive(Debug, Clone)]
pub struct FixedGridEngine {
    geometry: Arc<BoardGeometry>,
}

impl FixedGridEngine {
    /// Wrap `geometry`, which must be 9x6.
    pub fn new(geometry: Arc<BoardGeometry>) -> Result<Self, EngineError> {
        if geometry.shape() != (FIXED_ROWS, FIXED_COLS) {
            return Err(EngineError::UnsupportedShape {
                backend: "fixed",
                rows: geometry.rows(),
                cols: geometry.cols(),
                expected_rows: FIXED_ROWS,
                expected_cols: FIXED_COLS,
            });
        }
        Ok(Self { geometry })
    }

    /// Queue the neighbors of `idx` in up, down, left, right order.
    #[inline]
    fn push_neighbors(queue: &mut RingQueue, idx: usize) {
        let (row, col) = (idx / FIXED_COLS, idx % FIXED_COLS);
        if row > 0 {
            queue.push(idx - FIXED_COLS);
        }
        if row + 1 < FIXED_ROWS {
            queue.push(idx + FIXED_COLS);
        }
        if col > 0 {
            queue.push(idx - 1);
        }
        if col + 1 < FIXED_COLS {
            queue.push(idx + 1);
        }
    }
}

impl PropagationEngine for FixedGridEngine {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    fn apply(&self, board: &mut Board, cell: usize, player: Player) -> bool {
        debug_assert_eq!(board.len(), FIXED_CELLS);

        let mut tally = OwnershipTally::from_board(board, player);
        let mut queue = RingQueue::new();
        queue.push(cell);

        let mut game_over = false;
        while !game_over {
            let Some(idx) = queue.pop() else {
                break;
            };
            let exploded = place_orb(board, idx, CAPACITY[idx] as usize, player, &mut tally);
            game_over = tally.is_decisive();
            if exploded {
                Self::push_neighbors(&mut queue, idx);
            }
        }

        game_over
    }
}
