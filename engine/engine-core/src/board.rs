//! Board cells and players.
//!
//! A cell value encodes both owner and orb count: `0` is empty, a positive
//! value `v` is owned by [`Player::First`] with `v` orbs and a negative value
//! is owned by [`Player::Second`] with `|v|` orbs.

use std::fmt;

/// One of the two players. `First` (id 0) owns positive cells, `Second`
/// (id 1) owns negative cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Both players in turn order.
    pub const BOTH: [Player; 2] = [Player::First, Player::Second];

    /// Numeric id (0 or 1).
    #[inline]
    pub fn id(self) -> u8 {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    /// Player for a numeric id. Returns None for anything but 0 or 1.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Player::First),
            1 => Some(Player::Second),
            _ => None,
        }
    }

    /// Sign of the cells this player owns.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Player::First => 1,
            Player::Second => -1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.id())
    }
}

/// Row-major board of signed orb counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: Vec<i8>,
}

impl Board {
    /// An empty board with `len` cells.
    pub fn empty(len: usize) -> Self {
        Self {
            cells: vec![0; len],
        }
    }

    /// Wrap raw cell values. No invariant is checked.
    pub fn from_cells(cells: Vec<i8>) -> Self {
        Self { cells }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, idx: usize) -> i8 {
        self.cells[idx]
    }

    #[inline]
    pub(crate) fn set(&mut self, idx: usize, value: i8) {
        self.cells[idx] = value;
    }

    /// Number of orbs in a cell, regardless of owner.
    #[inline]
    pub fn orbs(&self, idx: usize) -> u8 {
        self.cells[idx].unsigned_abs()
    }

    /// Owner of a cell, None when empty.
    #[inline]
    pub fn owner(&self, idx: usize) -> Option<Player> {
        match self.cells[idx] {
            0 => None,
            v if v > 0 => Some(Player::First),
            _ => Some(Player::Second),
        }
    }

    /// Whether `player` may place an orb on `idx` (empty or already theirs).
    #[inline]
    pub fn is_valid_move(&self, idx: usize, player: Player) -> bool {
        self.cells
            .get(idx)
            .is_some_and(|&v| v * player.sign() >= 0)
    }

    /// All cells `player` may place an orb on, in ascending index order.
    pub fn valid_moves(&self, player: Player) -> Vec<usize> {
        let sign = player.sign();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v * sign >= 0)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Number of cells owned by `player`.
    pub fn territory(&self, player: Player) -> usize {
        let sign = player.sign();
        self.cells.iter().filter(|&&v| v * sign > 0).count()
    }

    /// Total orbs owned by `player`.
    pub fn orb_total(&self, player: Player) -> u32 {
        let sign = player.sign();
        self.cells
            .iter()
            .filter(|&&v| v * sign > 0)
            .map(|&v| v.unsigned_abs() as u32)
            .sum()
    }
}
