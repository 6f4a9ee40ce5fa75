//! MCTS tree node representation.
//!
//! Each node is a position reached by playing `cell` from its parent. A node
//! whose move ended the game keeps no board and is terminal. Statistics are
//! kept from the point of view of the node's `player`, the player to move.

use engine_core::{Board, Player};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Cell played from the parent to reach this node (0 for the root)
    pub cell: u16,

    /// Position at this node, None when the move into it ended the game
    pub board: Option<Board>,

    /// Player to move at this node. For a terminal node this is the
    /// opponent of the player who ended the game.
    pub player: Player,

    /// Moves not yet expanded, in ascending cell order. Expansion pops from
    /// the back, so higher cells are tried first.
    pub untried: Vec<u16>,

    /// Expanded children in expansion order
    pub children: Vec<NodeId>,

    /// Number of times this node has been visited
    pub visits: u32,

    /// Sum of rollout rewards: +1 when `player` won, -1 when they lost, 0 for a draw
    pub score: i64,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(board: Board, player: Player) -> Self {
        Self::new_child(NodeId::NONE, 0, Some(board), player)
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, cell: u16, board: Option<Board>, player: Player) -> Self {
        let untried = board
            .as_ref()
            .map(|b| b.valid_moves(player).into_iter().map(|c| c as u16).collect())
            .unwrap_or_default();

        Self {
            parent,
            cell,
            board,
            player,
            untried,
            children: Vec::new(),
            visits: 0,
            score: 0,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.board.is_none()
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Mean reward, `score / visits`. Returns 0.0 if never visited.
    #[inline]
    pub fn exploitation(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.score as f64 / self.visits as f64
        }
    }

    /// UCT score for child selection.
    /// UCT = score / N + c * sqrt(log_b(N_parent) / N)
    ///
    /// Takes the pre-computed parent logarithm so siblings share one `ln` call.
    #[inline]
    pub fn uct_score(&self, parent_log_visits: f64, c_param: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let explore = (parent_log_visits / self.visits as f64).sqrt();
        self.exploitation() + c_param * explore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root_lists_untried_moves() {
        let board = Board::from_cells(vec![0, 1, -1, 0]);
        let node = MctsNode::new_root(board, Player::Second);

        assert!(node.parent.is_none());
        assert!(!node.is_terminal());
        assert_eq!(node.untried, vec![0, 2, 3]);
        assert!(!node.is_fully_expanded());
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_terminal_child() {
        let node = MctsNode::new_child(NodeId(0), 3, None, Player::First);
        assert!(node.is_terminal());
        assert!(node.is_fully_expanded());
        assert_eq!(node.cell, 3);
    }

    #[test]
    fn test_exploitation() {
        let mut node = MctsNode::new_root(Board::empty(4), Player::First);
        assert!(node.exploitation().abs() < 1e-9);

        node.visits = 4;
        node.score = -2;
        assert!((node.exploitation() + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_uct_score() {
        let mut node = MctsNode::new_root(Board::empty(4), Player::First);
        node.visits = 10;
        node.score = 5;

        // log10(100) = 2, sqrt(2 / 10) = 0.4472
        let parent_log = 100f64.ln() / 10f64.ln();
        let uct = node.uct_score(parent_log, 1.5);
        assert!((uct - (0.5 + 1.5 * 0.4472)).abs() < 1e-3);

        // c = 0 is pure exploitation
        assert!((node.uct_score(parent_log, 0.0) - 0.5).abs() < 1e-9);
    }
}
