//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices; each node keeps its parent index so
//! backpropagation walks to the root without back-pointers.

use engine_core::{Board, Player};

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree rooted at `board` with `player` to move.
    pub fn new(board: Board, player: Player) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(board, player)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode] {
        &self.nodes
    }

    /// Select the child of `node_id` with the highest UCT score.
    /// Ties keep the earliest expanded child.
    pub fn select_child(&self, node_id: NodeId, c_param: f64, log_base: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute the parent logarithm once instead of per child
        let parent_log_visits = (node.visits as f64).ln() / log_base.ln();

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let score = self.get(child_id).uct_score(parent_log_visits, c_param);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child_id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Add a child to a parent node.
    /// Returns the new child's NodeId.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        cell: u16,
        board: Option<Board>,
        player: Player,
    ) -> NodeId {
        let child_id = self.allocate(MctsNode::new_child(parent_id, cell, board, player));
        self.get_mut(parent_id).children.push(child_id);
        child_id
    }

    /// Backpropagate a rollout result from a leaf to the root.
    ///
    /// Every node on the path gains a visit. Its score moves by +1 when its
    /// player is the winner and by -1 otherwise; a draw (`None`) leaves the
    /// score unchanged.
    pub fn backpropagate(&mut self, leaf_id: NodeId, winner: Option<Player>) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visits += 1;
            match winner {
                Some(player) if player == node.player => node.score += 1,
                Some(_) => node.score -= 1,
                None => {}
            }
            current_id = node.parent;
        }
    }

    /// Root child with the best exploitation score (UCT with c = 0).
    /// Returns (cell, exploitation) or None if the root has no children.
    pub fn best_action(&self) -> Option<(u16, f64)> {
        let mut best: Option<(u16, f64)> = None;
        for &child_id in &self.get(self.root).children {
            let child = self.get(child_id);
            let value = child.exploitation();
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((child.cell, value));
            }
        }
        best
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            root_children: root.children.len(),
            terminal_nodes: self.nodes.iter().filter(|n| n.is_terminal()).count(),
            max_depth: self.compute_max_depth(),
        }
    }

    /// Depth of the deepest node. Children are always allocated after their
    /// parent, so one forward pass over the arena suffices.
    fn compute_max_depth(&self) -> u32 {
        let mut depths = vec![0u32; self.nodes.len()];
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.parent.is_some() {
                depths[idx] = depths[node.parent.0 as usize] + 1;
            }
        }
        depths.into_iter().max().unwrap_or(0)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_children: usize,
    pub terminal_nodes: usize,
    pub max_depth: u32,
}
