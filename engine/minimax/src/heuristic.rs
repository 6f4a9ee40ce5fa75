//! Static board evaluation.
//!
//! Terms used below, always from the point of view of the scored player:
//! - friendly: a cell owned by the player
//! - critical: a cell one orb away from exploding (`orbs == capacity - 1`)
//! - safe: a friendly cell with no critical enemy neighbor
//! - orphan: a friendly critical cell with no critical friendly neighbor

use std::fmt;

use engine_core::{Board, BoardGeometry, Player};

/// Scores a stable board for one player. Higher is better for `player`.
pub trait MinimaxScorer: Send + Sync + fmt::Debug {
    fn score(&self, geometry: &BoardGeometry, board: &Board, player: Player) -> i32;
}

/// Positional heuristic rewarding material, safe corners and edges and
/// chains of critical cells, and penalizing cells next to critical enemies.
///
/// For every friendly cell:
/// 1. `+orbs`
/// 2. `-(5 - capacity)` per critical enemy neighbor
/// 3. if safe: `+3` on a corner, `+2` on an edge, and `+2` more if critical
/// 4. if critical and not an orphan: `+2`
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalHeuristic;

impl MinimaxScorer for PositionalHeuristic {
    fn score(&self, geometry: &BoardGeometry, board: &Board, player: Player) -> i32 {
        let sign = player.sign();
        let len = board.len();

        // Signed orb counts from the player's side: positive cells are friendly
        let critical_enemy: Vec<bool> = (0..len)
            .map(|idx| i32::from(board.get(idx) * sign) == 1 - geometry.capacity(idx) as i32)
            .collect();
        let critical_friend: Vec<bool> = (0..len)
            .map(|idx| i32::from(board.get(idx) * sign) == geometry.capacity(idx) as i32 - 1)
            .collect();

        let mut total = 0;
        for idx in 0..len {
            let orbs = i32::from(board.get(idx) * sign);
            if orbs <= 0 {
                continue;
            }

            let neighbors = geometry.neighbors(idx);
            let capacity = neighbors.len() as i32;
            let is_critical = critical_friend[idx];
            let enemies = neighbors.iter().filter(|&&n| critical_enemy[n]).count() as i32;
            let has_critical_friend = neighbors.iter().any(|&n| critical_friend[n]);

            total += orbs;
            total -= (5 - capacity) * enemies;

            if enemies == 0 {
                total += match capacity {
                    2 => 3,
                    3 => 2,
                    _ => 0,
                };
                if is_critical {
                    total += 2;
                }
            }

            if is_critical && has_critical_friend {
                total += 2;
            }
        }

        total
    }
}

/// Orb balance: the player's orbs minus the opponent's.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialHeuristic;

impl MinimaxScorer for MaterialHeuristic {
    fn score(&self, _geometry: &BoardGeometry, board: &Board, player: Player) -> i32 {
        board.orb_total(player) as i32 - board.orb_total(player.opponent()) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> BoardGeometry {
        BoardGeometry::new(3, 3).unwrap()
    }

    fn score(cells: Vec<i8>, player: Player) -> i32 {
        PositionalHeuristic.score(&geometry(), &Board::from_cells(cells), player)
    }

    #[test]
    fn test_empty_board_scores_zero() {
        assert_eq!(score(vec![0; 9], Player::First), 0);
        assert_eq!(score(vec![0; 9], Player::Second), 0);
    }

    #[test]
    fn test_safe_critical_corner() {
        // 1 orb + 3 corner + 2 critical safe
        assert_eq!(score(vec![1, 0, 0, 0, 0, 0, 0, 0, 0], Player::First), 6);
        // Same position seen from the other side is worth nothing
        assert_eq!(score(vec![1, 0, 0, 0, 0, 0, 0, 0, 0], Player::Second), 0);
    }

    #[test]
    fn test_interior_cell() {
        // Interior cells only count their orbs while safe and not critical
        assert_eq!(score(vec![0, 0, 0, 0, -2, 0, 0, 0, 0], Player::Second), 2);
    }

    #[test]
    fn test_critical_enemy_neighbor_penalty() {
        let cells = vec![1, -2, 0, 0, 0, 0, 0, 0, 0];
        // Corner next to a critical enemy edge: 1 orb - (5 - 2)
        assert_eq!(score(cells.clone(), Player::First), -2);
        // Edge next to a critical enemy corner: 2 orbs - (5 - 3), orphan
        assert_eq!(score(cells, Player::Second), 0);
    }

    #[test]
    fn test_non_orphan_bonus() {
        // Corner: 1 + 3 + 2 + 2, edge: 2 + 2 + 2 + 2
        assert_eq!(score(vec![1, 2, 0, 0, 0, 0, 0, 0, 0], Player::First), 16);
    }

    #[test]
    fn test_material_heuristic() {
        let board = Board::from_cells(vec![1, -2, 0, 2, 0, 0, 0, 0, 1]);
        assert_eq!(MaterialHeuristic.score(&geometry(), &board, Player::First), 2);
        assert_eq!(MaterialHeuristic.score(&geometry(), &board, Player::Second), -2);
    }
}
