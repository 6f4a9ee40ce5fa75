//! Plain-text board rendering.
//!
//! First-seat cells print as `+n`, second-seat cells as `-n`, empty cells as
//! `.`. Cells that exploded in an animation frame are marked with `*`.

use engine_core::{AnimationFrame, Board, BoardGeometry};
use std::fmt::Write;

const CELL_WIDTH: usize = 4;

fn cell_text(value: i8) -> String {
    match value {
        0 => ".".to_string(),
        v => format!("{:+}", v),
    }
}

/// Render `board` as a grid with row and column labels.
pub fn render_board(geometry: &BoardGeometry, board: &Board) -> String {
    render_marked(geometry, board, &[])
}

/// Render the board left behind by `frame`, marking the exploded cells.
pub fn render_frame(geometry: &BoardGeometry, board: &Board, frame: &AnimationFrame) -> String {
    let mut out = render_marked(geometry, board, &frame.exploded);
    if frame.game_over {
        out.push_str("game over\n");
    }
    out
}

fn render_marked(geometry: &BoardGeometry, board: &Board, marked: &[usize]) -> String {
    let mut out = String::new();

    out.push_str("   ");
    for col in 0..geometry.cols() {
        let _ = write!(out, "{:>width$}", col, width = CELL_WIDTH);
    }
    out.push('\n');

    for row in 0..geometry.rows() {
        let _ = write!(out, "{:>2} ", row);
        for col in 0..geometry.cols() {
            let idx = row * geometry.cols() + col;
            let mut text = cell_text(board.get(idx));
            if marked.contains(&idx) {
                text.push('*');
            }
            let _ = write!(out, "{:>width$}", text, width = CELL_WIDTH);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_board() {
        let geometry = BoardGeometry::new(2, 3).unwrap();
        let board = Board::from_cells(vec![1, 0, -2, 0, 2, 0]);

        let expected = "      0   1   2\n 0   +1   .  -2\n 1    .  +2   .\n";
        assert_eq!(render_board(&geometry, &board), expected);
    }

    #[test]
    fn test_render_frame_marks_explosions() {
        let geometry = BoardGeometry::new(2, 2).unwrap();
        let board = Board::from_cells(vec![0, 1, 1, 0]);
        let frame = AnimationFrame {
            exploded: vec![0],
            game_over: false,
        };

        let out = render_frame(&geometry, &board, &frame);
        assert!(out.contains("  .*"));
        assert!(!out.contains("game over"));

        let frame = AnimationFrame {
            game_over: true,
            ..frame
        };
        assert!(render_frame(&geometry, &board, &frame).ends_with("game over\n"));
    }
}
