//! Center-line win detection.

use crate::position::Position;
use crate::types::Board;
use tracing::instrument;

/// The outer squares of the four lines through the center.
pub const CENTER_LINES: [[Position; 2]; 4] = [
    // Diagonal \
    [Position::new(0, 0), Position::new(2, 2)],
    // Diagonal /
    [Position::new(0, 2), Position::new(2, 0)],
    // Vertical
    [Position::new(0, 1), Position::new(2, 1)],
    // Horizontal
    [Position::new(1, 0), Position::new(1, 2)],
];

/// Checks if `player` holds the center and a full line through it.
#[instrument(skip(board))]
pub fn is_center_line_win(board: &Board, player: &str) -> bool {
    if !board.is_owned_by(Position::CENTER, player) {
        return false;
    }
    CENTER_LINES
        .iter()
        .any(|line| line.iter().all(|&pos| board.is_owned_by(pos, player)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    fn board_with(pieces: &[(i32, i32, &str)]) -> Board {
        let mut board = Board::new();
        for &(row, col, player) in pieces {
            board
                .set(Position::new(row, col), Square::Occupied(player.to_string()))
                .unwrap();
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert!(!is_center_line_win(&Board::new(), "A"));
    }

    #[test]
    fn test_winner_diagonal() {
        let board = board_with(&[(0, 0, "A"), (1, 1, "A"), (2, 2, "A")]);
        assert!(is_center_line_win(&board, "A"));
        assert!(!is_center_line_win(&board, "B"));
    }

    #[test]
    fn test_winner_every_center_line() {
        for [a, b] in CENTER_LINES {
            let mut board = Board::new();
            for pos in [a, Position::CENTER, b] {
                board.set(pos, Square::Occupied("A".into())).unwrap();
            }
            assert!(is_center_line_win(&board, "A"), "line {a} {b}");
        }
    }

    #[test]
    fn test_edge_row_is_not_a_win() {
        let board = board_with(&[(0, 0, "A"), (0, 1, "A"), (0, 2, "A")]);
        assert!(!is_center_line_win(&board, "A"));
    }

    #[test]
    fn test_line_without_center_is_not_a_win() {
        let board = board_with(&[(0, 0, "A"), (1, 1, "B"), (2, 2, "A")]);
        assert!(!is_center_line_win(&board, "A"));
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = board_with(&[(0, 1, "A"), (1, 1, "A"), (2, 1, "B"), (0, 0, "A")]);
        assert!(!is_center_line_win(&board, "A"));
    }
}
