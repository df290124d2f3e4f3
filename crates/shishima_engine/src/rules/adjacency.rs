//! Adjacency and candidate enumeration.
//!
//! The center square is a hub: it is adjacent to every square and every
//! square is adjacent to it. Otherwise only orthogonal neighbours touch.

use crate::position::Position;
use crate::types::Board;
use tracing::instrument;

/// Checks whether two positions are adjacent.
#[instrument]
pub fn is_adjacent(a: Position, b: Position) -> bool {
    if a.is_center() || b.is_center() {
        return true;
    }
    let dr = (a.row() - b.row()).abs();
    let dc = (a.col() - b.col()).abs();
    dr + dc == 1
}

/// Checks whether `pos` is adjacent to at least one of `owned`.
pub fn is_adjacent_to_any(owned: &[Position], pos: Position) -> bool {
    owned.iter().any(|&own| is_adjacent(own, pos))
}

/// Legal setup squares for a player owning `owned`.
///
/// Empty, non-center squares; once the player has a piece, only squares
/// adjacent to one of them.
#[instrument(skip(board))]
pub fn setup_candidates(board: &Board, owned: &[Position]) -> Vec<Position> {
    Position::ALL
        .into_iter()
        .filter(|&pos| board.is_empty(pos) && !pos.is_center())
        .filter(|&pos| owned.is_empty() || is_adjacent_to_any(owned, pos))
        .collect()
}

/// Every `(from, to)` slide available to a player owning `owned`.
#[instrument(skip(board))]
pub fn move_candidates(board: &Board, owned: &[Position]) -> Vec<(Position, Position)> {
    owned
        .iter()
        .flat_map(|&from| {
            Position::ALL
                .into_iter()
                .filter(move |&to| board.is_empty(to) && is_adjacent(from, to))
                .map(move |to| (from, to))
        })
        .collect()
}
