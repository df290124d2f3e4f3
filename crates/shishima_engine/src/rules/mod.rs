//! Game rules for Shishima.
//!
//! Pure functions over a [`Board`](crate::Board): the geometry shared by
//! setup and play, and center-line win detection. Rules are kept apart from
//! the state machine so they can be tested on hand-built boards.

pub mod adjacency;
pub mod win;

pub use adjacency::{is_adjacent, is_adjacent_to_any, move_candidates, setup_candidates};
pub use win::{CENTER_LINES, is_center_line_win};
