//! Results and rejections of engine operations.
//!
//! Every mutating operation returns either a [`Transition`] describing the
//! state after the action or a [`GameError`] explaining why the action was
//! rejected.

use crate::position::Position;
use crate::types::{Board, Phase, PlayerId};
use serde::{Deserialize, Serialize};

/// Board, turn and phase after a successful action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    /// The board after the action.
    pub board: Board,
    /// The player expected to act next.
    pub current_player: PlayerId,
    /// The phase after the action.
    pub phase: Phase,
}

/// Outcome of a successful placement or move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Transition {
    /// The match continues.
    Continue(TurnSummary),
    /// The moving player completed a line through the center.
    Won {
        /// The player who just won.
        winner: PlayerId,
        /// The final board.
        board: Board,
    },
}

impl Transition {
    /// Returns the winner if this transition ended the match.
    pub fn winner(&self) -> Option<&str> {
        match self {
            Transition::Continue(_) => None,
            Transition::Won { winner, .. } => Some(winner),
        }
    }

    /// Returns the board after the transition.
    pub fn board(&self) -> &Board {
        match self {
            Transition::Continue(summary) => &summary.board,
            Transition::Won { board, .. } => board,
        }
    }
}

/// Error that can occur when validating or applying an action.
///
/// All variants are rejected-input conditions; none of them end the match.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// Position indices outside `[0, 2]`.
    #[display("Position {} is off the board", _0)]
    OutOfBounds(Position),

    /// Target square already holds a piece.
    #[display("Position {} is already taken", _0)]
    CellOccupied(Position),

    /// Setup placements may not use the center.
    #[display("Cannot place a piece in the center during setup")]
    CenterForbiddenDuringSetup,

    /// Second and third setup pieces must touch an own piece.
    #[display("Position {} is not next to any of your pieces", _0)]
    MustBeAdjacentToOwnPiece(Position),

    /// The player has already placed three pieces.
    #[display("Setup already completed for {}", _0)]
    SetupAlreadyComplete(PlayerId),

    /// Moves are only accepted from the player to act.
    #[display("Not {}'s turn", _0)]
    NotYourTurn(PlayerId),

    /// The origin square does not hold one of the player's pieces.
    #[display("Position {} does not hold your piece", _0)]
    NotOwner(Position),

    /// Origin and destination are not adjacent.
    #[display("Cannot move from {} to {}", from, to)]
    IllegalMove {
        /// Origin square.
        from: Position,
        /// Requested destination.
        to: Position,
    },

    /// The player has no piece that can slide anywhere.
    #[display("No valid moves available for {}", _0)]
    NoValidMoves(PlayerId),

    /// The label names neither player of the match.
    #[display("Unknown player {}", _0)]
    UnknownPlayer(PlayerId),

    /// The operation belongs to the other phase.
    #[display("Operation requires the {} phase", expected)]
    WrongPhase {
        /// Phase the operation needs.
        expected: Phase,
    },

    /// A move during play was submitted without an origin square.
    #[display("A move during play needs an origin square")]
    MissingOrigin,

    /// A winner has already been recorded.
    #[display("Game is already over, {} won", _0)]
    GameOver(PlayerId),

    /// A snapshot failed consistency checks on restore.
    #[display("Corrupt snapshot: {}", _0)]
    CorruptSnapshot(String),
}

impl std::error::Error for GameError {}

impl GameError {
    /// Stable machine-readable name of the rejection.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::OutOfBounds(_) => "out_of_bounds",
            GameError::CellOccupied(_) => "cell_occupied",
            GameError::CenterForbiddenDuringSetup => "center_forbidden_during_setup",
            GameError::MustBeAdjacentToOwnPiece(_) => "must_be_adjacent_to_own_piece",
            GameError::SetupAlreadyComplete(_) => "setup_already_complete",
            GameError::NotYourTurn(_) => "not_your_turn",
            GameError::NotOwner(_) => "not_owner",
            GameError::IllegalMove { .. } => "illegal_move",
            GameError::NoValidMoves(_) => "no_valid_moves",
            GameError::UnknownPlayer(_) => "unknown_player",
            GameError::WrongPhase { .. } => "wrong_phase",
            GameError::MissingOrigin => "missing_origin",
            GameError::GameOver(_) => "game_over",
            GameError::CorruptSnapshot(_) => "corrupt_snapshot",
        }
    }
}
