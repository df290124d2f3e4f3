//! Observable match state, as stored and restored by collaborators.

use crate::action::GameError;
use crate::position::Position;
use crate::rules::is_center_line_win;
use crate::types::{Board, Phase, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{instrument, warn};

/// Pieces each player places during setup.
pub const PIECES_PER_PLAYER: usize = 3;

/// Full observable state of a match.
///
/// Produced by [`Game::status`](crate::Game::status) and accepted by
/// [`Game::restore`](crate::Game::restore), which checks it with
/// [`Snapshot::validate`] first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// First player; moves first.
    pub player1: PlayerId,
    /// Second player.
    pub player2: PlayerId,
    /// The board.
    pub board: Board,
    /// Player expected to act next.
    pub current_player: PlayerId,
    /// Current phase.
    pub phase: Phase,
    /// Squares held by each player, in placement/move order.
    pub player_positions: BTreeMap<PlayerId, Vec<Position>>,
    /// Whether each player has placed all setup pieces.
    pub setup_completed: BTreeMap<PlayerId, bool>,
    /// Winner, once a center line has been completed.
    #[serde(default)]
    pub winner: Option<PlayerId>,
}

impl Snapshot {
    /// Checks that the snapshot describes a reachable match state.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CorruptSnapshot`] naming the first inconsistency.
    #[instrument(skip(self), fields(player1 = %self.player1, player2 = %self.player2))]
    pub fn validate(&self) -> Result<(), GameError> {
        let result = self.check();
        if let Err(e) = &result {
            warn!(error = %e, "Snapshot rejected");
        }
        result
    }

    fn check(&self) -> Result<(), GameError> {
        let players = [self.player1.as_str(), self.player2.as_str()];
        if players[0] == players[1] {
            return Err(corrupt(format!("both players are named {}", players[0])));
        }

        for key in self.player_positions.keys().chain(self.setup_completed.keys()) {
            if !players.contains(&key.as_str()) {
                return Err(corrupt(format!("unexpected player {key}")));
            }
        }

        for (pos, square) in self.board.squares() {
            if let Some(owner) = square.occupant()
                && !players.contains(&owner)
            {
                return Err(corrupt(format!("square {pos} held by unknown player {owner}")));
            }
        }

        for player in players {
            let positions = self
                .player_positions
                .get(player)
                .ok_or_else(|| corrupt(format!("no positions for {player}")))?;
            let completed = *self
                .setup_completed
                .get(player)
                .ok_or_else(|| corrupt(format!("no setup flag for {player}")))?;

            if let Some(pos) = positions.iter().find(|pos| !pos.is_on_board()) {
                return Err(corrupt(format!("{player} listed at off-board {pos}")));
            }
            let listed: BTreeSet<Position> = positions.iter().copied().collect();
            if listed.len() != positions.len() {
                return Err(corrupt(format!("{player} lists a square twice")));
            }
            let on_board: BTreeSet<Position> = self.board.positions_of(player).into_iter().collect();
            if listed != on_board {
                return Err(corrupt(format!("positions of {player} disagree with the board")));
            }
            if positions.len() > PIECES_PER_PLAYER {
                return Err(corrupt(format!("{player} has {} pieces", positions.len())));
            }
            if completed != (positions.len() == PIECES_PER_PLAYER) {
                return Err(corrupt(format!(
                    "setup flag of {player} does not match {} pieces",
                    positions.len()
                )));
            }
        }

        let all_complete = players.iter().all(|p| self.setup_completed.get(*p) == Some(&true));
        match self.phase {
            Phase::Setup => {
                if all_complete {
                    return Err(corrupt("setup phase with both players complete".to_string()));
                }
                if !self.board.is_empty(Position::CENTER) {
                    return Err(corrupt("center occupied during setup".to_string()));
                }
            }
            Phase::Play => {
                if !all_complete {
                    return Err(corrupt("play phase before setup finished".to_string()));
                }
            }
        }

        if !players.contains(&self.current_player.as_str()) {
            return Err(corrupt(format!("current player {} is unknown", self.current_player)));
        }

        if let Some(winner) = &self.winner {
            if !players.contains(&winner.as_str()) {
                return Err(corrupt(format!("winner {winner} is unknown")));
            }
            if self.phase != Phase::Play || !is_center_line_win(&self.board, winner) {
                return Err(corrupt(format!("{winner} does not hold a center line")));
            }
        }

        Ok(())
    }
}

fn corrupt(reason: String) -> GameError {
    GameError::CorruptSnapshot(reason)
}
