//! The Shishima state machine.
//!
//! A [`Game`] starts in [`Phase::Setup`] where each player places three
//! pieces off-center, each new piece touching one of their own. Once both
//! players are done it switches to [`Phase::Play`]: players slide one piece
//! per turn and the first to hold the center plus a full line through it
//! wins.

use crate::action::{GameError, Transition, TurnSummary};
use crate::position::Position;
use crate::rules::{is_adjacent, is_adjacent_to_any, is_center_line_win, move_candidates, setup_candidates};
use crate::snapshot::{PIECES_PER_PLAYER, Snapshot};
use crate::types::{Board, Phase, PlayerId, Seat, Square};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Per-player bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlayerSlot {
    name: PlayerId,
    positions: Vec<Position>,
    setup_completed: bool,
}

impl PlayerSlot {
    fn new(name: PlayerId) -> Self {
        Self {
            name,
            positions: Vec::new(),
            setup_completed: false,
        }
    }
}

/// One Shishima match.
///
/// The engine performs no locking; a host serving concurrent requests must
/// serialize access per match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    players: [PlayerSlot; 2],
    board: Board,
    to_move: Seat,
    phase: Phase,
    winner: Option<PlayerId>,
}

impl Game {
    /// Creates a new match. `player1` acts first.
    #[instrument(skip(player1, player2), fields(player1 = %player1.as_ref(), player2 = %player2.as_ref()))]
    pub fn new(player1: impl AsRef<str>, player2: impl AsRef<str>) -> Self {
        debug!("Creating new match");
        Self {
            players: [
                PlayerSlot::new(player1.as_ref().to_string()),
                PlayerSlot::new(player2.as_ref().to_string()),
            ],
            board: Board::new(),
            to_move: Seat::First,
            phase: Phase::Setup,
            winner: None,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Setup phase
    // ─────────────────────────────────────────────────────────────

    /// Places a setup piece for `player` at `pos`.
    ///
    /// Setup placements are not turn-checked. A player who has already
    /// placed all pieces gets [`GameError::SetupAlreadyComplete`], and the
    /// call still passes the turn (and starts play if both players are
    /// done).
    ///
    /// # Errors
    ///
    /// In order: `UnknownPlayer`, `GameOver`, `WrongPhase`,
    /// `SetupAlreadyComplete`, `OutOfBounds`, `CellOccupied`,
    /// `CenterForbiddenDuringSetup`, `MustBeAdjacentToOwnPiece`.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn place_setup_piece(&mut self, player: &str, pos: Position) -> Result<Transition, GameError> {
        let seat = self.seat_of(player)?;
        self.ensure_phase(Phase::Setup)?;

        let slot = &mut self.players[seat.index()];
        if slot.setup_completed || slot.positions.len() >= PIECES_PER_PLAYER {
            slot.setup_completed = true;
            self.update_phase();
            self.advance_turn();
            warn!(player, next = %self.current_player(), "Setup already complete, passing turn");
            return Err(GameError::SetupAlreadyComplete(player.to_string()));
        }

        if !pos.is_on_board() {
            return Err(GameError::OutOfBounds(pos));
        }
        if !self.board.is_empty(pos) {
            return Err(GameError::CellOccupied(pos));
        }
        if pos.is_center() {
            return Err(GameError::CenterForbiddenDuringSetup);
        }
        let owned = &self.players[seat.index()].positions;
        if !owned.is_empty() && !is_adjacent_to_any(owned, pos) {
            return Err(GameError::MustBeAdjacentToOwnPiece(pos));
        }

        self.board.set(pos, Square::Occupied(player.to_string()))?;
        let slot = &mut self.players[seat.index()];
        slot.positions.push(pos);
        if slot.positions.len() == PIECES_PER_PLAYER {
            slot.setup_completed = true;
            info!(player, "Player finished setup");
            self.update_phase();
        }
        self.advance_turn();

        debug!(player, %pos, phase = %self.phase, next = %self.current_player(), "Piece placed");
        Ok(Transition::Continue(self.summary()))
    }

    /// Places a setup piece on a uniformly chosen legal square.
    ///
    /// When no legal square exists the board is left untouched and the
    /// current summary is returned.
    #[instrument(skip(self, rng))]
    pub fn random_setup_placement<R: Rng + ?Sized>(
        &mut self,
        player: &str,
        rng: &mut R,
    ) -> Result<Transition, GameError> {
        self.seat_of(player)?;
        self.ensure_phase(Phase::Setup)?;

        let candidates = self.setup_candidates(player)?;
        match candidates.choose(rng) {
            Some(&pos) => {
                debug!(player, %pos, candidates = candidates.len(), "Random setup square chosen");
                self.place_setup_piece(player, pos)
            }
            None => {
                debug!(player, "No setup square available");
                Ok(Transition::Continue(self.summary()))
            }
        }
    }

    /// Legal setup squares for `player` on the current board.
    pub fn setup_candidates(&self, player: &str) -> Result<Vec<Position>, GameError> {
        let seat = self.seat_of(player)?;
        Ok(setup_candidates(&self.board, &self.players[seat.index()].positions))
    }

    // ─────────────────────────────────────────────────────────────
    //  Play phase
    // ─────────────────────────────────────────────────────────────

    /// Slides one of `player`'s pieces from `from` to `to`.
    ///
    /// # Errors
    ///
    /// In order: `UnknownPlayer`, `GameOver`, `WrongPhase`, `NotYourTurn`,
    /// `OutOfBounds`, `NotOwner`, `CellOccupied`, `IllegalMove`.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn move_piece(&mut self, player: &str, from: Position, to: Position) -> Result<Transition, GameError> {
        let seat = self.seat_of(player)?;
        self.ensure_phase(Phase::Play)?;

        if seat != self.to_move {
            return Err(GameError::NotYourTurn(player.to_string()));
        }
        if let Some(pos) = [from, to].into_iter().find(|pos| !pos.is_on_board()) {
            return Err(GameError::OutOfBounds(pos));
        }
        if !self.board.is_owned_by(from, player) {
            return Err(GameError::NotOwner(from));
        }
        if !self.board.is_empty(to) {
            return Err(GameError::CellOccupied(to));
        }
        if !is_adjacent(from, to) {
            return Err(GameError::IllegalMove { from, to });
        }

        self.board.set(from, Square::Empty)?;
        self.board.set(to, Square::Occupied(player.to_string()))?;
        let slot = &mut self.players[seat.index()];
        slot.positions.retain(|&pos| pos != from);
        slot.positions.push(to);

        if is_center_line_win(&self.board, player) {
            info!(player, %from, %to, "Center line completed");
            self.winner = Some(player.to_string());
            return Ok(Transition::Won {
                winner: player.to_string(),
                board: self.board.clone(),
            });
        }

        self.advance_turn();
        debug!(player, %from, %to, next = %self.current_player(), "Piece moved");
        Ok(Transition::Continue(self.summary()))
    }

    /// Makes a uniformly chosen legal move for `player`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoValidMoves`] when every piece is blocked,
    /// otherwise whatever [`Game::move_piece`] reports.
    #[instrument(skip(self, rng))]
    pub fn random_move<R: Rng + ?Sized>(&mut self, player: &str, rng: &mut R) -> Result<Transition, GameError> {
        self.seat_of(player)?;
        self.ensure_phase(Phase::Play)?;

        let moves = self.valid_moves(player)?;
        let &(from, to) = moves
            .choose(rng)
            .ok_or_else(|| GameError::NoValidMoves(player.to_string()))?;
        debug!(player, %from, %to, candidates = moves.len(), "Random move chosen");
        self.move_piece(player, from, to)
    }

    /// Every `(from, to)` slide available to `player`.
    pub fn valid_moves(&self, player: &str) -> Result<Vec<(Position, Position)>, GameError> {
        let seat = self.seat_of(player)?;
        Ok(move_candidates(&self.board, &self.players[seat.index()].positions))
    }

    // ─────────────────────────────────────────────────────────────
    //  Phase dispatch
    // ─────────────────────────────────────────────────────────────

    /// Routes an action to the current phase.
    ///
    /// During setup `from` is ignored; during play it is required.
    #[instrument(skip(self))]
    pub fn play(&mut self, player: &str, from: Option<Position>, to: Position) -> Result<Transition, GameError> {
        match self.phase {
            Phase::Setup => self.place_setup_piece(player, to),
            Phase::Play => {
                let from = from.ok_or(GameError::MissingOrigin)?;
                self.move_piece(player, from, to)
            }
        }
    }

    /// Takes a random legal action for `player` in the current phase.
    pub fn random_action<R: Rng + ?Sized>(&mut self, player: &str, rng: &mut R) -> Result<Transition, GameError> {
        match self.phase {
            Phase::Setup => self.random_setup_placement(player, rng),
            Phase::Play => self.random_move(player, rng),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Observation and restore
    // ─────────────────────────────────────────────────────────────

    /// Returns the labels of player1 and player2.
    pub fn players(&self) -> (&str, &str) {
        (&self.players[0].name, &self.players[1].name)
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player expected to act next.
    pub fn current_player(&self) -> &str {
        &self.players[self.to_move.index()].name
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the winner, once there is one.
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Whether a winner has been recorded.
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Squares held by `player`, in placement/move order.
    pub fn positions(&self, player: &str) -> Option<&[Position]> {
        self.slot(player).map(|slot| slot.positions.as_slice())
    }

    /// Whether `player` has placed all setup pieces.
    pub fn setup_completed(&self, player: &str) -> Option<bool> {
        self.slot(player).map(|slot| slot.setup_completed)
    }

    /// Board, turn and phase as they stand.
    pub fn summary(&self) -> TurnSummary {
        TurnSummary {
            board: self.board.clone(),
            current_player: self.current_player().to_string(),
            phase: self.phase,
        }
    }

    /// Returns the full observable state.
    pub fn status(&self) -> Snapshot {
        Snapshot {
            player1: self.players[0].name.clone(),
            player2: self.players[1].name.clone(),
            board: self.board.clone(),
            current_player: self.current_player().to_string(),
            phase: self.phase,
            player_positions: self
                .players
                .iter()
                .map(|slot| (slot.name.clone(), slot.positions.clone()))
                .collect(),
            setup_completed: self
                .players
                .iter()
                .map(|slot| (slot.name.clone(), slot.setup_completed))
                .collect::<BTreeMap<_, _>>(),
            winner: self.winner.clone(),
        }
    }

    /// Rebuilds a match from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CorruptSnapshot`] if the snapshot is internally
    /// inconsistent.
    #[instrument(skip(snapshot), fields(player1 = %snapshot.player1, player2 = %snapshot.player2))]
    pub fn restore(snapshot: Snapshot) -> Result<Self, GameError> {
        snapshot.validate()?;

        let Snapshot {
            player1,
            player2,
            board,
            current_player,
            phase,
            mut player_positions,
            setup_completed,
            winner,
        } = snapshot;

        let mut slot_for = |name: PlayerId| PlayerSlot {
            positions: player_positions.remove(&name).unwrap_or_default(),
            setup_completed: setup_completed.get(&name).copied().unwrap_or(false),
            name,
        };
        let to_move = if current_player == player1 { Seat::First } else { Seat::Second };
        let players = [slot_for(player1), slot_for(player2)];

        info!(%phase, current = %current_player, "Match restored");
        Ok(Self {
            players,
            board,
            to_move,
            phase,
            winner,
        })
    }

    // ─────────────────────────────────────────────────────────────
    //  Helpers
    // ─────────────────────────────────────────────────────────────

    fn seat_of(&self, player: &str) -> Result<Seat, GameError> {
        if self.players[0].name == player {
            Ok(Seat::First)
        } else if self.players[1].name == player {
            Ok(Seat::Second)
        } else {
            Err(GameError::UnknownPlayer(player.to_string()))
        }
    }

    fn slot(&self, player: &str) -> Option<&PlayerSlot> {
        self.seat_of(player).ok().map(|seat| &self.players[seat.index()])
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), GameError> {
        if let Some(winner) = &self.winner {
            return Err(GameError::GameOver(winner.clone()));
        }
        if self.phase != expected {
            return Err(GameError::WrongPhase { expected });
        }
        Ok(())
    }

    fn update_phase(&mut self) {
        if self.phase == Phase::Setup && self.players.iter().all(|slot| slot.setup_completed) {
            info!("Both players finished setup, starting play");
            self.phase = Phase::Play;
        }
    }

    fn advance_turn(&mut self) {
        self.to_move = self.to_move.opponent();
    }
}
