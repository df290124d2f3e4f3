//! Random self-play for smoke-testing the rules from the command line.

use rand::SeedableRng;
use rand::rngs::StdRng;
use shishima_engine::{Game, GameError, PlayerId, Transition};
use tracing::{debug, info, instrument, warn};

/// How a simulated match stopped.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SimulationOutcome {
    /// A player completed a center line.
    #[display("{} wins", _0)]
    Won(PlayerId),
    /// The player to act had no legal action.
    #[display("{} is stuck", _0)]
    Stalled(PlayerId),
    /// Turn limit reached without a winner.
    #[display("no winner after turn limit")]
    TurnLimit,
}

/// Result of a simulated match.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// The match in its final state.
    pub game: Game,
    /// Boards after each successful action, starting with the empty board.
    pub boards: Vec<String>,
    /// How the match stopped.
    pub outcome: SimulationOutcome,
}

/// Plays random legal actions for both sides until a win, a stall or
/// `max_turns` actions.
#[instrument]
pub fn simulate(player1: &str, player2: &str, seed: u64, max_turns: usize) -> SimulationReport {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new(player1, player2);
    let mut boards = vec![game.board().display()];

    for turn in 0..max_turns {
        let actor = game.current_player().to_string();
        match game.random_action(&actor, &mut rng) {
            Ok(Transition::Won { winner, board }) => {
                boards.push(board.display());
                info!(turn, winner = %winner, "Simulation finished with a win");
                return SimulationReport {
                    game,
                    boards,
                    outcome: SimulationOutcome::Won(winner),
                };
            }
            Ok(Transition::Continue(summary)) if summary.current_player == actor => {
                debug!(turn, player = %actor, "No setup square available");
                return SimulationReport {
                    game,
                    boards,
                    outcome: SimulationOutcome::Stalled(actor),
                };
            }
            Ok(Transition::Continue(summary)) => {
                boards.push(summary.board.display());
            }
            Err(GameError::NoValidMoves(player)) => {
                info!(turn, player = %player, "Simulation stalled");
                return SimulationReport {
                    game,
                    boards,
                    outcome: SimulationOutcome::Stalled(player),
                };
            }
            Err(e) => {
                warn!(turn, error = %e, "Unexpected rejection");
                return SimulationReport {
                    game,
                    boards,
                    outcome: SimulationOutcome::Stalled(actor),
                };
            }
        }
    }

    info!(max_turns, "Simulation hit turn limit");
    SimulationReport {
        game,
        boards,
        outcome: SimulationOutcome::TurnLimit,
    }
}
