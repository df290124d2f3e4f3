//! Shishima game engine.
//!
//! Shishima is played by two players on a 3x3 grid.
//!
//! - **Setup**: each player places three pieces. The center is off limits
//!   and every piece after the first must touch one of the player's own.
//! - **Play**: players alternate sliding a piece to an empty adjacent
//!   square. The center is adjacent to every square. Holding the center
//!   together with both ends of a line through it wins.
//!
//! The engine is pure: no I/O, no locking. Hosts own one [`Game`] per match
//! and persist its [`Snapshot`].
//!
//! # Example
//!
//! ```
//! use shishima_engine::{Game, GameError, Phase, Position};
//!
//! let mut game = Game::new("Alice", "Bob");
//! game.place_setup_piece("Alice", Position::new(0, 0))?;
//! game.place_setup_piece("Bob", Position::new(0, 1))?;
//!
//! let err = game.place_setup_piece("Alice", Position::CENTER).unwrap_err();
//! assert_eq!(err, GameError::CenterForbiddenDuringSetup);
//! assert_eq!(game.phase(), Phase::Setup);
//! # Ok::<(), GameError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod game;
mod position;
pub mod rules;
mod snapshot;
mod types;

pub use action::{GameError, Transition, TurnSummary};
pub use game::Game;
pub use position::Position;
pub use snapshot::{PIECES_PER_PLAYER, Snapshot};
pub use types::{Board, Phase, PlayerId, Square};
