//! Core domain types for Shishima.

use crate::action::GameError;
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// Opaque player label chosen by the caller.
pub type PlayerId = String;

/// A square on the Shishima board.
///
/// Serialized as `null` when empty and as the owner's label otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square holding a piece of the named player.
    Occupied(PlayerId),
}

impl Square {
    /// Returns the owner of the piece on this square, if any.
    pub fn occupant(&self) -> Option<&str> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

/// 3x3 Shishima board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    rows: [[Square; 3]; 3],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the square at the given position, `None` when off the board.
    pub fn get(&self, pos: Position) -> Option<&Square> {
        let (row, col) = Self::coords(pos)?;
        Some(&self.rows[row][col])
    }

    /// Returns the label of the piece at `pos`, if any.
    pub fn occupant(&self, pos: Position) -> Option<&str> {
        self.get(pos).and_then(Square::occupant)
    }

    /// Checks if an on-board square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Checks if the square at `pos` holds a piece of `player`.
    pub fn is_owned_by(&self, pos: Position, player: &str) -> bool {
        self.occupant(pos) == Some(player)
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) -> Result<(), GameError> {
        let (row, col) = Self::coords(pos).ok_or(GameError::OutOfBounds(pos))?;
        self.rows[row][col] = square;
        Ok(())
    }

    /// Iterates over every square with its position, row-major.
    pub fn squares(&self) -> impl Iterator<Item = (Position, &Square)> {
        Position::ALL
            .into_iter()
            .filter_map(move |pos| self.get(pos).map(|square| (pos, square)))
    }

    /// Positions of every piece owned by `player`, row-major.
    pub fn positions_of(&self, player: &str) -> Vec<Position> {
        self.squares()
            .filter(|(_, square)| square.occupant() == Some(player))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty squares show as `.`, occupied squares show the first
    /// character of the owner's label.
    pub fn display(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|square| match square {
                        Square::Empty => '.',
                        Square::Occupied(player) => player.chars().next().unwrap_or('?'),
                    })
                    .map(String::from)
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join("\n-+-+-\n")
    }

    fn coords(pos: Position) -> Option<(usize, usize)> {
        pos.is_on_board()
            .then(|| (pos.row() as usize, pos.col() as usize))
    }
}

/// Phase of a match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Players place three pieces each; the center is off limits.
    Setup,
    /// Players slide pieces; occupying a center line wins.
    Play,
}

/// Seat at the table: player1 or player2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Seat {
    First,
    Second,
}

impl Seat {
    /// Returns the other seat.
    pub(crate) fn opponent(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}
