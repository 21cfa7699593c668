//! Move rejection reasons.

use derive_more::{Display, Error};
use serde::Serialize;

use crate::{Player, Size};

/// Why a move was refused. Every variant leaves the game state untouched.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, Error, Serialize)]
pub enum MoveError {
    /// The game has already ended.
    #[display("game is already over")]
    GameOver,

    /// A destination or relocation source lies off the 3x3 board.
    #[display("cell ({row}, {col}) is off the board")]
    OutOfBounds { row: u8, col: u8 },

    /// The requesting player is not the player to move.
    #[display("it is not {player:?}'s turn")]
    WrongTurn { player: Player },

    /// No unit of that size is left in the player's reserve.
    #[display("{player:?} has no {size:?} units left in reserve")]
    ReserveEmpty { player: Player, size: Size },

    /// The relocation source's top unit is missing or not the named unit.
    #[display("top of ({row}, {col}) is not {player:?}'s {size:?}")]
    SourceMismatch { row: u8, col: u8, player: Player, size: Size },

    /// The destination's top unit is not strictly smaller.
    #[display("a {size:?} cannot cover the {top:?} at ({row}, {col})")]
    CannotCover { row: u8, col: u8, size: Size, top: Size },
}
