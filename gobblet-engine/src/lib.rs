//! Gobblet Gobblers rules engine.
//!
//! Two players each own two units of every size. On their turn a player
//! either places a unit from their reserve or relocates one of their
//! visible units already on the board. A unit may only cover a strictly
//! smaller top unit. Three same-owner top units on a row, column or
//! diagonal win.
//!
//! # Board Layout
//!
//! ```text
//! Cell indices (row-major order):
//!   (0,0)=0  (0,1)=1  (0,2)=2
//!   (1,0)=3  (1,1)=4  (1,2)=5
//!   (2,0)=6  (2,1)=7  (2,2)=8
//! ```
//!
//! Each cell holds a stack of units, bottom to top. Only the top unit is
//! visible for legality and win checks.
//!
//! # Line Table
//!
//! ```text
//! Index  Line           (start_row, start_col, d_row, d_col)
//!   0    Row 0          (0, 0,  0, 1)
//!   1    Row 1          (1, 0,  0, 1)
//!   2    Row 2          (2, 0,  0, 1)
//!   3    Col 0          (0, 0,  1, 0)
//!   4    Col 1          (0, 1,  1, 0)
//!   5    Col 2          (0, 2,  1, 0)
//!   6    Main diagonal  (0, 0,  1, 1)
//!   7    Anti-diagonal  (2, 0, -1, 1)
//! ```
//!
//! The [`GameEngine`] owns all game state and is the only entry point that
//! mutates it.

pub mod board;
pub mod engine;
pub mod error;
pub mod rules;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use board::{Board, Stack};
pub use engine::{GameEngine, GameStatus, MoveOutcome, Snapshot};
pub use error::MoveError;
pub use rules::{ReserveRule, Rules};

use serde::{Deserialize, Serialize};

/// Starting number of units per player per size.
pub const UNITS_PER_SIZE: u8 = 2;

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    One = 0,
    Two = 1,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Zero-based index (0 or 1).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Convert from a zero-based index to Player.
    #[inline]
    pub fn from_index(idx: u8) -> Option<Player> {
        match idx {
            0 => Some(Player::One),
            1 => Some(Player::Two),
            _ => None,
        }
    }

    pub fn all() -> impl Iterator<Item = Player> {
        [Player::One, Player::Two].into_iter()
    }
}

/// Unit size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Size {
    Small = 0,
    Medium = 1,
    Large = 2,
}

impl Size {
    /// Whether a unit of this size may cover a unit of size `other`.
    #[inline]
    pub fn can_gobble(self, other: Size) -> bool {
        self > other
    }

    /// Convert from index (0, 1, 2) to Size.
    #[inline]
    pub fn from_index(idx: u8) -> Option<Size> {
        match idx {
            0 => Some(Size::Small),
            1 => Some(Size::Medium),
            2 => Some(Size::Large),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get all sizes as an iterator, smallest first.
    pub fn all() -> impl Iterator<Item = Size> {
        [Size::Small, Size::Medium, Size::Large].into_iter()
    }
}

/// A unit on the board or in a reserve. Units carry no identity beyond
/// owner and size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub owner: Player,
    pub size: Size,
}

impl Unit {
    #[inline]
    pub const fn new(owner: Player, size: Size) -> Unit {
        Unit { owner, size }
    }
}

/// Position on the 3x3 board (0-8).
///
/// Layout:
/// ```text
///   0 1 2
///   3 4 5
///   6 7 8
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Pos(pub u8);

impl Pos {
    /// Create a position from row and column (0-2 each).
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Pos {
        debug_assert!(row < 3 && col < 3);
        Pos(row * 3 + col)
    }

    /// Checked version of [`Pos::from_row_col`]; `None` when off the board.
    #[inline]
    pub fn try_from_row_col(row: u8, col: u8) -> Option<Pos> {
        if row < 3 && col < 3 {
            Some(Pos(row * 3 + col))
        } else {
            None
        }
    }

    /// Get the row (0-2).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Get the column (0-2).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 % 3
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all 9 positions.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..9).map(Pos)
    }
}

/// Where the moving unit comes from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Source {
    /// A unit not yet on the board.
    Reserve,
    /// The top unit of a board cell.
    Cell { row: u8, col: u8 },
}

/// A move request, mirroring the arguments of
/// [`GameEngine::apply_move`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Move {
    pub player: Player,
    pub row: u8,
    pub col: u8,
    pub size: Size,
    pub source: Source,
}

impl Move {
    /// Place a unit from the player's reserve at `(row, col)`.
    pub fn from_reserve(player: Player, size: Size, row: u8, col: u8) -> Move {
        Move { player, row, col, size, source: Source::Reserve }
    }

    /// Relocate the player's `size` unit from `from` to `to`, both given as
    /// `(row, col)`.
    pub fn relocate(player: Player, size: Size, from: (u8, u8), to: (u8, u8)) -> Move {
        Move {
            player,
            row: to.0,
            col: to.1,
            size,
            source: Source::Cell { row: from.0, col: from.1 },
        }
    }

    #[inline]
    pub fn is_relocation(&self) -> bool {
        matches!(self.source, Source::Cell { .. })
    }

    #[inline]
    pub fn unit(&self) -> Unit {
        Unit::new(self.player, self.size)
    }
}

// ============================================================================
// LINES
// ============================================================================

/// One entry of the line table: a start cell and a direction vector.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LineDef {
    pub start_row: i8,
    pub start_col: i8,
    pub d_row: i8,
    pub d_col: i8,
}

impl LineDef {
    const fn new(start_row: i8, start_col: i8, d_row: i8, d_col: i8) -> LineDef {
        LineDef { start_row, start_col, d_row, d_col }
    }
}

/// The 8 winning lines, in scan order: rows top to bottom, columns left to
/// right, then the main and anti diagonals.
pub const LINES: [LineDef; 8] = [
    LineDef::new(0, 0, 0, 1),  // Row 0
    LineDef::new(1, 0, 0, 1),  // Row 1
    LineDef::new(2, 0, 0, 1),  // Row 2
    LineDef::new(0, 0, 1, 0),  // Col 0
    LineDef::new(0, 1, 1, 0),  // Col 1
    LineDef::new(0, 2, 1, 0),  // Col 2
    LineDef::new(0, 0, 1, 1),  // Main diagonal
    LineDef::new(2, 0, -1, 1), // Anti-diagonal
];

/// Geometric family of a line.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum LineKind {
    Row,
    Column,
    Diagonal,
}

/// Index into [`LINES`] (0-7).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct Line(u8);

impl Line {
    /// Create a line from its table index.
    #[inline]
    pub fn from_index(idx: u8) -> Option<Line> {
        if (idx as usize) < LINES.len() {
            Some(Line(idx))
        } else {
            None
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn def(self) -> LineDef {
        LINES[self.index()]
    }

    pub fn kind(self) -> LineKind {
        match self.0 {
            0..=2 => LineKind::Row,
            3..=5 => LineKind::Column,
            _ => LineKind::Diagonal,
        }
    }

    /// The three cells of the line, walked from the start cell along the
    /// direction vector.
    pub fn cells(self) -> [Pos; 3] {
        let def = self.def();
        let mut cells = [Pos(0); 3];
        let (mut row, mut col) = (def.start_row, def.start_col);
        for cell in cells.iter_mut() {
            *cell = Pos((row * 3 + col) as u8);
            row += def.d_row;
            col += def.d_col;
        }
        cells
    }

    /// Iterate over all 8 lines in scan order.
    pub fn all() -> impl Iterator<Item = Line> {
        (0..LINES.len() as u8).map(Line)
    }
}
