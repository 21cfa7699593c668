//! The game state machine.
//!
//! ```text
//!            Applied
//!           ┌───────┐
//!           ▼       │
//!      ┌────────────┴┐  WinConfirmed / WinsForOpponent  ┌───────┐
//!      │ InProgress  ├──────────────────────────────────▶│ Ended │
//!      └─────────────┘                                   └───────┘
//! ```
//!
//! `Rejected` never changes state. `Ended` is terminal until [`GameEngine::reset`].

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    Board, Line, Move, MoveError, Player, Pos, ReserveRule, Rules, Size, Source, Unit,
    UNITS_PER_SIZE,
};

/// Result of [`GameEngine::apply_move`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum MoveOutcome {
    /// The move was illegal; nothing changed.
    Rejected(MoveError),
    /// The move was made and the game continues.
    Applied,
    /// The move was made and completed a line.
    WinConfirmed,
    /// Lifting the relocated unit exposed a completed line before it was
    /// put down. The unit stays off the board, the turn does not pass, and
    /// the game ends with the exposed line's owner as winner.
    WinsForOpponent,
}

impl MoveOutcome {
    #[inline]
    pub fn is_rejected(&self) -> bool {
        matches!(self, MoveOutcome::Rejected(_))
    }

    /// True for the two outcomes that end the game.
    #[inline]
    pub fn ends_game(&self) -> bool {
        matches!(self, MoveOutcome::WinConfirmed | MoveOutcome::WinsForOpponent)
    }
}

/// Coarse lifecycle state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum GameStatus {
    InProgress { turn: Player },
    Ended { winner: Player, line: Line },
}

/// Serializable view of the whole game for a presentation layer.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Snapshot {
    /// Stacks in row-major order, each bottom to top.
    pub cells: Vec<Vec<Unit>>,
    /// `[player][size]` reserve counts; absent under the unlimited rule.
    pub reserves: Option<[[u8; 3]; 2]>,
    pub turn: Player,
    pub ended: bool,
    pub winner: Option<Player>,
    pub winning_line: Option<Line>,
}

/// Destination and optional source of a validated move.
#[derive(Clone, Copy)]
struct Resolved {
    to: Pos,
    from: Option<Pos>,
}

/// Rules engine for one game.
///
/// All mutation goes through [`apply_move`](GameEngine::apply_move) (or
/// [`apply`](GameEngine::apply)), which validates independently of
/// [`can_place`](GameEngine::can_place) so the two always agree.
///
/// The engine has no internal synchronization; a host sharing one game
/// between threads must serialize access itself.
#[derive(Clone, Debug)]
pub struct GameEngine {
    rules: Rules,
    board: Board,
    turn: Player,
    /// Winner and line once the game has ended.
    result: Option<(Player, Line)>,
    /// `[player][size]` units not yet placed.
    reserves: [[u8; 3]; 2],
}

impl GameEngine {
    /// New game under the default (reserve-tracking) rules.
    pub fn new() -> GameEngine {
        GameEngine::with_rules(Rules::default())
    }

    #[instrument]
    pub fn with_rules(rules: Rules) -> GameEngine {
        GameEngine {
            rules,
            board: Board::new(),
            turn: Player::One,
            result: None,
            reserves: [[UNITS_PER_SIZE; 3]; 2],
        }
    }

    /// Start over: empty board, full reserves, Player One to move. Rules
    /// are kept.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = GameEngine::with_rules(self.rules);
    }

    // ========== Queries ==========

    #[inline]
    pub fn rules(&self) -> Rules {
        self.rules
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player to move. Frozen once the game has ended.
    #[inline]
    pub fn turn_player(&self) -> Player {
        self.turn
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.result.is_some()
    }

    #[inline]
    pub fn winner(&self) -> Option<Player> {
        self.result.map(|(player, _)| player)
    }

    #[inline]
    pub fn winning_line(&self) -> Option<Line> {
        self.result.map(|(_, line)| line)
    }

    /// The three cells of the winning line, for highlighting.
    pub fn winning_cells(&self) -> Option<[Pos; 3]> {
        self.winning_line().map(Line::cells)
    }

    pub fn status(&self) -> GameStatus {
        match self.result {
            Some((winner, line)) => GameStatus::Ended { winner, line },
            None => GameStatus::InProgress { turn: self.turn },
        }
    }

    /// Top unit of a cell; `None` if the cell is empty or off the board.
    pub fn cell_top_unit(&self, row: u8, col: u8) -> Option<Unit> {
        Pos::try_from_row_col(row, col).and_then(|pos| self.board.top_unit(pos))
    }

    /// Full stack of a cell, bottom to top. Empty if off the board.
    pub fn cell_stack(&self, row: u8, col: u8) -> &[Unit] {
        match Pos::try_from_row_col(row, col) {
            Some(pos) => self.board.stack(pos),
            None => &[],
        }
    }

    /// Units of `(player, size)` still in reserve; `None` under the
    /// unlimited rule.
    pub fn reserve(&self, player: Player, size: Size) -> Option<u8> {
        match self.rules.reserve {
            ReserveRule::Tracked => Some(self.reserves[player.index()][size.index()]),
            ReserveRule::Unlimited => None,
        }
    }

    /// Reserve counts as [small, medium, large]; `None` under the
    /// unlimited rule.
    pub fn reserves(&self, player: Player) -> Option<[u8; 3]> {
        match self.rules.reserve {
            ReserveRule::Tracked => Some(self.reserves[player.index()]),
            ReserveRule::Unlimited => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: Pos::all().map(|pos| self.board.stack(pos).to_vec()).collect(),
            reserves: match self.rules.reserve {
                ReserveRule::Tracked => Some(self.reserves),
                ReserveRule::Unlimited => None,
            },
            turn: self.turn,
            ended: self.is_ended(),
            winner: self.winner(),
            winning_line: self.winning_line(),
        }
    }

    // ========== Legality ==========

    /// Whether `player` may put a `size` unit at `(row, col)` from `source`.
    /// Pure query.
    pub fn can_place(&self, player: Player, row: u8, col: u8, size: Size, source: Source) -> bool {
        self.check_move(&Move { player, row, col, size, source }).is_ok()
    }

    /// Like [`can_place`](GameEngine::can_place), but names the first rule
    /// the move breaks.
    pub fn check_move(&self, mov: &Move) -> Result<(), MoveError> {
        self.resolve(mov).map(|_| ())
    }

    /// Validate a move and turn its coordinates into positions.
    ///
    /// Checks run in order: game over, bounds, turn, source, destination.
    fn resolve(&self, mov: &Move) -> Result<Resolved, MoveError> {
        if self.result.is_some() {
            return Err(MoveError::GameOver);
        }
        let to = Pos::try_from_row_col(mov.row, mov.col)
            .ok_or(MoveError::OutOfBounds { row: mov.row, col: mov.col })?;
        if mov.player != self.turn {
            return Err(MoveError::WrongTurn { player: mov.player });
        }

        let from = match mov.source {
            Source::Reserve => {
                if self.rules.tracks_reserve()
                    && self.reserves[mov.player.index()][mov.size.index()] == 0
                {
                    return Err(MoveError::ReserveEmpty { player: mov.player, size: mov.size });
                }
                None
            }
            Source::Cell { row, col } => {
                let from = Pos::try_from_row_col(row, col)
                    .ok_or(MoveError::OutOfBounds { row, col })?;
                if self.board.top_unit(from) != Some(mov.unit()) {
                    return Err(MoveError::SourceMismatch {
                        row,
                        col,
                        player: mov.player,
                        size: mov.size,
                    });
                }
                Some(from)
            }
        };

        if let Some(top) = self.board.top_unit(to) {
            if !mov.size.can_gobble(top.size) {
                return Err(MoveError::CannotCover {
                    row: mov.row,
                    col: mov.col,
                    size: mov.size,
                    top: top.size,
                });
            }
        }

        Ok(Resolved { to, from })
    }

    /// Every move the player to move could make, reserve placements first.
    /// Relocations onto their own source cell are never legal and are not
    /// listed.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(32);
        if self.is_ended() {
            return moves;
        }
        let player = self.turn;

        for size in Size::all() {
            for to in Pos::all().filter(|&to| self.board.can_place(size, to)) {
                let mov = Move::from_reserve(player, size, to.row(), to.col());
                if self.check_move(&mov).is_ok() {
                    moves.push(mov);
                }
            }
        }

        for from in Pos::all() {
            let Some(unit) = self.board.top_unit(from) else {
                continue;
            };
            if unit.owner != player {
                continue;
            }
            let targets =
                Pos::all().filter(|&to| to != from && self.board.can_place(unit.size, to));
            for to in targets {
                let mov = Move::relocate(
                    player,
                    unit.size,
                    (from.row(), from.col()),
                    (to.row(), to.col()),
                );
                if self.check_move(&mov).is_ok() {
                    moves.push(mov);
                }
            }
        }

        moves
    }

    // ========== Mutation ==========

    /// Put a `size` unit of `player` at `(row, col)` from `source`.
    pub fn apply_move(
        &mut self,
        player: Player,
        row: u8,
        col: u8,
        size: Size,
        source: Source,
    ) -> MoveOutcome {
        self.apply(Move { player, row, col, size, source })
    }

    /// Apply a move.
    ///
    /// A relocation lifts the unit first and scans for a completed line
    /// before putting it down. If lifting exposed one, the game ends right
    /// there with [`MoveOutcome::WinsForOpponent`]: the unit is left off the
    /// board and the turn does not pass.
    #[instrument(
        skip(self),
        fields(player = ?mov.player, size = ?mov.size, row = mov.row, col = mov.col)
    )]
    pub fn apply(&mut self, mov: Move) -> MoveOutcome {
        let Resolved { to, from } = match self.resolve(&mov) {
            Ok(resolved) => resolved,
            Err(err) => {
                debug!(error = %err, "move rejected");
                return MoveOutcome::Rejected(err);
            }
        };
        let unit = mov.unit();

        if let Some(from) = from {
            self.board.pop_top(from);
            if let Some((winner, line)) = self.board.find_win() {
                self.finish(winner, line);
                return MoveOutcome::WinsForOpponent;
            }
        }

        self.board.push_unit(to, unit);
        if from.is_none() && self.rules.tracks_reserve() {
            self.reserves[mov.player.index()][mov.size.index()] -= 1;
        }
        self.turn = self.turn.opponent();

        if let Some((winner, line)) = self.board.find_win() {
            self.finish(winner, line);
            return MoveOutcome::WinConfirmed;
        }

        debug!(next = ?self.turn, "move applied");
        MoveOutcome::Applied
    }

    fn finish(&mut self, winner: Player, line: Line) {
        info!(winner = ?winner, line = line.index(), "game over");
        self.result = Some((winner, line));
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}
