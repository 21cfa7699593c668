//! Board representation: nine LIFO stacks of units.
//!
//! The board knows the stacking rule and how to scan for a completed line,
//! but nothing about turns or reserves. Those live in the engine.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Line, Player, Pos, Size, Unit};

/// One cell's stack, bottom to top. The stacking rule keeps sizes strictly
/// increasing, so three units fit inline.
pub type Stack = SmallVec<[Unit; 3]>;

/// The 3x3 board, cells in row-major order.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Stack; 9],
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Board {
        Board::default()
    }

    /// The full stack at a position, bottom to top.
    #[inline]
    pub fn stack(&self, pos: Pos) -> &[Unit] {
        &self.cells[pos.index()]
    }

    /// Get the top (visible) unit at a position.
    /// Returns None if the cell is empty.
    #[inline]
    pub fn top_unit(&self, pos: Pos) -> Option<Unit> {
        self.cells[pos.index()].last().copied()
    }

    /// Check if a cell is empty.
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.cells[pos.index()].is_empty()
    }

    /// Add a unit to a cell (push onto stack).
    /// Does NOT validate - caller must ensure the move is legal.
    #[inline]
    pub fn push_unit(&mut self, pos: Pos, unit: Unit) {
        self.cells[pos.index()].push(unit);
    }

    /// Remove the top unit from a cell.
    /// Returns the unit that was removed, or None if the cell was empty.
    #[inline]
    pub fn pop_top(&mut self, pos: Pos) -> Option<Unit> {
        self.cells[pos.index()].pop()
    }

    /// Check if a unit of the given size can be placed at this position.
    /// A unit can be placed if the cell is empty or the top unit is smaller.
    #[inline]
    pub fn can_place(&self, size: Size, pos: Pos) -> bool {
        match self.top_unit(pos) {
            None => true,
            Some(top) => size.can_gobble(top.size),
        }
    }

    /// Count units of each size on the board for a player, covered ones
    /// included. Returns [small_count, medium_count, large_count].
    pub fn units_on_board(&self, player: Player) -> [u8; 3] {
        let mut counts = [0u8; 3];
        for unit in self.cells.iter().flatten() {
            if unit.owner == player {
                counts[unit.size.index()] += 1;
            }
        }
        counts
    }

    /// Top unit at signed coordinates, `None` when off the board or empty.
    fn top_at(&self, row: i8, col: i8) -> Option<Unit> {
        if !(0..3).contains(&row) || !(0..3).contains(&col) {
            return None;
        }
        self.top_unit(Pos((row * 3 + col) as u8))
    }

    /// Scan the 8 lines in table order and return the owner and index of the
    /// first line whose three top units share an owner.
    ///
    /// Each line starts at its first cell; an empty first cell skips the
    /// line, otherwise the remaining two cells are walked along the line's
    /// direction vector.
    pub fn find_win(&self) -> Option<(Player, Line)> {
        for line in Line::all() {
            let def = line.def();
            let (mut row, mut col) = (def.start_row, def.start_col);
            let Some(first) = self.top_at(row, col) else {
                continue;
            };

            let mut matched = 1;
            while matched < 3 {
                row += def.d_row;
                col += def.d_col;
                match self.top_at(row, col) {
                    Some(unit) if unit.owner == first.owner => matched += 1,
                    _ => break,
                }
            }

            if matched == 3 {
                return Some((first.owner, line));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P1S: Unit = Unit::new(Player::One, Size::Small);
    const P1M: Unit = Unit::new(Player::One, Size::Medium);
    const P1L: Unit = Unit::new(Player::One, Size::Large);
    const P2S: Unit = Unit::new(Player::Two, Size::Small);
    const P2M: Unit = Unit::new(Player::Two, Size::Medium);
    const P2L: Unit = Unit::new(Player::Two, Size::Large);

    #[test]
    fn test_board_empty_cells() {
        let board = Board::new();
        for pos in Pos::all() {
            assert!(board.is_empty(pos));
            assert_eq!(board.top_unit(pos), None);
            assert!(board.stack(pos).is_empty());
        }
    }

    #[test]
    fn test_push_unit() {
        let mut board = Board::new();

        board.push_unit(Pos(0), P1S);
        assert_eq!(board.top_unit(Pos(0)), Some(P1S));

        // P2 Medium covers it
        board.push_unit(Pos(0), P2M);
        assert_eq!(board.top_unit(Pos(0)), Some(P2M));

        // The small unit is still there underneath
        assert_eq!(board.stack(Pos(0)), &[P1S, P2M]);
    }

    #[test]
    fn test_pop_top() {
        let mut board = Board::new();

        board.push_unit(Pos(0), P1S);
        board.push_unit(Pos(0), P2M);
        board.push_unit(Pos(0), P1L);

        assert_eq!(board.pop_top(Pos(0)), Some(P1L));
        assert_eq!(board.top_unit(Pos(0)), Some(P2M));

        assert_eq!(board.pop_top(Pos(0)), Some(P2M));
        assert_eq!(board.top_unit(Pos(0)), Some(P1S));

        assert_eq!(board.pop_top(Pos(0)), Some(P1S));
        assert_eq!(board.top_unit(Pos(0)), None);

        assert_eq!(board.pop_top(Pos(0)), None);
    }

    #[test]
    fn test_push_pop_roundtrip() {
        let mut board = Board::new();
        let original = board.clone();

        board.push_unit(Pos(4), P1M);
        assert_ne!(board, original);
        board.pop_top(Pos(4));
        assert_eq!(board, original);
    }

    #[test]
    fn test_can_place() {
        let mut board = Board::new();

        // Empty cell - any size can be placed
        assert!(board.can_place(Size::Small, Pos(0)));
        assert!(board.can_place(Size::Medium, Pos(0)));
        assert!(board.can_place(Size::Large, Pos(0)));

        board.push_unit(Pos(0), P1S);
        assert!(!board.can_place(Size::Small, Pos(0)));
        assert!(board.can_place(Size::Medium, Pos(0)));
        assert!(board.can_place(Size::Large, Pos(0)));

        board.push_unit(Pos(0), P2M);
        assert!(!board.can_place(Size::Small, Pos(0)));
        assert!(!board.can_place(Size::Medium, Pos(0)));
        assert!(board.can_place(Size::Large, Pos(0)));

        // Nothing can cover a Large
        board.push_unit(Pos(0), P1L);
        assert!(!board.can_place(Size::Small, Pos(0)));
        assert!(!board.can_place(Size::Medium, Pos(0)));
        assert!(!board.can_place(Size::Large, Pos(0)));
    }

    #[test]
    fn test_units_on_board_counts_covered_units() {
        let mut board = Board::new();
        assert_eq!(board.units_on_board(Player::One), [0, 0, 0]);

        board.push_unit(Pos(0), P1S);
        board.push_unit(Pos(1), P1S);
        board.push_unit(Pos(2), P1L);
        // P2 Large gobbles one of P1's smalls
        board.push_unit(Pos(0), P2L);

        assert_eq!(board.units_on_board(Player::One), [2, 0, 1]);
        assert_eq!(board.units_on_board(Player::Two), [0, 0, 1]);
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(board.find_win(), None);
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::new();
        board.push_unit(Pos(0), P1S);
        board.push_unit(Pos(1), P1M);
        board.push_unit(Pos(2), P1L);

        let (winner, line) = board.find_win().unwrap();
        assert_eq!(winner, Player::One);
        assert_eq!(line.index(), 0);
    }

    #[test]
    fn test_vertical_win() {
        let mut board = Board::new();
        board.push_unit(Pos(2), P2S);
        board.push_unit(Pos(5), P2M);
        board.push_unit(Pos(8), P2L);

        let (winner, line) = board.find_win().unwrap();
        assert_eq!(winner, Player::Two);
        assert_eq!(line.index(), 5);
    }

    #[test]
    fn test_anti_diagonal_win() {
        let mut board = Board::new();
        board.push_unit(Pos(6), P2S);
        board.push_unit(Pos(4), P2S);
        board.push_unit(Pos(2), P2M);

        let (winner, line) = board.find_win().unwrap();
        assert_eq!(winner, Player::Two);
        assert_eq!(line.index(), 7);
    }

    #[test]
    fn test_every_line_detected() {
        for line in Line::all() {
            let mut board = Board::new();
            for pos in line.cells() {
                board.push_unit(pos, P1S);
            }
            assert_eq!(
                board.find_win(),
                Some((Player::One, line)),
                "Failed for line {:?}",
                line
            );
        }
    }

    #[test]
    fn test_hidden_unit_doesnt_count() {
        let mut board = Board::new();

        board.push_unit(Pos(0), P1S);
        board.push_unit(Pos(1), P1S);
        // P1 also has a small at (0,2), but P2 gobbles it
        board.push_unit(Pos(2), P1S);
        board.push_unit(Pos(2), P2L);

        assert_eq!(board.find_win(), None);
    }

    #[test]
    fn test_mixed_owners_no_win() {
        let mut board = Board::new();
        board.push_unit(Pos(0), P1S);
        board.push_unit(Pos(1), P2M);
        board.push_unit(Pos(2), P1L);

        assert_eq!(board.find_win(), None);
    }

    #[test]
    fn test_first_line_in_table_order_wins() {
        let mut board = Board::new();

        // P1 holds both row 0 and column 0
        board.push_unit(Pos(0), P1L);
        board.push_unit(Pos(1), P1M);
        board.push_unit(Pos(2), P1S);
        board.push_unit(Pos(3), P1M);
        board.push_unit(Pos(6), P1S);

        let (_, line) = board.find_win().unwrap();
        assert_eq!(line.index(), 0);
    }

    #[test]
    fn test_two_in_every_line_is_no_win() {
        // X X .
        // O O .
        // X O .
        let mut board = Board::new();
        board.push_unit(Pos(0), P1S);
        board.push_unit(Pos(1), P1S);
        board.push_unit(Pos(3), P2S);
        board.push_unit(Pos(4), P2S);
        board.push_unit(Pos(6), P1M);
        board.push_unit(Pos(7), P2M);

        assert_eq!(board.find_win(), None);
    }
}
