//! WASM bindings for gobblet-engine
//!
//! Provides a JavaScript-friendly API for a browser presentation layer.
//! Players, sizes and coordinates cross the boundary as zero-based numbers.

use wasm_bindgen::prelude::*;

use crate::{GameEngine, MoveOutcome, Player, Rules, Size, Source, Unit};

/// Outcome codes returned by `applyMove`.
pub const OUTCOME_REJECTED: u8 = 0;
pub const OUTCOME_APPLIED: u8 = 1;
pub const OUTCOME_WIN_CONFIRMED: u8 = 2;
pub const OUTCOME_WINS_FOR_OPPONENT: u8 = 3;

/// Sentinel for "none" in numeric getters.
pub const NONE: i8 = -1;

/// WASM-friendly wrapper around GameEngine
#[wasm_bindgen]
pub struct WasmEngine {
    inner: GameEngine,
}

#[wasm_bindgen]
impl WasmEngine {
    /// Create a new game with the reserve-tracking rules
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmEngine {
        WasmEngine { inner: GameEngine::new() }
    }

    /// Create a new game where reserves never run out
    #[wasm_bindgen(js_name = withUnlimitedReserve)]
    pub fn with_unlimited_reserve() -> WasmEngine {
        WasmEngine { inner: GameEngine::with_rules(Rules::unlimited()) }
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Check a move without applying it.
    /// `src_row`/`src_col` are null for a placement from reserve.
    #[wasm_bindgen(js_name = canPlace)]
    pub fn can_place(
        &self,
        player: u8,
        row: u8,
        col: u8,
        size: u8,
        src_row: Option<u8>,
        src_col: Option<u8>,
    ) -> bool {
        match decode(player, size, src_row, src_col) {
            Some((player, size, source)) => self.inner.can_place(player, row, col, size, source),
            None => false,
        }
    }

    /// Apply a move. Returns one of the `OUTCOME_*` codes.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(
        &mut self,
        player: u8,
        row: u8,
        col: u8,
        size: u8,
        src_row: Option<u8>,
        src_col: Option<u8>,
    ) -> u8 {
        let Some((player, size, source)) = decode(player, size, src_row, src_col) else {
            return OUTCOME_REJECTED;
        };
        match self.inner.apply_move(player, row, col, size, source) {
            MoveOutcome::Rejected(_) => OUTCOME_REJECTED,
            MoveOutcome::Applied => OUTCOME_APPLIED,
            MoveOutcome::WinConfirmed => OUTCOME_WIN_CONFIRMED,
            MoveOutcome::WinsForOpponent => OUTCOME_WINS_FOR_OPPONENT,
        }
    }

    /// Top unit of a cell as [player, size], or an empty array
    #[wasm_bindgen(js_name = cellTopUnit)]
    pub fn cell_top_unit(&self, row: u8, col: u8) -> Vec<u8> {
        self.inner
            .cell_top_unit(row, col)
            .map(encode_unit)
            .map(|pair| pair.to_vec())
            .unwrap_or_default()
    }

    /// Get cell stack as array of [player, size, player, size, ...]
    /// Bottom to top order
    #[wasm_bindgen(js_name = cellStack)]
    pub fn cell_stack(&self, row: u8, col: u8) -> Vec<u8> {
        self.inner
            .cell_stack(row, col)
            .iter()
            .copied()
            .flat_map(encode_unit)
            .collect()
    }

    /// Player to move (0 or 1)
    #[wasm_bindgen(js_name = turnPlayer)]
    pub fn turn_player(&self) -> u8 {
        self.inner.turn_player() as u8
    }

    #[wasm_bindgen(js_name = isEnded)]
    pub fn is_ended(&self) -> bool {
        self.inner.is_ended()
    }

    /// Winner (0 or 1), or -1 while the game is running
    pub fn winner(&self) -> i8 {
        self.inner.winner().map_or(NONE, |p| p as i8)
    }

    /// Winning line index (0-7), or -1 while the game is running
    #[wasm_bindgen(js_name = winningLine)]
    pub fn winning_line(&self) -> i8 {
        self.inner.winning_line().map_or(NONE, |line| line.index() as i8)
    }

    /// Winning cells as [row, col, row, col, row, col]
    /// Returns empty array if no winner
    #[wasm_bindgen(js_name = winningCells)]
    pub fn winning_cells(&self) -> Vec<u8> {
        match self.inner.winning_cells() {
            Some(cells) => cells.iter().flat_map(|pos| [pos.row(), pos.col()]).collect(),
            None => vec![],
        }
    }

    /// Get reserves for a player as [small, medium, large]
    /// Returns empty array under the unlimited rule
    pub fn reserves(&self, player: u8) -> Vec<u8> {
        Player::from_index(player)
            .and_then(|p| self.inner.reserves(p))
            .map(|counts| counts.to_vec())
            .unwrap_or_default()
    }

    /// Legal moves for the player to move, as JSON
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.legal_moves()).map_err(JsValue::from)
    }

    /// Whole game state as JSON
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.snapshot()).map_err(JsValue::from)
    }
}

impl Default for WasmEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(
    player: u8,
    size: u8,
    src_row: Option<u8>,
    src_col: Option<u8>,
) -> Option<(Player, Size, Source)> {
    let player = Player::from_index(player)?;
    let size = Size::from_index(size)?;
    let source = match (src_row, src_col) {
        (Some(row), Some(col)) => Source::Cell { row, col },
        (None, None) => Source::Reserve,
        _ => return None,
    };
    Some((player, size, source))
}

fn encode_unit(unit: Unit) -> [u8; 2] {
    [unit.owner as u8, unit.size as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reserve_and_cell() {
        assert_eq!(decode(0, 1, None, None), Some((Player::One, Size::Medium, Source::Reserve)));
        assert_eq!(
            decode(1, 2, Some(0), Some(2)),
            Some((Player::Two, Size::Large, Source::Cell { row: 0, col: 2 }))
        );
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(decode(2, 0, None, None), None);
        assert_eq!(decode(0, 3, None, None), None);
        assert_eq!(decode(0, 0, Some(1), None), None);
    }

    #[test]
    fn test_apply_move_codes() {
        let mut engine = WasmEngine::new();
        assert_eq!(engine.apply_move(0, 1, 1, 1, None, None), OUTCOME_APPLIED);
        assert_eq!(engine.turn_player(), 1);
        assert_eq!(engine.cell_top_unit(1, 1), vec![0, 1]);
        assert_eq!(engine.apply_move(1, 1, 1, 0, None, None), OUTCOME_REJECTED);
        assert_eq!(engine.reserves(0), vec![2, 1, 2]);
        assert_eq!(engine.winner(), NONE);
    }
}
