//! Selection state machine
//!
//! Toggling a tile flips its membership; after every change the current
//! selection is evaluated:
//!
//! - a valid match is handed back and the selection cleared,
//! - a selection that no superset could ever complete is dropped,
//! - anything else stays selected, waiting for more input.
//!
//! Order is kept (insertion order) because math-operations arrangements are
//! evaluated in selection order.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::evaluator::{can_extend, evaluate};
use crate::types::{Expression, GameMode, ResetReason, TileId, MAX_CELLS};

/// Result of a single toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Tile is not on the board; nothing changed.
    Rejected,
    /// Tile toggled, selection waiting for more tiles.
    Pending { selected: bool },
    /// Selection formed a match and was cleared.
    Matched {
        tiles: Vec<TileId>,
        values: Vec<u32>,
        expression: Expression,
    },
    /// Selection can no longer match and was cleared.
    Reset {
        tiles: Vec<TileId>,
        reason: ResetReason,
    },
}

/// Ordered set of selected tile ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: ArrayVec<TileId, MAX_CELLS>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[TileId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Flip membership of `id`. Returns true if the tile is now selected.
    pub fn toggle(&mut self, id: TileId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            // A board never has more than MAX_CELLS tiles.
            self.ids.try_push(id).is_ok()
        }
    }

    /// Values of the selected tiles in selection order.
    pub fn values(&self, board: &Board) -> Vec<u32> {
        self.ids
            .iter()
            .filter_map(|&id| board.tile(id).map(|t| t.value))
            .collect()
    }

    /// Drop ids that are no longer on the board.
    pub fn retain_on(&mut self, board: &Board) {
        self.ids.retain(|id| board.contains(*id));
    }

    /// Toggle `id` and evaluate the result against `board` in `mode`.
    pub fn apply(&mut self, board: &Board, mode: GameMode, id: TileId) -> SelectionOutcome {
        if !board.contains(id) {
            return SelectionOutcome::Rejected;
        }
        let selected = self.toggle(id);
        let values = self.values(board);

        if let Some(expression) = evaluate(&values, mode) {
            let tiles = self.ids.to_vec();
            self.clear();
            return SelectionOutcome::Matched {
                tiles,
                values,
                expression,
            };
        }

        if !can_extend(&values, mode) {
            let tiles = self.ids.to_vec();
            self.clear();
            let reason = match mode {
                GameMode::Addition => ResetReason::Overshoot,
                GameMode::MathOperations => ResetReason::OperandLimit,
            };
            return SelectionOutcome::Reset { tiles, reason };
        }

        SelectionOutcome::Pending { selected }
    }
}
