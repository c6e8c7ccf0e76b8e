//! Board module - manages the tile grid
//!
//! The board is a square grid (4x4 up to 8x8) stored as a flat row-major array.
//! Each cell is either empty or holds exactly one [`Tile`]; tile ids are unique
//! within a board and stay stable while the tile is on it.
//! Coordinates: (row, col) where row 0 is the top and col 0 is the left edge.

use serde::Serialize;

use crate::rng::SimpleRng;
use crate::types::{GameMode, TileId, ADDITION_FILLER_MAX, MATH_FILLER_MAX, TARGET_SUM};

/// A numeric tile on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub row: usize,
    pub col: usize,
    /// Set on tiles handed back by [`Board::remove`].
    pub matched: bool,
}

/// Square grid of tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    size: usize,
    /// Row-major cells (row * size + col)
    cells: Vec<Option<Tile>>,
    next_id: u32,
}

impl Board {
    /// Create an empty board with the given side length
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
            next_id: 0,
        }
    }

    /// Build a board from row-major values; missing values leave cells empty.
    pub fn from_values(size: usize, values: &[u32]) -> Self {
        let mut board = Self::empty(size);
        for (idx, &value) in values.iter().take(size * size).enumerate() {
            let id = board.alloc_id();
            board.cells[idx] = Some(Tile {
                id,
                value,
                row: idx / size,
                col: idx % size,
                matched: false,
            });
        }
        board
    }

    fn alloc_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(row * self.size + col)
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Tile at (row, col); None if empty or out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&Tile> {
        self.index(row, col).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Tile by id
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tile(id).is_some()
    }

    /// Tiles currently on the board in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells.iter().flatten()
    }

    /// Values of the remaining tiles in row-major order
    pub fn values(&self) -> Vec<u32> {
        self.tiles().map(|t| t.value).collect()
    }

    /// Number of tiles left
    pub fn remaining(&self) -> usize {
        self.tiles().count()
    }

    /// Every cell has been matched away
    pub fn is_cleared(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Remove the given tiles; returns them flagged as matched.
    ///
    /// Ids not on the board are skipped.
    pub fn remove(&mut self, ids: &[TileId]) -> Vec<Tile> {
        let mut removed = Vec::with_capacity(ids.len());
        for cell in self.cells.iter_mut() {
            if let Some(tile) = cell {
                if ids.contains(&tile.id) {
                    removed.push(Tile {
                        matched: true,
                        ..*tile
                    });
                    *cell = None;
                }
            }
        }
        removed
    }

    /// Let tiles fall to the bottom of their column.
    ///
    /// Two-pointer pass per column, bottom to top. Returns the number of tiles moved.
    pub fn collapse(&mut self) -> usize {
        let mut moved = 0;
        for col in 0..self.size {
            let mut write_row = self.size;
            for read_row in (0..self.size).rev() {
                let read_idx = read_row * self.size + col;
                if let Some(mut tile) = self.cells[read_idx].take() {
                    write_row -= 1;
                    if write_row != read_row {
                        moved += 1;
                    }
                    tile.row = write_row;
                    self.cells[write_row * self.size + col] = Some(tile);
                }
            }
        }
        moved
    }

    /// Fill every empty cell with a fresh filler tile. Returns the number of tiles added.
    pub fn refill(&mut self, rng: &mut SimpleRng, mode: GameMode) -> usize {
        let mut added = 0;
        for idx in 0..self.cells.len() {
            if self.cells[idx].is_none() {
                let id = self.alloc_id();
                self.cells[idx] = Some(Tile {
                    id,
                    value: filler_value(rng, mode),
                    row: idx / self.size,
                    col: idx % self.size,
                    matched: false,
                });
                added += 1;
            }
        }
        added
    }

    /// Value grid for views; `None` marks an empty cell.
    pub fn value_grid(&self) -> Vec<Vec<Option<u32>>> {
        self.cells
            .chunks(self.size.max(1))
            .map(|row| row.iter().map(|c| c.map(|t| t.value)).collect())
            .collect()
    }
}

/// Random non-seeded value for the given mode.
///
/// Addition draws 1..=9. Math operations draws 1..=20 and never the target itself,
/// otherwise a single tile paired with an identity operand would be a free match.
pub fn filler_value(rng: &mut SimpleRng, mode: GameMode) -> u32 {
    match mode {
        GameMode::Addition => rng.next_in(1, ADDITION_FILLER_MAX),
        GameMode::MathOperations => loop {
            let v = rng.next_in(1, MATH_FILLER_MAX);
            if v != TARGET_SUM {
                return v;
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_3x3() -> Board {
        Board::from_values(3, &[1, 2, 3, 4, 5, 6, 7, 8, 9])
    }

    #[test]
    fn test_from_values_places_row_major() {
        let board = board_3x3();
        assert_eq!(board.size(), 3);
        assert_eq!(board.get(0, 0).map(|t| t.value), Some(1));
        assert_eq!(board.get(1, 2).map(|t| t.value), Some(6));
        assert_eq!(board.get(2, 2).map(|t| (t.row, t.col)), Some((2, 2)));
        assert!(board.get(3, 0).is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let board = board_3x3();
        let mut ids: Vec<_> = board.tiles().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn test_remove_marks_matched_and_empties_cells() {
        let mut board = board_3x3();
        let a = board.get(0, 0).unwrap().id;
        let b = board.get(2, 1).unwrap().id;

        let removed = board.remove(&[a, b, TileId(999)]);
        assert_eq!(removed.len(), 2);
        assert!(removed.iter().all(|t| t.matched));
        assert!(board.get(0, 0).is_none());
        assert!(!board.contains(b));
        assert_eq!(board.remaining(), 7);
    }

    #[test]
    fn test_collapse_drops_tiles_down() {
        let mut board = board_3x3();
        let bottom = board.get(2, 0).unwrap().id;
        let top = board.get(0, 0).unwrap().id;
        board.remove(&[bottom]);

        let moved = board.collapse();
        assert_eq!(moved, 2);
        assert!(board.get(0, 0).is_none());
        let fallen = board.tile(top).unwrap();
        assert_eq!((fallen.row, fallen.col), (1, 0));
        assert_eq!(board.get(2, 0).map(|t| t.value), Some(4));
    }

    #[test]
    fn test_refill_uses_fresh_ids() {
        let mut board = board_3x3();
        let ids: Vec<_> = board.tiles().map(|t| t.id).collect();
        board.remove(&ids[..3]);
        board.collapse();

        let mut rng = SimpleRng::new(3);
        assert_eq!(board.refill(&mut rng, GameMode::Addition), 3);
        assert_eq!(board.remaining(), 9);
        for tile in board.tiles() {
            assert!((1..=9).contains(&tile.value));
        }
        let new_ids: Vec<_> = board.tiles().filter(|t| !ids.contains(&t.id)).collect();
        assert_eq!(new_ids.len(), 3);
    }

    #[test]
    fn test_is_cleared() {
        let mut board = Board::from_values(2, &[6, 6, 3, 9]);
        assert!(!board.is_cleared());
        let ids: Vec<_> = board.tiles().map(|t| t.id).collect();
        board.remove(&ids);
        assert!(board.is_cleared());
    }

    #[test]
    fn test_math_filler_never_target() {
        let mut rng = SimpleRng::new(11);
        for _ in 0..2000 {
            let v = filler_value(&mut rng, GameMode::MathOperations);
            assert!((1..=20).contains(&v));
            assert_ne!(v, TARGET_SUM);
        }
    }

    #[test]
    fn test_value_grid() {
        let mut board = Board::from_values(2, &[1, 2, 3, 4]);
        let id = board.get(0, 1).unwrap().id;
        board.remove(&[id]);
        assert_eq!(
            board.value_grid(),
            vec![vec![Some(1), None], vec![Some(3), Some(4)]]
        );
    }
}
