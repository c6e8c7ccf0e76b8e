//! Board generator - builds a solvable board for a level
//!
//! A fresh board is seeded with curated value groups that are known to make 12,
//! padded with filler values and shuffled. Because every seed group lands on the
//! board whole, the board always holds at least one valid match.

use crate::board::{filler_value, Board};
use crate::evaluator::is_valid_match;
use crate::rng::SimpleRng;
use crate::types::{GameMode, MAX_BOARD_SIZE, MIN_BOARD_SIZE};

const ADDITION_GROUPS: &[&[u32]] = &[&[3, 4, 5], &[6, 6], &[7, 5], &[8, 4], &[9, 3]];

// `[12, 0]` only works as 12 + 0; it is filtered out by `usable_groups`.
const MATH_GROUPS: &[&[u32]] = &[&[10, 2], &[15, 3], &[20, 8], &[18, 6], &[12, 0]];

/// Side length of the board for a level: grows by one every three levels.
pub fn board_size(level: u32) -> usize {
    let grown = MIN_BOARD_SIZE.saturating_add((level / 3) as usize);
    grown.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE)
}

/// Raw curated groups for a mode, before filtering.
pub fn seed_groups(mode: GameMode) -> &'static [&'static [u32]] {
    match mode {
        GameMode::Addition => ADDITION_GROUPS,
        GameMode::MathOperations => MATH_GROUPS,
    }
}

/// Curated groups that are safe to seed: no zero operand and a valid match on their own.
pub fn usable_groups(mode: GameMode) -> impl Iterator<Item = &'static [u32]> {
    seed_groups(mode)
        .iter()
        .copied()
        .filter(move |group| !group.contains(&0) && is_valid_match(group, mode))
}

/// Tile values for a board of `size * size` cells, before placement.
///
/// Groups that do not fit whole are skipped so the board stays solvable.
pub fn tile_pool(size: usize, mode: GameMode, rng: &mut SimpleRng) -> Vec<u32> {
    let cells = size * size;
    let mut pool = Vec::with_capacity(cells);
    for group in usable_groups(mode) {
        if pool.len() + group.len() <= cells {
            pool.extend_from_slice(group);
        }
    }
    while pool.len() < cells {
        pool.push(filler_value(rng, mode));
    }
    rng.shuffle(&mut pool);
    pool
}

/// Generate the board for `level` in `mode`.
pub fn generate(level: u32, mode: GameMode, rng: &mut SimpleRng) -> Board {
    let size = board_size(level);
    let pool = tile_pool(size, mode, rng);
    log::debug!("generated {}x{} {} board for level {}", size, size, mode, level);
    Board::from_values(size, &pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::has_valid_combination;

    #[test]
    fn test_board_size_growth_and_bounds() {
        assert_eq!(board_size(1), 4);
        assert_eq!(board_size(2), 4);
        assert_eq!(board_size(3), 5);
        assert_eq!(board_size(6), 6);
        assert_eq!(board_size(12), 8);
        assert_eq!(board_size(50), 8);
        assert_eq!(board_size(u32::MAX), 8);
    }

    #[test]
    fn test_degenerate_group_filtered() {
        let groups: Vec<_> = usable_groups(GameMode::MathOperations).collect();
        assert!(!groups.iter().any(|g| g.contains(&0)));
        assert_eq!(groups.len(), 4);
        assert_eq!(usable_groups(GameMode::Addition).count(), 5);
    }

    #[test]
    fn test_every_usable_group_matches() {
        for mode in [GameMode::Addition, GameMode::MathOperations] {
            for group in usable_groups(mode) {
                assert!(is_valid_match(group, mode), "{:?} in {}", group, mode);
            }
        }
    }

    #[test]
    fn test_board_is_full_and_sized() {
        let mut rng = SimpleRng::new(9);
        let board = generate(7, GameMode::Addition, &mut rng);
        assert_eq!(board.size(), 6);
        assert_eq!(board.remaining(), 36);
    }

    #[test]
    fn test_pool_contains_seed_groups() {
        let mut rng = SimpleRng::new(1);
        let mut pool = tile_pool(4, GameMode::MathOperations, &mut rng);
        for v in [15, 3, 20, 8, 18, 6, 10, 2] {
            let pos = pool.iter().position(|&p| p == v);
            assert!(pos.is_some(), "missing {}", v);
            if let Some(i) = pos {
                pool.swap_remove(i);
            }
        }
        assert!(pool.iter().all(|&v| v != 12 && (1..=20).contains(&v)));
    }

    #[test]
    fn test_generated_board_is_solvable() {
        let mut rng = SimpleRng::new(2024);
        for level in 1..=20 {
            for mode in [GameMode::Addition, GameMode::MathOperations] {
                let board = generate(level, mode, &mut rng);
                assert!(has_valid_combination(&board.values(), mode));
            }
        }
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = generate(4, GameMode::Addition, &mut SimpleRng::new(77));
        let b = generate(4, GameMode::Addition, &mut SimpleRng::new(77));
        assert_eq!(a.values(), b.values());
    }
}
