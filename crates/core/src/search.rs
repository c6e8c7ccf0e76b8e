//! Remaining-combination search
//!
//! Used twice: after every match to decide whether the level can go on, and on
//! demand to produce a hint. Both searches are bounded for the largest board.
//!
//! - **Addition**: 0/1 subset-sum over sums `0..=12`, kept as a bitset for the
//!   yes/no question and as a parent table when the tiles themselves are needed.
//!   Values of 0 or above the target can never be part of a match and are skipped.
//! - **Math operations**: matches use two or three operands, so the search
//!   enumerates ordered pairs and triples over the *distinct* values present,
//!   respecting how many tiles carry each value.

use std::collections::BTreeMap;

use crate::evaluator::is_valid_match;
use crate::types::{GameMode, TileId, TARGET_SUM};

const TARGET: usize = TARGET_SUM as usize;

/// True iff some subset of `values` forms a valid match in `mode`.
pub fn has_valid_combination(values: &[u32], mode: GameMode) -> bool {
    match mode {
        GameMode::Addition => {
            let full: u32 = (1 << (TARGET + 1)) - 1;
            let mut reach: u32 = 1;
            for &v in values {
                if v == 0 || v > TARGET_SUM {
                    continue;
                }
                reach |= (reach << v) & full;
                if reach & (1 << TARGET) != 0 {
                    return true;
                }
            }
            false
        }
        GameMode::MathOperations => math_operands(&value_counts(values.iter().copied())).is_some(),
    }
}

/// Find tiles forming a valid match, in an order the evaluator accepts.
///
/// Math operations prefers two-tile matches over three-tile ones.
pub fn find_combination(tiles: &[(TileId, u32)], mode: GameMode) -> Option<Vec<TileId>> {
    match mode {
        GameMode::Addition => addition_subset(tiles),
        GameMode::MathOperations => {
            let operands = math_operands(&value_counts(tiles.iter().map(|&(_, v)| v)))?;
            let mut pool: Vec<(TileId, u32)> = tiles.to_vec();
            let mut picked = Vec::with_capacity(operands.len());
            for value in operands {
                let pos = pool.iter().position(|&(_, v)| v == value)?;
                picked.push(pool.swap_remove(pos).0);
            }
            Some(picked)
        }
    }
}

fn addition_subset(tiles: &[(TileId, u32)]) -> Option<Vec<TileId>> {
    let mut reached = [false; TARGET + 1];
    // from[s] = (tile index, previous sum) that first reached s
    let mut from: [Option<(usize, usize)>; TARGET + 1] = [None; TARGET + 1];
    reached[0] = true;

    for (i, &(_, value)) in tiles.iter().enumerate() {
        let v = value as usize;
        if v == 0 || v > TARGET {
            continue;
        }
        for s in (v..=TARGET).rev() {
            if reached[s - v] && !reached[s] {
                reached[s] = true;
                from[s] = Some((i, s - v));
            }
        }
        if reached[TARGET] {
            break;
        }
    }

    if !reached[TARGET] {
        return None;
    }
    let mut picked = Vec::new();
    let mut s = TARGET;
    while s > 0 {
        let (i, prev) = from[s]?;
        picked.push(tiles[i].0);
        s = prev;
    }
    picked.reverse();
    Some(picked)
}

fn value_counts(values: impl Iterator<Item = u32>) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Operand values (in evaluation order) of the first match found.
fn math_operands(counts: &BTreeMap<u32, usize>) -> Option<Vec<u32>> {
    let distinct: Vec<u32> = counts.keys().copied().collect();
    let available = |picked: &[u32]| {
        picked.iter().all(|v| {
            let used = picked.iter().filter(|&p| p == v).count();
            used <= counts.get(v).copied().unwrap_or(0)
        })
    };
    let mode = GameMode::MathOperations;

    for &a in &distinct {
        for &b in &distinct {
            let pick = [a, b];
            if available(&pick) && is_valid_match(&pick, mode) {
                return Some(pick.to_vec());
            }
        }
    }
    for &a in &distinct {
        for &b in &distinct {
            for &c in &distinct {
                let pick = [a, b, c];
                if available(&pick) && is_valid_match(&pick, mode) {
                    return Some(pick.to_vec());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;

    fn tiles(values: &[u32]) -> Vec<(TileId, u32)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (TileId(i as u32), v))
            .collect()
    }

    fn values_of(tiles: &[(TileId, u32)], ids: &[TileId]) -> Vec<u32> {
        ids.iter()
            .filter_map(|id| tiles.iter().find(|(t, _)| t == id).map(|&(_, v)| v))
            .collect()
    }

    #[test]
    fn test_addition_subset_sum() {
        let m = GameMode::Addition;
        assert!(has_valid_combination(&[1, 2, 9], m));
        assert!(has_valid_combination(&[5, 5, 1, 1], m));
        assert!(!has_valid_combination(&[5, 5, 1], m));
        assert!(!has_valid_combination(&[13, 20, 0], m));
        assert!(!has_valid_combination(&[], m));
        assert!(has_valid_combination(&[12], m));
    }

    #[test]
    fn test_addition_large_board_without_match() {
        // 5 + 5 + 1 + 1 is the only way to 12 here.
        let mut values = vec![5; 62];
        values.extend([1, 1]);
        assert!(has_valid_combination(&values, GameMode::Addition));
        values.pop();
        assert!(!has_valid_combination(&values, GameMode::Addition));
        let only_fives = vec![5; 64];
        assert!(!has_valid_combination(&only_fives, GameMode::Addition));
        let only_sevens = vec![7; 64];
        assert!(!has_valid_combination(&only_sevens, GameMode::Addition));
    }

    #[test]
    fn test_find_addition_uses_distinct_tiles() {
        let t = tiles(&[9, 6, 2, 1, 4]);
        let ids = find_combination(&t, GameMode::Addition).unwrap();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
        assert_eq!(values_of(&t, &ids).iter().sum::<u32>(), 12);
    }

    #[test]
    fn test_find_addition_none() {
        assert_eq!(find_combination(&tiles(&[5, 5, 1]), GameMode::Addition), None);
    }

    #[test]
    fn test_math_pairs_respect_multiplicity() {
        let m = GameMode::MathOperations;
        // 6 + 6 needs two sixes.
        assert!(!has_valid_combination(&[6, 1], m));
        assert!(has_valid_combination(&[6, 6], m));
    }

    #[test]
    fn test_math_triples() {
        let m = GameMode::MathOperations;
        // No pair reaches 12, but 5 + 5 + 2 does.
        assert!(!has_valid_combination(&[5, 5], m));
        assert!(has_valid_combination(&[5, 5, 2], m));
        assert!(!has_valid_combination(&[1, 1, 1], m));
    }

    #[test]
    fn test_find_math_returns_evaluable_order() {
        let t = tiles(&[1, 17, 19, 2, 24]);
        let ids = find_combination(&t, GameMode::MathOperations).unwrap();
        let values = values_of(&t, &ids);
        assert!(evaluate(&values, GameMode::MathOperations).is_some());
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_find_math_three_tiles() {
        let t = tiles(&[5, 19, 5, 2]);
        let ids = find_combination(&t, GameMode::MathOperations).unwrap();
        assert_eq!(ids.len(), 3);
        assert!(evaluate(&values_of(&t, &ids), GameMode::MathOperations).is_some());
    }
}
