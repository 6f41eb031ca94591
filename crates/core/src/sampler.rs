//! Weighted sampling over parallel item/weight slices.

use rand::Rng;

use crate::error::GenerationError;

/// Picks one item proportionally to `weights`.
///
/// Draws uniformly from `[0, sum)` and scans left to right, returning the
/// first item whose cumulative weight exceeds the roll; ties therefore
/// always resolve toward the earlier entry. Callers guarantee non-negative
/// weights and equal slice lengths.
pub(crate) fn pick_weighted<'a, T, R: Rng>(
    items: &'a [T],
    weights: &[f32],
    rng: &mut R,
) -> Result<&'a T, GenerationError> {
    debug_assert_eq!(items.len(), weights.len());
    debug_assert!(weights.iter().all(|weight| *weight >= 0.0));

    let total: f32 = weights.iter().sum();
    if items.is_empty() || total <= 0.0 {
        return Err(GenerationError::EmptyCandidateSet);
    }

    let roll = rng.gen_range(0.0..total);
    let mut cumulative = 0.0_f32;
    for (item, &weight) in items.iter().zip(weights) {
        cumulative += weight;
        if roll < cumulative {
            return Ok(item);
        }
    }

    // Float accumulation can leave the roll a hair past the final bucket;
    // fall back to the last entry that actually has weight.
    items
        .iter()
        .zip(weights)
        .rev()
        .find(|&(_, &weight)| weight > 0.0)
        .map(|(item, _)| item)
        .ok_or(GenerationError::EmptyCandidateSet)
}
