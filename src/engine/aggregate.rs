//! Mamdani implication and max aggregation over sampled curves

use crate::core::Degree;

/// Min-implication: cap every sample of a consequent term at the rule's
/// firing strength
pub fn clip(samples: &[f64], strength: Degree) -> Vec<f64> {
    let cap = strength.value();
    samples.iter().map(|&m| m.min(cap)).collect()
}

/// Zadeh union of `clipped` into `aggregate`, pointwise maximum
///
/// Both slices are sampled over the same universe.
pub fn accumulate(aggregate: &mut [f64], clipped: &[f64]) {
    debug_assert_eq!(aggregate.len(), clipped.len());
    for (current, &m) in aggregate.iter_mut().zip(clipped) {
        *current = current.max(m);
    }
}
