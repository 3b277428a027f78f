//! Core value types shared by every layer of the engine
//!
//! - [`Degree`] - a membership degree in [0, 1] with the Zadeh combinators
//! - [`Universe`] - an immutable, ordered sampling of a numeric range

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ErrorCode, FuzzyResult};
use crate::fuzzy_ensure;

/// A membership degree in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degree(f64);

impl Degree {
    pub const ZERO: Degree = Degree(0.0);
    pub const ONE: Degree = Degree(1.0);

    /// Clamps into [0, 1]; NaN becomes 0
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Fuzzy AND (Zadeh t-norm) - minimum
    pub fn and(&self, other: &Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Fuzzy OR (Zadeh t-conorm) - maximum
    pub fn or(&self, other: &Self) -> Self {
        Self(self.0.max(other.0))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl From<f64> for Degree {
    fn from(v: f64) -> Self {
        Self::new(v)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Upper bound on the number of points in one universe
pub const MAX_SAMPLES: usize = 1_000_000;

/// An ordered, finite sampling of a continuous numeric range
///
/// Sample `i` is computed as `min + i * step` rather than by repeated
/// addition, so two universes built from the same bounds hold bit-identical
/// points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Universe {
    min: f64,
    max: f64,
    points: Vec<f64>,
}

impl Universe {
    /// Sample `[min, max]` at `step` increments
    ///
    /// `max` is included when it falls on the grid (within a small relative
    /// tolerance), matching `arange(min, max + step, step)`.
    pub fn new(min: f64, max: f64, step: f64) -> FuzzyResult<Self> {
        Self::check_bounds(min, max)?;
        fuzzy_ensure!(
            step.is_finite() && step > 0.0,
            ErrorCode::InvalidUniverse,
            "universe step must be positive, got {}",
            step
        );

        let n = (max - min) / step;
        fuzzy_ensure!(
            n.is_finite() && n < MAX_SAMPLES as f64,
            ErrorCode::InvalidUniverse,
            "step {} over [{}, {}] exceeds {} samples",
            step,
            min,
            max,
            MAX_SAMPLES
        );

        let intervals = (n + 1e-9).floor() as usize;
        let points = (0..=intervals).map(|i| min + (i as f64) * step).collect();

        Ok(Self { min, max, points })
    }

    /// Sample `[min, max]` with exactly `samples` evenly spaced points
    pub fn linspace(min: f64, max: f64, samples: usize) -> FuzzyResult<Self> {
        Self::check_bounds(min, max)?;
        fuzzy_ensure!(
            samples >= 2,
            ErrorCode::InvalidUniverse,
            "universe needs at least 2 samples, got {}",
            samples
        );
        fuzzy_ensure!(
            samples <= MAX_SAMPLES,
            ErrorCode::InvalidUniverse,
            "universe is capped at {} samples, got {}",
            MAX_SAMPLES,
            samples
        );

        let span = max - min;
        let last = (samples - 1) as f64;
        let points = (0..samples)
            .map(|i| if i == samples - 1 { max } else { min + span * (i as f64) / last })
            .collect();

        Ok(Self { min, max, points })
    }

    fn check_bounds(min: f64, max: f64) -> FuzzyResult<()> {
        fuzzy_ensure!(
            min.is_finite() && max.is_finite(),
            ErrorCode::InvalidUniverse,
            "universe bounds must be finite, got [{}, {}]",
            min,
            max
        );
        fuzzy_ensure!(
            max > min,
            ErrorCode::InvalidUniverse,
            "universe max ({}) must exceed min ({})",
            max,
            min
        );
        fuzzy_ensure!(
            (max - min).is_finite(),
            ErrorCode::InvalidUniverse,
            "universe span [{}, {}] overflows",
            min,
            max
        );
        Ok(())
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Sample points, ascending
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Clamp a crisp value into the universe bounds
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_clamps() {
        assert_eq!(Degree::new(1.5).value(), 1.0);
        assert_eq!(Degree::new(-0.2).value(), 0.0);
        assert_eq!(Degree::new(f64::NAN).value(), 0.0);
        assert!((Degree::new(0.25).value() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_degree_combinators() {
        let a = Degree::new(0.6);
        let b = Degree::new(0.4);

        assert!((a.and(&b).value() - 0.4).abs() < 0.001);
        assert!((a.or(&b).value() - 0.6).abs() < 0.001);
        assert!(a.and(&b) <= a.or(&b));
    }

    #[test]
    fn test_universe_unit_steps() {
        let u = Universe::new(0.0, 10.0, 1.0).unwrap();
        assert_eq!(u.len(), 11);
        assert_eq!(u.points()[0], 0.0);
        assert_eq!(u.points()[10], 10.0);
        assert_eq!(u.span(), 10.0);
    }

    #[test]
    fn test_universe_fractional_step_reaches_max() {
        let u = Universe::new(0.0, 1.0, 0.1).unwrap();
        assert_eq!(u.len(), 11);
        assert!((u.points()[10] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_universe_off_grid_max_excluded() {
        let u = Universe::new(0.0, 10.0, 3.0).unwrap();
        assert_eq!(u.points(), &[0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_linspace() {
        let u = Universe::linspace(0.0, 10.0, 21).unwrap();
        assert_eq!(u.len(), 21);
        assert_eq!(u.points()[20], 10.0);
        assert!((u.points()[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_universes() {
        assert_eq!(
            Universe::new(10.0, 0.0, 1.0).unwrap_err().code,
            ErrorCode::InvalidUniverse
        );
        assert!(Universe::new(0.0, 10.0, 0.0).is_err());
        assert!(Universe::new(0.0, f64::INFINITY, 1.0).is_err());
        assert!(Universe::linspace(0.0, 1.0, 1).is_err());
    }

    #[test]
    fn test_oversized_universes_rejected() {
        let err = Universe::new(0.0, 10.0, 1e-300).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidUniverse);
        assert_eq!(
            Universe::new(0.0, 10.0, 1e-12).unwrap_err().code,
            ErrorCode::InvalidUniverse
        );
        assert_eq!(
            Universe::new(-1e308, 1e308, 1.0).unwrap_err().code,
            ErrorCode::InvalidUniverse
        );
        assert_eq!(
            Universe::linspace(0.0, 1.0, MAX_SAMPLES + 1).unwrap_err().code,
            ErrorCode::InvalidUniverse
        );
        assert_eq!(
            Universe::linspace(-1e308, 1e308, 11).unwrap_err().code,
            ErrorCode::InvalidUniverse
        );
    }

    #[test]
    fn test_universe_at_sample_cap() {
        let u = Universe::new(0.0, 1.0, 1.0 / (MAX_SAMPLES - 1) as f64).unwrap();
        assert!(u.len() <= MAX_SAMPLES);
        assert_eq!(Universe::linspace(0.0, 1.0, MAX_SAMPLES).unwrap().len(), MAX_SAMPLES);
    }

    #[test]
    fn test_clamp_and_contains() {
        let u = Universe::new(0.0, 10.0, 1.0).unwrap();
        assert_eq!(u.clamp(-3.0), 0.0);
        assert_eq!(u.clamp(12.0), 10.0);
        assert!(u.contains(10.0));
        assert!(!u.contains(10.01));
    }
}
