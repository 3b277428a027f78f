//! Membership functions
//!
//! Piecewise-linear shapes mapping a crisp value to a [`Degree`]. A triangle
//! is a trapezoid whose two interior breakpoints coincide, and both are
//! evaluated by the same formula. Vertical edges (`a == b` or `c == d`) are
//! steps: the plateau `[b, c]` is checked first, so `x == a == b` is 1.
//!
//! Shoulders need no special shape. `[0, 0, 2, 4]` on a universe starting at
//! 0 already evaluates to 1 at the boundary; values beyond it are clamped to
//! the universe by the fuzzifier before evaluation.

use serde::{Deserialize, Serialize};

use crate::core::Degree;
use crate::error::{FuzzyError, FuzzyResult};

/// Membership function shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipFunction {
    /// Trapezoidal: `[left, left_top, right_top, right]`
    Trapezoid([f64; 4]),
    /// Triangular: `[left, center, right]`
    Triangle([f64; 3]),
}

impl MembershipFunction {
    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> FuzzyResult<Self> {
        let mf = MembershipFunction::Trapezoid([a, b, c, d]);
        mf.validate()?;
        Ok(mf)
    }

    pub fn triangle(a: f64, b: f64, c: f64) -> FuzzyResult<Self> {
        let mf = MembershipFunction::Triangle([a, b, c]);
        mf.validate()?;
        Ok(mf)
    }

    /// Breakpoints as entered
    pub fn breakpoints(&self) -> &[f64] {
        match self {
            MembershipFunction::Trapezoid(p) => p,
            MembershipFunction::Triangle(p) => p,
        }
    }

    /// Breakpoints normalized to trapezoid form `(a, b, c, d)`
    fn corners(&self) -> (f64, f64, f64, f64) {
        match *self {
            MembershipFunction::Trapezoid([a, b, c, d]) => (a, b, c, d),
            MembershipFunction::Triangle([a, b, c]) => (a, b, b, c),
        }
    }

    /// Breakpoints must be finite and non-decreasing
    pub fn validate(&self) -> FuzzyResult<()> {
        let points = self.breakpoints();
        let finite = points.iter().all(|p| p.is_finite());
        let ordered = points.windows(2).all(|w| w[0] <= w[1]);
        if finite && ordered {
            Ok(())
        } else {
            Err(FuzzyError::invalid_breakpoints(points))
        }
    }

    /// Evaluate membership for a crisp value
    pub fn evaluate(&self, x: f64) -> Degree {
        let (a, b, c, d) = self.corners();

        let result = if x >= b && x <= c {
            1.0
        } else if x <= a || x >= d {
            0.0
        } else if x < b {
            (x - a) / (b - a)
        } else {
            (d - x) / (d - c)
        };

        Degree::new(result)
    }

    /// Evaluate at every point of a sampled universe
    pub fn sample(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.evaluate(x).value()).collect()
    }

    /// Get the core (where membership = 1)
    pub fn core(&self) -> (f64, f64) {
        let (_, b, c, _) = self.corners();
        (b, c)
    }

    /// Get the support (where membership > 0, plus the step edges)
    pub fn support(&self) -> (f64, f64) {
        let (a, _, _, d) = self.corners();
        (a, d)
    }
}
