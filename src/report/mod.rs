//! Presentation policy: naming a crisp output
//!
//! A [`CategoryScale`] maps a crisp value to a label by ascending inclusive
//! upper bounds. It reads the engine's output and never feeds back into it.

use serde::{Deserialize, Serialize};

use crate::core::Universe;
use crate::error::{ErrorCode, FuzzyResult};
use crate::fuzzy_ensure;

/// Ordered label thresholds for one output variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScale {
    /// `(upper bound, label)`: a value `<= bound` gets the first matching label
    pub thresholds: Vec<(f64, String)>,
    /// Label for values above every bound
    pub otherwise: String,
}

impl CategoryScale {
    pub fn new<S: Into<String>>(thresholds: Vec<(f64, S)>, otherwise: impl Into<String>) -> FuzzyResult<Self> {
        let scale = Self {
            thresholds: thresholds.into_iter().map(|(b, l)| (b, l.into())).collect(),
            otherwise: otherwise.into(),
        };
        scale.validate()?;
        Ok(scale)
    }

    /// Lowest third, middle third, top third of the universe span
    pub fn thirds(
        universe: &Universe,
        low: impl Into<String>,
        middle: impl Into<String>,
        high: impl Into<String>,
    ) -> Self {
        let third = universe.span() / 3.0;
        Self {
            thresholds: vec![
                (universe.min() + third, low.into()),
                (universe.min() + 2.0 * third, middle.into()),
            ],
            otherwise: high.into(),
        }
    }

    /// Bounds must be finite and strictly ascending
    pub fn validate(&self) -> FuzzyResult<()> {
        fuzzy_ensure!(
            self.thresholds.iter().all(|(b, _)| b.is_finite()),
            ErrorCode::InvalidConfigValue,
            "category bounds must be finite"
        );
        fuzzy_ensure!(
            self.thresholds.windows(2).all(|w| w[0].0 < w[1].0),
            ErrorCode::InvalidConfigValue,
            "category bounds must be strictly ascending"
        );
        Ok(())
    }

    pub fn categorize(&self, value: f64) -> &str {
        self.thresholds
            .iter()
            .find(|(bound, _)| value <= *bound)
            .map(|(_, label)| label.as_str())
            .unwrap_or(self.otherwise.as_str())
    }
}
