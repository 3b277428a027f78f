//! Defuzzification of an aggregated output curve
//!
//! Every method works on the sampled curve directly: the centroid is the
//! discrete `sum(x * mu) / sum(mu)` over the universe points, not a
//! closed-form integral, so results only depend on the sampling.

use serde::{Deserialize, Serialize};

/// Defuzzification method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Defuzzifier {
    /// Center of Gravity (Centroid)
    #[default]
    Centroid,
    /// Bisector of Area
    Bisector,
    /// Mean of Maximum
    MeanOfMaximum,
    /// Smallest of Maximum
    SmallestOfMaximum,
    /// Largest of Maximum
    LargestOfMaximum,
}

impl Defuzzifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Defuzzifier::Centroid => "centroid",
            Defuzzifier::Bisector => "bisector",
            Defuzzifier::MeanOfMaximum => "mean_of_maximum",
            Defuzzifier::SmallestOfMaximum => "smallest_of_maximum",
            Defuzzifier::LargestOfMaximum => "largest_of_maximum",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "centroid" | "cog" => Some(Defuzzifier::Centroid),
            "bisector" => Some(Defuzzifier::Bisector),
            "mean_of_maximum" | "mom" => Some(Defuzzifier::MeanOfMaximum),
            "smallest_of_maximum" | "som" => Some(Defuzzifier::SmallestOfMaximum),
            "largest_of_maximum" | "lom" => Some(Defuzzifier::LargestOfMaximum),
            _ => None,
        }
    }

    /// Collapse `curve` (sampled at `points`) to one crisp value
    ///
    /// Returns `None` when the curve has zero total membership; there is no
    /// meaningful crisp value to report in that case.
    pub fn defuzzify(&self, points: &[f64], curve: &[f64]) -> Option<f64> {
        debug_assert_eq!(points.len(), curve.len());
        let samples = || points.iter().copied().zip(curve.iter().copied());

        let total: f64 = curve.iter().sum();
        if total == 0.0 {
            return None;
        }

        match self {
            Defuzzifier::Centroid => {
                let mut numerator = 0.0;
                let mut denominator = 0.0;
                for (x, m) in samples() {
                    numerator += x * m;
                    denominator += m;
                }
                Some(numerator / denominator)
            }
            Defuzzifier::Bisector => {
                let half_area = total / 2.0;
                let mut cumulative = 0.0;
                for (x, m) in samples() {
                    cumulative += m;
                    if cumulative >= half_area {
                        return Some(x);
                    }
                }
                points.last().copied()
            }
            Defuzzifier::MeanOfMaximum => {
                let max_value = curve.iter().copied().fold(0.0, f64::max);
                let maxima: Vec<f64> = samples()
                    .filter(|(_, m)| *m == max_value)
                    .map(|(x, _)| x)
                    .collect();
                Some(maxima.iter().sum::<f64>() / maxima.len() as f64)
            }
            Defuzzifier::SmallestOfMaximum => {
                let max_value = curve.iter().copied().fold(0.0, f64::max);
                samples().find(|(_, m)| *m == max_value).map(|(x, _)| x)
            }
            Defuzzifier::LargestOfMaximum => {
                let max_value = curve.iter().copied().fold(0.0, f64::max);
                samples().rev().find(|(_, m)| *m == max_value).map(|(x, _)| x)
            }
        }
    }
}
