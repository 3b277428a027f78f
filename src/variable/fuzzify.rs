//! Fuzzifier: crisp value -> degree per term

use indexmap::IndexMap;
use serde::Serialize;

use super::LinguisticVariable;
use crate::core::Degree;

/// Degrees of one crisp value in every term of a variable
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Memberships(IndexMap<String, Degree>);

impl Memberships {
    pub fn degree(&self, term: &str) -> Option<Degree> {
        self.0.get(term).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Degree)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Evaluate every term of `variable` at `x`
///
/// Never fails: `x` is clamped into the universe first, so values past a
/// boundary shoulder read 1 and values outside a term's support read 0.
pub fn fuzzify(variable: &LinguisticVariable, x: f64) -> Memberships {
    let clamped = variable.universe().clamp(x);
    Memberships(
        variable
            .terms()
            .map(|(name, mf)| (name.to_string(), mf.evaluate(clamped)))
            .collect(),
    )
}
