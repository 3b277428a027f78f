//! Per-evaluation state
//!
//! A [`Simulation`] is created by [`InferenceEngine::simulate`] and holds
//! everything one evaluation computed. It borrows the engine read-only and
//! is dropped after use; nothing flows back into the engine.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::InferenceEngine;
use crate::core::Degree;
use crate::error::{FuzzyError, FuzzyResult};
use crate::variable::Memberships;

/// Firing strength of one rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleFiring {
    pub label: String,
    pub strength: Degree,
}

/// Transient record of one evaluation
#[derive(Debug, Clone, Serialize)]
pub struct Simulation<'e> {
    #[serde(skip)]
    engine: &'e InferenceEngine,
    /// Crisp input per antecedent, declaration order
    pub(super) inputs: IndexMap<String, f64>,
    /// Fuzzified degrees per antecedent
    pub(super) memberships: IndexMap<String, Memberships>,
    /// One entry per rule, rule order
    pub(super) firing: Vec<RuleFiring>,
    /// Aggregated curve per consequent, sampled over its universe
    pub(super) aggregated: IndexMap<String, Vec<f64>>,
}

impl<'e> Simulation<'e> {
    pub(super) fn new(engine: &'e InferenceEngine) -> Self {
        Self {
            engine,
            inputs: IndexMap::new(),
            memberships: IndexMap::new(),
            firing: Vec::new(),
            aggregated: IndexMap::new(),
        }
    }

    pub fn input(&self, variable: &str) -> Option<f64> {
        self.inputs.get(variable).copied()
    }

    pub fn memberships(&self, variable: &str) -> Option<&Memberships> {
        self.memberships.get(variable)
    }

    pub fn firing_strengths(&self) -> &[RuleFiring] {
        &self.firing
    }

    /// Firing strength of the rule with the given label
    pub fn firing_strength(&self, label: &str) -> Option<Degree> {
        self.firing.iter().find(|f| f.label == label).map(|f| f.strength)
    }

    pub fn aggregated(&self, variable: &str) -> Option<&[f64]> {
        self.aggregated.get(variable).map(Vec::as_slice)
    }

    /// Defuzzify one consequent
    pub fn output(&self, variable: &str) -> FuzzyResult<f64> {
        let curve = self
            .aggregated
            .get(variable)
            .ok_or_else(|| FuzzyError::unknown_output(variable))?;
        let var = self
            .engine
            .consequent(variable)
            .ok_or_else(|| FuzzyError::unknown_output(variable))?;

        let method = self.engine.defuzzifier();
        let crisp = method
            .defuzzify(var.universe().points(), curve)
            .ok_or_else(|| FuzzyError::degenerate(variable).with_context("method", method.as_str()))?;

        debug!(variable, crisp, method = method.as_str(), "defuzzified");
        Ok(crisp)
    }

    /// Defuzzify every consequent; fails on the first degenerate one
    pub fn outputs(&self) -> FuzzyResult<IndexMap<String, f64>> {
        self.aggregated
            .keys()
            .map(|name| Ok((name.clone(), self.output(name)?)))
            .collect()
    }
}
