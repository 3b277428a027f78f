//! Mamdani inference engine
//!
//! An [`InferenceEngine`] is built once through [`EngineBuilder`], which
//! validates the whole model, and is immutable afterwards. Evaluation runs
//! in four steps, all on per-call state:
//!
//! 1. fuzzify every antecedent variable at its crisp input
//! 2. compute each rule's firing strength (AND = min, OR = max)
//! 3. clip each consequent term at its rule's strength and aggregate by max
//! 4. defuzzify each aggregated curve
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzy_paradise::engine::{inputs, InferenceEngine};
//!
//! let engine = InferenceEngine::builder()
//!     .variable(service_quality)
//!     .variable(tip)
//!     .rule(Rule::parse("service_quality[poor]", &["tip[low]"])?)
//!     .build()?;
//!
//! let out = engine.evaluate(&inputs([("service_quality", 3.0)]))?;
//! ```

mod aggregate;
mod defuzz;
mod simulation;

pub use aggregate::{accumulate, clip};
pub use defuzz::Defuzzifier;
pub use simulation::{RuleFiring, Simulation};

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::core::Degree;
use crate::error::{ErrorCode, FuzzyError, FuzzyResult};
use crate::rule::{Rule, TermRef};
use crate::variable::{LinguisticVariable, Role};

/// Collect name/value pairs into the input mapping `evaluate` expects
pub fn inputs<K, I>(pairs: I) -> HashMap<String, f64>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, f64)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Collects variables and rules; [`build`](Self::build) validates them
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    variables: Vec<LinguisticVariable>,
    rules: Vec<Rule>,
    defuzzifier: Defuzzifier,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input or output variable (its role decides which)
    pub fn variable(mut self, variable: LinguisticVariable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn variables<I: IntoIterator<Item = LinguisticVariable>>(mut self, variables: I) -> Self {
        self.variables.extend(variables);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules<I: IntoIterator<Item = Rule>>(mut self, rules: I) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn defuzzifier(mut self, defuzzifier: Defuzzifier) -> Self {
        self.defuzzifier = defuzzifier;
        self
    }

    /// Validate the model and freeze it into an engine
    ///
    /// Fails on duplicate variable names and on rules that reference an
    /// undeclared variable or term, use a variable in the wrong role, or
    /// assign no consequent.
    pub fn build(self) -> FuzzyResult<InferenceEngine> {
        let mut antecedents = IndexMap::new();
        let mut consequents = IndexMap::new();
        let mut seen = HashSet::new();

        for variable in self.variables {
            if !seen.insert(variable.name().to_string()) {
                return Err(FuzzyError::duplicate_variable(variable.name()));
            }
            let target = match variable.role() {
                Role::Antecedent => &mut antecedents,
                Role::Consequent => &mut consequents,
            };
            target.insert(variable.name().to_string(), variable);
        }

        for (index, rule) in self.rules.iter().enumerate() {
            let label = rule.display_label(index);
            if rule.consequents.is_empty() {
                return Err(FuzzyError::new(
                    ErrorCode::EmptyConsequent,
                    format!("rule '{}' assigns no consequent", label),
                )
                .with_context("rule", label));
            }
            for term in rule.antecedent.term_refs() {
                check_reference(term, Role::Antecedent, &antecedents, &consequents)
                    .map_err(|e| e.with_context("rule", label.as_str()))?;
            }
            for term in &rule.consequents {
                check_reference(term, Role::Consequent, &antecedents, &consequents)
                    .map_err(|e| e.with_context("rule", label.as_str()))?;
            }
        }

        let mut samples = HashMap::new();
        for variable in consequents.values() {
            for (term, mf) in variable.terms() {
                samples.insert(
                    TermRef::new(variable.name(), term),
                    mf.sample(variable.universe().points()),
                );
            }
            let targeted = self
                .rules
                .iter()
                .any(|r| r.consequents.iter().any(|c| c.variable == variable.name()));
            if !targeted {
                warn!(variable = variable.name(), "no rule assigns this consequent; it can never be defuzzified");
            }
        }

        debug!(
            antecedents = antecedents.len(),
            consequents = consequents.len(),
            rules = self.rules.len(),
            defuzzifier = self.defuzzifier.as_str(),
            "inference engine built"
        );

        Ok(InferenceEngine {
            antecedents,
            consequents,
            rules: self.rules,
            defuzzifier: self.defuzzifier,
            samples,
        })
    }
}

fn check_reference(
    term: &TermRef,
    expected: Role,
    antecedents: &IndexMap<String, LinguisticVariable>,
    consequents: &IndexMap<String, LinguisticVariable>,
) -> FuzzyResult<()> {
    let (own, other) = match expected {
        Role::Antecedent => (antecedents, consequents),
        Role::Consequent => (consequents, antecedents),
    };

    match own.get(&term.variable) {
        Some(variable) if variable.has_term(&term.term) => Ok(()),
        Some(_) => Err(FuzzyError::undeclared_term(&term.variable, &term.term)),
        None if other.contains_key(&term.variable) => Err(FuzzyError::new(
            ErrorCode::RoleMismatch,
            format!(
                "'{}' is not an {} variable and cannot appear in that position",
                term.variable,
                expected.as_str()
            ),
        )
        .with_context("variable", term.variable.as_str())),
        None => Err(FuzzyError::undeclared_variable(&term.variable)),
    }
}

/// Immutable Mamdani inference model
///
/// `evaluate` takes `&self` and keeps all intermediate results in a fresh
/// [`Simulation`], so one engine can serve many threads at once.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    antecedents: IndexMap<String, LinguisticVariable>,
    consequents: IndexMap<String, LinguisticVariable>,
    rules: Vec<Rule>,
    defuzzifier: Defuzzifier,
    /// Consequent terms sampled over their universe
    samples: HashMap<TermRef, Vec<f64>>,
}

impl InferenceEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn antecedents(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.antecedents.values()
    }

    pub fn consequents(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.consequents.values()
    }

    pub fn antecedent(&self, name: &str) -> Option<&LinguisticVariable> {
        self.antecedents.get(name)
    }

    pub fn consequent(&self, name: &str) -> Option<&LinguisticVariable> {
        self.consequents.get(name)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn defuzzifier(&self) -> Defuzzifier {
        self.defuzzifier
    }

    /// Evaluate and return the crisp value of every consequent
    pub fn evaluate(&self, inputs: &HashMap<String, f64>) -> FuzzyResult<IndexMap<String, f64>> {
        self.simulate(inputs)?.outputs()
    }

    /// Run fuzzification, rule evaluation and aggregation, keeping every
    /// intermediate result
    ///
    /// Inputs naming anything other than a declared antecedent are ignored.
    pub fn simulate(&self, inputs: &HashMap<String, f64>) -> FuzzyResult<Simulation<'_>> {
        let mut sim = Simulation::new(self);

        for (name, variable) in &self.antecedents {
            let value = *inputs.get(name).ok_or_else(|| FuzzyError::missing_input(name))?;
            if !value.is_finite() {
                return Err(FuzzyError::non_finite_input(name, value));
            }
            let memberships = variable.fuzzify(value);
            trace!(variable = name.as_str(), value, ?memberships, "fuzzified");
            sim.inputs.insert(name.clone(), value);
            sim.memberships.insert(name.clone(), memberships);
        }

        for name in inputs.keys() {
            if !self.antecedents.contains_key(name) {
                warn!(input = name.as_str(), "ignoring value for undeclared input variable");
            }
        }

        for name in self.consequents.keys() {
            let len = self.consequents[name].universe().len();
            sim.aggregated.insert(name.clone(), vec![0.0; len]);
        }

        for (index, rule) in self.rules.iter().enumerate() {
            let strength = rule.antecedent.evaluate(&|term: &TermRef| {
                sim.memberships
                    .get(&term.variable)
                    .and_then(|m| m.degree(&term.term))
                    .ok_or_else(|| FuzzyError::internal(format!("no membership computed for {}", term)))
            })?;
            let label = rule.display_label(index);
            debug!(rule = label.as_str(), strength = strength.value(), "rule fired");

            for target in &rule.consequents {
                self.apply(&mut sim, target, strength)?;
            }
            sim.firing.push(RuleFiring { label, strength });
        }

        Ok(sim)
    }

    fn apply(&self, sim: &mut Simulation<'_>, target: &TermRef, strength: Degree) -> FuzzyResult<()> {
        let samples = self
            .samples
            .get(target)
            .ok_or_else(|| FuzzyError::internal(format!("no samples for consequent {}", target)))?;
        let curve = sim
            .aggregated
            .get_mut(&target.variable)
            .ok_or_else(|| FuzzyError::internal(format!("no curve for consequent {}", target)))?;
        accumulate(curve, &clip(samples, strength));
        Ok(())
    }
}
