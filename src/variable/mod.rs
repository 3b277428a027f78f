//! Linguistic variables and fuzzification

mod fuzzify;

pub use fuzzify::{fuzzify, Memberships};

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::{Degree, Universe};
use crate::error::{FuzzyError, FuzzyResult};
use crate::membership::MembershipFunction;

/// Whether a variable consumes a crisp input or produces the output curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Antecedent,
    Consequent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Antecedent => "antecedent",
            Role::Consequent => "consequent",
        }
    }
}

/// A named universe described by overlapping fuzzy terms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinguisticVariable {
    name: String,
    role: Role,
    universe: Universe,
    terms: IndexMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, role: Role, universe: Universe) -> Self {
        Self {
            name: name.into(),
            role,
            universe,
            terms: IndexMap::new(),
        }
    }

    /// An input variable
    pub fn antecedent(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, Role::Antecedent, universe)
    }

    /// An output variable
    pub fn consequent(name: impl Into<String>, universe: Universe) -> Self {
        Self::new(name, Role::Consequent, universe)
    }

    /// Add a term, rejecting duplicate names and malformed breakpoints
    pub fn add_term(&mut self, name: impl Into<String>, membership: MembershipFunction) -> FuzzyResult<()> {
        let name = name.into();
        if self.terms.contains_key(&name) {
            return Err(FuzzyError::duplicate_term(&self.name, &name));
        }
        membership
            .validate()
            .map_err(|e| e.with_context("variable", self.name.as_str()).with_context("term", name.as_str()))?;
        self.terms.insert(name, membership);
        Ok(())
    }

    /// Builder form of [`add_term`](Self::add_term)
    pub fn with_term(mut self, name: impl Into<String>, membership: MembershipFunction) -> FuzzyResult<Self> {
        self.add_term(name, membership)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn term(&self, name: &str) -> Option<&MembershipFunction> {
        self.terms.get(name)
    }

    pub fn has_term(&self, name: &str) -> bool {
        self.terms.contains_key(name)
    }

    /// Terms in declaration order
    pub fn terms(&self) -> impl Iterator<Item = (&str, &MembershipFunction)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn term_names(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Fuzzify a crisp value - get membership for all terms
    pub fn fuzzify(&self, value: f64) -> Memberships {
        fuzzify(self, value)
    }

    /// Get the term with highest membership for a value
    ///
    /// Ties go to the term declared first.
    pub fn dominant_term(&self, value: f64) -> Option<(&str, Degree)> {
        let x = self.universe.clamp(value);
        let mut best: Option<(&str, Degree)> = None;
        for (name, mf) in &self.terms {
            let degree = mf.evaluate(x);
            match best {
                Some((_, top)) if top >= degree => {}
                _ => best = Some((name.as_str(), degree)),
            }
        }
        best
    }
}
