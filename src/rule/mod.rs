//! Fuzzy rules
//!
//! A rule pairs an antecedent expression with one or more consequent
//! assignments:
//!
//! ```text
//! service_quality[poor] | meal_temperature[cold]  =>  customer_satisfaction[dissatisfied]
//! ```
//!
//! The antecedent is an explicit tree of [`Antecedent::Term`] leaves joined by
//! [`Antecedent::And`] (minimum) and [`Antecedent::Or`] (maximum). Evaluation
//! is a structural recursion over that tree.

mod parser;

pub use parser::RuleParseError;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::Degree;
use crate::error::{FuzzyError, FuzzyResult};

/// Reference to one term of one variable, written `variable[term]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TermRef {
    pub variable: String,
    pub term: String,
}

impl TermRef {
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }
}

impl fmt::Display for TermRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.variable, self.term)
    }
}

impl FromStr for TermRef {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parser::parse_term_ref(s)?)
    }
}

/// Antecedent expression tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Antecedent {
    Term(TermRef),
    And(Box<Antecedent>, Box<Antecedent>),
    Or(Box<Antecedent>, Box<Antecedent>),
}

impl Antecedent {
    pub fn term(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Antecedent::Term(TermRef::new(variable, term))
    }

    /// `self & other`
    pub fn and(self, other: Antecedent) -> Self {
        Antecedent::And(Box::new(self), Box::new(other))
    }

    /// `self | other`
    pub fn or(self, other: Antecedent) -> Self {
        Antecedent::Or(Box::new(self), Box::new(other))
    }

    /// Fold a list of operands with AND, left-associative
    pub fn all<I: IntoIterator<Item = Antecedent>>(operands: I) -> Option<Self> {
        operands.into_iter().reduce(Antecedent::and)
    }

    /// Fold a list of operands with OR, left-associative
    pub fn any<I: IntoIterator<Item = Antecedent>>(operands: I) -> Option<Self> {
        operands.into_iter().reduce(Antecedent::or)
    }

    /// Compute the firing strength, resolving each leaf through `lookup`
    pub fn evaluate<F>(&self, lookup: &F) -> FuzzyResult<Degree>
    where
        F: Fn(&TermRef) -> FuzzyResult<Degree>,
    {
        match self {
            Antecedent::Term(term) => lookup(term),
            Antecedent::And(left, right) => Ok(left.evaluate(lookup)?.and(&right.evaluate(lookup)?)),
            Antecedent::Or(left, right) => Ok(left.evaluate(lookup)?.or(&right.evaluate(lookup)?)),
        }
    }

    /// Every leaf, left to right
    pub fn term_refs(&self) -> Vec<&TermRef> {
        let mut refs = Vec::new();
        self.collect_refs(&mut refs);
        refs
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a TermRef>) {
        match self {
            Antecedent::Term(term) => out.push(term),
            Antecedent::And(left, right) | Antecedent::Or(left, right) => {
                left.collect_refs(out);
                right.collect_refs(out);
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Antecedent::Or(..) => 0,
            Antecedent::And(..) => 1,
            Antecedent::Term(_) => 2,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Antecedent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Antecedent::Term(term) => write!(f, "{}", term),
            Antecedent::And(left, right) => {
                left.fmt_operand(f, 1)?;
                write!(f, " & ")?;
                right.fmt_operand(f, 2)
            }
            Antecedent::Or(left, right) => {
                left.fmt_operand(f, 0)?;
                write!(f, " | ")?;
                right.fmt_operand(f, 1)
            }
        }
    }
}

impl FromStr for Antecedent {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parser::parse_antecedent(s)?)
    }
}

/// A fuzzy rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    /// Rule name/label
    pub label: Option<String>,
    pub antecedent: Antecedent,
    /// Output assignments; never empty once validated by the engine builder
    pub consequents: Vec<TermRef>,
}

impl Rule {
    pub fn new(antecedent: Antecedent, consequent: TermRef) -> Self {
        Self {
            label: None,
            antecedent,
            consequents: vec![consequent],
        }
    }

    /// Parse both sides from rule text
    pub fn parse<S: AsRef<str>>(antecedent: &str, consequents: &[S]) -> FuzzyResult<Self> {
        let antecedent: Antecedent = antecedent.parse()?;
        let consequents = consequents
            .iter()
            .map(|c| c.as_ref().parse())
            .collect::<FuzzyResult<Vec<TermRef>>>()?;
        Ok(Self {
            label: None,
            antecedent,
            consequents,
        })
    }

    /// Assign an additional consequent term
    pub fn also(mut self, consequent: TermRef) -> Self {
        self.consequents.push(consequent);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label for logs: the explicit label or the rule's position
    pub fn display_label(&self, index: usize) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("rule#{}", index + 1))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF {} THEN ", self.antecedent)?;
        for (i, c) in self.consequents.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
