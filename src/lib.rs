//! fuzzy-paradise - Mamdani fuzzy inference
//!
//! Rates a situation from a handful of crisp measurements by fuzzifying them
//! against linguistic variables, firing an AND/OR rule base, aggregating the
//! clipped consequent terms and defuzzifying the result back to a number.
//!
//! # Architecture
//!
//! - [`membership`] - trapezoid and triangle membership functions
//! - [`variable`] - linguistic variables and the fuzzifier
//! - [`rule`] - antecedent trees, rules and the rule text parser
//! - [`engine`] - engine builder, evaluation, aggregation and defuzzification
//! - [`model`] - TOML model definitions and the built-in satisfaction model
//! - [`report`] - category labels for crisp outputs
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzy_paradise::{inputs, model::satisfaction};
//!
//! let model = satisfaction::model()?;
//! let out = model.engine.evaluate(&inputs([
//!     ("service_quality", 9.0),
//!     ("meal_temperature", 9.0),
//!     ("cleanliness", 9.0),
//! ]))?;
//!
//! let score = out["customer_satisfaction"];
//! assert_eq!(model.categorize("customer_satisfaction", score), Some("Delighted"));
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod membership;
pub mod model;
pub mod report;
pub mod rule;
pub mod variable;

pub use crate::core::{Degree, Universe, MAX_SAMPLES};
pub use config::{ConfigError, FuzzyConfig, LogLevel, OutputFormat};
pub use engine::{inputs, Defuzzifier, EngineBuilder, InferenceEngine, RuleFiring, Simulation};
pub use error::{ErrorCode, ErrorContext, FuzzyError, FuzzyResult};
pub use membership::MembershipFunction;
pub use model::{Model, ModelDefinition};
pub use report::CategoryScale;
pub use rule::{Antecedent, Rule, RuleParseError, TermRef};
pub use variable::{fuzzify, LinguisticVariable, Memberships, Role};
