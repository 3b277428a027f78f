//! Model definitions
//!
//! A model is a set of linguistic variables, a rule base, and the category
//! scales used to present its outputs. Models are built either in code
//! (see [`satisfaction`]) or from a TOML document:
//!
//! ```toml
//! [[antecedent]]
//! name = "service_quality"
//! universe = { min = 0.0, max = 10.0, step = 1.0 }
//! terms = { poor = { trapezoid = [0, 0, 2, 4] }, average = { triangle = [3, 5, 7] } }
//!
//! [[consequent]]
//! name = "customer_satisfaction"
//! universe = { min = 0.0, max = 10.0, step = 1.0 }
//! terms = { dissatisfied = { trapezoid = [0, 0, 2, 4] } }
//!
//! [[rule]]
//! label = "rule1"
//! if = "service_quality[poor]"
//! then = ["customer_satisfaction[dissatisfied]"]
//!
//! [[category]]
//! variable = "customer_satisfaction"
//! thresholds = [[3.0, "Dissatisfied"], [7.0, "Content"]]
//! otherwise = "Delighted"
//! ```
//!
//! Every definition goes through [`EngineBuilder`](crate::engine::EngineBuilder),
//! so a TOML model is validated exactly like one built in code.

pub mod satisfaction;

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::Universe;
use crate::engine::{Defuzzifier, InferenceEngine};
use crate::error::{ErrorCode, FuzzyError, FuzzyResult};
use crate::membership::MembershipFunction;
use crate::report::CategoryScale;
use crate::rule::Rule;
use crate::variable::{LinguisticVariable, Role};

/// A built engine plus the presentation scales for its outputs
#[derive(Debug, Clone)]
pub struct Model {
    pub name: Option<String>,
    pub engine: InferenceEngine,
    /// Category scale per consequent that has one
    pub categories: IndexMap<String, CategoryScale>,
}

impl Model {
    /// Label for a crisp output, if the model defines a scale for it
    pub fn categorize(&self, variable: &str, value: f64) -> Option<&str> {
        self.categories.get(variable).map(|s| s.categorize(value))
    }
}

/// Universe sampling, by step or by sample count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniverseDef {
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<usize>,
}

impl UniverseDef {
    pub fn build(&self) -> FuzzyResult<Universe> {
        match (self.step, self.samples) {
            (Some(step), None) => Universe::new(self.min, self.max, step),
            (None, Some(samples)) => Universe::linspace(self.min, self.max, samples),
            _ => Err(FuzzyError::invalid_universe(
                "universe needs exactly one of `step` or `samples`",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableDef {
    pub name: String,
    pub universe: UniverseDef,
    #[serde(default)]
    pub terms: IndexMap<String, MembershipFunction>,
}

impl VariableDef {
    pub fn build(&self, role: Role) -> FuzzyResult<LinguisticVariable> {
        let universe = self
            .universe
            .build()
            .map_err(|e| e.with_context("variable", self.name.as_str()))?;
        let mut variable = LinguisticVariable::new(self.name.clone(), role, universe);
        for (term, mf) in &self.terms {
            variable.add_term(term.clone(), mf.clone())?;
        }
        Ok(variable)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "if")]
    pub antecedent: String,
    #[serde(rename = "then")]
    pub consequents: Vec<String>,
}

impl RuleDef {
    pub fn build(&self) -> FuzzyResult<Rule> {
        let rule = Rule::parse(&self.antecedent, self.consequents.as_slice()).map_err(|e| match &self.label {
            Some(label) => e.with_context("rule", label.as_str()),
            None => e,
        })?;
        Ok(Rule {
            label: self.label.clone(),
            ..rule
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryDef {
    pub variable: String,
    pub thresholds: Vec<(f64, String)>,
    pub otherwise: String,
}

/// Serializable description of a whole model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defuzzification: Option<Defuzzifier>,
    #[serde(default, rename = "antecedent")]
    pub antecedents: Vec<VariableDef>,
    #[serde(default, rename = "consequent")]
    pub consequents: Vec<VariableDef>,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleDef>,
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryDef>,
}

impl ModelDefinition {
    pub fn from_toml_str(content: &str) -> FuzzyResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a model definition from a TOML file
    pub fn load(path: &Path) -> FuzzyResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| FuzzyError::from(e).with_context("path", path.display().to_string()))?;
        Self::from_toml_str(&content).map_err(|e| e.with_context("path", path.display().to_string()))
    }

    pub fn to_toml(&self) -> FuzzyResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| FuzzyError::config(e.to_string()).with_code(ErrorCode::InvalidConfigValue))
    }

    /// Validate everything and build the engine and category scales
    pub fn build(&self) -> FuzzyResult<Model> {
        let mut builder = InferenceEngine::builder();
        for def in &self.antecedents {
            builder = builder.variable(def.build(Role::Antecedent)?);
        }
        for def in &self.consequents {
            builder = builder.variable(def.build(Role::Consequent)?);
        }
        for def in &self.rules {
            builder = builder.rule(def.build()?);
        }
        if let Some(method) = self.defuzzification {
            builder = builder.defuzzifier(method);
        }
        let engine = builder.build()?;

        let mut categories = IndexMap::new();
        for def in &self.categories {
            if engine.consequent(&def.variable).is_none() {
                return Err(FuzzyError::configuration(format!(
                    "category scale targets '{}', which is not a consequent",
                    def.variable
                ))
                .with_context("variable", def.variable.as_str())
                .with_hint("categories can only be attached to consequent variables"));
            }
            let scale = CategoryScale::new(def.thresholds.clone(), def.otherwise.clone())
                .map_err(|e| e.with_code(ErrorCode::ConfigurationError).with_context("variable", def.variable.as_str()))?;
            categories.insert(def.variable.clone(), scale);
        }

        Ok(Model {
            name: self.name.clone(),
            engine,
            categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_MODEL: &str = r#"
        name = "tipping"

        [[antecedent]]
        name = "service"
        universe = { min = 0.0, max = 10.0, step = 0.5 }
        terms = { bad = { trapezoid = [0, 0, 3, 6] }, good = { trapezoid = [4, 7, 10, 10] } }

        [[consequent]]
        name = "tip"
        universe = { min = 0.0, max = 30.0, samples = 61 }
        terms = { low = { triangle = [0, 5, 15] }, high = { triangle = [15, 25, 30] } }

        [[rule]]
        label = "stingy"
        if = "service[bad]"
        then = ["tip[low]"]

        [[rule]]
        if = "service[good]"
        then = ["tip[high]"]

        [[category]]
        variable = "tip"
        thresholds = [[10.0, "small"], [20.0, "fair"]]
        otherwise = "generous"
    "#;

    #[test]
    fn test_parse_and_build() {
        let def = ModelDefinition::from_toml_str(SMALL_MODEL).unwrap();
        assert_eq!(def.name.as_deref(), Some("tipping"));
        assert_eq!(def.antecedents[0].terms.keys().collect::<Vec<_>>(), vec!["bad", "good"]);

        let model = def.build().unwrap();
        assert_eq!(model.engine.rules().len(), 2);
        assert_eq!(model.engine.rules()[0].label.as_deref(), Some("stingy"));
        assert_eq!(model.engine.consequent("tip").unwrap().universe().len(), 61);

        let out = model
            .engine
            .evaluate(&crate::engine::inputs([("service", 1.0)]))
            .unwrap();
        assert!(out["tip"] < 10.0);
        assert_eq!(model.categorize("tip", out["tip"]), Some("small"));
        assert_eq!(model.categorize("service", 1.0), None);
    }

    #[test]
    fn test_toml_round_trip() {
        let def = ModelDefinition::from_toml_str(SMALL_MODEL).unwrap();
        let text = def.to_toml().unwrap();
        assert_eq!(ModelDefinition::from_toml_str(&text).unwrap(), def);
    }

    #[test]
    fn test_bad_rule_text_is_configuration_error() {
        let text = SMALL_MODEL.replace("if = \"service[bad]\"", "if = \"service[bad] &\"");
        let err = ModelDefinition::from_toml_str(&text).unwrap().build().unwrap_err();
        assert_eq!(err.code, ErrorCode::RuleSyntax);
        assert!(err.is_configuration());
        assert_eq!(err.context_field("rule"), Some("stingy"));
    }

    #[test]
    fn test_undeclared_term_in_file() {
        let text = SMALL_MODEL.replace("tip[high]", "tip[huge]");
        let err = ModelDefinition::from_toml_str(&text).unwrap().build().unwrap_err();
        assert_eq!(err.code, ErrorCode::UndeclaredTerm);
    }

    #[test]
    fn test_malformed_breakpoints_in_file() {
        let text = SMALL_MODEL.replace("[0, 5, 15]", "[0, 15, 5]");
        let err = ModelDefinition::from_toml_str(&text).unwrap().build().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidBreakpoints);
        assert_eq!(err.context_field("term"), Some("low"));
    }

    #[test]
    fn test_universe_needs_step_or_samples() {
        let def = UniverseDef { min: 0.0, max: 1.0, step: None, samples: None };
        assert_eq!(def.build().unwrap_err().code, ErrorCode::InvalidUniverse);
        let def = UniverseDef { min: 0.0, max: 1.0, step: Some(0.1), samples: Some(11) };
        assert!(def.build().is_err());
    }

    #[test]
    fn test_category_on_unknown_variable() {
        let text = SMALL_MODEL.replace("variable = \"tip\"", "variable = \"service\"");
        let err = ModelDefinition::from_toml_str(&text).unwrap().build().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigurationError);
        assert_eq!(err.context_field("variable"), Some("service"));
        assert!(err.hint.is_some());
    }

    #[test]
    fn test_tiny_step_is_configuration_error() {
        let text = SMALL_MODEL.replace("step = 0.5", "step = 1e-300");
        let err = ModelDefinition::from_toml_str(&text).unwrap().build().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidUniverse);
        assert!(err.is_configuration());
        assert_eq!(err.context_field("variable"), Some("service"));

        let text = SMALL_MODEL.replace("samples = 61", "samples = 5000000");
        let err = ModelDefinition::from_toml_str(&text).unwrap().build().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidUniverse);
        assert_eq!(err.context_field("variable"), Some("tip"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = SMALL_MODEL.replace("label = \"stingy\"", "lable = \"stingy\"");
        let err = ModelDefinition::from_toml_str(&text).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigSyntax);
    }
}
