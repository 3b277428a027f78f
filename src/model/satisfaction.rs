//! Built-in restaurant customer satisfaction model
//!
//! Three inputs (service quality, meal temperature, cleanliness) and one
//! output (customer satisfaction), each rated on a 0-10 unit-step universe
//! with three terms:
//!
//! - rule1: any input poor/cold/dirty -> dissatisfied
//! - rule2: all inputs average/warm/okay -> content
//! - rule3: all inputs excellent/hot/spotless -> delighted

use indexmap::IndexMap;

use super::{Model, ModelDefinition};
use crate::core::Universe;
use crate::engine::InferenceEngine;
use crate::error::FuzzyResult;
use crate::membership::MembershipFunction;
use crate::report::CategoryScale;
use crate::rule::{Antecedent, Rule, TermRef};
use crate::variable::LinguisticVariable;

pub const SERVICE_QUALITY: &str = "service_quality";
pub const MEAL_TEMPERATURE: &str = "meal_temperature";
pub const CLEANLINESS: &str = "cleanliness";
pub const CUSTOMER_SATISFACTION: &str = "customer_satisfaction";

/// The same model as a TOML definition, usable as a template
pub const SATISFACTION_TOML: &str = include_str!("../../models/satisfaction.toml");

fn rating() -> FuzzyResult<Universe> {
    Universe::new(0.0, 10.0, 1.0)
}

/// Build a 0-10 variable with a low shoulder, a middle triangle and a high shoulder
fn three_terms(
    mut variable: LinguisticVariable,
    names: [&str; 3],
    low: [f64; 4],
    mid: [f64; 3],
    high: [f64; 4],
) -> FuzzyResult<LinguisticVariable> {
    variable.add_term(names[0], MembershipFunction::trapezoid(low[0], low[1], low[2], low[3])?)?;
    variable.add_term(names[1], MembershipFunction::triangle(mid[0], mid[1], mid[2])?)?;
    variable.add_term(names[2], MembershipFunction::trapezoid(high[0], high[1], high[2], high[3])?)?;
    Ok(variable)
}

/// Input and output variables, inputs first
pub fn variables() -> FuzzyResult<Vec<LinguisticVariable>> {
    Ok(vec![
        three_terms(
            LinguisticVariable::antecedent(SERVICE_QUALITY, rating()?),
            ["poor", "average", "excellent"],
            [0.0, 0.0, 2.0, 4.0],
            [3.0, 5.0, 7.0],
            [6.0, 8.0, 10.0, 10.0],
        )?,
        three_terms(
            LinguisticVariable::antecedent(MEAL_TEMPERATURE, rating()?),
            ["cold", "warm", "hot"],
            [0.0, 0.0, 3.0, 5.0],
            [4.0, 6.0, 8.0],
            [7.0, 9.0, 10.0, 10.0],
        )?,
        three_terms(
            LinguisticVariable::antecedent(CLEANLINESS, rating()?),
            ["dirty", "okay", "spotless"],
            [0.0, 0.0, 3.0, 5.0],
            [4.0, 6.0, 8.0],
            [7.0, 9.0, 10.0, 10.0],
        )?,
        three_terms(
            LinguisticVariable::consequent(CUSTOMER_SATISFACTION, rating()?),
            ["dissatisfied", "content", "delighted"],
            [0.0, 0.0, 2.0, 4.0],
            [3.0, 5.0, 7.0],
            [6.0, 8.0, 10.0, 10.0],
        )?,
    ])
}

fn across_inputs(terms: [&str; 3]) -> [Antecedent; 3] {
    [
        Antecedent::term(SERVICE_QUALITY, terms[0]),
        Antecedent::term(MEAL_TEMPERATURE, terms[1]),
        Antecedent::term(CLEANLINESS, terms[2]),
    ]
}

/// Catch-all: any input in its lowest term
pub fn rule1() -> Rule {
    let [a, b, c] = across_inputs(["poor", "cold", "dirty"]);
    Rule::new(a.or(b).or(c), TermRef::new(CUSTOMER_SATISFACTION, "dissatisfied")).with_label("rule1")
}

pub fn rule2() -> Rule {
    let [a, b, c] = across_inputs(["average", "warm", "okay"]);
    Rule::new(a.and(b).and(c), TermRef::new(CUSTOMER_SATISFACTION, "content")).with_label("rule2")
}

pub fn rule3() -> Rule {
    let [a, b, c] = across_inputs(["excellent", "hot", "spotless"]);
    Rule::new(a.and(b).and(c), TermRef::new(CUSTOMER_SATISFACTION, "delighted")).with_label("rule3")
}

pub fn rules() -> Vec<Rule> {
    vec![rule1(), rule2(), rule3()]
}

pub fn engine() -> FuzzyResult<InferenceEngine> {
    InferenceEngine::builder()
        .variables(variables()?)
        .rules(rules())
        .build()
}

/// Dissatisfied up to 3, Content up to 7, Delighted above
pub fn categories() -> FuzzyResult<CategoryScale> {
    CategoryScale::new(vec![(3.0, "Dissatisfied"), (7.0, "Content")], "Delighted")
}

pub fn model() -> FuzzyResult<Model> {
    let mut categories_by_output = IndexMap::new();
    categories_by_output.insert(CUSTOMER_SATISFACTION.to_string(), categories()?);
    Ok(Model {
        name: Some(CUSTOMER_SATISFACTION.to_string()),
        engine: engine()?,
        categories: categories_by_output,
    })
}

/// Parse [`SATISFACTION_TOML`]
pub fn definition() -> FuzzyResult<ModelDefinition> {
    ModelDefinition::from_toml_str(SATISFACTION_TOML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::inputs;

    #[test]
    fn test_engine_shape() {
        let engine = engine().unwrap();
        let names: Vec<&str> = engine.antecedents().map(|v| v.name()).collect();
        assert_eq!(names, vec![SERVICE_QUALITY, MEAL_TEMPERATURE, CLEANLINESS]);
        assert_eq!(engine.consequents().count(), 1);
        assert_eq!(engine.rules().len(), 3);
        assert_eq!(
            engine.rules()[0].antecedent.to_string(),
            "service_quality[poor] | meal_temperature[cold] | cleanliness[dirty]"
        );
    }

    #[test]
    fn test_toml_definition_matches_code() {
        let from_toml = definition().unwrap().build().unwrap();
        let from_code = model().unwrap();

        assert_eq!(from_toml.categories, from_code.categories);
        assert_eq!(from_toml.engine.rules(), from_code.engine.rules());
        for var in from_code.engine.antecedents() {
            assert_eq!(from_toml.engine.antecedent(var.name()), Some(var));
        }
        for var in from_code.engine.consequents() {
            assert_eq!(from_toml.engine.consequent(var.name()), Some(var));
        }

        for x in [0.0, 2.5, 5.0, 7.5, 10.0] {
            let values = inputs([(SERVICE_QUALITY, x), (MEAL_TEMPERATURE, 10.0 - x), (CLEANLINESS, x)]);
            assert_eq!(
                from_toml.engine.evaluate(&values).unwrap(),
                from_code.engine.evaluate(&values).unwrap()
            );
        }
    }

    #[test]
    fn test_low_inputs_fire_catch_all() {
        let engine = engine().unwrap();
        let sim = engine
            .simulate(&inputs([(SERVICE_QUALITY, 1.0), (MEAL_TEMPERATURE, 1.0), (CLEANLINESS, 1.0)]))
            .unwrap();
        assert_eq!(sim.firing_strength("rule1").unwrap().value(), 1.0);
        assert_eq!(sim.firing_strength("rule2").unwrap().value(), 0.0);
        assert_eq!(sim.firing_strength("rule3").unwrap().value(), 0.0);

        let out = sim.output(CUSTOMER_SATISFACTION).unwrap();
        assert!((out - 4.5 / 3.5).abs() < 1e-12);
        assert_eq!(categories().unwrap().categorize(out), "Dissatisfied");
    }
}
