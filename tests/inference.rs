//! End-to-end inference tests against the built-in satisfaction model

use std::collections::HashMap;
use std::thread;

use fuzzy_paradise::model::satisfaction::{
    self, CLEANLINESS, CUSTOMER_SATISFACTION, MEAL_TEMPERATURE, SERVICE_QUALITY,
};
use fuzzy_paradise::{
    inputs, Antecedent, Degree, ErrorCode, FuzzyResult, InferenceEngine, LinguisticVariable,
    MembershipFunction, ModelDefinition, Rule, TermRef, Universe,
};

const EPSILON: f64 = 1e-9;

fn ratings(service: f64, temperature: f64, cleanliness: f64) -> HashMap<String, f64> {
    inputs([
        (SERVICE_QUALITY, service),
        (MEAL_TEMPERATURE, temperature),
        (CLEANLINESS, cleanliness),
    ])
}

fn satisfaction_of(engine: &InferenceEngine, values: &HashMap<String, f64>) -> f64 {
    engine.evaluate(values).unwrap()[CUSTOMER_SATISFACTION]
}

#[test]
fn test_poor_experience_is_dissatisfied() {
    let model = satisfaction::model().unwrap();
    let sim = model.engine.simulate(&ratings(1.0, 1.0, 1.0)).unwrap();

    assert!((sim.firing_strength("rule1").unwrap().value() - 1.0).abs() < EPSILON);
    let score = sim.output(CUSTOMER_SATISFACTION).unwrap();
    assert!((score - 4.5 / 3.5).abs() < EPSILON);
    assert_eq!(model.categorize(CUSTOMER_SATISFACTION, score), Some("Dissatisfied"));
}

#[test]
fn test_average_experience_is_content() {
    let model = satisfaction::model().unwrap();
    let sim = model.engine.simulate(&ratings(5.0, 6.0, 6.0)).unwrap();

    assert_eq!(sim.firing_strength("rule1").unwrap(), Degree::ZERO);
    assert_eq!(sim.firing_strength("rule2").unwrap(), Degree::ONE);
    assert_eq!(sim.firing_strength("rule3").unwrap(), Degree::ZERO);

    let score = sim.output(CUSTOMER_SATISFACTION).unwrap();
    assert!((score - 5.0).abs() < EPSILON);
    assert_eq!(model.categorize(CUSTOMER_SATISFACTION, score), Some("Content"));
}

#[test]
fn test_excellent_experience_is_delighted() {
    let model = satisfaction::model().unwrap();
    let score = satisfaction_of(&model.engine, &ratings(9.0, 9.0, 9.0));

    assert!((score - 30.5 / 3.5).abs() < EPSILON);
    assert_eq!(model.categorize(CUSTOMER_SATISFACTION, score), Some("Delighted"));
}

#[test]
fn test_no_catch_all_rule_is_degenerate() {
    let engine = InferenceEngine::builder()
        .variables(satisfaction::variables().unwrap())
        .rules([satisfaction::rule2(), satisfaction::rule3()])
        .build()
        .unwrap();

    let err = engine.evaluate(&ratings(0.0, 0.0, 0.0)).unwrap_err();
    assert_eq!(err.code, ErrorCode::DegenerateAggregation);
    assert!(err.is_evaluation());
    assert_eq!(err.context_field("variable"), Some(CUSTOMER_SATISFACTION));

    let sim = engine.simulate(&ratings(0.0, 0.0, 0.0)).unwrap();
    assert!(sim.aggregated(CUSTOMER_SATISFACTION).unwrap().iter().all(|&mu| mu == 0.0));
}

#[test]
fn test_missing_input_is_reported() {
    let engine = satisfaction::engine().unwrap();
    let err = engine
        .evaluate(&inputs([(SERVICE_QUALITY, 5.0), (CLEANLINESS, 5.0)]))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingInput);
    assert_eq!(err.context_field("variable"), Some(MEAL_TEMPERATURE));
}

#[test]
fn test_extra_inputs_are_ignored() {
    let engine = satisfaction::engine().unwrap();
    let mut values = ratings(5.0, 6.0, 6.0);
    let expected = satisfaction_of(&engine, &values);
    values.insert("ambience".to_string(), 3.0);
    assert_eq!(satisfaction_of(&engine, &values), expected);
}

#[test]
fn test_inputs_past_the_edge_saturate_shoulders() {
    let engine = satisfaction::engine().unwrap();
    assert_eq!(
        satisfaction_of(&engine, &ratings(-5.0, -5.0, -5.0)),
        satisfaction_of(&engine, &ratings(0.0, 0.0, 0.0))
    );
    assert_eq!(
        satisfaction_of(&engine, &ratings(15.0, 15.0, 15.0)),
        satisfaction_of(&engine, &ratings(10.0, 10.0, 10.0))
    );
}

#[test]
fn test_construction_order_does_not_matter() {
    let forward = satisfaction::engine().unwrap();

    let mut variables = satisfaction::variables().unwrap();
    variables.reverse();
    let mut rules = satisfaction::rules();
    rules.reverse();
    let backward = InferenceEngine::builder()
        .variables(variables)
        .rules(rules)
        .build()
        .unwrap();

    for service in [0.0, 2.0, 3.5, 5.0, 7.0, 9.5] {
        for temperature in [0.0, 4.5, 6.0, 8.0, 10.0] {
            let values = ratings(service, temperature, 10.0 - service);
            let a = forward.evaluate(&values);
            let b = backward.evaluate(&values);
            match (a, b) {
                (Ok(a), Ok(b)) => assert_eq!(a, b),
                (Err(a), Err(b)) => assert_eq!(a.code, b.code),
                (a, b) => panic!("engines disagree: {:?} vs {:?}", a, b),
            }
        }
    }
}

#[test]
fn test_concurrent_evaluation_matches_sequential() {
    let engine = satisfaction::engine().unwrap();
    let cases: Vec<HashMap<String, f64>> = (0..=10)
        .map(|i| {
            let x = i as f64;
            ratings(x, (x + 3.0) % 10.0, 10.0 - x)
        })
        .collect();
    let expected: Vec<FuzzyResult<_>> = cases.iter().map(|v| engine.evaluate(v)).collect();

    let (engine, cases) = (&engine, &cases);
    let results: Vec<Vec<FuzzyResult<_>>> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(move || cases.iter().map(|v| engine.evaluate(v)).collect::<Vec<_>>()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for per_thread in results {
        assert_eq!(per_thread, expected);
    }
}

#[test]
fn test_and_never_exceeds_or() {
    let engine = satisfaction::engine().unwrap();
    for x in [0.0, 1.5, 3.5, 4.5, 6.0, 7.5, 9.0] {
        let sim = engine.simulate(&ratings(x, 10.0 - x, x)).unwrap();
        let lookup = |t: &TermRef| -> FuzzyResult<Degree> {
            Ok(sim
                .memberships(&t.variable)
                .and_then(|m| m.degree(&t.term))
                .unwrap_or(Degree::ZERO))
        };
        let a = || Antecedent::term(SERVICE_QUALITY, "average");
        let b = || Antecedent::term(MEAL_TEMPERATURE, "warm");
        let and = a().and(b()).evaluate(&lookup).unwrap();
        let or = a().or(b()).evaluate(&lookup).unwrap();
        assert!(and <= or);
    }
}

#[test]
fn test_extra_rule_never_lowers_aggregate() {
    let without = InferenceEngine::builder()
        .variables(satisfaction::variables().unwrap())
        .rules([satisfaction::rule2(), satisfaction::rule3()])
        .build()
        .unwrap();
    let with = satisfaction::engine().unwrap();

    let values = ratings(3.5, 4.5, 4.5);
    let before = without.simulate(&values).unwrap();
    let after = with.simulate(&values).unwrap();
    assert!(after.firing_strength("rule1").unwrap() > Degree::ZERO);

    let before = before.aggregated(CUSTOMER_SATISFACTION).unwrap();
    let after = after.aggregated(CUSTOMER_SATISFACTION).unwrap();
    assert!(before.iter().zip(after).all(|(b, a)| a >= b));
    assert!(before.iter().zip(after).any(|(b, a)| a > b));
}

fn resolution_engine(samples: usize) -> InferenceEngine {
    let rating = || Universe::linspace(0.0, 10.0, samples).unwrap();
    let service = LinguisticVariable::antecedent("service", rating())
        .with_term("poor", MembershipFunction::trapezoid(0.0, 0.0, 2.0, 4.0).unwrap())
        .unwrap()
        .with_term("average", MembershipFunction::triangle(3.0, 5.0, 7.0).unwrap())
        .unwrap();
    let tip = LinguisticVariable::consequent("tip", rating())
        .with_term("low", MembershipFunction::trapezoid(0.0, 0.0, 2.0, 4.0).unwrap())
        .unwrap()
        .with_term("mid", MembershipFunction::triangle(3.0, 5.0, 7.0).unwrap())
        .unwrap();

    InferenceEngine::builder()
        .variable(service)
        .variable(tip)
        .rule(Rule::parse("service[poor]", &["tip[low]"]).unwrap())
        .rule(Rule::parse("service[average]", &["tip[mid]"]).unwrap())
        .build()
        .unwrap()
}

#[test]
fn test_centroid_stable_under_finer_sampling() {
    let coarse = resolution_engine(101);
    let fine = resolution_engine(201);
    let finer = resolution_engine(401);

    for x in [1.0, 3.3, 3.7, 5.0] {
        let values = inputs([("service", x)]);
        let a = coarse.evaluate(&values).unwrap()["tip"];
        let b = fine.evaluate(&values).unwrap()["tip"];
        let c = finer.evaluate(&values).unwrap()["tip"];
        assert!((a - b).abs() < 0.05, "x={}: {} vs {}", x, a, b);
        assert!((a - c).abs() < 0.05, "x={}: {} vs {}", x, a, c);
    }
}

#[test]
fn test_toml_model_round_trip() {
    let definition = satisfaction::definition().unwrap();
    let text = definition.to_toml().unwrap();
    let reparsed = ModelDefinition::from_toml_str(&text).unwrap();
    assert_eq!(reparsed, definition);

    let original = definition.build().unwrap();
    let rebuilt = reparsed.build().unwrap();
    for values in [ratings(1.0, 1.0, 1.0), ratings(5.0, 6.0, 6.0), ratings(9.0, 9.0, 9.0)] {
        assert_eq!(
            original.engine.evaluate(&values).unwrap(),
            rebuilt.engine.evaluate(&values).unwrap()
        );
    }
}
