
use std::sync::Arc;

use chrono::Days;
use program_rules::{
    ErrorKind, RuleEffect, RuleEngine, RuleEngineError, RuleEnrollment, RuleEvent,
};
use proptest::prelude::*;
use strategies::{arb_facts, arb_rules, base_date, build_context, model_eval, Facts, GenRule};

fn engine_for(rules: &[GenRule], facts: &Facts) -> RuleEngine {
    RuleEngine::builder(build_context(rules))
        .events(facts.context_events())
        .current_date(base_date())
        .build()
        .unwrap()
}

fn run(engine: &RuleEngine, target: &RuleEvent) -> Vec<RuleEffect> {
    engine.evaluate_event(target).unwrap().call().unwrap()
}

// ---------------------------------------------------------------------------
// Invariant 1: Determinism
//
// Evaluating the same target against the same engine twice yields identical
// effect lists.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn evaluation_is_deterministic(rules in arb_rules(), facts in arb_facts()) {
        let engine = engine_for(&rules, &facts);
        let target = facts.target();
        prop_assert_eq!(run(&engine, &target), run(&engine, &target));
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Effects follow the rule model
//
// A rule contributes exactly its actions, in order, iff its condition holds
// under the reference model; rules contribute in declaration order.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn effects_match_model(rules in arb_rules(), facts in arb_facts()) {
        let engine = engine_for(&rules, &facts);
        let effects = run(&engine, &facts.target());

        let expected: Vec<(String, String)> = rules
            .iter()
            .filter(|rule| model_eval(&rule.condition, &facts))
            .flat_map(|rule| (0..rule.actions).map(move |j| (rule.uid.clone(), format!("{}.{j}", rule.uid))))
            .collect();
        let actual: Vec<(String, String)> = effects
            .iter()
            .map(|effect| (effect.rule().to_owned(), effect.target().unwrap_or_default().to_owned()))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn fired_rules_match_model(rules in arb_rules(), facts in arb_facts()) {
        let engine = engine_for(&rules, &facts);
        let report = engine.evaluate_event(&facts.target()).unwrap().call_detailed().unwrap();

        let expected: Vec<&str> = rules
            .iter()
            .filter(|rule| model_eval(&rule.condition, &facts))
            .map(|rule| rule.uid.as_str())
            .collect();
        let fired: Vec<&str> = report.fired().iter().map(String::as_str).collect();
        prop_assert_eq!(fired, expected);

        let order: Vec<&str> = report.evaluation_order().iter().map(String::as_str).collect();
        let declared: Vec<&str> = rules.iter().map(|rule| rule.uid.as_str()).collect();
        prop_assert_eq!(order, declared);
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Composition
//
// Running the full rule list gives the concatenation of running each rule on
// its own (no rule here assigns, so rules are independent).
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn full_run_is_concatenation_of_single_rules(rules in arb_rules(), facts in arb_facts()) {
        let engine = engine_for(&rules, &facts);
        let target = facts.target();
        let full = run(&engine, &target);

        let mut concatenated = Vec::new();
        for rule in &rules {
            let single: Arc<[_]> = Arc::from(vec![rule.to_rule()]);
            let effects = engine.evaluate_event_with(&target, single).unwrap().call().unwrap();
            concatenated.extend(effects);
        }
        prop_assert_eq!(full, concatenated);
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Execution-context state checks
//
// Evaluating an event whose id is already in the context is always a state
// error; so is evaluating an enrollment when one is set. Fresh identities
// never produce a state error.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn duplicate_event_is_state_error(rules in arb_rules(), facts in arb_facts(), pick in any::<prop::sample::Index>()) {
        let events = facts.context_events();
        prop_assume!(!events.is_empty());
        let engine = engine_for(&rules, &facts);
        let existing = &events[pick.index(events.len())];

        let err = engine.evaluate_event(existing).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::State);
        prop_assert_eq!(err, RuleEngineError::DuplicateEvent { event: existing.event.clone() });
    }

    #[test]
    fn second_enrollment_is_state_error(rules in arb_rules(), facts in arb_facts()) {
        let engine = RuleEngine::builder(build_context(&rules))
            .events(facts.context_events())
            .enrollment(RuleEnrollment::new("enrollment_a", base_date()))
            .build()
            .unwrap();

        let err = engine
            .evaluate_enrollment(&RuleEnrollment::new("enrollment_b", base_date()))
            .unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn fresh_identities_never_raise_state_errors(rules in arb_rules(), facts in arb_facts(), day in 0_u64..200) {
        let engine = engine_for(&rules, &facts);
        let fresh = RuleEvent::new("fresh", "visit", base_date() + Days::new(day));
        let event_result = engine.evaluate_event(&fresh);
        prop_assert!(event_result.is_ok());

        let enrollment_result = engine.evaluate_enrollment(&RuleEnrollment::new("enrollment", base_date()));
        prop_assert!(enrollment_result.is_ok());
    }
}
