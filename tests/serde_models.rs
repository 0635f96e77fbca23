#![cfg(feature = "serde")]

use std::sync::Arc;

use program_rules::{
    EventStatus, Rule, RuleAction, RuleEffect, RuleEngine, RuleEngineContext, RuleEvent,
    RuleValueType, RuleVariable,
};
use serde_json::json;

#[test]
fn program_metadata_from_json_evaluates() {
    let rules: Vec<Rule> = serde_json::from_value(json!([
        {
            "uid": "low_weight",
            "condition": "#{weight} < 2.5",
            "actions": [
                { "type": "show_warning", "content": "Low birth weight", "field": "de_weight" },
                { "type": "assign", "field": "de_risk", "data": "'high'" }
            ]
        },
        {
            "uid": "followup_only",
            "program_stage": "followup",
            "condition": "true",
            "actions": [{ "type": "hide_section", "section": "sec_birth" }]
        }
    ]))
    .unwrap();
    let variables: Vec<RuleVariable> = serde_json::from_value(json!([
        {
            "source": "current_event",
            "name": "weight",
            "data_element": "de_weight",
            "value_type": "NUMERIC"
        }
    ]))
    .unwrap();
    assert_eq!(variables[0].value_type(), RuleValueType::Numeric);
    assert_eq!(rules[1].program_stage.as_deref(), Some("followup"));

    let context = RuleEngineContext::builder()
        .rules(rules)
        .variables(variables)
        .build()
        .unwrap();
    let context = Arc::new(context);

    let event: RuleEvent = serde_json::from_value(json!({
        "event": "ev1",
        "program_stage": "birth",
        "status": "COMPLETED",
        "event_date": "2024-03-01",
        "data_values": { "de_weight": "2.1" }
    }))
    .unwrap();
    assert_eq!(event.status, EventStatus::Completed);

    let engine = RuleEngine::builder(Arc::clone(&context)).build().unwrap();
    let effects = engine
        .evaluate_event_with(&event, context.rules_for_stage(&event.program_stage))
        .unwrap()
        .call()
        .unwrap();

    let rendered = serde_json::to_value(&effects).unwrap();
    assert_eq!(
        rendered,
        json!([
            {
                "rule": "low_weight",
                "action": {
                    "type": "show_warning",
                    "content": "Low birth weight",
                    "data": null,
                    "field": "de_weight"
                },
                "data": ""
            },
            {
                "rule": "low_weight",
                "action": {
                    "type": "assign",
                    "field": "de_risk",
                    "content": null,
                    "data": "'high'"
                },
                "data": "high"
            }
        ])
    );
}

#[test]
fn effects_survive_a_round_trip() {
    let effect = RuleEffect::new(
        "reminder",
        RuleAction::schedule_message("notif_visit", "d2:addDays(V{current_date}, 7)"),
        "2024-03-08",
    );
    let text = serde_json::to_string(&effect).unwrap();
    let back: RuleEffect = serde_json::from_str(&text).unwrap();
    assert_eq!(back, effect);
}

#[test]
fn optional_event_fields_default() {
    let event: RuleEvent = serde_json::from_value(json!({
        "event": "ev1",
        "program_stage": "anc",
        "event_date": "2024-03-01"
    }))
    .unwrap();
    assert_eq!(event.status, EventStatus::Active);
    assert!(event.data_values.is_empty());
    assert!(event.due_date.is_none());
}
