use std::sync::Arc;

use chrono::NaiveDate;
use program_rules::{
    Rule, RuleAction, RuleEngine, RuleEngineContext, RuleEvent, RuleValueType, RuleVariable,
};

fn main() {
    // Declare variables and rules
    let context = RuleEngineContext::builder()
        .variable(RuleVariable::CurrentEvent {
            name: "weight".into(),
            data_element: "de_weight".into(),
            value_type: RuleValueType::Numeric,
        })
        .variable(RuleVariable::CurrentEvent {
            name: "height".into(),
            data_element: "de_height".into(),
            value_type: RuleValueType::Numeric,
        })
        .rule(
            Rule::new("low_weight", "#{weight} < 2.5")
                .action(RuleAction::show_warning("de_weight", "Low birth weight")),
        )
        .rule(
            Rule::new("ratio", "d2:hasValue('height')")
                .action(RuleAction::assign("de_ratio", "#{weight} / #{height} * 100")),
        )
        .build()
        .expect("failed to build context");

    println!("{context}");

    let engine = RuleEngine::builder(Arc::new(context))
        .build()
        .expect("failed to build engine");

    // Evaluate one event
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
    let event = RuleEvent::new("ev1", "birth", date)
        .with_value("de_weight", "2.2")
        .with_value("de_height", "44");

    let effects = engine
        .evaluate_event(&event)
        .and_then(|task| task.call())
        .expect("evaluation failed");

    for effect in &effects {
        println!("{effect}");
    }
}
