use std::sync::Arc;

use chrono::NaiveDate;
use program_rules::{
    Rule, RuleAction, RuleEngine, RuleEngineContext, RuleEvent, RuleValueType, RuleVariable,
};

fn main() {
    // RUST_LOG=program_rules=trace shows every condition and effect.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let context = RuleEngineContext::builder()
        .variable(RuleVariable::NewestEvent {
            name: "hb".into(),
            data_element: "de_hb".into(),
            value_type: RuleValueType::Numeric,
        })
        .variable(RuleVariable::PreviousEvent {
            name: "hb_previous".into(),
            data_element: "de_hb".into(),
            value_type: RuleValueType::Numeric,
        })
        .rule(
            Rule::new("anaemia", "#{hb} < 11")
                .action(RuleAction::show_warning("de_hb", "Haemoglobin below 11 g/dl")),
        )
        .rule(
            Rule::new("falling_hb", "d2:hasValue('hb_previous') && #{hb} < #{hb_previous}")
                .action(RuleAction::display_text("Hb drop", "#{hb_previous} - #{hb}")),
        )
        .rule(
            Rule::new("lowest_hb", "d2:count('hb') > 1")
                .action(RuleAction::display_text("Lowest Hb", "d2:minValue('hb')")),
        )
        .build()
        .expect("failed to build context");

    let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).expect("valid date");
    let engine = RuleEngine::builder(Arc::new(context))
        .event(RuleEvent::new("visit1", "anc", day(2)).with_value("de_hb", "12.1"))
        .event(RuleEvent::new("visit2", "anc", day(16)).with_value("de_hb", "11.4"))
        .build()
        .expect("failed to build engine");

    let event = RuleEvent::new("visit3", "anc", day(30)).with_value("de_hb", "10.6");
    let report = engine
        .evaluate_event(&event)
        .and_then(|task| task.call_detailed())
        .expect("evaluation failed");

    println!("{report}");
    println!();
    println!("Evaluation order: {:?}", report.evaluation_order());
    println!("Rules that fired: {:?}", report.fired());
    for effect in report.effects() {
        println!("  {effect}");
    }
    println!("Duration: {:?}", report.duration());
}
