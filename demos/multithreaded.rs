use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use program_rules::{
    Rule, RuleAction, RuleEngine, RuleEngineContext, RuleEvent, RuleValueType, RuleVariable,
};

fn main() {
    let context = RuleEngineContext::builder()
        .variable(RuleVariable::CurrentEvent {
            name: "age".into(),
            data_element: "de_age".into(),
            value_type: RuleValueType::Numeric,
        })
        .rule(
            Rule::new("adolescent", "#{age} < 18")
                .action(RuleAction::show_warning("de_age", "Adolescent pregnancy")),
        )
        .build()
        .expect("failed to build context");

    let engine = Arc::new(
        RuleEngine::builder(Arc::new(context))
            .build()
            .expect("failed to build engine"),
    );
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let eng = Arc::clone(&engine);
            // Values are resolved on this thread; the rule walk runs on the worker.
            let event = RuleEvent::new(format!("ev{i}"), "anc", date)
                .with_value("de_age", (16 + i).to_string());
            let task = eng.evaluate_event(&event).expect("valid event");
            thread::spawn(move || {
                let effects = task.call().expect("evaluation failed");
                println!("Thread {i}: {} effect(s)", effects.len());
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
