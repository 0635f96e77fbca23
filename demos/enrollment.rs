use std::sync::Arc;

use chrono::NaiveDate;
use program_rules::{
    Rule, RuleAction, RuleEngine, RuleEngineContext, RuleEnrollment, RuleEvent, RuleValueType,
    RuleVariable, TriggerEnvironment,
};

fn main() {
    let context = RuleEngineContext::builder()
        .variable(RuleVariable::Attribute {
            name: "age".into(),
            attribute: "at_age".into(),
            value_type: RuleValueType::Numeric,
        })
        .variable(RuleVariable::NewestEventProgramStage {
            name: "last_bp".into(),
            data_element: "de_systolic".into(),
            program_stage: "screening".into(),
            value_type: RuleValueType::Numeric,
        })
        .rule(
            Rule::new("hypertension", "#{last_bp} >= 140")
                .action(RuleAction::show_warning("at_age", "Hypertension at last screening")),
        )
        .rule(
            Rule::new("followup_stage", "A{age} >= 40")
                .for_stage("followup")
                .action(RuleAction::schedule_message("notif_followup", "V{current_date}")),
        )
        .rule(
            Rule::new("server_note", "V{environment} == 'Server'")
                .action(RuleAction::display_text("Source", "'batch run'")),
        )
        .build()
        .expect("failed to build context");
    let context = Arc::new(context);

    let day = |d| NaiveDate::from_ymd_opt(2024, 9, d).expect("valid date");
    let engine = RuleEngine::builder(Arc::clone(&context))
        .event(RuleEvent::new("scr1", "screening", day(3)).with_value("de_systolic", "128"))
        .event(RuleEvent::new("scr2", "screening", day(17)).with_value("de_systolic", "146"))
        .trigger_environment(TriggerEnvironment::Server)
        .current_date(day(30))
        .build()
        .expect("failed to build engine");

    // Enrollment-level rules: those not bound to a stage.
    let enrollment = RuleEnrollment::new("en1", day(1)).with_attribute("at_age", "52");
    let effects = engine
        .evaluate_enrollment_with(&enrollment, context.rules_for_enrollment())
        .and_then(|task| task.call())
        .expect("evaluation failed");
    println!("Enrollment {}:", enrollment.enrollment);
    for effect in &effects {
        println!("  {effect}");
    }

    // A second enrollment on an engine that already carries one is refused.
    let with_enrollment = RuleEngine::builder(context)
        .enrollment(enrollment.clone())
        .build()
        .expect("failed to build engine");
    let other = RuleEnrollment::new("en2", day(1));
    match with_enrollment.evaluate_enrollment(&other) {
        Ok(_) => println!("unexpectedly accepted {}", other.enrollment),
        Err(err) => println!("Refused: {err} ({})", err.kind()),
    }
}
