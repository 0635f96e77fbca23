use std::sync::Arc;

use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use program_rules::{
    Rule, RuleAction, RuleEngine, RuleEngineContext, RuleEvent, RuleValueType, RuleVariable,
    RuleVariableValueMapBuilder,
};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Build a context with `n` numeric variables (`v0..`) and `n` rules, each
/// checking one variable and its history, plus a history of `events` prior
/// events.
fn build_engine(n: usize, events: usize) -> (RuleEngine, RuleEvent) {
    let mut builder = RuleEngineContext::builder();
    for i in 0..n {
        builder = builder
            .variable(RuleVariable::CurrentEvent {
                name: format!("v{i}"),
                data_element: format!("de{i}"),
                value_type: RuleValueType::Numeric,
            })
            .variable(RuleVariable::NewestEvent {
                name: format!("h{i}"),
                data_element: format!("de{i}"),
                value_type: RuleValueType::Numeric,
            })
            .rule(
                Rule::new(
                    format!("r{i}"),
                    format!("#{{v{i}}} >= 1 && d2:minValue('h{i}') < 100"),
                )
                .action(RuleAction::assign(format!("de_out{i}"), format!("#{{v{i}}} * 2")))
                .action(RuleAction::hide_field(format!("de_hidden{i}"))),
            );
    }
    let context = Arc::new(builder.build().unwrap());

    let history = (0..events).map(|e| {
        (0..n).fold(
            RuleEvent::new(format!("ev{e}"), "visit", base_date() + Days::new(e as u64)),
            |event, i| event.with_value(format!("de{i}"), (e + i).to_string()),
        )
    });
    let engine = RuleEngine::builder(context)
        .events(history)
        .current_date(base_date())
        .build()
        .unwrap();

    let target = (0..n).fold(
        RuleEvent::new("target", "visit", base_date() + Days::new(365)),
        |event, i| event.with_value(format!("de{i}"), "10"),
    );
    (engine, target)
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_eval");

    for &n in &[5, 20, 50] {
        let (engine, target) = build_engine(n, 10);
        group.bench_function(&format!("{n}_rules_call"), |b| {
            b.iter(|| {
                engine
                    .evaluate_event(black_box(&target))
                    .unwrap()
                    .call()
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_value_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_resolution");

    for &events in &[0, 10, 100] {
        let (engine, target) = build_engine(20, events);
        group.bench_function(&format!("{events}_events"), |b| {
            b.iter(|| {
                RuleVariableValueMapBuilder::for_event(engine.context(), black_box(&target))
                    .events(engine.events())
                    .current_date(Some(base_date()))
                    .build()
            });
        });
    }

    group.finish();
}

fn bench_context_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_construction");

    for &n in &[5, 20, 50] {
        group.bench_function(&format!("{n}_rules"), |b| {
            b.iter(|| black_box(build_engine(n, 0)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_value_resolution,
    bench_context_construction
);
criterion_main!(benches);
