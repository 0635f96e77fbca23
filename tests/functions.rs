use program_rules::{
    Arity, D2ExpressionEvaluator, ExpressionError, ExpressionEvaluator, FunctionError,
    RuleFunction, RuleValueType, RuleVariableValue, RuleVariableValueMap, SupplementaryData,
    Value,
};

fn args(items: &[Option<&str>]) -> Vec<Option<String>> {
    items.iter().map(|a| a.map(str::to_owned)).collect()
}

fn run(function: RuleFunction, items: &[Option<&str>]) -> Result<String, FunctionError> {
    function.evaluate(
        &args(items),
        &RuleVariableValueMap::new(),
        &SupplementaryData::new(),
    )
}

fn candidates(values: &[&str]) -> RuleVariableValueMap {
    let mut map = RuleVariableValueMap::new();
    map.insert(
        "de1".into(),
        RuleVariableValue::from_candidates(
            values.iter().map(|v| (*v).to_owned()).collect(),
            RuleValueType::Numeric,
        ),
    );
    map
}

// --- d2:right ---

#[test]
fn right_examples() {
    assert_eq!(run(RuleFunction::Right, &[Some("hello"), Some("3")]).unwrap(), "llo");
    assert_eq!(run(RuleFunction::Right, &[Some("hi"), Some("5")]).unwrap(), "hi");
    assert_eq!(run(RuleFunction::Right, &[Some("hello"), Some("-1")]).unwrap(), "");
    assert_eq!(run(RuleFunction::Right, &[None, Some("3")]).unwrap(), "");
}

#[test]
fn right_counts_characters_not_bytes() {
    assert_eq!(run(RuleFunction::Right, &[Some("naïve"), Some("3")]).unwrap(), "ïve");
}

#[test]
fn right_rejects_non_integer_count() {
    let err = run(RuleFunction::Right, &[Some("hello"), Some("1.5")]).unwrap_err();
    assert!(err.is_argument_error());
    assert_eq!(
        err.to_string(),
        "d2:right: number has to be an integer, got '1.5'"
    );
}

#[test]
fn right_count_must_be_exact_integer_text() {
    for count in ["", " 3 ", "3 "] {
        let err = run(RuleFunction::Right, &[Some("hello"), Some(count)]).unwrap_err();
        assert!(err.is_argument_error(), "{count:?}");
    }
    assert_eq!(run(RuleFunction::Right, &[Some("hello"), None]).unwrap(), "");
}

#[test]
fn right_requires_two_arguments() {
    let err = run(RuleFunction::Right, &[Some("hello")]).unwrap_err();
    assert_eq!(
        err,
        FunctionError::ArgumentCount {
            function: "d2:right",
            expected: Arity::Exact(2),
            actual: 1,
        }
    );
    assert_eq!(err.to_string(), "d2:right expects 2 argument(s), got 1");
}

// --- d2:minValue / d2:maxValue ---

#[test]
fn min_value_examples() {
    let supplementary = SupplementaryData::new();
    let key = args(&[Some("de1")]);

    let values = candidates(&["3", "1.5", "2"]);
    assert_eq!(
        RuleFunction::MinValue.evaluate(&key, &values, &supplementary).unwrap(),
        "1.5"
    );
    assert_eq!(
        RuleFunction::MaxValue.evaluate(&key, &values, &supplementary).unwrap(),
        "3"
    );

    let empty = candidates(&[]);
    assert_eq!(
        RuleFunction::MinValue.evaluate(&key, &empty, &supplementary).unwrap(),
        ""
    );
}

#[test]
fn min_value_of_unknown_key_is_empty() {
    assert_eq!(run(RuleFunction::MinValue, &[Some("nope")]).unwrap(), "");
}

#[test]
fn min_value_propagates_number_format_failure() {
    let values = candidates(&["3", "abc"]);
    let err = RuleFunction::MinValue
        .evaluate(&args(&[Some("de1")]), &values, &SupplementaryData::new())
        .unwrap_err();
    assert!(matches!(err, FunctionError::NumberFormat { ref value, .. } if value == "abc"));
    assert!(!err.is_argument_error());
}

#[test]
fn min_value_requires_exactly_one_argument() {
    let err = run(RuleFunction::MinValue, &[]).unwrap_err();
    assert!(err.is_argument_error());
    let err = run(RuleFunction::MinValue, &[Some("a"), Some("b")]).unwrap_err();
    assert!(err.is_argument_error());
}

// --- remaining library ---

#[test]
fn count_and_has_value() {
    let values = candidates(&["1", "2"]);
    let supplementary = SupplementaryData::new();
    let key = args(&[Some("de1")]);
    assert_eq!(RuleFunction::Count.evaluate(&key, &values, &supplementary).unwrap(), "2");
    assert_eq!(RuleFunction::HasValue.evaluate(&key, &values, &supplementary).unwrap(), "true");

    let missing = args(&[Some("nope")]);
    assert_eq!(RuleFunction::Count.evaluate(&missing, &values, &supplementary).unwrap(), "0");
    assert_eq!(RuleFunction::HasValue.evaluate(&missing, &values, &supplementary).unwrap(), "false");
}

#[test]
fn left_length_concatenate() {
    assert_eq!(run(RuleFunction::Left, &[Some("hello"), Some("2")]).unwrap(), "he");
    assert_eq!(run(RuleFunction::Left, &[Some("hello"), Some("9")]).unwrap(), "hello");
    assert_eq!(run(RuleFunction::Length, &[Some("naïve")]).unwrap(), "5");
    assert_eq!(run(RuleFunction::Length, &[None]).unwrap(), "0");
    assert_eq!(
        run(RuleFunction::Concatenate, &[Some("a"), None, Some("b"), Some("c")]).unwrap(),
        "abc"
    );
    assert_eq!(run(RuleFunction::Concatenate, &[]).unwrap(), "");
}

#[test]
fn in_org_unit_group_uses_supplementary_data() {
    let mut values = RuleVariableValueMap::new();
    values.insert(
        "org_unit".into(),
        RuleVariableValue::single("ou_clinic", RuleValueType::Text),
    );
    let mut supplementary = SupplementaryData::new();
    supplementary.insert("rural".into(), vec!["ou_clinic".into(), "ou_post".into()]);

    let rural = args(&[Some("rural")]);
    let urban = args(&[Some("urban")]);
    assert_eq!(
        RuleFunction::InOrgUnitGroup.evaluate(&rural, &values, &supplementary).unwrap(),
        "true"
    );
    assert_eq!(
        RuleFunction::InOrgUnitGroup.evaluate(&urban, &values, &supplementary).unwrap(),
        "false"
    );
}

#[test]
fn registry_metadata() {
    assert_eq!(RuleFunction::ALL.len(), 10);
    for function in RuleFunction::ALL {
        assert!(function.name().starts_with("d2:"));
        assert_eq!(RuleFunction::from_name(function.name()), Some(function));
    }
    assert_eq!(RuleFunction::Left.arity(), Arity::Exact(2));
    assert!(RuleFunction::Concatenate.arity().accepts(0));
    assert_eq!(RuleFunction::Count.return_type(), RuleValueType::Numeric);
    assert_eq!(RuleFunction::HasValue.return_type(), RuleValueType::Boolean);
    assert_eq!(RuleFunction::ZScoreWfa.arity(), Arity::Exact(3));
}

// --- d2:zScoreWFA ---

fn z_score(age: &str, weight: &str, gender: &str) -> Result<String, FunctionError> {
    run(RuleFunction::ZScoreWfa, &[Some(age), Some(weight), Some(gender)])
}

#[test]
fn z_score_on_sd_lines() {
    assert_eq!(z_score("1", "4.8", "1").unwrap(), "1");
    assert_eq!(z_score("1", "3.2", "1").unwrap(), "-2");
    assert_eq!(z_score("39", "9.9", "1").unwrap(), "-3");
    assert_eq!(z_score("39", "11.5", "1").unwrap(), "-1.80");
}

#[test]
fn z_score_above_median() {
    assert_eq!(z_score("1", "5.2", "1").unwrap(), "1.57");
    assert_eq!(z_score("6", "9.5", "1").unwrap(), "2.15");
    assert_eq!(z_score("1", "6.0", "1").unwrap(), "2.71");
}

#[test]
fn z_score_below_median() {
    assert_eq!(z_score("1", "2.9", "1").unwrap(), "-2.60");
    assert_eq!(z_score("12", "7.5", "1").unwrap(), "-1.44");
    assert_eq!(z_score("1", "2.8", "1").unwrap(), "-2.80");
}

#[test]
fn z_score_beyond_three_sd() {
    assert_eq!(z_score("1", "7.5", "1").unwrap(), "3.5");
}

#[test]
fn z_score_argument_errors() {
    let err = run(RuleFunction::ZScoreWfa, &[Some("1"), Some("2.9")]).unwrap_err();
    assert_eq!(
        err,
        FunctionError::ArgumentCount {
            function: "d2:zScoreWFA",
            expected: Arity::Exact(3),
            actual: 2,
        }
    );

    let err = z_score("1", "abc", "1").unwrap_err();
    assert!(err.is_argument_error());
    assert_eq!(
        err.to_string(),
        "d2:zScoreWFA: weight has to be a number, got 'abc'"
    );
}

// --- through the expression language ---

fn eval(expression: &str, values: &RuleVariableValueMap) -> Result<Value, ExpressionError> {
    D2ExpressionEvaluator::new().evaluate(expression, values, &SupplementaryData::new())
}

#[test]
fn functions_inside_expressions() {
    let values = candidates(&["3", "1.5", "2"]);
    assert_eq!(eval("d2:minValue('de1')", &values).unwrap(), Value::Number(1.5));
    assert_eq!(eval("d2:minValue(#{de1}) < 2", &values).unwrap(), Value::Bool(true));
    assert_eq!(eval("d2:count('de1') + 1", &values).unwrap(), Value::Number(4.0));
    assert_eq!(eval("d2:right('hello', 3)", &values).unwrap(), Value::Text("llo".into()));
    assert_eq!(
        eval("d2:concatenate(d2:left('abc', 1), '-', d2:right(#{de1}, 1))", &values).unwrap(),
        Value::Text("a-2".into())
    );
    assert_eq!(
        eval("d2:zScoreWFA(1, 4.8, 1)", &values).unwrap(),
        Value::Number(1.0)
    );
}

#[test]
fn unknown_function_is_reported() {
    let err = eval("d2:zScoreHFA(1, 2, 3)", &RuleVariableValueMap::new()).unwrap_err();
    assert_eq!(
        err,
        ExpressionError::UnknownFunction {
            name: "d2:zScoreHFA".into()
        }
    );
}
