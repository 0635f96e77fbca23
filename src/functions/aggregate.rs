use super::{arg, FunctionError};
use crate::types::RuleVariableValueMap;

fn parse_number(function: &'static str, raw: &str) -> Result<f64, FunctionError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FunctionError::NumberFormat {
            function,
            value: raw.to_owned(),
        })
}

fn fold_candidates(
    function: &'static str,
    args: &[Option<String>],
    values: &RuleVariableValueMap,
    pick: fn(f64, f64) -> f64,
) -> Result<String, FunctionError> {
    let Some(variable) = values.get(arg(args, 0)) else {
        return Ok(String::new());
    };
    let mut result: Option<f64> = None;
    for candidate in variable.candidates() {
        let n = parse_number(function, candidate)?;
        result = Some(result.map_or(n, |acc| pick(acc, n)));
    }
    Ok(result.map(|n| n.to_string()).unwrap_or_default())
}

/// Smallest numeric candidate of the named variable; empty when the
/// variable is unknown or has no candidates.
///
/// Results use the shortest float rendering, so a whole number comes back
/// as `"3"` rather than `"3.0"`.
pub(super) fn min_value(
    function: &'static str,
    args: &[Option<String>],
    values: &RuleVariableValueMap,
) -> Result<String, FunctionError> {
    fold_candidates(function, args, values, f64::min)
}

/// Largest numeric candidate, rendered like [`min_value`].
pub(super) fn max_value(
    function: &'static str,
    args: &[Option<String>],
    values: &RuleVariableValueMap,
) -> Result<String, FunctionError> {
    fold_candidates(function, args, values, f64::max)
}

pub(super) fn count(args: &[Option<String>], values: &RuleVariableValueMap) -> String {
    values
        .get(arg(args, 0))
        .map_or(0, |v| v.candidates().len())
        .to_string()
}

pub(super) fn has_value(args: &[Option<String>], values: &RuleVariableValueMap) -> String {
    values
        .get(arg(args, 0))
        .is_some_and(|v| v.has_value())
        .to_string()
}
