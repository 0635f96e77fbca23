use crate::functions::RuleFunction;
use crate::types::{
    ArithOp, CompareOp, Expr, RuleVariableValueMap, SupplementaryData, Value,
};

use super::ExpressionError;

/// Evaluate a parsed expression against resolved variable values.
///
/// Variables are read through their declared type; a variable with no value
/// reads as its type's default (`0`, `false`, empty text). `&&` and `||`
/// short-circuit. Numeric text is compared and computed with as a number,
/// except under `+`, which concatenates as soon as either side is text.
///
/// # Errors
///
/// Returns [`ExpressionError`] for unknown variables or functions, values
/// that do not fit their declared type, operator type mismatches and
/// function failures.
pub fn interpret(
    expr: &Expr,
    values: &RuleVariableValueMap,
    supplementary: &SupplementaryData,
) -> Result<Value, ExpressionError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Variable { name, .. } => variable(name, values),
        Expr::Call { function, args } => call(function, args, values, supplementary),
        Expr::Compare { lhs, op, rhs } => {
            let lhs = interpret(lhs, values, supplementary)?;
            let rhs = interpret(rhs, values, supplementary)?;
            compare(&lhs, *op, &rhs).map(Value::Bool)
        }
        Expr::Arith { lhs, op, rhs } => {
            let lhs = interpret(lhs, values, supplementary)?;
            let rhs = interpret(rhs, values, supplementary)?;
            arith(lhs, *op, rhs)
        }
        Expr::And(a, b) => {
            if !boolean(interpret(a, values, supplementary)?)? {
                return Ok(Value::Bool(false));
            }
            boolean(interpret(b, values, supplementary)?).map(Value::Bool)
        }
        Expr::Or(a, b) => {
            if boolean(interpret(a, values, supplementary)?)? {
                return Ok(Value::Bool(true));
            }
            boolean(interpret(b, values, supplementary)?).map(Value::Bool)
        }
        Expr::Not(inner) => boolean(interpret(inner, values, supplementary)?).map(|b| Value::Bool(!b)),
        Expr::Neg(inner) => match numeric(interpret(inner, values, supplementary)?) {
            Value::Number(n) => Ok(Value::Number(-n)),
            other => Err(ExpressionError::TypeMismatch {
                op: "-".into(),
                lhs: other.type_name(),
                rhs: other.type_name(),
            }),
        },
    }
}

fn variable(name: &str, values: &RuleVariableValueMap) -> Result<Value, ExpressionError> {
    let resolved = values
        .get(name)
        .ok_or_else(|| ExpressionError::UnknownVariable {
            name: name.to_owned(),
        })?;
    resolved.typed().ok_or_else(|| ExpressionError::InvalidValue {
        name: name.to_owned(),
        value: resolved.value_or_default().to_owned(),
        value_type: resolved.value_type(),
    })
}

fn call(
    function: &str,
    args: &[Expr],
    values: &RuleVariableValueMap,
    supplementary: &SupplementaryData,
) -> Result<Value, ExpressionError> {
    let handler =
        RuleFunction::from_name(function).ok_or_else(|| ExpressionError::UnknownFunction {
            name: function.to_owned(),
        })?;

    let mut evaluated = Vec::with_capacity(args.len());
    for arg in args {
        let value = match arg {
            Expr::Variable { name, .. } if handler.takes_variable_name() => Some(name.clone()),
            Expr::Variable { name, .. } => {
                let resolved = values
                    .get(name)
                    .ok_or_else(|| ExpressionError::UnknownVariable { name: name.clone() })?;
                resolved.value().map(str::to_owned)
            }
            other => Some(interpret(other, values, supplementary)?.to_string()),
        };
        evaluated.push(value);
    }

    let result = handler.evaluate(&evaluated, values, supplementary)?;
    if result.is_empty() {
        return Ok(Value::Text(result));
    }
    Ok(Value::from_typed(&result, handler.return_type()).unwrap_or(Value::Text(result)))
}

fn boolean(value: Value) -> Result<bool, ExpressionError> {
    value
        .as_bool()
        .ok_or_else(|| ExpressionError::not_boolean(&value))
}

/// Read numeric-looking text as a number, leave everything else alone.
fn numeric(value: Value) -> Value {
    match value {
        Value::Text(ref t) => match t.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => value,
        },
        other => other,
    }
}

/// Bring a mixed pair to a common type where the text side allows it.
fn coerce(lhs: &Value, rhs: &Value) -> (Value, Value) {
    match (lhs, rhs) {
        (Value::Number(_), Value::Text(_)) => (lhs.clone(), numeric(rhs.clone())),
        (Value::Text(_), Value::Number(_)) => (numeric(lhs.clone()), rhs.clone()),
        (Value::Bool(_), Value::Text(_)) => (lhs.clone(), rhs.as_bool().map_or(rhs.clone(), Value::Bool)),
        (Value::Text(_), Value::Bool(_)) => (lhs.as_bool().map_or(lhs.clone(), Value::Bool), rhs.clone()),
        _ => (lhs.clone(), rhs.clone()),
    }
}

fn compare(lhs: &Value, op: CompareOp, rhs: &Value) -> Result<bool, ExpressionError> {
    let (lhs, rhs) = coerce(lhs, rhs);
    if let Some(result) = lhs.compare(op, &rhs) {
        return Ok(result);
    }
    let same_type = std::mem::discriminant(&lhs) == std::mem::discriminant(&rhs);
    match op {
        CompareOp::Eq if !same_type => Ok(false),
        CompareOp::Neq if !same_type => Ok(true),
        _ => Err(ExpressionError::TypeMismatch {
            op: op.to_string(),
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }),
    }
}

fn arith(lhs: Value, op: ArithOp, rhs: Value) -> Result<Value, ExpressionError> {
    if op == ArithOp::Add && (matches!(lhs, Value::Text(_)) || matches!(rhs, Value::Text(_))) {
        return Ok(Value::Text(format!("{lhs}{rhs}")));
    }
    let (Value::Number(a), Value::Number(b)) = (numeric(lhs.clone()), numeric(rhs.clone())) else {
        return Err(ExpressionError::TypeMismatch {
            op: op.to_string(),
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        });
    };
    let result = match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div | ArithOp::Rem if b == 0.0 => return Err(ExpressionError::DivisionByZero),
        ArithOp::Div => a / b,
        ArithOp::Rem => a % b,
    };
    Ok(Value::Number(result))
}
