use std::cmp::Ordering;
use std::fmt;

use super::expr::CompareOp;
use super::variable::RuleValueType;

/// A typed result produced by expression evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit floating-point number. All numerics share this representation.
    Number(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string. Dates travel as `YYYY-MM-DD` text.
    Text(String),
}

impl Value {
    /// Convert a raw string into a value of the given declared type.
    ///
    /// Returns `None` when the text does not fit the type (e.g. `"abc"` as
    /// numeric). An empty string is always accepted as empty text.
    #[must_use]
    pub fn from_typed(raw: &str, value_type: RuleValueType) -> Option<Value> {
        if raw.is_empty() {
            return Some(Value::Text(String::new()));
        }
        match value_type {
            RuleValueType::Numeric => raw.trim().parse::<f64>().ok().map(Value::Number),
            RuleValueType::Boolean => match raw.trim() {
                t if t.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
                f if f.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
                _ => None,
            },
            RuleValueType::Text | RuleValueType::Date => Some(Value::Text(raw.to_owned())),
        }
    }

    /// Interpret this value as a boolean. `Text("true")` and `Text("false")`
    /// are accepted, everything else returns `None`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Text(t) if t == "true" => Some(true),
            Value::Text(t) if t == "false" => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Text(_) => "text",
        }
    }

    /// Compare this value to another using the given operator.
    /// Returns `None` for incompatible types or unsupported operations (e.g. Gt on bools).
    #[must_use]
    pub fn compare(&self, op: CompareOp, other: &Value) -> Option<bool> {
        let ord = self.partial_cmp_value(other)?;
        match op {
            CompareOp::Eq => Some(ord == Ordering::Equal),
            CompareOp::Neq => Some(ord != Ordering::Equal),
            _ if matches!(self, Value::Bool(_)) => None,
            CompareOp::Gt => Some(ord == Ordering::Greater),
            CompareOp::Gte => Some(ord != Ordering::Less),
            CompareOp::Lt => Some(ord == Ordering::Less),
            CompareOp::Lte => Some(ord != Ordering::Greater),
        }
    }

    fn partial_cmp_value(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Renders the canonical string form handed to hosts as effect data:
/// numbers in shortest round-trip form (`3`, `1.5`), booleans as
/// `true`/`false`, text unquoted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
        }
    }
}
