use std::collections::HashMap;
use std::fmt;

use super::Value;

/// Declared type of a program rule variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RuleValueType {
    #[default]
    Text,
    Numeric,
    Boolean,
    Date,
}

impl RuleValueType {
    /// The value substituted when a variable has no contributing data.
    #[must_use]
    pub fn default_value(self) -> &'static str {
        match self {
            RuleValueType::Text | RuleValueType::Date => "",
            RuleValueType::Numeric => "0",
            RuleValueType::Boolean => "false",
        }
    }
}

impl fmt::Display for RuleValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleValueType::Text => "TEXT",
            RuleValueType::Numeric => "NUMERIC",
            RuleValueType::Boolean => "BOOLEAN",
            RuleValueType::Date => "DATE",
        };
        f.write_str(s)
    }
}

/// A variable declared by the program, resolved per evaluation call into a
/// [`RuleVariableValue`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "source", rename_all = "snake_case"))]
pub enum RuleVariable {
    /// Value of a data element on the event being evaluated.
    CurrentEvent {
        name: String,
        data_element: String,
        value_type: RuleValueType,
    },
    /// Most recent value of a data element across every event of the enrollment.
    NewestEvent {
        name: String,
        data_element: String,
        value_type: RuleValueType,
    },
    /// Most recent value of a data element within one program stage.
    NewestEventProgramStage {
        name: String,
        data_element: String,
        program_stage: String,
        value_type: RuleValueType,
    },
    /// Most recent value among events ordered strictly before the target event.
    PreviousEvent {
        name: String,
        data_element: String,
        value_type: RuleValueType,
    },
    /// Enrollment attribute value.
    Attribute {
        name: String,
        attribute: String,
        value_type: RuleValueType,
    },
    /// Value previously calculated for the target record by the host.
    CalculatedValue {
        name: String,
        value_type: RuleValueType,
    },
}

impl RuleVariable {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            RuleVariable::CurrentEvent { name, .. }
            | RuleVariable::NewestEvent { name, .. }
            | RuleVariable::NewestEventProgramStage { name, .. }
            | RuleVariable::PreviousEvent { name, .. }
            | RuleVariable::Attribute { name, .. }
            | RuleVariable::CalculatedValue { name, .. } => name,
        }
    }

    #[must_use]
    pub fn value_type(&self) -> RuleValueType {
        match self {
            RuleVariable::CurrentEvent { value_type, .. }
            | RuleVariable::NewestEvent { value_type, .. }
            | RuleVariable::NewestEventProgramStage { value_type, .. }
            | RuleVariable::PreviousEvent { value_type, .. }
            | RuleVariable::Attribute { value_type, .. }
            | RuleVariable::CalculatedValue { value_type, .. } => *value_type,
        }
    }
}

/// The resolved value of one variable for a single evaluation call.
///
/// `candidates` holds every contributing raw value in chronological order
/// (oldest first); `value` is the one selected by the variable's policy,
/// or `None` when nothing contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleVariableValue {
    value: Option<String>,
    candidates: Vec<String>,
    value_type: RuleValueType,
}

impl RuleVariableValue {
    /// A variable with no contributing data.
    #[must_use]
    pub fn empty(value_type: RuleValueType) -> Self {
        Self {
            value: None,
            candidates: Vec::new(),
            value_type,
        }
    }

    /// A single-valued variable whose only candidate is its value.
    #[must_use]
    pub fn single(value: impl Into<String>, value_type: RuleValueType) -> Self {
        let value = value.into();
        Self {
            candidates: vec![value.clone()],
            value: Some(value),
            value_type,
        }
    }

    /// A variable resolved from several contributions. `candidates` must be
    /// oldest first; the newest candidate becomes the value.
    #[must_use]
    pub fn from_candidates(candidates: Vec<String>, value_type: RuleValueType) -> Self {
        Self {
            value: candidates.last().cloned(),
            candidates,
            value_type,
        }
    }

    /// The selected current value, if any data contributed.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The selected value, or the declared type's default when empty.
    #[must_use]
    pub fn value_or_default(&self) -> &str {
        self.value
            .as_deref()
            .unwrap_or_else(|| self.value_type.default_value())
    }

    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    #[must_use]
    pub fn value_type(&self) -> RuleValueType {
        self.value_type
    }

    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Convert the value (or type default) into a typed [`Value`].
    /// Returns `None` when the stored text does not fit the declared type.
    #[must_use]
    pub fn typed(&self) -> Option<Value> {
        Value::from_typed(self.value_or_default(), self.value_type)
    }
}

/// Variable name to resolved value, built fresh for every evaluation call.
pub type RuleVariableValueMap = HashMap<String, RuleVariableValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_uses_type_default() {
        let v = RuleVariableValue::empty(RuleValueType::Numeric);
        assert!(!v.has_value());
        assert_eq!(v.value(), None);
        assert_eq!(v.value_or_default(), "0");
        assert!(v.candidates().is_empty());
        assert_eq!(v.typed(), Some(Value::Number(0.0)));
    }

    #[test]
    fn from_candidates_selects_newest() {
        let v = RuleVariableValue::from_candidates(
            vec!["1".into(), "2".into(), "3".into()],
            RuleValueType::Numeric,
        );
        assert_eq!(v.value(), Some("3"));
        assert_eq!(v.candidates(), &["1", "2", "3"]);
    }

    #[test]
    fn from_no_candidates_is_empty() {
        let v = RuleVariableValue::from_candidates(Vec::new(), RuleValueType::Text);
        assert!(!v.has_value());
    }

    #[test]
    fn typed_rejects_mismatched_text() {
        let v = RuleVariableValue::single("abc", RuleValueType::Numeric);
        assert_eq!(v.typed(), None);
    }

    #[test]
    fn variable_accessors() {
        let var = RuleVariable::PreviousEvent {
            name: "weight".into(),
            data_element: "de_weight".into(),
            value_type: RuleValueType::Numeric,
        };
        assert_eq!(var.name(), "weight");
        assert_eq!(var.value_type(), RuleValueType::Numeric);
    }

    #[test]
    fn default_values() {
        assert_eq!(RuleValueType::Text.default_value(), "");
        assert_eq!(RuleValueType::Numeric.default_value(), "0");
        assert_eq!(RuleValueType::Boolean.default_value(), "false");
        assert_eq!(RuleValueType::Date.default_value(), "");
    }
}
