use std::fmt;

use super::rule::{ActionKind, RuleAction};

/// The outcome of one fired action: which rule fired it, the action itself,
/// and the string result of the action's data expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct RuleEffect {
    rule: String,
    action: RuleAction,
    data: String,
}

impl RuleEffect {
    pub fn new(rule: impl Into<String>, action: RuleAction, data: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            action,
            data: data.into(),
        }
    }

    /// Uid of the rule that produced this effect.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    #[must_use]
    pub fn action(&self) -> &RuleAction {
        &self.action
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.action.target()
    }

    /// Evaluated data; empty when the action carries no data expression.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl fmt::Display for RuleEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.rule, self.kind())?;
        if let Some(target) = self.target() {
            write!(f, "({target})")?;
        }
        if !self.data.is_empty() {
            write!(f, " = {}", self.data)?;
        }
        Ok(())
    }
}
