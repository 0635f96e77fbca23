use thiserror::Error;

/// Errors raised while assembling a [`RuleEngineContext`](super::RuleEngineContext).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("duplicate rule uid '{uid}'")]
    DuplicateRule { uid: String },

    #[error("duplicate variable name '{name}'")]
    DuplicateVariable { name: String },

    #[error("rule uid must not be empty")]
    EmptyRuleUid,
}
