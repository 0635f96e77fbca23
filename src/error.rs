use std::fmt;

use thiserror::Error;

use crate::expression::ExpressionError;
use crate::types::ContextError;

/// Broad category of a [`RuleEngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required input is missing or has the wrong shape.
    Argument,
    /// An execution-context invariant would be violated.
    State,
    /// A rule's expression or function failed while being evaluated.
    Evaluation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Argument => write!(f, "argument error"),
            ErrorKind::State => write!(f, "state error"),
            ErrorKind::Evaluation => write!(f, "evaluation error"),
        }
    }
}

/// Unified error type for building engines and running evaluations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuleEngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("event '{event}' is already part of the execution context")]
    DuplicateEvent { event: String },

    #[error("enrollment '{enrollment}' is already part of the execution context")]
    EnrollmentAlreadySet { enrollment: String },

    #[error("rule '{rule}' failed evaluating '{expression}': {source}")]
    Evaluation {
        rule: String,
        expression: String,
        source: ExpressionError,
    },

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl RuleEngineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuleEngineError::InvalidArgument(_) | RuleEngineError::Context(_) => {
                ErrorKind::Argument
            }
            RuleEngineError::DuplicateEvent { .. } | RuleEngineError::EnrollmentAlreadySet { .. } => {
                ErrorKind::State
            }
            RuleEngineError::Evaluation { source, .. } if source.is_argument_error() => {
                ErrorKind::Argument
            }
            RuleEngineError::Evaluation { .. } => ErrorKind::Evaluation,
        }
    }
}
