//! The expression evaluation seam.
//!
//! The engine only needs something that turns `(expression, values,
//! supplementary data)` into a [`Value`]. [`ExpressionEvaluator`] is that
//! contract; [`D2ExpressionEvaluator`] is the bundled implementation.

mod interpret;

use thiserror::Error;

use crate::functions::FunctionError;
use crate::parse::{parse_expression, ParseError};
use crate::types::{Expr, RuleValueType, RuleVariableValueMap, SupplementaryData, Value};

pub use interpret::interpret;

/// Errors raised while evaluating one expression.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExpressionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("variable '{name}' has value '{value}' which is not {value_type}")]
    InvalidValue {
        name: String,
        value: String,
        value_type: RuleValueType,
    },

    #[error("cannot apply '{op}' to {lhs} and {rhs}")]
    TypeMismatch {
        op: String,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("expected boolean, found {found} '{value}'")]
    NotBoolean { found: &'static str, value: String },

    #[error(transparent)]
    Function(#[from] FunctionError),
}

impl ExpressionError {
    /// Whether the failure is a wrong function call shape rather than bad data.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(self, ExpressionError::Function(e) if e.is_argument_error())
    }

    pub(crate) fn not_boolean(value: &Value) -> Self {
        ExpressionError::NotBoolean {
            found: value.type_name(),
            value: value.to_string(),
        }
    }
}

/// Evaluates condition and action expressions.
///
/// Implemented by [`D2ExpressionEvaluator`] and by any
/// `Fn(&str, &RuleVariableValueMap, &SupplementaryData) -> Result<Value, ExpressionError>`
/// closure, so hosts can plug in their own language.
pub trait ExpressionEvaluator: Send + Sync {
    /// Evaluate `expression` against the resolved variable values.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError`] if the expression is malformed or fails
    /// while being evaluated.
    fn evaluate(
        &self,
        expression: &str,
        values: &RuleVariableValueMap,
        supplementary: &SupplementaryData,
    ) -> Result<Value, ExpressionError>;
}

impl<F> ExpressionEvaluator for F
where
    F: Fn(&str, &RuleVariableValueMap, &SupplementaryData) -> Result<Value, ExpressionError>
        + Send
        + Sync,
{
    fn evaluate(
        &self,
        expression: &str,
        values: &RuleVariableValueMap,
        supplementary: &SupplementaryData,
    ) -> Result<Value, ExpressionError> {
        self(expression, values, supplementary)
    }
}

/// Parses expressions with [`parse_expression`] and runs them with
/// [`interpret`].
#[derive(Debug, Clone, Copy, Default)]
pub struct D2ExpressionEvaluator;

impl D2ExpressionEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse without evaluating, for validating rule metadata up front.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if `expression` is not valid syntax.
    pub fn parse(&self, expression: &str) -> Result<Expr, ParseError> {
        parse_expression(expression)
    }
}

impl ExpressionEvaluator for D2ExpressionEvaluator {
    fn evaluate(
        &self,
        expression: &str,
        values: &RuleVariableValueMap,
        supplementary: &SupplementaryData,
    ) -> Result<Value, ExpressionError> {
        let expr = parse_expression(expression)?;
        interpret(&expr, values, supplementary)
    }
}
