//! Built-in `d2:` functions.
//!
//! Every function receives its arguments as optional strings (absent when a
//! referenced variable has no value), the per-call value map and the
//! supplementary data, and returns a string. Call shape is checked by
//! [`check_arg_count`] against the function's declared [`Arity`] before the
//! handler runs.

mod aggregate;
mod membership;
mod text;
mod zscore;

use std::fmt;

use thiserror::Error;

use crate::types::{RuleValueType, RuleVariableValueMap, SupplementaryData};

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Errors raised by a function handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FunctionError {
    #[error("{function} expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        function: &'static str,
        expected: Arity,
        actual: usize,
    },

    #[error("{function}: {message}")]
    InvalidArgument {
        function: &'static str,
        message: String,
    },

    #[error("{function}: '{value}' is not a number")]
    NumberFormat {
        function: &'static str,
        value: String,
    },
}

impl FunctionError {
    /// Whether the failure is about call shape rather than data.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            FunctionError::ArgumentCount { .. } | FunctionError::InvalidArgument { .. }
        )
    }
}

/// Check that `args` matches `expected`, failing with
/// [`FunctionError::ArgumentCount`] otherwise.
pub(crate) fn check_arg_count<T>(
    function: &'static str,
    args: &[T],
    expected: Arity,
) -> Result<(), FunctionError> {
    if expected.accepts(args.len()) {
        Ok(())
    } else {
        Err(FunctionError::ArgumentCount {
            function,
            expected,
            actual: args.len(),
        })
    }
}

/// The closed set of built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFunction {
    MinValue,
    MaxValue,
    Count,
    HasValue,
    Left,
    Right,
    Length,
    Concatenate,
    InOrgUnitGroup,
    ZScoreWfa,
}

impl RuleFunction {
    pub const ALL: [RuleFunction; 10] = [
        RuleFunction::MinValue,
        RuleFunction::MaxValue,
        RuleFunction::Count,
        RuleFunction::HasValue,
        RuleFunction::Left,
        RuleFunction::Right,
        RuleFunction::Length,
        RuleFunction::Concatenate,
        RuleFunction::InOrgUnitGroup,
        RuleFunction::ZScoreWfa,
    ];

    /// Look up a function by its expression name, e.g. `d2:minValue`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<RuleFunction> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RuleFunction::MinValue => "d2:minValue",
            RuleFunction::MaxValue => "d2:maxValue",
            RuleFunction::Count => "d2:count",
            RuleFunction::HasValue => "d2:hasValue",
            RuleFunction::Left => "d2:left",
            RuleFunction::Right => "d2:right",
            RuleFunction::Length => "d2:length",
            RuleFunction::Concatenate => "d2:concatenate",
            RuleFunction::InOrgUnitGroup => "d2:inOrgUnitGroup",
            RuleFunction::ZScoreWfa => "d2:zScoreWFA",
        }
    }

    #[must_use]
    pub fn arity(self) -> Arity {
        match self {
            RuleFunction::MinValue
            | RuleFunction::MaxValue
            | RuleFunction::Count
            | RuleFunction::HasValue
            | RuleFunction::Length
            | RuleFunction::InOrgUnitGroup => Arity::Exact(1),
            RuleFunction::Left | RuleFunction::Right => Arity::Exact(2),
            RuleFunction::ZScoreWfa => Arity::Exact(3),
            RuleFunction::Concatenate => Arity::AtLeast(0),
        }
    }

    /// Type the string result is read back as by the expression evaluator.
    #[must_use]
    pub fn return_type(self) -> RuleValueType {
        match self {
            RuleFunction::MinValue
            | RuleFunction::MaxValue
            | RuleFunction::Count
            | RuleFunction::Length
            | RuleFunction::ZScoreWfa => RuleValueType::Numeric,
            RuleFunction::HasValue | RuleFunction::InOrgUnitGroup => RuleValueType::Boolean,
            RuleFunction::Left | RuleFunction::Right | RuleFunction::Concatenate => {
                RuleValueType::Text
            }
        }
    }

    /// Whether the function addresses variables by name: a `#{x}` argument
    /// is passed as `"x"` instead of the variable's value.
    #[must_use]
    pub fn takes_variable_name(self) -> bool {
        matches!(
            self,
            RuleFunction::MinValue
                | RuleFunction::MaxValue
                | RuleFunction::Count
                | RuleFunction::HasValue
        )
    }

    /// Run the function.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionError`] on a wrong argument count, malformed
    /// argument content, or non-numeric data fed to a numeric aggregate.
    pub fn evaluate(
        self,
        args: &[Option<String>],
        values: &RuleVariableValueMap,
        supplementary: &SupplementaryData,
    ) -> Result<String, FunctionError> {
        check_arg_count(self.name(), args, self.arity())?;
        match self {
            RuleFunction::MinValue => aggregate::min_value(self.name(), args, values),
            RuleFunction::MaxValue => aggregate::max_value(self.name(), args, values),
            RuleFunction::Count => Ok(aggregate::count(args, values)),
            RuleFunction::HasValue => Ok(aggregate::has_value(args, values)),
            RuleFunction::Left => text::left(self.name(), args),
            RuleFunction::Right => text::right(self.name(), args),
            RuleFunction::Length => Ok(text::length(args)),
            RuleFunction::Concatenate => Ok(text::concatenate(args)),
            RuleFunction::InOrgUnitGroup => Ok(membership::in_org_unit_group(
                args,
                values,
                supplementary,
            )),
            RuleFunction::ZScoreWfa => zscore::z_score_wfa(self.name(), args),
        }
    }
}

impl fmt::Display for RuleFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Argument at `index` as text, empty when absent.
fn arg(args: &[Option<String>], index: usize) -> &str {
    args.get(index).and_then(Option::as_deref).unwrap_or("")
}
