//! Program rule evaluation for health data-collection events and enrollments.
//!
//! A [`RuleEngineContext`] holds the rules, declared variables, constants and
//! reference data. A [`RuleEngine`] pairs it with the records of one
//! enrollment, checks the execution-context invariants and produces
//! [`RuleEngineExecution`] tasks. Variable values are resolved when a task is
//! created; calling it walks the rules and returns the [`RuleEffect`]s the
//! host should apply.

mod engine;
mod error;
mod execution;
pub mod expression;
pub mod functions;
pub mod parse;
mod resolve;
mod types;

pub use engine::{RuleEngine, RuleEngineBuilder, RuleEngineConfig};
pub use error::{ErrorKind, RuleEngineError};
pub use execution::RuleEngineExecution;
pub use expression::{D2ExpressionEvaluator, ExpressionError, ExpressionEvaluator};
pub use functions::{Arity, FunctionError, RuleFunction};
pub use resolve::RuleVariableValueMapBuilder;
pub use types::{
    call, env, var, ActionKind, ArithOp, CalculatedValueMap, CompareOp, ContextError,
    DisplayLocation, EnrollmentStatus, EventStatus, ExecutionReport, Expr, Rule, RuleAction,
    RuleEffect, RuleEngineContext, RuleEngineContextBuilder, RuleEnrollment, RuleEvent,
    RuleValueType, RuleVariable, RuleVariableValue, RuleVariableValueMap, SupplementaryData,
    TriggerEnvironment, Value, VariableSigil,
};
