mod context;
mod effect;
mod error;
mod event;
mod execution_report;
mod expr;
mod rule;
mod value;
mod variable;

pub use context::{
    CalculatedValueMap, RuleEngineContext, RuleEngineContextBuilder, SupplementaryData,
};
pub use effect::RuleEffect;
pub use error::ContextError;
pub use event::{EnrollmentStatus, EventStatus, RuleEnrollment, RuleEvent, TriggerEnvironment};
pub use execution_report::ExecutionReport;
pub use expr::{ArithOp, CompareOp, Expr, VariableSigil, call, env, var};
pub use rule::{ActionKind, DisplayLocation, Rule, RuleAction};
pub use value::Value;
pub use variable::{RuleValueType, RuleVariable, RuleVariableValue, RuleVariableValueMap};
