use std::fmt;
use std::time::Duration;

use super::effect::RuleEffect;

/// Detailed outcome of one execution, returned by
/// [`RuleEngineExecution::call_detailed()`](crate::RuleEngineExecution::call_detailed).
///
/// Contains the effects, the uids of rules whose condition held, every rule
/// uid in the order it was evaluated, and the wall-clock duration.
#[derive(Debug, Clone)]
#[must_use]
pub struct ExecutionReport {
    effects: Vec<RuleEffect>,
    fired: Vec<String>,
    evaluation_order: Vec<String>,
    duration: Duration,
}

impl ExecutionReport {
    pub(crate) fn new(
        effects: Vec<RuleEffect>,
        fired: Vec<String>,
        evaluation_order: Vec<String>,
        duration: Duration,
    ) -> Self {
        Self {
            effects,
            fired,
            evaluation_order,
            duration,
        }
    }

    /// The effects, same as [`RuleEngineExecution::call()`](crate::RuleEngineExecution::call).
    #[must_use]
    pub fn effects(&self) -> &[RuleEffect] {
        &self.effects
    }

    #[must_use]
    pub fn into_effects(self) -> Vec<RuleEffect> {
        self.effects
    }

    /// Uids of rules whose condition evaluated to `true`, in evaluation order.
    #[must_use]
    pub fn fired(&self) -> &[String] {
        &self.fired
    }

    #[must_use]
    pub fn evaluation_order(&self) -> &[String] {
        &self.evaluation_order
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effects: {}", self.effects.len())?;
        write!(f, ", fired: [{}]", self.fired.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
