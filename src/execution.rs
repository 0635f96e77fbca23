use std::sync::Arc;
use std::time::Instant;

use crate::error::RuleEngineError;
use crate::expression::ExpressionError;
use crate::types::{
    ExecutionReport, Rule, RuleAction, RuleEffect, RuleEngineContext, RuleValueType,
    RuleVariableValue, RuleVariableValueMap, Value,
};

/// A deferred rule evaluation, produced by
/// [`RuleEngine::evaluate_event`](crate::RuleEngine::evaluate_event) and
/// friends.
///
/// Nothing runs until [`call`](Self::call). The task owns the shared
/// context, the selected rules and the resolved values, so it can be moved
/// to whatever thread or executor the host prefers.
#[must_use = "an execution does nothing until `call` is invoked"]
pub struct RuleEngineExecution {
    context: Arc<RuleEngineContext>,
    rules: Arc<[Rule]>,
    values: RuleVariableValueMap,
}

impl RuleEngineExecution {
    pub(crate) fn new(
        context: Arc<RuleEngineContext>,
        rules: Arc<[Rule]>,
        values: RuleVariableValueMap,
    ) -> Self {
        Self {
            context,
            rules,
            values,
        }
    }

    /// The variable values the rules will see.
    #[must_use]
    pub fn values(&self) -> &RuleVariableValueMap {
        &self.values
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Walk the rules in order and collect the effects of those whose
    /// condition holds, in rule order and then action order.
    ///
    /// # Errors
    ///
    /// Returns [`RuleEngineError::Evaluation`] for the first condition or
    /// action expression that fails; no partial effect list is returned.
    pub fn call(self) -> Result<Vec<RuleEffect>, RuleEngineError> {
        self.call_detailed().map(ExecutionReport::into_effects)
    }

    /// Like [`call`](Self::call), but also reports which rules fired and
    /// how long the walk took.
    ///
    /// # Errors
    ///
    /// Same as [`call`](Self::call).
    pub fn call_detailed(self) -> Result<ExecutionReport, RuleEngineError> {
        let start = Instant::now();
        let Self {
            context,
            rules,
            mut values,
        } = self;

        let mut effects = Vec::new();
        let mut fired = Vec::new();
        let mut evaluation_order = Vec::with_capacity(rules.len());

        for rule in rules.iter() {
            evaluation_order.push(rule.uid.clone());
            let holds = evaluate_condition(&context, rule, &values)?;
            tracing::trace!(rule = %rule.uid, holds, "evaluated rule condition");
            if !holds {
                continue;
            }
            fired.push(rule.uid.clone());

            for action in &rule.actions {
                let data = match action.data() {
                    Some(expression) if !expression.trim().is_empty() => {
                        evaluate(&context, rule, expression, &values)?.to_string()
                    }
                    _ => String::new(),
                };
                if let RuleAction::Assign {
                    content: Some(content),
                    ..
                } = action
                {
                    assign(&mut values, content, &data);
                }
                let effect = RuleEffect::new(rule.uid.clone(), action.clone(), data);
                tracing::trace!(%effect, "produced effect");
                effects.push(effect);
            }
        }

        let duration = start.elapsed();
        tracing::debug!(
            rules = rules.len(),
            fired = fired.len(),
            effects = effects.len(),
            ?duration,
            "rule execution finished"
        );
        Ok(ExecutionReport::new(
            effects,
            fired,
            evaluation_order,
            duration,
        ))
    }
}

impl std::fmt::Debug for RuleEngineExecution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngineExecution")
            .field("rules", &self.rules.len())
            .field("values", &self.values.len())
            .finish_non_exhaustive()
    }
}

fn evaluate(
    context: &RuleEngineContext,
    rule: &Rule,
    expression: &str,
    values: &RuleVariableValueMap,
) -> Result<Value, RuleEngineError> {
    context
        .evaluator
        .evaluate(expression, values, &context.supplementary_data)
        .map_err(|source| evaluation_error(rule, expression, source))
}

fn evaluate_condition(
    context: &RuleEngineContext,
    rule: &Rule,
    values: &RuleVariableValueMap,
) -> Result<bool, RuleEngineError> {
    let result = evaluate(context, rule, &rule.condition, values)?;
    result.as_bool().ok_or_else(|| {
        evaluation_error(rule, &rule.condition, ExpressionError::not_boolean(&result))
    })
}

fn evaluation_error(rule: &Rule, expression: &str, source: ExpressionError) -> RuleEngineError {
    RuleEngineError::Evaluation {
        rule: rule.uid.clone(),
        expression: expression.to_owned(),
        source,
    }
}

/// Name of the variable an assign action's `content` refers to:
/// `#{name}`, `A{name}` or a bare `name`.
fn assigned_variable(content: &str) -> &str {
    let content = content.trim();
    content
        .strip_prefix("#{")
        .or_else(|| content.strip_prefix("A{"))
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(content)
}

/// Write an assigned value into this call's value map so later rules see it.
fn assign(values: &mut RuleVariableValueMap, content: &str, data: &str) {
    let name = assigned_variable(content);
    if name.is_empty() {
        return;
    }
    let value_type = values
        .get(name)
        .map_or(RuleValueType::Text, RuleVariableValue::value_type);
    let value = if data.is_empty() {
        RuleVariableValue::empty(value_type)
    } else {
        RuleVariableValue::single(data, value_type)
    };
    values.insert(name.to_owned(), value);
}
