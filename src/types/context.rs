use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::error::ContextError;
use super::rule::Rule;
use super::variable::RuleVariable;
use crate::expression::{D2ExpressionEvaluator, ExpressionEvaluator};

/// Externally supplied reference data, e.g. organisation-unit group code to
/// member organisation units.
pub type SupplementaryData = HashMap<String, Vec<String>>;

/// Values the host calculated earlier, keyed by record identity (event or
/// enrollment) and then by variable name.
pub type CalculatedValueMap = HashMap<String, HashMap<String, String>>;

/// Builder for constructing a [`RuleEngineContext`].
///
/// # Example
///
/// ```
/// use program_rules::{Rule, RuleAction, RuleEngineContext, RuleValueType, RuleVariable};
///
/// let context = RuleEngineContext::builder()
///     .variable(RuleVariable::CurrentEvent {
///         name: "weight".into(),
///         data_element: "de_weight".into(),
///         value_type: RuleValueType::Numeric,
///     })
///     .rule(
///         Rule::new("low_weight", "#{weight} < 2.5")
///             .action(RuleAction::show_warning("de_weight", "Low birth weight")),
///     )
///     .constant("threshold", "2.5")
///     .build()
///     .unwrap();
/// assert_eq!(context.rules().len(), 1);
/// ```
#[derive(Default)]
pub struct RuleEngineContextBuilder {
    rules: Vec<Rule>,
    variables: Vec<RuleVariable>,
    constants: HashMap<String, String>,
    calculated_values: CalculatedValueMap,
    supplementary_data: SupplementaryData,
    evaluator: Option<Arc<dyn ExpressionEvaluator>>,
}

impl RuleEngineContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. Rules run in the order they are added.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    #[must_use]
    pub fn variable(mut self, variable: RuleVariable) -> Self {
        self.variables.push(variable);
        self
    }

    #[must_use]
    pub fn variables(mut self, variables: impl IntoIterator<Item = RuleVariable>) -> Self {
        self.variables.extend(variables);
        self
    }

    #[must_use]
    pub fn constant(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.constants.insert(id.into(), value.into());
        self
    }

    /// Record a value calculated for `record` (event or enrollment identity).
    #[must_use]
    pub fn calculated_value(
        mut self,
        record: impl Into<String>,
        variable: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.calculated_values
            .entry(record.into())
            .or_default()
            .insert(variable.into(), value.into());
        self
    }

    #[must_use]
    pub fn supplementary(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.supplementary_data.insert(key.into(), values);
        self
    }

    /// Replace the bundled [`D2ExpressionEvaluator`].
    #[must_use]
    pub fn evaluator(mut self, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Validate and freeze the context.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] if a rule uid is empty or duplicated, or a
    /// variable name is declared twice.
    pub fn build(self) -> Result<RuleEngineContext, ContextError> {
        check_rules(&self.rules)?;
        check_variables(&self.variables)?;

        Ok(RuleEngineContext {
            rules: self.rules.into(),
            variables: self.variables,
            constants: self.constants,
            calculated_values: self.calculated_values,
            supplementary_data: self.supplementary_data,
            evaluator: self
                .evaluator
                .unwrap_or_else(|| Arc::new(D2ExpressionEvaluator::new())),
        })
    }
}

fn check_rules(rules: &[Rule]) -> Result<(), ContextError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if rule.uid.is_empty() {
            return Err(ContextError::EmptyRuleUid);
        }
        if !seen.insert(rule.uid.as_str()) {
            return Err(ContextError::DuplicateRule {
                uid: rule.uid.clone(),
            });
        }
    }
    Ok(())
}

fn check_variables(variables: &[RuleVariable]) -> Result<(), ContextError> {
    let mut seen = HashSet::new();
    for variable in variables {
        if !seen.insert(variable.name()) {
            return Err(ContextError::DuplicateVariable {
                name: variable.name().to_owned(),
            });
        }
    }
    Ok(())
}

/// Everything an engine needs besides the records under evaluation: rules,
/// declared variables, constants, calculated values, supplementary data and
/// the expression evaluator.
///
/// Immutable once built. Share it behind `Arc` across engines and threads.
pub struct RuleEngineContext {
    pub(crate) rules: Arc<[Rule]>,
    pub(crate) variables: Vec<RuleVariable>,
    pub(crate) constants: HashMap<String, String>,
    pub(crate) calculated_values: CalculatedValueMap,
    pub(crate) supplementary_data: SupplementaryData,
    pub(crate) evaluator: Arc<dyn ExpressionEvaluator>,
}

impl RuleEngineContext {
    #[must_use]
    pub fn builder() -> RuleEngineContextBuilder {
        RuleEngineContextBuilder::new()
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn variables(&self) -> &[RuleVariable] {
        &self.variables
    }

    #[must_use]
    pub fn constants(&self) -> &HashMap<String, String> {
        &self.constants
    }

    #[must_use]
    pub fn calculated_values(&self) -> &CalculatedValueMap {
        &self.calculated_values
    }

    #[must_use]
    pub fn supplementary_data(&self) -> &SupplementaryData {
        &self.supplementary_data
    }

    #[must_use]
    pub fn evaluator(&self) -> &Arc<dyn ExpressionEvaluator> {
        &self.evaluator
    }

    /// Rules applicable to events of `program_stage`, in declaration order.
    #[must_use]
    pub fn rules_for_stage(&self, program_stage: &str) -> Vec<Rule> {
        self.rules
            .iter()
            .filter(|r| r.applies_to_stage(program_stage))
            .cloned()
            .collect()
    }

    /// Rules with no program stage, the set that applies to enrollments.
    #[must_use]
    pub fn rules_for_enrollment(&self) -> Vec<Rule> {
        self.rules
            .iter()
            .filter(|r| r.program_stage.is_none())
            .cloned()
            .collect()
    }
}

impl fmt::Debug for RuleEngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEngineContext")
            .field("rules", &self.rules.len())
            .field("variables", &self.variables.len())
            .field("constants", &self.constants.len())
            .field("calculated_values", &self.calculated_values.len())
            .field("supplementary_data", &self.supplementary_data.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for RuleEngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleEngineContext({} rules, {} variables, {} constants)",
            self.rules.len(),
            self.variables.len(),
            self.constants.len(),
        )
    }
}
