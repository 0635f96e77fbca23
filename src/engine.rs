use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::RuleEngineError;
use crate::execution::RuleEngineExecution;
use crate::resolve::RuleVariableValueMapBuilder;
use crate::types::{Rule, RuleEngineContext, RuleEnrollment, RuleEvent, TriggerEnvironment};

/// Records and settings an engine evaluates against, besides the shared
/// [`RuleEngineContext`].
#[derive(Debug, Clone, Default)]
pub struct RuleEngineConfig {
    /// Events already recorded for the enrollment. Identities must be
    /// non-empty and pairwise distinct.
    pub events: Vec<RuleEvent>,
    pub enrollment: Option<RuleEnrollment>,
    pub trigger_environment: Option<TriggerEnvironment>,
    /// Value of `V{current_date}`; today's local date when `None`.
    pub current_date: Option<NaiveDate>,
}

/// Validates execution-context invariants and hands out
/// [`RuleEngineExecution`] tasks.
///
/// Immutable once built; share it across threads freely.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use chrono::NaiveDate;
/// use program_rules::{
///     Rule, RuleAction, RuleEngine, RuleEngineContext, RuleEvent, RuleValueType, RuleVariable,
/// };
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
///     .build()
///     .unwrap();
///
/// let engine = RuleEngine::builder(Arc::new(context)).build().unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let event = RuleEvent::new("ev1", "birth", date).with_value("de_weight", "2.1");
///
/// let effects = engine.evaluate_event(&event).unwrap().call().unwrap();
/// assert_eq!(effects.len(), 1);
/// assert_eq!(effects[0].target(), Some("de_weight"));
/// ```
#[derive(Debug, Clone)]
pub struct RuleEngine {
    context: Arc<RuleEngineContext>,
    events: Vec<RuleEvent>,
    enrollment: Option<RuleEnrollment>,
    trigger_environment: Option<TriggerEnvironment>,
    current_date: Option<NaiveDate>,
}

impl RuleEngine {
    /// Validate `config` and create an engine.
    ///
    /// # Errors
    ///
    /// Returns [`RuleEngineError::InvalidArgument`] if an event or the
    /// enrollment has an empty identity, and
    /// [`RuleEngineError::DuplicateEvent`] if two events share an identity.
    pub fn new(
        context: Arc<RuleEngineContext>,
        config: RuleEngineConfig,
    ) -> Result<Self, RuleEngineError> {
        let mut seen = HashSet::new();
        for event in &config.events {
            if event.event.is_empty() {
                return Err(RuleEngineError::InvalidArgument(
                    "context event identity must not be empty".into(),
                ));
            }
            if !seen.insert(event.event.as_str()) {
                return Err(RuleEngineError::DuplicateEvent {
                    event: event.event.clone(),
                });
            }
        }
        if config
            .enrollment
            .as_ref()
            .is_some_and(|e| e.enrollment.is_empty())
        {
            return Err(RuleEngineError::InvalidArgument(
                "enrollment identity must not be empty".into(),
            ));
        }

        Ok(Self {
            context,
            events: config.events,
            enrollment: config.enrollment,
            trigger_environment: config.trigger_environment,
            current_date: config.current_date,
        })
    }

    pub fn builder(context: Arc<RuleEngineContext>) -> RuleEngineBuilder {
        RuleEngineBuilder::new(context)
    }

    #[must_use]
    pub fn context(&self) -> &Arc<RuleEngineContext> {
        &self.context
    }

    #[must_use]
    pub fn events(&self) -> &[RuleEvent] {
        &self.events
    }

    #[must_use]
    pub fn enrollment(&self) -> Option<&RuleEnrollment> {
        self.enrollment.as_ref()
    }

    #[must_use]
    pub fn trigger_environment(&self) -> Option<TriggerEnvironment> {
        self.trigger_environment
    }

    /// Evaluate every context rule against `target`.
    ///
    /// # Errors
    ///
    /// See [`evaluate_event_with`](Self::evaluate_event_with).
    pub fn evaluate_event(&self, target: &RuleEvent) -> Result<RuleEngineExecution, RuleEngineError> {
        self.evaluate_event_with(target, Arc::clone(&self.context.rules))
    }

    /// Evaluate `rules` against `target`, e.g. the output of
    /// [`RuleEngineContext::rules_for_stage`].
    ///
    /// Values are resolved now; the rules run when the returned task is called.
    ///
    /// # Errors
    ///
    /// Returns [`RuleEngineError::InvalidArgument`] if `target` has an empty
    /// identity and [`RuleEngineError::DuplicateEvent`] if its identity is
    /// already one of the engine's events.
    pub fn evaluate_event_with(
        &self,
        target: &RuleEvent,
        rules: impl Into<Arc<[Rule]>>,
    ) -> Result<RuleEngineExecution, RuleEngineError> {
        if target.event.is_empty() {
            return Err(RuleEngineError::InvalidArgument(
                "target event identity must not be empty".into(),
            ));
        }
        if self.events.iter().any(|e| e.event == target.event) {
            return Err(RuleEngineError::DuplicateEvent {
                event: target.event.clone(),
            });
        }
        let rules = rules.into();
        tracing::debug!(
            event = %target.event,
            rules = rules.len(),
            events = self.events.len(),
            "evaluating event"
        );

        let values = RuleVariableValueMapBuilder::for_event(&self.context, target)
            .events(&self.events)
            .enrollment(self.enrollment.as_ref())
            .trigger_environment(self.trigger_environment)
            .current_date(self.current_date)
            .build();
        Ok(RuleEngineExecution::new(
            Arc::clone(&self.context),
            rules,
            values,
        ))
    }

    /// Evaluate every context rule against `target`.
    ///
    /// # Errors
    ///
    /// See [`evaluate_enrollment_with`](Self::evaluate_enrollment_with).
    pub fn evaluate_enrollment(
        &self,
        target: &RuleEnrollment,
    ) -> Result<RuleEngineExecution, RuleEngineError> {
        self.evaluate_enrollment_with(target, Arc::clone(&self.context.rules))
    }

    /// Evaluate `rules` against the enrollment `target`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleEngineError::InvalidArgument`] if `target` has an empty
    /// identity and [`RuleEngineError::EnrollmentAlreadySet`] if the engine
    /// was built with an enrollment.
    pub fn evaluate_enrollment_with(
        &self,
        target: &RuleEnrollment,
        rules: impl Into<Arc<[Rule]>>,
    ) -> Result<RuleEngineExecution, RuleEngineError> {
        if target.enrollment.is_empty() {
            return Err(RuleEngineError::InvalidArgument(
                "target enrollment identity must not be empty".into(),
            ));
        }
        if let Some(existing) = &self.enrollment {
            return Err(RuleEngineError::EnrollmentAlreadySet {
                enrollment: existing.enrollment.clone(),
            });
        }
        let rules = rules.into();
        tracing::debug!(
            enrollment = %target.enrollment,
            rules = rules.len(),
            events = self.events.len(),
            "evaluating enrollment"
        );

        let values = RuleVariableValueMapBuilder::for_enrollment(&self.context, target)
            .events(&self.events)
            .trigger_environment(self.trigger_environment)
            .current_date(self.current_date)
            .build();
        Ok(RuleEngineExecution::new(
            Arc::clone(&self.context),
            rules,
            values,
        ))
    }
}

/// Fluent construction of a [`RuleEngine`]; `build` validates through
/// [`RuleEngine::new`].
#[derive(Debug, Clone)]
#[must_use]
pub struct RuleEngineBuilder {
    context: Arc<RuleEngineContext>,
    config: RuleEngineConfig,
}

impl RuleEngineBuilder {
    pub fn new(context: Arc<RuleEngineContext>) -> Self {
        Self {
            context,
            config: RuleEngineConfig::default(),
        }
    }

    pub fn events(mut self, events: impl IntoIterator<Item = RuleEvent>) -> Self {
        self.config.events.extend(events);
        self
    }

    pub fn event(mut self, event: RuleEvent) -> Self {
        self.config.events.push(event);
        self
    }

    pub fn enrollment(mut self, enrollment: RuleEnrollment) -> Self {
        self.config.enrollment = Some(enrollment);
        self
    }

    pub fn trigger_environment(mut self, environment: TriggerEnvironment) -> Self {
        self.config.trigger_environment = Some(environment);
        self
    }

    pub fn current_date(mut self, date: NaiveDate) -> Self {
        self.config.current_date = Some(date);
        self
    }

    /// # Errors
    ///
    /// Same as [`RuleEngine::new`].
    pub fn build(self) -> Result<RuleEngine, RuleEngineError> {
        RuleEngine::new(self.context, self.config)
    }
}
