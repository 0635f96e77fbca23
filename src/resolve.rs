use chrono::{Local, NaiveDate};

use crate::types::{
    RuleEngineContext, RuleEnrollment, RuleEvent, RuleValueType, RuleVariable, RuleVariableValue,
    RuleVariableValueMap, TriggerEnvironment,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The record a value map is built for.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Event(&'a RuleEvent),
    Enrollment(&'a RuleEnrollment),
}

/// Builds the variable name to [`RuleVariableValue`] map for one evaluation.
///
/// Sources, in insertion order (later entries win on a name clash):
/// environment variables, the context's declared variables, then constants.
/// Events are considered oldest first, by event date and then creation time.
/// Empty raw values count as no value.
#[derive(Debug, Clone)]
#[must_use]
pub struct RuleVariableValueMapBuilder<'a> {
    context: &'a RuleEngineContext,
    target: Target<'a>,
    events: &'a [RuleEvent],
    enrollment: Option<&'a RuleEnrollment>,
    trigger_environment: Option<TriggerEnvironment>,
    current_date: Option<NaiveDate>,
}

impl<'a> RuleVariableValueMapBuilder<'a> {
    /// Resolve against `target`; `events` given later are its companions.
    pub fn for_event(context: &'a RuleEngineContext, target: &'a RuleEvent) -> Self {
        Self::new(context, Target::Event(target))
    }

    pub fn for_enrollment(context: &'a RuleEngineContext, target: &'a RuleEnrollment) -> Self {
        Self::new(context, Target::Enrollment(target))
    }

    fn new(context: &'a RuleEngineContext, target: Target<'a>) -> Self {
        Self {
            context,
            target,
            events: &[],
            enrollment: None,
            trigger_environment: None,
            current_date: None,
        }
    }

    /// Other events of the same enrollment.
    pub fn events(mut self, events: &'a [RuleEvent]) -> Self {
        self.events = events;
        self
    }

    /// The enrollment the target event belongs to. Ignored for enrollment targets.
    pub fn enrollment(mut self, enrollment: Option<&'a RuleEnrollment>) -> Self {
        self.enrollment = enrollment;
        self
    }

    pub fn trigger_environment(mut self, environment: Option<TriggerEnvironment>) -> Self {
        self.trigger_environment = environment;
        self
    }

    /// Pin `current_date`; defaults to today's local date.
    pub fn current_date(mut self, date: Option<NaiveDate>) -> Self {
        self.current_date = date;
        self
    }

    #[must_use]
    pub fn build(self) -> RuleVariableValueMap {
        let ordered = self.ordered_events();
        let mut values = RuleVariableValueMap::new();

        self.insert_environment(&mut values, ordered.len());

        for variable in &self.context.variables {
            let value = self.resolve(variable, &ordered);
            values.insert(variable.name().to_owned(), value);
        }

        for (id, constant) in &self.context.constants {
            values.insert(
                id.clone(),
                RuleVariableValue::single(constant.clone(), RuleValueType::Numeric),
            );
        }

        tracing::trace!(
            target_id = self.target_id(),
            variables = values.len(),
            "resolved variable values"
        );
        values
    }

    fn target_event(&self) -> Option<&'a RuleEvent> {
        match self.target {
            Target::Event(event) => Some(event),
            Target::Enrollment(_) => None,
        }
    }

    fn known_enrollment(&self) -> Option<&'a RuleEnrollment> {
        match self.target {
            Target::Enrollment(enrollment) => Some(enrollment),
            Target::Event(_) => self.enrollment,
        }
    }

    fn target_id(&self) -> &'a str {
        match self.target {
            Target::Event(event) => &event.event,
            Target::Enrollment(enrollment) => &enrollment.enrollment,
        }
    }

    /// Context events plus the target event, oldest first. Ties keep input
    /// order with the target last.
    fn ordered_events(&self) -> Vec<&'a RuleEvent> {
        let mut ordered: Vec<&RuleEvent> = self.events.iter().collect();
        ordered.extend(self.target_event());
        ordered.sort_by_key(|e| e.sort_key());
        ordered
    }

    fn resolve(&self, variable: &RuleVariable, ordered: &[&RuleEvent]) -> RuleVariableValue {
        let value_type = variable.value_type();
        match variable {
            RuleVariable::CurrentEvent { data_element, .. } => self
                .target_event()
                .and_then(|e| non_empty(e.value(data_element)))
                .map_or_else(
                    || RuleVariableValue::empty(value_type),
                    |v| RuleVariableValue::single(v, value_type),
                ),
            RuleVariable::NewestEvent { data_element, .. } => {
                history(ordered.iter().copied(), data_element, value_type)
            }
            RuleVariable::NewestEventProgramStage {
                data_element,
                program_stage,
                ..
            } => history(
                ordered
                    .iter()
                    .copied()
                    .filter(|e| e.program_stage == *program_stage),
                data_element,
                value_type,
            ),
            RuleVariable::PreviousEvent { data_element, .. } => match self.target_event() {
                Some(target) => history(
                    ordered
                        .iter()
                        .copied()
                        .take_while(|e| !std::ptr::eq(*e, target)),
                    data_element,
                    value_type,
                ),
                None => RuleVariableValue::empty(value_type),
            },
            RuleVariable::Attribute { attribute, .. } => self
                .known_enrollment()
                .and_then(|e| non_empty(e.attribute(attribute)))
                .map_or_else(
                    || RuleVariableValue::empty(value_type),
                    |v| RuleVariableValue::single(v, value_type),
                ),
            RuleVariable::CalculatedValue { name, .. } => self
                .target_event()
                .and_then(|event| self.context.calculated_values.get(&event.event))
                .and_then(|values| non_empty(values.get(name).map(String::as_str)))
                .map_or_else(
                    || RuleVariableValue::empty(value_type),
                    |v| RuleVariableValue::single(v, value_type),
                ),
        }
    }

    fn insert_environment(&self, values: &mut RuleVariableValueMap, event_count: usize) {
        let current_date = self
            .current_date
            .unwrap_or_else(|| Local::now().date_naive());
        put(values, "current_date", date(current_date), RuleValueType::Date);
        put(
            values,
            "event_count",
            event_count.to_string(),
            RuleValueType::Numeric,
        );
        if let Some(environment) = self.trigger_environment {
            put(values, "environment", environment.to_string(), RuleValueType::Text);
        }

        if let Some(event) = self.target_event() {
            put(values, "event_id", event.event.clone(), RuleValueType::Text);
            put(values, "event_date", date(event.event_date), RuleValueType::Date);
            if let Some(due) = event.due_date {
                put(values, "due_date", date(due), RuleValueType::Date);
            }
            put(values, "event_status", event.status.to_string(), RuleValueType::Text);
            put(
                values,
                "program_stage_id",
                event.program_stage.clone(),
                RuleValueType::Text,
            );
            if let Some(name) = &event.program_stage_name {
                put(values, "program_stage_name", name.clone(), RuleValueType::Text);
            }
            if let Some(org_unit) = &event.organisation_unit {
                put(values, "org_unit", org_unit.clone(), RuleValueType::Text);
            }
        }

        if let Some(enrollment) = self.known_enrollment() {
            put(
                values,
                "enrollment_id",
                enrollment.enrollment.clone(),
                RuleValueType::Text,
            );
            put(
                values,
                "enrollment_date",
                date(enrollment.enrollment_date),
                RuleValueType::Date,
            );
            put(
                values,
                "incident_date",
                date(enrollment.incident_date),
                RuleValueType::Date,
            );
            put(
                values,
                "enrollment_status",
                enrollment.status.to_string(),
                RuleValueType::Text,
            );
            if let Some(name) = &enrollment.program_name {
                put(values, "program_name", name.clone(), RuleValueType::Text);
            }
            if let (Target::Enrollment(_), Some(org_unit)) =
                (self.target, &enrollment.organisation_unit)
            {
                put(values, "org_unit", org_unit.clone(), RuleValueType::Text);
            }
        }
    }
}

fn put(values: &mut RuleVariableValueMap, name: &str, value: String, value_type: RuleValueType) {
    values.insert(name.to_owned(), RuleVariableValue::single(value, value_type));
}

fn date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Values of `data_element` across `events` (already oldest first); the
/// newest becomes the current value.
fn history<'e>(
    events: impl Iterator<Item = &'e RuleEvent>,
    data_element: &str,
    value_type: RuleValueType,
) -> RuleVariableValue {
    let candidates = events
        .filter_map(|e| non_empty(e.value(data_element)))
        .map(str::to_owned)
        .collect();
    RuleVariableValue::from_candidates(candidates, value_type)
}
