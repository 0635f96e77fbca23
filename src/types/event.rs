use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EventStatus {
    #[default]
    Active,
    Completed,
    Visited,
    Schedule,
    Overdue,
    Skipped,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventStatus::Active => "ACTIVE",
            EventStatus::Completed => "COMPLETED",
            EventStatus::Visited => "VISITED",
            EventStatus::Schedule => "SCHEDULE",
            EventStatus::Overdue => "OVERDUE",
            EventStatus::Skipped => "SKIPPED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnrollmentStatus::Active => "ACTIVE",
            EnrollmentStatus::Completed => "COMPLETED",
            EnrollmentStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Who triggered the evaluation. Exposed to expressions as `V{environment}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEnvironment {
    Server,
    AndroidClient,
    WebClient,
}

impl fmt::Display for TriggerEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TriggerEnvironment::Server => "Server",
            TriggerEnvironment::AndroidClient => "AndroidClient",
            TriggerEnvironment::WebClient => "WebClient",
        };
        f.write_str(s)
    }
}

/// A single data-collection instance within a program stage.
///
/// Construct with [`RuleEvent::new`] and chain the `with_*` setters:
///
/// ```
/// use chrono::NaiveDate;
/// use program_rules::{EventStatus, RuleEvent};
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let event = RuleEvent::new("ev1", "anc_visit", date)
///     .with_status(EventStatus::Completed)
///     .with_value("hb_level", "11.2");
/// assert_eq!(event.value("hb_level"), Some("11.2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleEvent {
    pub event: String,
    pub program_stage: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub program_stage_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: EventStatus,
    pub event_date: NaiveDate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub due_date: Option<NaiveDate>,
    /// Tie-breaker when two events share an `event_date`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub created: Option<NaiveDateTime>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub organisation_unit: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub data_values: HashMap<String, String>,
}

impl RuleEvent {
    #[must_use]
    pub fn new(
        event: impl Into<String>,
        program_stage: impl Into<String>,
        event_date: NaiveDate,
    ) -> Self {
        Self {
            event: event.into(),
            program_stage: program_stage.into(),
            program_stage_name: None,
            status: EventStatus::default(),
            event_date,
            due_date: None,
            created: None,
            organisation_unit: None,
            data_values: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, data_element: impl Into<String>, value: impl Into<String>) -> Self {
        self.data_values.insert(data_element.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_stage_name(mut self, name: impl Into<String>) -> Self {
        self.program_stage_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn with_created(mut self, created: NaiveDateTime) -> Self {
        self.created = Some(created);
        self
    }

    #[must_use]
    pub fn with_org_unit(mut self, organisation_unit: impl Into<String>) -> Self {
        self.organisation_unit = Some(organisation_unit.into());
        self
    }

    /// Raw value of a data element on this event.
    #[must_use]
    pub fn value(&self, data_element: &str) -> Option<&str> {
        self.data_values.get(data_element).map(String::as_str)
    }

    /// Chronological sort key: event date, then creation time.
    pub(crate) fn sort_key(&self) -> (NaiveDate, Option<NaiveDateTime>) {
        (self.event_date, self.created)
    }
}

/// A program enrollment with its tracked-entity attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleEnrollment {
    pub enrollment: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub program_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: EnrollmentStatus,
    pub enrollment_date: NaiveDate,
    pub incident_date: NaiveDate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub organisation_unit: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attribute_values: HashMap<String, String>,
}

impl RuleEnrollment {
    /// Create an enrollment whose incident date equals its enrollment date.
    #[must_use]
    pub fn new(enrollment: impl Into<String>, enrollment_date: NaiveDate) -> Self {
        Self {
            enrollment: enrollment.into(),
            program_name: None,
            status: EnrollmentStatus::default(),
            enrollment_date,
            incident_date: enrollment_date,
            organisation_unit: None,
            attribute_values: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute_values.insert(attribute.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: EnrollmentStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_incident_date(mut self, incident_date: NaiveDate) -> Self {
        self.incident_date = incident_date;
        self
    }

    #[must_use]
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_org_unit(mut self, organisation_unit: impl Into<String>) -> Self {
        self.organisation_unit = Some(organisation_unit.into());
        self
    }

    #[must_use]
    pub fn attribute(&self, attribute: &str) -> Option<&str> {
        self.attribute_values.get(attribute).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn event_builder_sets_fields() {
        let event = RuleEvent::new("e1", "stage", date(5))
            .with_value("de", "7")
            .with_status(EventStatus::Completed)
            .with_stage_name("First visit")
            .with_org_unit("ou1");
        assert_eq!(event.value("de"), Some("7"));
        assert_eq!(event.value("missing"), None);
        assert_eq!(event.status, EventStatus::Completed);
        assert_eq!(event.program_stage_name.as_deref(), Some("First visit"));
        assert_eq!(event.organisation_unit.as_deref(), Some("ou1"));
    }

    #[test]
    fn sort_key_orders_by_date_then_created() {
        let early = RuleEvent::new("a", "s", date(1));
        let late = RuleEvent::new("b", "s", date(2));
        assert!(early.sort_key() < late.sort_key());

        let created = date(2).and_hms_opt(8, 0, 0).unwrap();
        let late_created = RuleEvent::new("c", "s", date(2)).with_created(created);
        assert!(late.sort_key() < late_created.sort_key());
    }

    #[test]
    fn enrollment_defaults_incident_date() {
        let enrollment = RuleEnrollment::new("en1", date(3)).with_attribute("sex", "female");
        assert_eq!(enrollment.incident_date, date(3));
        assert_eq!(enrollment.attribute("sex"), Some("female"));
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
    }

    #[test]
    fn status_display() {
        assert_eq!(EventStatus::Schedule.to_string(), "SCHEDULE");
        assert_eq!(EnrollmentStatus::Cancelled.to_string(), "CANCELLED");
        assert_eq!(TriggerEnvironment::Server.to_string(), "Server");
    }
}
