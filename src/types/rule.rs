use std::fmt;

/// A program rule: a condition expression and the actions fired when it holds.
///
/// Rules without a `program_stage` apply to every event and to enrollments;
/// stage-bound rules are meant for events of that stage only. Which rules run
/// is the caller's choice, see
/// [`RuleEngineContext::rules_for_stage`](super::RuleEngineContext::rules_for_stage).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub uid: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub program_stage: Option<String>,
    pub condition: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub actions: Vec<RuleAction>,
}

impl Rule {
    #[must_use]
    pub fn new(uid: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: None,
            program_stage: None,
            condition: condition.into(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn for_stage(mut self, program_stage: impl Into<String>) -> Self {
        self.program_stage = Some(program_stage.into());
        self
    }

    /// Append an action. Actions fire in the order they were added.
    #[must_use]
    pub fn action(mut self, action: RuleAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Whether this rule applies to events of the given stage.
    #[must_use]
    pub fn applies_to_stage(&self, program_stage: &str) -> bool {
        self.program_stage
            .as_deref()
            .map_or(true, |stage| stage == program_stage)
    }
}

/// Where a display action's text is rendered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DisplayLocation {
    #[default]
    Feedback,
    Indicators,
}

/// An action attached to a rule.
///
/// `data` fields hold an expression evaluated when the rule fires; its
/// result becomes the [`RuleEffect`](super::RuleEffect)'s data. Other fields
/// are static text or identifiers passed through to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum RuleAction {
    /// Assign the data result to a field and, when `content` names a
    /// variable, to that variable for the rest of the call.
    Assign {
        field: Option<String>,
        content: Option<String>,
        data: String,
    },
    DisplayText {
        content: String,
        data: Option<String>,
        location: DisplayLocation,
    },
    DisplayKeyValuePair {
        content: String,
        data: Option<String>,
        location: DisplayLocation,
    },
    ShowWarning {
        content: String,
        data: Option<String>,
        field: Option<String>,
    },
    ShowError {
        content: String,
        data: Option<String>,
        field: Option<String>,
    },
    WarningOnCompletion {
        content: String,
        data: Option<String>,
        field: Option<String>,
    },
    ErrorOnCompletion {
        content: String,
        data: Option<String>,
        field: Option<String>,
    },
    HideField {
        field: String,
        content: Option<String>,
    },
    HideSection {
        section: String,
    },
    HideProgramStage {
        program_stage: String,
    },
    SetMandatoryField {
        field: String,
    },
    CreateEvent {
        program_stage: String,
        content: Option<String>,
        data: Option<String>,
    },
    ScheduleMessage {
        notification: String,
        data: Option<String>,
    },
    SendMessage {
        notification: String,
        data: Option<String>,
    },
}

/// Discriminant of a [`RuleAction`], for hosts that dispatch on kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Assign,
    DisplayText,
    DisplayKeyValuePair,
    ShowWarning,
    ShowError,
    WarningOnCompletion,
    ErrorOnCompletion,
    HideField,
    HideSection,
    HideProgramStage,
    SetMandatoryField,
    CreateEvent,
    ScheduleMessage,
    SendMessage,
}

impl RuleAction {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            RuleAction::Assign { .. } => ActionKind::Assign,
            RuleAction::DisplayText { .. } => ActionKind::DisplayText,
            RuleAction::DisplayKeyValuePair { .. } => ActionKind::DisplayKeyValuePair,
            RuleAction::ShowWarning { .. } => ActionKind::ShowWarning,
            RuleAction::ShowError { .. } => ActionKind::ShowError,
            RuleAction::WarningOnCompletion { .. } => ActionKind::WarningOnCompletion,
            RuleAction::ErrorOnCompletion { .. } => ActionKind::ErrorOnCompletion,
            RuleAction::HideField { .. } => ActionKind::HideField,
            RuleAction::HideSection { .. } => ActionKind::HideSection,
            RuleAction::HideProgramStage { .. } => ActionKind::HideProgramStage,
            RuleAction::SetMandatoryField { .. } => ActionKind::SetMandatoryField,
            RuleAction::CreateEvent { .. } => ActionKind::CreateEvent,
            RuleAction::ScheduleMessage { .. } => ActionKind::ScheduleMessage,
            RuleAction::SendMessage { .. } => ActionKind::SendMessage,
        }
    }

    /// The expression evaluated when the action fires, if any.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        match self {
            RuleAction::Assign { data, .. } => Some(data),
            RuleAction::DisplayText { data, .. }
            | RuleAction::DisplayKeyValuePair { data, .. }
            | RuleAction::ShowWarning { data, .. }
            | RuleAction::ShowError { data, .. }
            | RuleAction::WarningOnCompletion { data, .. }
            | RuleAction::ErrorOnCompletion { data, .. }
            | RuleAction::CreateEvent { data, .. }
            | RuleAction::ScheduleMessage { data, .. }
            | RuleAction::SendMessage { data, .. } => data.as_deref(),
            RuleAction::HideField { .. }
            | RuleAction::HideSection { .. }
            | RuleAction::HideProgramStage { .. }
            | RuleAction::SetMandatoryField { .. } => None,
        }
    }

    /// Identifier of the thing this action acts on: a field, section,
    /// stage or notification.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            RuleAction::Assign { field, .. }
            | RuleAction::ShowWarning { field, .. }
            | RuleAction::ShowError { field, .. }
            | RuleAction::WarningOnCompletion { field, .. }
            | RuleAction::ErrorOnCompletion { field, .. } => field.as_deref(),
            RuleAction::HideField { field, .. } | RuleAction::SetMandatoryField { field } => {
                Some(field)
            }
            RuleAction::HideSection { section } => Some(section),
            RuleAction::HideProgramStage { program_stage }
            | RuleAction::CreateEvent { program_stage, .. } => Some(program_stage),
            RuleAction::ScheduleMessage { notification, .. }
            | RuleAction::SendMessage { notification, .. } => Some(notification),
            RuleAction::DisplayText { .. } | RuleAction::DisplayKeyValuePair { .. } => None,
        }
    }

    #[must_use]
    pub fn assign(field: impl Into<String>, data: impl Into<String>) -> Self {
        RuleAction::Assign {
            field: Some(field.into()),
            content: None,
            data: data.into(),
        }
    }

    /// Assign to a variable only (`content` such as `#{bmi}`), no host field.
    #[must_use]
    pub fn assign_variable(content: impl Into<String>, data: impl Into<String>) -> Self {
        RuleAction::Assign {
            field: None,
            content: Some(content.into()),
            data: data.into(),
        }
    }

    #[must_use]
    pub fn show_warning(field: impl Into<String>, content: impl Into<String>) -> Self {
        RuleAction::ShowWarning {
            content: content.into(),
            data: None,
            field: Some(field.into()),
        }
    }

    #[must_use]
    pub fn show_error(field: impl Into<String>, content: impl Into<String>) -> Self {
        RuleAction::ShowError {
            content: content.into(),
            data: None,
            field: Some(field.into()),
        }
    }

    #[must_use]
    pub fn hide_field(field: impl Into<String>) -> Self {
        RuleAction::HideField {
            field: field.into(),
            content: None,
        }
    }

    #[must_use]
    pub fn display_text(content: impl Into<String>, data: impl Into<String>) -> Self {
        RuleAction::DisplayText {
            content: content.into(),
            data: Some(data.into()),
            location: DisplayLocation::default(),
        }
    }

    #[must_use]
    pub fn schedule_message(notification: impl Into<String>, date: impl Into<String>) -> Self {
        RuleAction::ScheduleMessage {
            notification: notification.into(),
            data: Some(date.into()),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
