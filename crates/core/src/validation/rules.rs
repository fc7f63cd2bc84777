//! The per-field validation rule table.
//!
//! One rule per [`FieldId`], enforced by the exhaustive `match` in
//! [`rule`]. Rule contents mirror the survey instrument: the client
//! information step, the citizen's-charter step (with the `cc1` awareness
//! gate), the nine service-quality dimensions, and the optional feedback
//! step.

use chrono::{NaiveDate, Utc};

use crate::charter;
use crate::fields::{FieldId, StepSnapshot};

/// Input control kind for a field. Drives the type-specific checks in the
/// evaluator (numeric range, date parsing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
    Date,
    Select,
    Radio,
    Email,
    Textarea,
}

/// Named regex classes shared across rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedPattern {
    Email,
    Phone,
    Numeric,
    Alphanumeric,
    OnlyLetters,
}

impl NamedPattern {
    /// The regex source for this class. Compiled at evaluation time.
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Email => r"^[^\s@]+@[^\s@]+\.[^\s@]+$",
            Self::Phone => r"^(\+?\d{1,3}[-.\s]?)?\d{7,14}$",
            Self::Numeric => r"^\d+$",
            Self::Alphanumeric => r"^[a-zA-Z0-9\s\-.,()]+$",
            Self::OnlyLetters => r"^[a-zA-Z\s]+$",
        }
    }
}

/// Static validation descriptor for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub required: bool,
    pub field_type: FieldType,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<NamedPattern>,
    /// Extra check run last; failure uses `custom_message` when present.
    pub custom: Option<fn(&str) -> bool>,
    /// Requiredness derived from other answers in the same snapshot.
    pub conditionally_required: Option<fn(&StepSnapshot) -> bool>,
    pub message: &'static str,
    pub custom_message: Option<&'static str>,
}

impl FieldRule {
    const fn base(field_type: FieldType, required: bool, message: &'static str) -> Self {
        Self {
            required,
            field_type,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            pattern: None,
            custom: None,
            conditionally_required: None,
            message,
            custom_message: None,
        }
    }
}

/// Age must be a whole number; "35.5" is rejected even though it is
/// numerically inside the 1..=150 range.
fn age_is_whole_number(value: &str) -> bool {
    match value.parse::<f64>() {
        Ok(n) => n.fract() == 0.0 && n >= 1.0 && n <= 150.0,
        Err(_) => false,
    }
}

/// The service date cannot lie after today (UTC).
fn date_not_in_future(value: &str) -> bool {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date <= Utc::now().date_naive(),
        Err(_) => false,
    }
}

/// Look up the rule for a field. Exhaustive by construction, so every
/// field referenced anywhere has exactly one rule.
pub fn rule(field: FieldId) -> FieldRule {
    match field {
        FieldId::ClientType => FieldRule::base(
            FieldType::Select,
            true,
            "Please select a client type",
        ),
        FieldId::Date => FieldRule {
            custom: Some(date_not_in_future),
            custom_message: Some("Date cannot be in the future"),
            ..FieldRule::base(FieldType::Date, true, "Please select a valid date")
        },
        FieldId::Age => FieldRule {
            min: Some(1.0),
            max: Some(150.0),
            custom: Some(age_is_whole_number),
            custom_message: Some("Age must be a whole number between 1 and 150"),
            ..FieldRule::base(FieldType::Number, true, "Please enter a valid age (1-150)")
        },
        FieldId::ServiceAvailed => FieldRule {
            min_length: Some(2),
            max_length: Some(100),
            pattern: Some(NamedPattern::Alphanumeric),
            ..FieldRule::base(
                FieldType::Text,
                true,
                "Service availed must be 2-100 characters",
            )
        },
        FieldId::RegionOfResidence => FieldRule {
            min_length: Some(2),
            max_length: Some(100),
            ..FieldRule::base(FieldType::Text, true, "Region must be 2-100 characters")
        },
        FieldId::Sex => FieldRule::base(FieldType::Radio, true, "Please select a gender"),

        FieldId::Cc1 => FieldRule::base(
            FieldType::Radio,
            true,
            "Please answer Citizen Charter question 1",
        ),
        // cc2/cc3 derive their requiredness from the cc1 awareness gate;
        // when cc1 is the unaware answer they may legitimately stay at the
        // auto-filled "Not Applicable" value.
        FieldId::Cc2 => FieldRule {
            conditionally_required: Some(charter::followups_required),
            ..FieldRule::base(
                FieldType::Radio,
                false,
                "Please answer Citizen Charter question 2",
            )
        },
        FieldId::Cc3 => FieldRule {
            conditionally_required: Some(charter::followups_required),
            ..FieldRule::base(
                FieldType::Radio,
                false,
                "Please answer Citizen Charter question 3",
            )
        },

        FieldId::Sqd0 => sqd_rule("Please answer SQD question 0"),
        FieldId::Sqd1 => sqd_rule("Please answer SQD question 1"),
        FieldId::Sqd2 => sqd_rule("Please answer SQD question 2"),
        FieldId::Sqd3 => sqd_rule("Please answer SQD question 3"),
        FieldId::Sqd4 => sqd_rule("Please answer SQD question 4"),
        FieldId::Sqd5 => sqd_rule("Please answer SQD question 5"),
        FieldId::Sqd6 => sqd_rule("Please answer SQD question 6"),
        FieldId::Sqd7 => sqd_rule("Please answer SQD question 7"),
        FieldId::Sqd8 => sqd_rule("Please answer SQD question 8"),

        FieldId::Suggestions => FieldRule {
            max_length: Some(500),
            ..FieldRule::base(
                FieldType::Textarea,
                false,
                "Suggestions must not exceed 500 characters",
            )
        },
        FieldId::Email => FieldRule {
            max_length: Some(100),
            pattern: Some(NamedPattern::Email),
            ..FieldRule::base(
                FieldType::Email,
                false,
                "Please enter a valid email address",
            )
        },
    }
}

const fn sqd_rule(message: &'static str) -> FieldRule {
    FieldRule::base(FieldType::Radio, true, message)
}
