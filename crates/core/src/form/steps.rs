//! The four survey steps and their field sets.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::fields::FieldId;

/// Total number of input steps in the survey.
pub const TOTAL_STEPS: u8 = 4;

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 4;

/// The four pages of the survey form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStep {
    ClientInfo,
    CitizensCharter,
    ServiceQuality,
    Feedback,
}

impl SurveyStep {
    /// Convert a 1-based step number to a `SurveyStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::ClientInfo),
            2 => Ok(Self::CitizensCharter),
            3 => Ok(Self::ServiceQuality),
            4 => Ok(Self::Feedback),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::ClientInfo => 1,
            Self::CitizensCharter => 2,
            Self::ServiceQuality => 3,
            Self::Feedback => 4,
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::ClientInfo => "Client Information",
            Self::CitizensCharter => "Citizen's Charter",
            Self::ServiceQuality => "Service Quality",
            Self::Feedback => "Feedback",
        }
    }

    /// The fields collected on this step, in display order.
    pub fn fields(self) -> &'static [FieldId] {
        match self {
            Self::ClientInfo => &[
                FieldId::ClientType,
                FieldId::Date,
                FieldId::Age,
                FieldId::ServiceAvailed,
                FieldId::RegionOfResidence,
                FieldId::Sex,
            ],
            Self::CitizensCharter => &[FieldId::Cc1, FieldId::Cc2, FieldId::Cc3],
            Self::ServiceQuality => &[
                FieldId::Sqd0,
                FieldId::Sqd1,
                FieldId::Sqd2,
                FieldId::Sqd3,
                FieldId::Sqd4,
                FieldId::Sqd5,
                FieldId::Sqd6,
                FieldId::Sqd7,
                FieldId::Sqd8,
            ],
            Self::Feedback => &[FieldId::Suggestions, FieldId::Email],
        }
    }

    /// Whether the step has no required fields of its own.
    pub fn is_optional(self) -> bool {
        matches!(self, Self::Feedback)
    }

    /// Progress percentage shown while on this step.
    ///
    /// The schedule is deliberately non-linear (the last input step shows
    /// 90%): completion only reaches 100% once persistence succeeds.
    pub fn progress_percent(self) -> u8 {
        match self {
            Self::ClientInfo => 25,
            Self::CitizensCharter => 50,
            Self::ServiceQuality => 75,
            Self::Feedback => 90,
        }
    }

    /// The next step forward, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::ClientInfo => Some(Self::CitizensCharter),
            Self::CitizensCharter => Some(Self::ServiceQuality),
            Self::ServiceQuality => Some(Self::Feedback),
            Self::Feedback => None,
        }
    }

    /// The previous step, if any.
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::ClientInfo => None,
            Self::CitizensCharter => Some(Self::ClientInfo),
            Self::ServiceQuality => Some(Self::CitizensCharter),
            Self::Feedback => Some(Self::ServiceQuality),
        }
    }

    /// All steps in order.
    pub fn all() -> [Self; TOTAL_STEPS as usize] {
        [
            Self::ClientInfo,
            Self::CitizensCharter,
            Self::ServiceQuality,
            Self::Feedback,
        ]
    }
}
