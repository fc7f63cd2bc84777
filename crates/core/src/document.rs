//! The assembled survey document and its assembler.
//!
//! Field names and nesting are a storage contract shared with downstream
//! readers (reporting, analytics) and must be preserved exactly.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::fields::{non_empty, FieldId, StepSnapshot};
use crate::sanitize::escape_html;
use crate::types::SURVEY_VERSION;

/// Sentinel used when the submitter's network address cannot be resolved.
pub const UNKNOWN_CLIENT_ADDRESS: &str = "unknown";

/// Citizen's-charter answers (step 2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharterAnswers {
    pub cc1: String,
    pub cc2: String,
    pub cc3: String,
}

/// Service-quality-dimension ratings (step 3): ordinal 1-5 or the
/// "not applicable" option, stored as the collected strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceQualityAnswers {
    pub sqd0: String,
    pub sqd1: String,
    pub sqd2: String,
    pub sqd3: String,
    pub sqd4: String,
    pub sqd5: String,
    pub sqd6: String,
    pub sqd7: String,
    pub sqd8: String,
}

/// Optional free-text feedback and contact email (step 4). Absent values
/// are stored as empty strings, never omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAnswers {
    pub suggestions: String,
    pub email: String,
}

/// The fully assembled submission record.
///
/// Created once at submission time from the four step snapshots and
/// immutable afterwards. The submission timestamp is deliberately absent:
/// the persistence backend assigns it server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDocument {
    // Client information
    pub client_type: String,
    pub date: String,
    pub age: i64,
    pub service_availed: String,
    pub region_of_residence: String,
    pub sex: String,

    // Nested answer groups
    pub citizens_charter: CharterAnswers,
    pub service_quality: ServiceQualityAnswers,
    pub feedback: FeedbackAnswers,

    // System metadata
    pub completion_status: String,
    pub privacy_accepted: bool,
    pub ip_address: String,
    pub user_agent: String,
    pub survey_version: String,
}

impl SurveyDocument {
    /// Attach the submitter's network/client identifiers.
    pub fn with_submitter(mut self, ip_address: impl Into<String>, user_agent: impl Into<String>) -> Self {
        self.ip_address = ip_address.into();
        self.user_agent = user_agent.into();
        self
    }

    /// Return a copy with every string leaf HTML-escaped, recursively
    /// across the nested groups. Non-string leaves pass through unchanged.
    pub fn sanitized(&self) -> Self {
        Self {
            client_type: escape_html(&self.client_type),
            date: escape_html(&self.date),
            age: self.age,
            service_availed: escape_html(&self.service_availed),
            region_of_residence: escape_html(&self.region_of_residence),
            sex: escape_html(&self.sex),
            citizens_charter: CharterAnswers {
                cc1: escape_html(&self.citizens_charter.cc1),
                cc2: escape_html(&self.citizens_charter.cc2),
                cc3: escape_html(&self.citizens_charter.cc3),
            },
            service_quality: ServiceQualityAnswers {
                sqd0: escape_html(&self.service_quality.sqd0),
                sqd1: escape_html(&self.service_quality.sqd1),
                sqd2: escape_html(&self.service_quality.sqd2),
                sqd3: escape_html(&self.service_quality.sqd3),
                sqd4: escape_html(&self.service_quality.sqd4),
                sqd5: escape_html(&self.service_quality.sqd5),
                sqd6: escape_html(&self.service_quality.sqd6),
                sqd7: escape_html(&self.service_quality.sqd7),
                sqd8: escape_html(&self.service_quality.sqd8),
            },
            feedback: FeedbackAnswers {
                suggestions: escape_html(&self.feedback.suggestions),
                email: escape_html(&self.feedback.email),
            },
            completion_status: self.completion_status.clone(),
            privacy_accepted: self.privacy_accepted,
            ip_address: self.ip_address.clone(),
            user_agent: self.user_agent.clone(),
            survey_version: self.survey_version.clone(),
        }
    }
}

/// Merge the four step snapshots into one normalized document.
///
/// Pure function. Only ever invoked after the privacy gate and full
/// validation have passed, so the completion and privacy flags are
/// stamped unconditionally rather than re-checked.
pub fn assemble(
    client_info: &StepSnapshot,
    charter: &StepSnapshot,
    service_quality: &StepSnapshot,
    feedback: &StepSnapshot,
) -> Result<SurveyDocument, CoreError> {
    let age_raw = required(client_info, FieldId::Age)?;
    let age: i64 = age_raw
        .parse()
        .map_err(|_| CoreError::Internal(format!("Age '{age_raw}' is not an integer")))?;

    Ok(SurveyDocument {
        client_type: required(client_info, FieldId::ClientType)?.to_string(),
        date: required(client_info, FieldId::Date)?.to_string(),
        age,
        service_availed: required(client_info, FieldId::ServiceAvailed)?.to_string(),
        region_of_residence: required(client_info, FieldId::RegionOfResidence)?.to_string(),
        sex: required(client_info, FieldId::Sex)?.to_string(),
        citizens_charter: CharterAnswers {
            cc1: required(charter, FieldId::Cc1)?.to_string(),
            cc2: required(charter, FieldId::Cc2)?.to_string(),
            cc3: required(charter, FieldId::Cc3)?.to_string(),
        },
        service_quality: ServiceQualityAnswers {
            sqd0: required(service_quality, FieldId::Sqd0)?.to_string(),
            sqd1: required(service_quality, FieldId::Sqd1)?.to_string(),
            sqd2: required(service_quality, FieldId::Sqd2)?.to_string(),
            sqd3: required(service_quality, FieldId::Sqd3)?.to_string(),
            sqd4: required(service_quality, FieldId::Sqd4)?.to_string(),
            sqd5: required(service_quality, FieldId::Sqd5)?.to_string(),
            sqd6: required(service_quality, FieldId::Sqd6)?.to_string(),
            sqd7: required(service_quality, FieldId::Sqd7)?.to_string(),
            sqd8: required(service_quality, FieldId::Sqd8)?.to_string(),
        },
        feedback: FeedbackAnswers {
            suggestions: optional(feedback, FieldId::Suggestions),
            email: optional(feedback, FieldId::Email),
        },
        completion_status: "completed".to_string(),
        privacy_accepted: true,
        ip_address: UNKNOWN_CLIENT_ADDRESS.to_string(),
        user_agent: String::new(),
        survey_version: SURVEY_VERSION.to_string(),
    })
}

fn required(snapshot: &StepSnapshot, field: FieldId) -> Result<&str, CoreError> {
    non_empty(snapshot, field)
        .ok_or_else(|| CoreError::Internal(format!("Missing required field '{field}' at assembly")))
}

fn optional(snapshot: &StepSnapshot, field: FieldId) -> String {
    non_empty(snapshot, field).unwrap_or_default().to_string()
}
