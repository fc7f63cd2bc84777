//! The closed set of survey field identifiers.
//!
//! Every field the survey collects is named here; unknown field names are
//! unrepresentable. Wire names (the camelCase keys used in snapshots and
//! the persisted document) are fixed for compatibility with downstream
//! readers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifier for one survey field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    // Step 1: client information
    ClientType,
    Date,
    Age,
    ServiceAvailed,
    RegionOfResidence,
    Sex,

    // Step 2: citizen's charter
    Cc1,
    Cc2,
    Cc3,

    // Step 3: service quality dimensions
    Sqd0,
    Sqd1,
    Sqd2,
    Sqd3,
    Sqd4,
    Sqd5,
    Sqd6,
    Sqd7,
    Sqd8,

    // Step 4: optional feedback
    Suggestions,
    Email,
}

/// All fields, in step order.
pub const ALL_FIELDS: &[FieldId] = &[
    FieldId::ClientType,
    FieldId::Date,
    FieldId::Age,
    FieldId::ServiceAvailed,
    FieldId::RegionOfResidence,
    FieldId::Sex,
    FieldId::Cc1,
    FieldId::Cc2,
    FieldId::Cc3,
    FieldId::Sqd0,
    FieldId::Sqd1,
    FieldId::Sqd2,
    FieldId::Sqd3,
    FieldId::Sqd4,
    FieldId::Sqd5,
    FieldId::Sqd6,
    FieldId::Sqd7,
    FieldId::Sqd8,
    FieldId::Suggestions,
    FieldId::Email,
];

impl FieldId {
    /// Wire name used in snapshots and the persisted document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientType => "clientType",
            Self::Date => "date",
            Self::Age => "age",
            Self::ServiceAvailed => "serviceAvailed",
            Self::RegionOfResidence => "regionOfResidence",
            Self::Sex => "sex",
            Self::Cc1 => "cc1",
            Self::Cc2 => "cc2",
            Self::Cc3 => "cc3",
            Self::Sqd0 => "sqd0",
            Self::Sqd1 => "sqd1",
            Self::Sqd2 => "sqd2",
            Self::Sqd3 => "sqd3",
            Self::Sqd4 => "sqd4",
            Self::Sqd5 => "sqd5",
            Self::Sqd6 => "sqd6",
            Self::Sqd7 => "sqd7",
            Self::Sqd8 => "sqd8",
            Self::Suggestions => "suggestions",
            Self::Email => "email",
        }
    }

    /// Parse a wire name, rejecting anything outside the closed set.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        ALL_FIELDS
            .iter()
            .copied()
            .find(|f| f.as_str() == name)
            .ok_or_else(|| CoreError::Validation(format!("Unknown survey field '{name}'")))
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The flat set of field values collected for one step.
///
/// A snapshot is created when a step is first entered, mutated on every
/// field change, and persisted whole (no merge) when the step advances.
pub type StepSnapshot = BTreeMap<FieldId, String>;

/// Look up a field value, treating an empty string the same as absent.
pub fn non_empty<'a>(snapshot: &'a StepSnapshot, field: FieldId) -> Option<&'a str> {
    snapshot
        .get(&field)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}
