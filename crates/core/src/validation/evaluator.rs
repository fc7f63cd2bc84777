//! Field evaluator — pure logic, no I/O.
//!
//! Checks run in a strict order and short-circuit on the first failure:
//! required, conditional requiredness, optional-empty pass, length,
//! numeric range, date parse, named pattern, custom validator.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use super::rules::{self, FieldType};
use crate::fields::{FieldId, StepSnapshot};

/// A single field-level rule violation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: FieldId,
    pub message: String,
}

/// Aggregated result of validating a set of fields against one snapshot.
///
/// All failures are collected so the caller can report every problem at
/// once; there is no cross-field short circuit.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: BTreeMap<FieldId, String>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: BTreeMap::new(),
        }
    }
}

/// Evaluate one field against its rule.
///
/// `value` is the raw collected value; `snapshot` is the full current
/// step snapshot, consulted by conditional-requiredness predicates.
/// Returns `None` when the field passes.
pub fn evaluate_field(
    field: FieldId,
    value: Option<&str>,
    snapshot: &StepSnapshot,
) -> Option<FieldViolation> {
    let rule = rules::rule(field);
    let present = value.filter(|v| !v.is_empty());

    let violation = |message: &str| {
        Some(FieldViolation {
            field,
            message: message.to_string(),
        })
    };

    // 1. Required and absent.
    if rule.required && present.is_none() {
        return violation(rule.message);
    }

    // 2. Conditionally required (another field's answer gates this one).
    if let Some(required_when) = rule.conditionally_required {
        if required_when(snapshot) && present.is_none() {
            return violation(rule.message);
        }
    }

    // 3. Optional and absent: nothing further to check.
    let Some(value) = present else {
        return None;
    };

    // 4. Length bounds.
    if let Some(min) = rule.min_length {
        if value.len() < min {
            return violation(rule.message);
        }
    }
    if let Some(max) = rule.max_length {
        if value.len() > max {
            return violation(rule.message);
        }
    }

    // 5. Numeric parse + range.
    if rule.field_type == FieldType::Number {
        let Ok(number) = value.parse::<f64>() else {
            return violation(rule.message);
        };
        if let Some(min) = rule.min {
            if number < min {
                return violation(rule.message);
            }
        }
        if let Some(max) = rule.max {
            if number > max {
                return violation(rule.message);
            }
        }
    }

    // 6. Date parse.
    if rule.field_type == FieldType::Date
        && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err()
    {
        return violation(rule.message);
    }

    // 7. Named pattern.
    if let Some(pattern) = rule.pattern {
        match Regex::new(pattern.pattern()) {
            Ok(re) if re.is_match(value) => {}
            Ok(_) => return violation(rule.message),
            Err(_) => {} // unmatchable pattern source passes silently
        }
    }

    // 8. Custom validator, with its override message when present.
    if let Some(check) = rule.custom {
        if !check(value) {
            return violation(rule.custom_message.unwrap_or(rule.message));
        }
    }

    None
}

/// Validate `fields` against `snapshot`, aggregating failures per field.
pub fn validate_step(snapshot: &StepSnapshot, fields: &[FieldId]) -> ValidationReport {
    let mut errors = BTreeMap::new();

    for &field in fields {
        let value = snapshot.get(&field).map(String::as_str);
        if let Some(violation) = evaluate_field(field, value, snapshot) {
            errors.insert(field, violation.message);
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}
