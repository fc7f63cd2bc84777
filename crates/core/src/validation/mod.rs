//! Declarative field validation: the static rule table and its evaluator.

pub mod evaluator;
pub mod rules;

pub use evaluator::{evaluate_field, validate_step, FieldViolation, ValidationReport};
pub use rules::{rule, FieldRule, FieldType, NamedPattern};
