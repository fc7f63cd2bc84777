//! Civica survey engine — domain logic for the citizen-satisfaction survey.
//!
//! This crate owns the parts of the system with real invariants:
//!
//! - [`validation`] — the declarative per-field rule table and evaluator.
//! - [`charter`] — the awareness-gate conditional dependency resolver.
//! - [`form`] — the four-step form state machine and snapshot contract.
//! - [`sanitize`] — HTML-escaping of string leaves in the storage document.
//! - [`document`] — the assembled [`document::SurveyDocument`].
//! - [`duplicate`] — the time-windowed duplicate-submission guard.
//! - [`questions`] — the observable live question list (rendering input).
//! - [`submit`] — collaborator contracts and the submission orchestrator.
//!
//! No I/O happens here beyond the async collaborator traits; concrete
//! storage lives in `civica-store` and the HTTP surface in `civica-api`.

pub mod charter;
pub mod document;
pub mod duplicate;
pub mod error;
pub mod fields;
pub mod form;
pub mod questions;
pub mod sanitize;
pub mod submit;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod testutil;
