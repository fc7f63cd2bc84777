//! In-memory implementations of the survey engine's storage contracts.
//!
//! The engine only ever talks to storage through the traits in
//! `civica-core` ([`civica_core::form::machine::StepStore`],
//! [`civica_core::duplicate::GuardStore`],
//! [`civica_core::submit::ResponseStore`]); this crate provides the
//! process-local backings used by the API server and by tests.

pub mod memory;

pub use memory::{MemoryGuardStore, MemoryResponseStore, MemoryStepStore, StoredResponse};
