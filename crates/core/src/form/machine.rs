//! The form flow state machine.
//!
//! Owns the step sequence, the current step's working snapshot, the
//! privacy-acknowledgement gate, and the durable per-step persistence
//! contract. Field-level validation failures are a normal [`AdvanceOutcome`],
//! never an error: the respondent edits and retries.

use serde::Serialize;

use crate::charter::AwarenessGate;
use crate::error::CoreError;
use crate::fields::{FieldId, StepSnapshot};
use crate::form::steps::SurveyStep;
use crate::validation::{validate_step, ValidationReport};

/// Durable per-step snapshot storage.
///
/// A plain key-value contract with no transactional guarantee: writes are
/// last-write-wins per step, and a missing key simply means the step has
/// never been saved.
pub trait StepStore {
    fn load(&self, step: SurveyStep) -> Option<StepSnapshot>;
    fn save(&mut self, step: SurveyStep, snapshot: &StepSnapshot);
    fn remove(&mut self, step: SurveyStep);
}

/// Where the respondent currently is in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// Not yet entered (or exited). Entry requires the privacy gate.
    Idle,
    /// On one of the four input steps.
    InStep(SurveyStep),
    /// Terminal: the submission was persisted.
    Submitted,
}

/// Result of an [`FormStateMachine::advance`] call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AdvanceOutcome {
    /// Moved forward to the given step.
    Moved { step: SurveyStep },
    /// Already on the final step; the caller must raise the submission
    /// confirmation gate instead of transitioning.
    ConfirmationRequired,
    /// The current step's fields did not validate; nothing moved.
    Rejected { report: ValidationReport },
}

/// Result of a [`FormStateMachine::retreat`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RetreatOutcome {
    /// Moved back to the given step, with its saved snapshot restored.
    Moved { step: SurveyStep },
    /// Retreated from the first step: the whole flow was exited and all
    /// collected data discarded.
    Exited,
}

/// The sequential multi-step form engine.
pub struct FormStateMachine<S: StepStore> {
    store: S,
    state: FlowState,
    privacy_acknowledged: bool,
    working: StepSnapshot,
    gate: AwarenessGate,
}

impl<S: StepStore> FormStateMachine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: FlowState::Idle,
            privacy_acknowledged: false,
            working: StepSnapshot::new(),
            gate: AwarenessGate::new(),
        }
    }

    /// Record the respondent's explicit data-privacy acknowledgement.
    pub fn acknowledge_privacy(&mut self) {
        self.privacy_acknowledged = true;
    }

    pub fn privacy_acknowledged(&self) -> bool {
        self.privacy_acknowledged
    }

    /// Enter the flow at step 1.
    ///
    /// Refuses unless the privacy acknowledgement has been given. A saved
    /// step-1 snapshot (e.g. from a reload) is restored if present.
    pub fn enter(&mut self) -> Result<SurveyStep, CoreError> {
        if !self.privacy_acknowledged {
            return Err(CoreError::AcknowledgementRequired);
        }
        match self.state {
            FlowState::Idle => {
                self.restore(SurveyStep::ClientInfo);
                Ok(SurveyStep::ClientInfo)
            }
            FlowState::InStep(step) => Ok(step),
            FlowState::Submitted => Err(CoreError::Validation(
                "Survey already submitted".to_string(),
            )),
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// The current step, if inside the flow.
    pub fn current_step(&self) -> Option<SurveyStep> {
        match self.state {
            FlowState::InStep(step) => Some(step),
            _ => None,
        }
    }

    /// Progress percentage for the current state.
    pub fn progress(&self) -> u8 {
        match self.state {
            FlowState::Idle => 0,
            FlowState::InStep(step) => step.progress_percent(),
            FlowState::Submitted => 100,
        }
    }

    /// The current step's in-progress field values.
    pub fn values(&self) -> &StepSnapshot {
        &self.working
    }

    /// Whether the charter follow-up region is locked by the awareness gate.
    pub fn dependents_locked(&self) -> bool {
        self.gate.dependents_locked(&self.working)
    }

    /// Record a field change on the current step.
    ///
    /// Only fields belonging to the current step are accepted. An empty
    /// value clears the field. Changing the awareness answer re-runs the
    /// charter gate over the snapshot.
    pub fn set_field(&mut self, field: FieldId, value: &str) -> Result<(), CoreError> {
        let Some(step) = self.current_step() else {
            return Err(CoreError::Validation(
                "Cannot set a field outside the survey flow".to_string(),
            ));
        };
        if !step.fields().contains(&field) {
            return Err(CoreError::Validation(format!(
                "Field '{field}' does not belong to step {} ({})",
                step.to_number(),
                step.label()
            )));
        }

        if value.is_empty() {
            self.working.remove(&field);
        } else {
            self.working.insert(field, value.to_string());
        }

        if field == FieldId::Cc1 {
            self.gate.apply(&mut self.working);
        }

        Ok(())
    }

    /// Validate the current step and move forward.
    ///
    /// On success the working snapshot is persisted whole (overwriting any
    /// earlier save for the step) before the transition. The final step
    /// never advances; it yields the confirmation gate.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, CoreError> {
        let Some(step) = self.current_step() else {
            return Err(CoreError::Validation(
                "Cannot advance outside the survey flow".to_string(),
            ));
        };

        let report = validate_step(&self.working, step.fields());
        if !report.is_valid {
            return Ok(AdvanceOutcome::Rejected { report });
        }

        self.store.save(step, &self.working);

        match step.next() {
            Some(next) => {
                self.restore(next);
                Ok(AdvanceOutcome::Moved { step: next })
            }
            None => Ok(AdvanceOutcome::ConfirmationRequired),
        }
    }

    /// Move backward without validating.
    ///
    /// The destination step's previously persisted snapshot is restored
    /// exactly. Retreating from step 1 exits the flow and discards all
    /// collected data, like abandoning the survey from its first page.
    pub fn retreat(&mut self) -> Result<RetreatOutcome, CoreError> {
        let Some(step) = self.current_step() else {
            return Err(CoreError::Validation(
                "Cannot go back outside the survey flow".to_string(),
            ));
        };

        match step.previous() {
            Some(previous) => {
                self.restore(previous);
                Ok(RetreatOutcome::Moved { step: previous })
            }
            None => {
                self.reset();
                Ok(RetreatOutcome::Exited)
            }
        }
    }

    /// Clear all persisted snapshots and the privacy acknowledgement, and
    /// return to the initial state. Re-entry requires re-acknowledgement.
    pub fn reset(&mut self) {
        for step in SurveyStep::all() {
            self.store.remove(step);
        }
        self.working.clear();
        self.gate = AwarenessGate::new();
        self.privacy_acknowledged = false;
        self.state = FlowState::Idle;
    }

    /// Persist the current step's working snapshot without transitioning.
    ///
    /// The submission orchestrator uses this to capture the final step
    /// (which never advances) before assembly, so a failed persistence
    /// attempt leaves everything restorable.
    pub fn persist_current(&mut self) -> Result<(), CoreError> {
        let Some(step) = self.current_step() else {
            return Err(CoreError::Validation(
                "No step is active to persist".to_string(),
            ));
        };
        self.store.save(step, &self.working);
        Ok(())
    }

    /// Read a step's persisted snapshot.
    pub fn stored_snapshot(&self, step: SurveyStep) -> Option<StepSnapshot> {
        self.store.load(step)
    }

    /// Terminal transition after a successful persistence write: clears
    /// the durable snapshots and moves to `Submitted`.
    pub fn mark_submitted(&mut self) {
        for step in SurveyStep::all() {
            self.store.remove(step);
        }
        self.working.clear();
        self.state = FlowState::Submitted;
    }

    fn restore(&mut self, step: SurveyStep) {
        self.working = self.store.load(step).unwrap_or_default();
        self.state = FlowState::InStep(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    /// Minimal in-memory step store for machine tests.
    #[derive(Default)]
    struct TestStore {
        slots: HashMap<u8, StepSnapshot>,
    }

    impl StepStore for TestStore {
        fn load(&self, step: SurveyStep) -> Option<StepSnapshot> {
            self.slots.get(&step.to_number()).cloned()
        }
        fn save(&mut self, step: SurveyStep, snapshot: &StepSnapshot) {
            self.slots.insert(step.to_number(), snapshot.clone());
        }
        fn remove(&mut self, step: SurveyStep) {
            self.slots.remove(&step.to_number());
        }
    }

    fn entered_machine() -> FormStateMachine<TestStore> {
        let mut machine = FormStateMachine::new(TestStore::default());
        machine.acknowledge_privacy();
        machine.enter().unwrap();
        machine
    }

    fn fill_client_info(machine: &mut FormStateMachine<TestStore>) {
        machine.set_field(FieldId::ClientType, "citizen").unwrap();
        machine.set_field(FieldId::Date, "2024-05-10").unwrap();
        machine.set_field(FieldId::Age, "35").unwrap();
        machine
            .set_field(FieldId::ServiceAvailed, "Business permit")
            .unwrap();
        machine
            .set_field(FieldId::RegionOfResidence, "Region IV-A")
            .unwrap();
        machine.set_field(FieldId::Sex, "Female").unwrap();
    }

    fn fill_charter(machine: &mut FormStateMachine<TestStore>) {
        machine.set_field(FieldId::Cc1, "1").unwrap();
        machine.set_field(FieldId::Cc2, "Easy to see").unwrap();
        machine.set_field(FieldId::Cc3, "Helped very much").unwrap();
    }

    fn fill_service_quality(machine: &mut FormStateMachine<TestStore>) {
        for field in SurveyStep::ServiceQuality.fields() {
            machine.set_field(*field, "5").unwrap();
        }
    }

    // -- Privacy gate --------------------------------------------------------

    #[test]
    fn enter_requires_acknowledgement() {
        let mut machine = FormStateMachine::new(TestStore::default());
        assert_matches!(machine.enter(), Err(CoreError::AcknowledgementRequired));

        machine.acknowledge_privacy();
        assert_eq!(machine.enter().unwrap(), SurveyStep::ClientInfo);
        assert_eq!(machine.progress(), 25);
    }

    // -- Field updates -------------------------------------------------------

    #[test]
    fn set_field_rejects_fields_from_other_steps() {
        let mut machine = entered_machine();
        let err = machine.set_field(FieldId::Sqd0, "5").unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn cc1_change_runs_the_awareness_gate() {
        let mut machine = entered_machine();
        fill_client_info(&mut machine);
        machine.advance().unwrap();

        machine.set_field(FieldId::Cc1, "4").unwrap();
        assert!(machine.dependents_locked());
        assert_eq!(
            machine.values().get(&FieldId::Cc2).unwrap(),
            "Not Applicable"
        );

        machine.set_field(FieldId::Cc1, "1").unwrap();
        assert!(!machine.dependents_locked());
        assert!(machine.values().get(&FieldId::Cc2).is_none());
    }

    // -- Advance -------------------------------------------------------------

    #[test]
    fn advance_rejects_an_incomplete_step() {
        let mut machine = entered_machine();
        let outcome = machine.advance().unwrap();
        assert_matches!(outcome, AdvanceOutcome::Rejected { ref report } if !report.is_valid);
        assert_eq!(machine.current_step(), Some(SurveyStep::ClientInfo));
    }

    #[test]
    fn advance_persists_and_moves_forward() {
        let mut machine = entered_machine();
        fill_client_info(&mut machine);

        let outcome = machine.advance().unwrap();
        assert_matches!(
            outcome,
            AdvanceOutcome::Moved {
                step: SurveyStep::CitizensCharter
            }
        );
        assert_eq!(machine.progress(), 50);

        let saved = machine.stored_snapshot(SurveyStep::ClientInfo).unwrap();
        assert_eq!(saved.get(&FieldId::Age).unwrap(), "35");
    }

    #[test]
    fn final_step_advance_raises_the_confirmation_gate() {
        let mut machine = entered_machine();
        fill_client_info(&mut machine);
        machine.advance().unwrap();
        fill_charter(&mut machine);
        machine.advance().unwrap();
        fill_service_quality(&mut machine);
        machine.advance().unwrap();

        assert_eq!(machine.current_step(), Some(SurveyStep::Feedback));
        assert_eq!(machine.progress(), 90);

        // Feedback has no required fields; advancing yields the gate.
        let outcome = machine.advance().unwrap();
        assert_matches!(outcome, AdvanceOutcome::ConfirmationRequired);
        assert_eq!(machine.current_step(), Some(SurveyStep::Feedback));
    }

    // -- Retreat -------------------------------------------------------------

    #[test]
    fn retreat_restores_the_saved_snapshot_exactly() {
        let mut machine = entered_machine();
        fill_client_info(&mut machine);
        machine.advance().unwrap();
        machine.set_field(FieldId::Cc1, "2").unwrap();

        let outcome = machine.retreat().unwrap();
        assert_matches!(
            outcome,
            RetreatOutcome::Moved {
                step: SurveyStep::ClientInfo
            }
        );
        assert_eq!(machine.values().get(&FieldId::ClientType).unwrap(), "citizen");
        assert_eq!(machine.values().get(&FieldId::Sex).unwrap(), "Female");
    }

    #[test]
    fn retreat_from_step_one_exits_the_flow() {
        let mut machine = entered_machine();
        fill_client_info(&mut machine);

        let outcome = machine.retreat().unwrap();
        assert_eq!(outcome, RetreatOutcome::Exited);
        assert_eq!(machine.state(), FlowState::Idle);
        assert!(!machine.privacy_acknowledged());
        assert!(machine.stored_snapshot(SurveyStep::ClientInfo).is_none());
    }

    #[test]
    fn forward_after_retreat_overwrites_the_old_snapshot() {
        let mut machine = entered_machine();
        fill_client_info(&mut machine);
        machine.advance().unwrap();
        machine.retreat().unwrap();

        machine.set_field(FieldId::Age, "36").unwrap();
        machine.advance().unwrap();

        let saved = machine.stored_snapshot(SurveyStep::ClientInfo).unwrap();
        assert_eq!(saved.get(&FieldId::Age).unwrap(), "36");
    }

    // -- Reset / submitted ---------------------------------------------------

    #[test]
    fn reset_clears_snapshots_and_acknowledgement() {
        let mut machine = entered_machine();
        fill_client_info(&mut machine);
        machine.advance().unwrap();

        machine.reset();

        assert_eq!(machine.state(), FlowState::Idle);
        assert!(!machine.privacy_acknowledged());
        assert!(machine.stored_snapshot(SurveyStep::ClientInfo).is_none());
        assert_eq!(machine.progress(), 0);
    }

    #[test]
    fn mark_submitted_is_terminal_and_clears_storage() {
        let mut machine = entered_machine();
        fill_client_info(&mut machine);
        machine.advance().unwrap();

        machine.mark_submitted();

        assert_eq!(machine.state(), FlowState::Submitted);
        assert_eq!(machine.progress(), 100);
        assert!(machine.stored_snapshot(SurveyStep::ClientInfo).is_none());
        assert_matches!(machine.enter(), Err(CoreError::Validation(_)));
    }
}
