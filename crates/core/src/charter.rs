//! Citizen's-charter awareness gate.
//!
//! The charter step has one structural dependency: when the respondent
//! answers the awareness question (`cc1`) with the "unaware" option, the
//! two follow-up questions (`cc2`, `cc3`) stop being required and are
//! auto-filled with the canonical "Not Applicable" answer. Any other
//! answer restores their requiredness and clears values the gate itself
//! filled in, leaving deliberate respondent choices untouched.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::fields::{non_empty, FieldId, StepSnapshot};

/// `cc1` answer meaning "I do not know what a CC is and did not see one".
pub const CC1_UNAWARE: &str = "4";

/// Canonical answer auto-filled into gated follow-ups.
pub const NOT_APPLICABLE: &str = "Not Applicable";

/// The two follow-up questions gated by `cc1`.
pub const CHARTER_DEPENDENTS: &[FieldId] = &[FieldId::Cc2, FieldId::Cc3];

/// Conditional-requiredness predicate for `cc2`/`cc3`.
///
/// The follow-ups are required for every `cc1` answer except the unaware
/// option, and also while `cc1` is still unanswered.
pub fn followups_required(snapshot: &StepSnapshot) -> bool {
    non_empty(snapshot, FieldId::Cc1) != Some(CC1_UNAWARE)
}

/// Tracks which follow-up values were filled in by the gate rather than
/// chosen by the respondent, so releasing the gate never discards a
/// deliberate "Not Applicable" answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwarenessGate {
    auto_filled: BTreeSet<FieldId>,
}

impl AwarenessGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluate the gate against the current charter snapshot.
    ///
    /// Returns `true` while the follow-ups are locked (non-interactive).
    /// Applying this twice with the same `cc1` value is a no-op.
    pub fn apply(&mut self, snapshot: &mut StepSnapshot) -> bool {
        let unaware = non_empty(snapshot, FieldId::Cc1) == Some(CC1_UNAWARE);

        if unaware {
            for &field in CHARTER_DEPENDENTS {
                if non_empty(snapshot, field) != Some(NOT_APPLICABLE) {
                    snapshot.insert(field, NOT_APPLICABLE.to_string());
                    self.auto_filled.insert(field);
                }
            }
        } else {
            for &field in CHARTER_DEPENDENTS {
                if self.auto_filled.remove(&field)
                    && non_empty(snapshot, field) == Some(NOT_APPLICABLE)
                {
                    snapshot.remove(&field);
                }
            }
        }

        unaware
    }

    /// Whether the follow-up region is currently locked.
    pub fn dependents_locked(&self, snapshot: &StepSnapshot) -> bool {
        non_empty(snapshot, FieldId::Cc1) == Some(CC1_UNAWARE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_cc1(value: &str) -> StepSnapshot {
        let mut s = StepSnapshot::new();
        s.insert(FieldId::Cc1, value.to_string());
        s
    }

    #[test]
    fn unaware_forces_dependents_to_not_applicable() {
        let mut gate = AwarenessGate::new();
        let mut snapshot = snapshot_with_cc1(CC1_UNAWARE);

        let locked = gate.apply(&mut snapshot);

        assert!(locked);
        assert_eq!(snapshot.get(&FieldId::Cc2).unwrap(), NOT_APPLICABLE);
        assert_eq!(snapshot.get(&FieldId::Cc3).unwrap(), NOT_APPLICABLE);
        assert!(!followups_required(&snapshot));
    }

    #[test]
    fn other_answers_keep_dependents_required() {
        let mut gate = AwarenessGate::new();
        let mut snapshot = snapshot_with_cc1("1");

        let locked = gate.apply(&mut snapshot);

        assert!(!locked);
        assert!(followups_required(&snapshot));
        assert!(snapshot.get(&FieldId::Cc2).is_none());
    }

    #[test]
    fn releasing_the_gate_clears_machine_set_values_only() {
        let mut gate = AwarenessGate::new();
        let mut snapshot = snapshot_with_cc1(CC1_UNAWARE);
        gate.apply(&mut snapshot);

        snapshot.insert(FieldId::Cc1, "2".to_string());
        gate.apply(&mut snapshot);

        assert!(snapshot.get(&FieldId::Cc2).is_none());
        assert!(snapshot.get(&FieldId::Cc3).is_none());
        assert!(followups_required(&snapshot));
    }

    #[test]
    fn releasing_the_gate_preserves_deliberate_choices() {
        let mut gate = AwarenessGate::new();
        let mut snapshot = snapshot_with_cc1("2");
        snapshot.insert(FieldId::Cc2, NOT_APPLICABLE.to_string());
        snapshot.insert(FieldId::Cc3, "Helped very much".to_string());
        gate.apply(&mut snapshot);

        // Flip to unaware and back; cc2 was the respondent's own answer.
        snapshot.insert(FieldId::Cc1, CC1_UNAWARE.to_string());
        gate.apply(&mut snapshot);
        snapshot.insert(FieldId::Cc1, "2".to_string());
        gate.apply(&mut snapshot);

        assert_eq!(snapshot.get(&FieldId::Cc2).unwrap(), NOT_APPLICABLE);
        assert_eq!(snapshot.get(&FieldId::Cc3).unwrap(), "Helped very much");
    }

    #[test]
    fn apply_is_idempotent() {
        let mut gate = AwarenessGate::new();
        let mut snapshot = snapshot_with_cc1(CC1_UNAWARE);

        gate.apply(&mut snapshot);
        let first = snapshot.clone();
        gate.apply(&mut snapshot);

        assert_eq!(snapshot, first);

        snapshot.insert(FieldId::Cc1, "3".to_string());
        gate.apply(&mut snapshot);
        let released = snapshot.clone();
        gate.apply(&mut snapshot);

        assert_eq!(snapshot, released);
    }
}
