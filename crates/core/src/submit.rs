//! Submission orchestration: assembly, duplicate check, persistence, and
//! post-submission bookkeeping.
//!
//! The orchestrator is the only place where the engine performs I/O, all
//! of it through the collaborator traits below. Persistence failures are
//! recoverable: the form stays on its final step with snapshots intact so
//! the respondent can retry without re-entering anything.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::document::{assemble, SurveyDocument, UNKNOWN_CLIENT_ADDRESS};
use crate::duplicate::{DuplicateGuard, GuardStore, IdentityKey};
use crate::error::CoreError;
use crate::form::machine::{FormStateMachine, StepStore};
use crate::form::steps::SurveyStep;
use crate::types::Timestamp;
use crate::validation::{validate_step, ValidationReport};

/// Receipt returned by the persistence collaborator.
///
/// The backend assigns both the stable identifier and the submission
/// timestamp; the submitted document carries neither.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResponse {
    pub id: String,
    pub submitted_at: Timestamp,
}

/// Persistence collaborator contract.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    async fn save(&self, document: &SurveyDocument) -> Result<SavedResponse, CoreError>;
}

#[async_trait]
impl<T: ResponseStore + ?Sized> ResponseStore for std::sync::Arc<T> {
    async fn save(&self, document: &SurveyDocument) -> Result<SavedResponse, CoreError> {
        (**self).save(document).await
    }
}

/// Best-effort client-identity collaborator.
///
/// `None` means the address could not be resolved; the orchestrator
/// records the `"unknown"` sentinel and proceeds. Lookup failure must
/// never block a submission.
#[async_trait]
pub trait ClientIdentity: Send + Sync {
    async fn lookup_client_address(&self) -> Option<String>;
}

/// Outcome of a submission attempt that did not error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SubmitOutcome {
    /// The document was persisted and the flow is now `Submitted`.
    Completed { response: SavedResponse },
    /// The final step's optional fields failed their format checks.
    FieldErrors { report: ValidationReport },
    /// Another submission is already in flight; this call did nothing.
    Ignored,
}

/// Sequences a survey submission end to end.
pub struct SubmissionOrchestrator<R: ResponseStore, G: GuardStore> {
    responses: R,
    guard: DuplicateGuard<G>,
    in_flight: AtomicBool,
}

/// Releases the in-flight flag on every exit path.
struct InFlightReset<'a>(&'a AtomicBool);

impl Drop for InFlightReset<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<R: ResponseStore, G: GuardStore> SubmissionOrchestrator<R, G> {
    pub fn new(responses: R, guard: DuplicateGuard<G>) -> Self {
        Self {
            responses,
            guard,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submit the survey currently sitting on its final step.
    ///
    /// A second call while one is outstanding returns
    /// [`SubmitOutcome::Ignored`] without touching the form — it is not
    /// queued and the outstanding attempt is not aborted.
    ///
    /// Errors escalated to the caller are limited to
    /// [`CoreError::DuplicateSubmission`], [`CoreError::Persistence`],
    /// and flow misuse ([`CoreError::Validation`]).
    pub async fn submit<S: StepStore>(
        &self,
        machine: &Mutex<FormStateMachine<S>>,
        identity: &dyn ClientIdentity,
        user_agent: &str,
    ) -> Result<SubmitOutcome, CoreError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Submission already in flight; ignoring trigger");
            return Ok(SubmitOutcome::Ignored);
        }
        let _reset = InFlightReset(&self.in_flight);

        let mut machine = machine.lock().await;

        match machine.current_step() {
            Some(SurveyStep::Feedback) => {}
            Some(step) => {
                return Err(CoreError::Validation(format!(
                    "Submission is only allowed from the final step, not step {}",
                    step.to_number()
                )));
            }
            None => {
                return Err(CoreError::Validation(
                    "No survey is in progress to submit".to_string(),
                ));
            }
        }

        // Optional fields must still satisfy their format checks when
        // non-empty.
        let report = validate_step(machine.values(), SurveyStep::Feedback.fields());
        if !report.is_valid {
            return Ok(SubmitOutcome::FieldErrors { report });
        }

        // Capture the final step so a failed persist is retryable as-is.
        machine.persist_current()?;

        let document = self.assemble_from(&machine)?;

        let address = match identity.lookup_client_address().await {
            Some(address) => address,
            None => {
                tracing::debug!("Client address lookup failed; recording as unknown");
                UNKNOWN_CLIENT_ADDRESS.to_string()
            }
        };
        let document = document.with_submitter(address, user_agent).sanitized();

        let key = IdentityKey::new(
            document.client_type.clone(),
            document.feedback.email.clone(),
        );
        if self.guard.is_duplicate(&key).await {
            return Err(CoreError::DuplicateSubmission {
                window_minutes: self.guard.window_minutes(),
            });
        }

        match self.responses.save(&document).await {
            Ok(response) => {
                // Only a persisted submission may arm the guard.
                self.guard.record_submission(&key).await;
                machine.mark_submitted();
                tracing::info!(response_id = %response.id, "Survey submission persisted");
                Ok(SubmitOutcome::Completed { response })
            }
            Err(err) => {
                tracing::warn!(error = %err, "Survey persistence failed; snapshots kept for retry");
                Err(CoreError::Persistence(err.to_string()))
            }
        }
    }

    fn assemble_from<S: StepStore>(
        &self,
        machine: &FormStateMachine<S>,
    ) -> Result<SurveyDocument, CoreError> {
        let load = |step: SurveyStep| {
            machine.stored_snapshot(step).ok_or_else(|| {
                CoreError::Internal(format!(
                    "Step {} snapshot missing at submission",
                    step.to_number()
                ))
            })
        };
        assemble(
            &load(SurveyStep::ClientInfo)?,
            &load(SurveyStep::CitizensCharter)?,
            &load(SurveyStep::ServiceQuality)?,
            &load(SurveyStep::Feedback)?,
        )
    }
}
