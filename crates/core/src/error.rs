/// Domain error for the survey engine.
///
/// Field-level validation failures are NOT represented here — they travel
/// in [`crate::validation::ValidationReport`] and never escalate past the
/// form state machine. Only flow-level failures become `CoreError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Data privacy acknowledgement is required before entering the survey")]
    AcknowledgementRequired,

    #[error("A survey was already submitted for this identity within the last {window_minutes} minutes")]
    DuplicateSubmission { window_minutes: i64 },

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
