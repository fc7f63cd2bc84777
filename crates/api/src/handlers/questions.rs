//! Handlers for the live question list.
//!
//! The list feeds rendering only; replacing it never alters the validated
//! field set or any collected answers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use civica_core::questions::QuestionDescriptor;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /questions
// ---------------------------------------------------------------------------

/// The current ordered question list.
pub async fn list_questions(State(state): State<AppState>) -> impl IntoResponse {
    let questions: Vec<QuestionDescriptor> = (*state.questions.current()).clone();
    Json(DataResponse { data: questions })
}

// ---------------------------------------------------------------------------
// PUT /questions
// ---------------------------------------------------------------------------

/// Replace the live question list.
///
/// This is the push seam for the question-source collaborator; the new
/// list is re-sorted by `order` and broadcast to subscribers.
pub async fn replace_questions(
    State(state): State<AppState>,
    Json(body): Json<Vec<QuestionDescriptor>>,
) -> AppResult<impl IntoResponse> {
    if body.is_empty() {
        return Err(AppError::BadRequest(
            "Question list cannot be empty".to_string(),
        ));
    }

    state.questions.publish(body);
    let questions: Vec<QuestionDescriptor> = (*state.questions.current()).clone();

    tracing::info!(count = questions.len(), "Survey question list replaced");

    Ok(Json(DataResponse { data: questions }))
}
