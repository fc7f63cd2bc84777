//! Handlers for the survey flow.
//!
//! A session is created per respondent; the privacy acknowledgement gates
//! entry into step 1, and navigation/submission endpoints drive the form
//! state machine owned by that session.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use civica_core::fields::{FieldId, StepSnapshot};
use civica_core::form::machine::{AdvanceOutcome, FlowState, FormStateMachine, RetreatOutcome};
use civica_core::submit::SubmitOutcome;
use civica_store::MemoryStepStore;

use crate::error::{field_errors_response, AppError, AppResult};
use crate::identity::HeaderIdentity;
use crate::response::DataResponse;
use crate::sessions::SurveySession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Snapshot of a session's flow state returned by most endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyView {
    pub id: Uuid,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_label: Option<&'static str>,
    pub progress: u8,
    pub privacy_acknowledged: bool,
    pub dependents_locked: bool,
    pub values: StepSnapshot,
}

fn view(id: Uuid, machine: &FormStateMachine<MemoryStepStore>) -> SurveyView {
    let (state, step) = match machine.state() {
        FlowState::Idle => ("idle", None),
        FlowState::InStep(step) => ("in_step", Some(step)),
        FlowState::Submitted => ("submitted", None),
    };
    SurveyView {
        id,
        state,
        step: step.map(|s| s.to_number()),
        step_label: step.map(|s| s.label()),
        progress: machine.progress(),
        privacy_acknowledged: machine.privacy_acknowledged(),
        dependents_locked: machine.dependents_locked(),
        values: machine.values().clone(),
    }
}

/// Advance/retreat responses pair the transition outcome with the
/// resulting view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransitionView<O: Serialize> {
    outcome: O,
    survey: SurveyView,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_session(state: &AppState, id: Uuid) -> AppResult<Arc<SurveySession>> {
    state
        .sessions
        .get(id)
        .await
        .ok_or(AppError::NotFound("Survey session"))
}

// ---------------------------------------------------------------------------
// POST /surveys
// ---------------------------------------------------------------------------

/// Create a new survey session. The privacy acknowledgement is still
/// required before the flow can be entered.
pub async fn create_survey(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let (id, session) = state
        .sessions
        .create(
            Arc::clone(&state.responses),
            Arc::clone(&state.guard_store),
            state.config.duplicate_window_minutes,
        )
        .await;

    tracing::info!(session_id = %id, "Survey session created");

    let machine = session.machine.lock().await;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: view(id, &machine),
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /surveys/{id}/acknowledge
// ---------------------------------------------------------------------------

/// Record the respondent's explicit data-privacy acknowledgement.
pub async fn acknowledge_privacy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, id).await?;
    let mut machine = session.machine.lock().await;

    machine.acknowledge_privacy();
    tracing::info!(session_id = %id, "Privacy acknowledged");

    Ok(Json(DataResponse {
        data: view(id, &machine),
    }))
}

// ---------------------------------------------------------------------------
// POST /surveys/{id}/enter
// ---------------------------------------------------------------------------

/// Enter the flow at step 1.
///
/// Refused with 403 until the privacy acknowledgement has been recorded.
pub async fn enter_survey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, id).await?;
    let mut machine = session.machine.lock().await;

    let step = machine.enter()?;
    tracing::info!(session_id = %id, step = step.to_number(), "Survey entered");

    Ok(Json(DataResponse {
        data: view(id, &machine),
    }))
}

// ---------------------------------------------------------------------------
// GET /surveys/{id}
// ---------------------------------------------------------------------------

/// Current state of a survey session.
pub async fn get_survey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, id).await?;
    let machine = session.machine.lock().await;
    Ok(Json(DataResponse {
        data: view(id, &machine),
    }))
}

// ---------------------------------------------------------------------------
// PUT /surveys/{id}/fields
// ---------------------------------------------------------------------------

/// Record field changes on the current step.
///
/// The body is a flat map of wire field names to values; unknown names
/// and fields from other steps are rejected. An empty value clears the
/// field.
pub async fn update_fields(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<BTreeMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, id).await?;
    let mut machine = session.machine.lock().await;

    for (name, value) in &body {
        let field = FieldId::from_name(name)?;
        machine.set_field(field, value)?;
    }

    Ok(Json(DataResponse {
        data: view(id, &machine),
    }))
}

// ---------------------------------------------------------------------------
// POST /surveys/{id}/advance
// ---------------------------------------------------------------------------

/// Validate the current step and move forward.
///
/// Field validation failures return 422 with a per-field error map; on
/// the final step a valid advance yields the submission-confirmation
/// gate instead of a transition.
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let session = find_session(&state, id).await?;
    let mut machine = session.machine.lock().await;

    let outcome = machine.advance()?;
    if let AdvanceOutcome::Rejected { report } = &outcome {
        return Ok(field_errors_response(report));
    }

    Ok(Json(DataResponse {
        data: TransitionView {
            outcome,
            survey: view(id, &machine),
        },
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// POST /surveys/{id}/retreat
// ---------------------------------------------------------------------------

/// Move backward without validating; from step 1 this exits the flow and
/// discards collected data.
pub async fn retreat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, id).await?;
    let mut machine = session.machine.lock().await;

    let outcome = machine.retreat()?;
    if outcome == RetreatOutcome::Exited {
        tracing::info!(session_id = %id, "Survey flow exited from step 1");
    }

    Ok(Json(DataResponse {
        data: TransitionView {
            outcome,
            survey: view(id, &machine),
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /surveys/{id}/reset
// ---------------------------------------------------------------------------

/// Clear all collected data and the privacy acknowledgement.
pub async fn reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state, id).await?;
    let mut machine = session.machine.lock().await;

    machine.reset();
    tracing::info!(session_id = %id, "Survey session reset");

    Ok(Json(DataResponse {
        data: view(id, &machine),
    }))
}

// ---------------------------------------------------------------------------
// POST /surveys/{id}/submit
// ---------------------------------------------------------------------------

/// Run the submission pipeline for a session sitting on its final step.
pub async fn submit_survey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let session = find_session(&state, id).await?;

    let identity = HeaderIdentity::from_headers(&headers);
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let outcome = session
        .orchestrator
        .submit(&session.machine, &identity, user_agent)
        .await?;

    match outcome {
        SubmitOutcome::Completed { response } => {
            tracing::info!(session_id = %id, response_id = %response.id, "Survey submitted");
            Ok((StatusCode::CREATED, Json(DataResponse { data: response })).into_response())
        }
        SubmitOutcome::FieldErrors { report } => Ok(field_errors_response(&report)),
        SubmitOutcome::Ignored => {
            // A submission is already in flight for this session; the
            // duplicate trigger is dropped, not queued.
            Ok((
                StatusCode::ACCEPTED,
                Json(serde_json::json!({ "data": { "outcome": "ignored" } })),
            )
                .into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// DELETE /surveys/{id}
// ---------------------------------------------------------------------------

/// Discard a session entirely.
pub async fn delete_survey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound("Survey session"));
    }
    tracing::info!(session_id = %id, "Survey session deleted");
    Ok(StatusCode::NO_CONTENT)
}
