pub mod health;
pub mod questions;
pub mod survey;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /surveys                      create session (POST)
/// /surveys/{id}                 get state (GET), discard (DELETE)
/// /surveys/{id}/acknowledge     privacy acknowledgement (POST)
/// /surveys/{id}/enter           enter the flow at step 1 (POST)
/// /surveys/{id}/fields          record field changes (PUT)
/// /surveys/{id}/advance         validate + move forward (POST)
/// /surveys/{id}/retreat         move backward / exit (POST)
/// /surveys/{id}/reset           clear collected data (POST)
/// /surveys/{id}/submit          run the submission pipeline (POST)
///
/// /questions                    live question list (GET, PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/surveys", survey::router())
        .nest("/questions", questions::router())
}
