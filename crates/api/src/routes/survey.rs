//! Route definitions for the survey flow — mounted at `/surveys`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::survey;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(survey::create_survey))
        .route(
            "/{id}",
            get(survey::get_survey).delete(survey::delete_survey),
        )
        .route("/{id}/acknowledge", post(survey::acknowledge_privacy))
        .route("/{id}/enter", post(survey::enter_survey))
        .route("/{id}/fields", put(survey::update_fields))
        .route("/{id}/advance", post(survey::advance))
        .route("/{id}/retreat", post(survey::retreat))
        .route("/{id}/reset", post(survey::reset))
        .route("/{id}/submit", post(survey::submit_survey))
}
