//! Route definitions for the live question list — mounted at `/questions`.

use axum::routing::get;
use axum::Router;

use crate::handlers::questions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(questions::list_questions).put(questions::replace_questions),
    )
}
