//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope; use
//! [`DataResponse`] rather than ad-hoc `serde_json::json!` objects so the
//! payload shape stays typed and consistent.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
