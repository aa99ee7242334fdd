use axum::{routing::get, Router};

use crate::error::method_not_allowed;
use crate::state::AppState;

pub mod appointments;
pub mod contacts;
pub mod users;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(users::list)
                .post(users::mutate)
                .fallback(method_not_allowed),
        )
        .route(
            "/appointments",
            get(appointments::list)
                .post(appointments::mutate)
                .fallback(method_not_allowed),
        )
        .route(
            "/contacts",
            get(contacts::list)
                .post(contacts::mutate)
                .fallback(method_not_allowed),
        )
}

/// Parse a form-supplied row id. Anything that is not a positive integer
/// (missing, garbage, zero) reads as invalid.
pub(crate) fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}
