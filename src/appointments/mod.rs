use axum::{
    routing::{get, post},
    Router,
};

use crate::error::{get_only, post_only};
use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub use repo::{Appointment, AppointmentWithUser};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointment", post(handlers::create).fallback(post_only))
        .route(
            "/user_appointments",
            get(handlers::list_for_email).fallback(get_only),
        )
}
