use axum::{routing::post, Router};

use crate::error::post_only;
use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub use repo::{Contact, ContactWithUser};

pub fn router() -> Router<AppState> {
    Router::new().route("/contact", post(handlers::create).fallback(post_only))
}
