use axum::{
    routing::{get, post},
    Router,
};

use crate::error::{method_not_allowed, post_only};
use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod password;
pub mod repo;

pub use repo::{Role, User};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register).fallback(post_only))
        .route("/login", post(handlers::login).fallback(post_only))
        .route(
            "/logout",
            get(handlers::logout)
                .post(handlers::logout)
                .fallback(method_not_allowed),
        )
}
