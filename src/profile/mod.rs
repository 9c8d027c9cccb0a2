use crate::state::AppState;
use axum::{routing::get, Router};

mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(handlers::get_profile).put(handlers::update_profile),
    )
}
