use crate::state::AppState;
use axum::Router;

mod dto;
pub mod error;
pub mod handlers;
pub mod repo_types;
pub mod services;
pub mod session;
pub(crate) mod extractors;
mod repo;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
