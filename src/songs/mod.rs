use crate::state::AppState;
use axum::Router;

pub mod handlers;
mod repo;
pub mod row;

pub fn router() -> Router<AppState> {
    handlers::song_routes()
}
