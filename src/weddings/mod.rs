pub mod access;
mod dto;
pub mod handlers;
pub mod services;
pub mod validate;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::wedding_routes()
}
