pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use repo_types::Project;

pub fn router() -> Router<AppState> {
    handlers::project_routes()
}
