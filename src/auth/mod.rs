use crate::state::AppState;
use axum::Router;

pub mod context;
mod dto;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod session;
pub mod validate;

pub use context::AuthContext;
pub use dto::PublicUser;

pub fn router() -> Router<AppState> {
    handlers::router()
}
