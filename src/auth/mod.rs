use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod session;
pub mod store;

pub use repo_types::User;

pub fn router(security_enabled: bool) -> Router<AppState> {
    handlers::auth_routes(security_enabled)
}

pub fn protected_router() -> Router<AppState> {
    handlers::login_user_routes()
}
