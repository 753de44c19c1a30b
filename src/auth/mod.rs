mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;

pub use jwt::AuthUser;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::profile_routes())
}
