use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod dto;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod memory_repo;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod status;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::rpc_routes())
}
