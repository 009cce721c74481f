pub mod config;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod seeders;
pub mod services;
pub mod utils;

use axum::Router;

use crate::config::AppState;

/// The full HTTP application with its state attached.
pub fn app(state: AppState) -> Router {
    routes::create_routes(state.clone()).with_state(state)
}
