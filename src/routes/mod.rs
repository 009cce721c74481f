use axum::http::Method;
use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppState;
use crate::handlers::health_check_handler;
use crate::middleware::auth_middleware::identify_user;

pub mod auth_route;
pub mod ingredient_route;
pub mod recipe_route;
pub mod tag_route;
pub mod user_route;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/auth", auth_route::auth_routes())
        .nest("/api/users", user_route::user_routes())
        .nest("/api/tags", tag_route::tag_routes())
        .nest("/api/ingredients", ingredient_route::ingredient_routes())
        .nest("/api/recipes", recipe_route::recipe_routes())
        .route("/api/health", get(health_check_handler))
        // Every route sees the caller identity; handlers decide whether it is required.
        .layer(middleware::from_fn_with_state(state, identify_user))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
