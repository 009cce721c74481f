use axum::{routing::get, Router};

use crate::config::AppState;
use crate::handlers::ingredient_handler::*;

pub fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_ingredients_handler).post(create_ingredient_handler))
        .route("/{id}", get(get_ingredient_handler))
}
