use axum::{routing::post, Router};

use crate::config::AppState;
use crate::handlers::auth_handler::login_handler;

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/token/login", post(login_handler))
}
