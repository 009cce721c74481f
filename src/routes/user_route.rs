use axum::{
    routing::{get, post},
    Router,
};

use crate::config::AppState;
use crate::handlers::user_handler::*;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users_handler).post(register_handler))
        .route("/me", get(me_handler))
        .route("/set_password", post(set_password_handler))
        .route("/subscriptions", get(subscriptions_handler))
        .route("/{id}", get(get_user_handler))
        .route("/{id}/subscribe", get(subscribe_handler).delete(unsubscribe_handler))
}
