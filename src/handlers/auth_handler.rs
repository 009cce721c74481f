use axum::{extract::State, response::IntoResponse};

use crate::config::AppState;
use crate::models::auth_model::LoginRequest;
use crate::services::user_service::UserService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> impl IntoResponse {
    match UserService::login(&state.db, &state.config, payload).await {
        Ok(res) => ResponseBuilder::success("LOGIN_SUCCESS", "Login successful", res).into_response(),
        Err(e) => e.into_response(),
    }
}
