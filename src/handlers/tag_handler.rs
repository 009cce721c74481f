use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::config::AppState;
use crate::models::catalog_model::CreateTagRequest;
use crate::services::tag_service::TagService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::auth_extractor::AuthUser;
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn list_tags_handler(State(state): State<AppState>) -> impl IntoResponse {
    match TagService::list(&state.db).await {
        Ok(res) => ResponseBuilder::success("TAGS_FETCHED", "Success", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_tag_handler(State(state): State<AppState>, Path(slug): Path<String>) -> impl IntoResponse {
    match TagService::get_by_slug(&state.db, &slug).await {
        Ok(res) => ResponseBuilder::success("TAG_FETCHED", "Success", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_tag_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTagRequest>,
) -> impl IntoResponse {
    match TagService::create(&state.db, &user, payload).await {
        Ok(res) => ResponseBuilder::created("TAG_CREATED", "Tag created successfully", res).into_response(),
        Err(e) => e.into_response(),
    }
}
