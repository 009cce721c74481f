use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::config::AppState;
use crate::models::catalog_model::{CreateIngredientRequest, IngredientSearchParams};
use crate::services::ingredient_service::IngredientService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::auth_extractor::AuthUser;
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn search_ingredients_handler(
    State(state): State<AppState>,
    Query(params): Query<IngredientSearchParams>,
) -> impl IntoResponse {
    match IngredientService::search(&state.db, params.name.as_deref()).await {
        Ok(res) => ResponseBuilder::success("INGREDIENTS_FETCHED", "Success", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_ingredient_handler(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match IngredientService::get(&state.db, id).await {
        Ok(res) => ResponseBuilder::success("INGREDIENT_FETCHED", "Success", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_ingredient_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateIngredientRequest>,
) -> impl IntoResponse {
    match IngredientService::create(&state.db, &user, payload).await {
        Ok(res) => ResponseBuilder::created("INGREDIENT_CREATED", "Ingredient created", res).into_response(),
        Err(e) => e.into_response(),
    }
}
