use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::config::AppState;
use crate::entities::{favorite_recipe, shopping_recipe};
use crate::error::AppError;
use crate::models::recipe_model::RecipeRequest;
use crate::services::recipe_filter::RecipeFilter;
use crate::services::recipe_service::RecipeService;
use crate::services::shopping_list_service::ShoppingListService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::auth_extractor::{AuthUser, MaybeUser};
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn list_recipes_handler(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let filter = match RecipeFilter::from_query(&pairs) {
        Ok(f) => f,
        Err(e) => return e.into_response(),
    };

    let viewer_id = viewer.map(|u| u.id);
    match RecipeService::list(&state.db, &state.config, &filter, viewer_id).await {
        Ok(res) => ResponseBuilder::success("RECIPES_FETCHED", "Success", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_recipe_handler(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RecipeService::get(&state.db, id, viewer.map(|u| u.id)).await {
        Ok(res) => ResponseBuilder::success("RECIPE_FETCHED", "Success", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_recipe_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<RecipeRequest>,
) -> impl IntoResponse {
    match RecipeService::create(&state.db, &user, payload).await {
        Ok(res) => ResponseBuilder::created("RECIPE_CREATED", "Recipe created", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_recipe_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RecipeRequest>,
) -> impl IntoResponse {
    match RecipeService::update(&state.db, &user, id, payload).await {
        Ok(res) => ResponseBuilder::success("RECIPE_UPDATED", "Recipe updated", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_recipe_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RecipeService::delete(&state.db, &user, id).await {
        Ok(()) => ResponseBuilder::no_content(),
        Err(e) => e.into_response(),
    }
}

pub async fn add_favorite_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RecipeService::add_relation::<favorite_recipe::Entity>(&state.db, user.id, id).await {
        Ok(res) => ResponseBuilder::success("FAVORITE_ADDED", "Recipe added to favorites", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RecipeService::remove_relation::<favorite_recipe::Entity>(&state.db, user.id, id).await {
        Ok(()) => ResponseBuilder::no_content(),
        Err(e) => e.into_response(),
    }
}

pub async fn add_to_cart_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RecipeService::add_relation::<shopping_recipe::Entity>(&state.db, user.id, id).await {
        Ok(res) => ResponseBuilder::success("CART_ADDED", "Recipe added to shopping cart", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn remove_from_cart_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RecipeService::remove_relation::<shopping_recipe::Entity>(&state.db, user.id, id).await {
        Ok(()) => ResponseBuilder::no_content(),
        Err(e) => e.into_response(),
    }
}

pub async fn download_shopping_cart_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> impl IntoResponse {
    match ShoppingListService::export(&state.db, user.id).await {
        Ok(body) => ResponseBuilder::attachment("shopping_list.txt", body),
        Err(e) => AppError::from(e).into_response(),
    }
}
