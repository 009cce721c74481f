use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::config::AppState;
use crate::models::auth_model::SetPasswordRequest;
use crate::models::pagination_model::PageParams;
use crate::models::user_model::{RegisterRequest, RegisterResponse, SubscriptionParams};
use crate::services::user_service::UserService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::auth_extractor::{AuthUser, MaybeUser};
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> impl IntoResponse {
    match UserService::register(&state.db, payload).await {
        Ok(user) => ResponseBuilder::created(
            "REGISTER_SUCCESS",
            "User registered successfully",
            RegisterResponse::from(user),
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    let viewer_id = viewer.map(|u| u.id);
    match UserService::list_users(&state.db, &state.config, viewer_id, params.page, params.limit).await {
        Ok(res) => ResponseBuilder::success("USERS_FETCHED", "Success", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn me_handler(State(state): State<AppState>, AuthUser(user): AuthUser) -> impl IntoResponse {
    match UserService::me(&state.db, &user).await {
        Ok(res) => ResponseBuilder::success("PROFILE_FETCHED", "Success", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match UserService::get_user(&state.db, Some(user.id), id).await {
        Ok(res) => ResponseBuilder::success("USER_FETCHED", "Success", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn set_password_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<SetPasswordRequest>,
) -> impl IntoResponse {
    match UserService::set_password(&state.db, &user, payload).await {
        Ok(()) => ResponseBuilder::no_content(),
        Err(e) => e.into_response(),
    }
}

pub async fn subscriptions_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<SubscriptionParams>,
) -> impl IntoResponse {
    match UserService::subscriptions(&state.db, &state.config, &user, params).await {
        Ok(res) => ResponseBuilder::success("SUBSCRIPTIONS_FETCHED", "Success", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn subscribe_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Query(params): Query<SubscriptionParams>,
) -> impl IntoResponse {
    match UserService::subscribe(&state.db, &state.config, &user, id, params.recipes_limit).await {
        Ok(res) => ResponseBuilder::success("SUBSCRIBED", "Subscribed to author", res).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn unsubscribe_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match UserService::unsubscribe(&state.db, &user, id).await {
        Ok(()) => ResponseBuilder::no_content(),
        Err(e) => e.into_response(),
    }
}
