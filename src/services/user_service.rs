use std::collections::HashMap;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::config::Config;
use crate::entities::{follow_user, recipe, user};
use crate::error::AppError;
use crate::models::auth_model::{CurrentUser, LoginRequest, LoginResponse, SetPasswordRequest};
use crate::models::pagination_model::{Page, PaginationMeta};
use crate::models::recipe_model::RecipeShortResponse;
use crate::models::user_model::*;
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::services::relation_service::{RelationService, ViewerContext};
use crate::utils::api_response::ValidationErrorDetail;
use crate::utils::jwt_utils::JwtUtils;

pub struct UserService;

impl UserService {
    pub async fn register(db: &DatabaseConnection, payload: RegisterRequest) -> Result<user::Model, AppError> {
        let email = payload.email.trim().to_lowercase();
        let username = payload.username.trim().to_string();

        let duplicates = UserRepository::find_duplicates(db, &username, &email).await?;
        if !duplicates.is_empty() {
            return Err(Self::duplicate_error(&duplicates, &username, &email));
        }

        let password_hash = Self::hash_password(&payload.password)?;

        let created = UserRepository::create(
            db,
            NewUser {
                email,
                username,
                first_name: payload.first_name.trim().to_string(),
                last_name: payload.last_name.trim().to_string(),
                password_hash,
                is_staff: false,
            },
        )
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::field("username", "unique", "A user with this email or username already exists")
            }
            _ => AppError::Database(e),
        })?;

        tracing::info!("User registered: {} ({})", created.username, created.id);
        Ok(created)
    }

    pub async fn login(db: &DatabaseConnection, cfg: &Config, payload: LoginRequest) -> Result<LoginResponse, AppError> {
        let email = payload.email.trim().to_lowercase();

        let found = UserRepository::find_by_email(db, &email).await?;
        let Some(found) = found else {
            return Err(Self::invalid_credentials());
        };

        if !Self::verify_password(&payload.password, &found.password_hash)? {
            tracing::warn!("Failed login for user {}", found.id);
            return Err(Self::invalid_credentials());
        }

        let (auth_token, token_expires_at) = JwtUtils::generate_jwt(cfg, found.id)
            .map_err(|e| AppError::Internal("JWT_ERR", format!("Token generation failed: {}", e)))?;

        tracing::info!("User logged in: {}", found.id);
        Ok(LoginResponse {
            auth_token,
            token_expires_at,
            type_: "Bearer".to_string(),
        })
    }

    pub async fn set_password(
        db: &DatabaseConnection,
        actor: &CurrentUser,
        payload: SetPasswordRequest,
    ) -> Result<(), AppError> {
        let found = Self::find(db, actor.id).await?;

        if !Self::verify_password(&payload.current_password, &found.password_hash)? {
            return Err(AppError::field(
                "current_password",
                "invalid",
                "Current password is incorrect",
            ));
        }

        let mut active: user::ActiveModel = found.into();
        active.password_hash = Set(Self::hash_password(&payload.new_password)?);
        active.update(db).await?;

        tracing::info!("Password changed for user {}", actor.id);
        Ok(())
    }

    pub async fn me(db: &DatabaseConnection, actor: &CurrentUser) -> Result<UserResponse, AppError> {
        let found = Self::find(db, actor.id).await?;
        Ok(UserResponse::from_model(found, false))
    }

    pub async fn get_user(db: &DatabaseConnection, viewer_id: Option<i64>, user_id: i64) -> Result<UserResponse, AppError> {
        let found = Self::find(db, user_id).await?;
        let is_subscribed = match viewer_id {
            Some(viewer) => RelationService::exists::<follow_user::Entity, _>(db, viewer, user_id).await?,
            None => false,
        };
        Ok(UserResponse::from_model(found, is_subscribed))
    }

    pub async fn list_users(
        db: &DatabaseConnection,
        cfg: &Config,
        viewer_id: Option<i64>,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Page<UserResponse>, AppError> {
        let (page, limit) = cfg.page_window(page, limit)?;

        let paginator = user::Entity::find().order_by_asc(user::Column::Id).paginate(db, limit);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        let ctx = ViewerContext::load(db, viewer_id).await?;
        let data = rows
            .into_iter()
            .map(|u| {
                let subscribed = ctx.is_subscribed(u.id);
                UserResponse::from_model(u, subscribed)
            })
            .collect();

        Ok(Page {
            data,
            meta: PaginationMeta::new(total, page, limit),
        })
    }

    /// Authors followed by `actor`, each with a preview of their newest recipes.
    pub async fn subscriptions(
        db: &DatabaseConnection,
        cfg: &Config,
        actor: &CurrentUser,
        params: SubscriptionParams,
    ) -> Result<Page<SubscriptionResponse>, AppError> {
        let (page, limit) = cfg.page_window(params.page, params.limit)?;
        let recipes_limit = cfg.recipes_preview_limit(params.recipes_limit);

        let paginator = user::Entity::find()
            .join_rev(JoinType::InnerJoin, follow_user::Relation::Author.def())
            .filter(follow_user::Column::UserId.eq(actor.id))
            .order_by_asc(user::Column::Id)
            .paginate(db, limit);
        let total = paginator.num_items().await?;
        let authors = paginator.fetch_page(page - 1).await?;

        let data = Self::to_subscriptions(db, authors, recipes_limit).await?;

        Ok(Page {
            data,
            meta: PaginationMeta::new(total, page, limit),
        })
    }

    pub async fn subscribe(
        db: &DatabaseConnection,
        cfg: &Config,
        actor: &CurrentUser,
        author_id: i64,
        recipes_limit: Option<u64>,
    ) -> Result<SubscriptionResponse, AppError> {
        let author = Self::find(db, author_id).await?;
        if author.id == actor.id {
            return Err(AppError::BadRequest("SELF_FOLLOW", "You cannot subscribe to yourself".to_string()));
        }

        RelationService::add::<follow_user::Entity>(db, actor.id, author_id).await?;

        let limit = cfg.recipes_preview_limit(recipes_limit);
        let mut views = Self::to_subscriptions(db, vec![author], limit).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("SUBSCRIPTION_MAPPING", "Subscription view missing".to_string()))
    }

    pub async fn unsubscribe(db: &DatabaseConnection, actor: &CurrentUser, author_id: i64) -> Result<(), AppError> {
        Self::find(db, author_id).await?;
        RelationService::remove::<follow_user::Entity>(db, actor.id, author_id).await
    }

    pub async fn find(db: &DatabaseConnection, user_id: i64) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("USER_NOT_FOUND", "User not found".to_string()))
    }

    /// Builds subscription views; every author listed is followed by the caller.
    async fn to_subscriptions(
        db: &DatabaseConnection,
        authors: Vec<user::Model>,
        recipes_limit: u64,
    ) -> Result<Vec<SubscriptionResponse>, AppError> {
        let author_ids: Vec<i64> = authors.iter().map(|a| a.id).collect();

        let counts: HashMap<i64, i64> = recipe::Entity::find()
            .select_only()
            .column(recipe::Column::AuthorId)
            .column_as(Expr::col(recipe::Column::Id).count(), "recipes_count")
            .filter(recipe::Column::AuthorId.is_in(author_ids))
            .group_by(recipe::Column::AuthorId)
            .into_tuple::<(i64, i64)>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let mut views = Vec::with_capacity(authors.len());
        for author in authors {
            let recipes: Vec<RecipeShortResponse> = recipe::Entity::find()
                .filter(recipe::Column::AuthorId.eq(author.id))
                .order_by_desc(recipe::Column::CreatedAt)
                .order_by_desc(recipe::Column::Id)
                .limit(recipes_limit)
                .all(db)
                .await?
                .into_iter()
                .map(RecipeShortResponse::from)
                .collect();

            let recipes_count = counts.get(&author.id).copied().unwrap_or(0) as u64;
            views.push(SubscriptionResponse {
                user: UserResponse::from_model(author, true),
                recipes,
                recipes_count,
            });
        }
        Ok(views)
    }

    fn duplicate_error(duplicates: &[user::Model], username: &str, email: &str) -> AppError {
        let mut details = Vec::new();
        if duplicates.iter().any(|u| u.email == email) {
            details.push(ValidationErrorDetail {
                field: "email".to_string(),
                title: "unique".to_string(),
                message: "A user with this email already exists".to_string(),
            });
        }
        if duplicates.iter().any(|u| u.username == username) {
            details.push(ValidationErrorDetail {
                field: "username".to_string(),
                title: "unique".to_string(),
                message: "A user with this username already exists".to_string(),
            });
        }
        AppError::Validation(details)
    }

    fn invalid_credentials() -> AppError {
        AppError::BadRequest("AUTH_FAILED", "Unable to log in with the provided credentials".to_string())
    }

    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal("HASH_ERR", format!("Failed to hash password: {}", e)))
    }

    fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal("HASH_ERR", format!("Stored hash is malformed: {}", e)))?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }
}
