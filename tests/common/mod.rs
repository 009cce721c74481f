#![allow(dead_code)]

use foodgram::config::{AnonymousFilterPolicy, AppState, Config};
use foodgram::entities::{ingredient, tag};
use foodgram::models::auth_model::CurrentUser;
use foodgram::models::recipe_model::{IngredientAmountRequest, RecipeRequest, RecipeResponse};
use foodgram::repositories::user_repository::{NewUser, UserRepository};
use foodgram::services::recipe_service::RecipeService;
use foodgram::services::user_service::UserService;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection, NotSet};

pub const PASSWORD: &str = "s3cret-pass";

/// Fresh migrated in-memory database. One connection so every query sees the
/// same memory store.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expires_in: 60,
        page_size: 6,
        max_page_size: 100,
        recipes_limit: 3,
        anonymous_filter_policy: AnonymousFilterPolicy::Ignore,
        run_migrations: true,
        ingredients_fixture: None,
        admin: None,
    }
}

pub async fn test_state() -> AppState {
    AppState {
        db: setup_db().await,
        config: test_config(),
    }
}

pub async fn create_user(db: &DatabaseConnection, username: &str, is_staff: bool) -> CurrentUser {
    let created = UserRepository::create(
        db,
        NewUser {
            email: format!("{}@example.com", username),
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: UserService::hash_password(PASSWORD).unwrap(),
            is_staff,
        },
    )
    .await
    .unwrap();

    CurrentUser {
        id: created.id,
        username: created.username,
        email: created.email,
        is_staff: created.is_staff,
    }
}

pub async fn create_ingredient(db: &DatabaseConnection, name: &str, unit: &str) -> ingredient::Model {
    ingredient::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        measurement_unit: Set(unit.to_string()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn create_tag(db: &DatabaseConnection, name: &str, slug: &str) -> tag::Model {
    tag::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        color: Set("#112233".to_string()),
        slug: Set(slug.to_string()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub fn recipe_request(name: &str, ingredients: &[(i64, i32)], tags: &[i64]) -> RecipeRequest {
    RecipeRequest {
        ingredients: ingredients
            .iter()
            .map(|(id, amount)| IngredientAmountRequest { id: *id, amount: *amount })
            .collect(),
        tags: tags.to_vec(),
        image: "data:image/png;base64,AAAA".to_string(),
        name: name.to_string(),
        text: "Mix and serve.".to_string(),
        cooking_time: 10,
    }
}

pub async fn create_recipe(
    db: &DatabaseConnection,
    author: &CurrentUser,
    name: &str,
    ingredients: &[(i64, i32)],
    tags: &[i64],
) -> RecipeResponse {
    RecipeService::create(db, author, recipe_request(name, ingredients, tags))
        .await
        .unwrap()
}
