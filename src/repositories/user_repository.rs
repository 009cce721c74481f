use chrono::Utc;
use sea_orm::*;

use crate::entities::{user, user::Entity as User};

pub struct UserRepository;

/// Fields of a new account; the password is already hashed.
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_staff: bool,
}

impl UserRepository {
    pub async fn find_by_email<C>(db: &C, email: &str) -> Result<Option<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        User::find().filter(user::Column::Email.eq(email)).one(db).await
    }

    // Returns every clash so the caller can report each field
    pub async fn find_duplicates<C>(db: &C, username: &str, email: &str) -> Result<Vec<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .all(db)
            .await
    }

    pub async fn create<C>(db: &C, new_user: NewUser) -> Result<user::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        user::ActiveModel {
            id: NotSet,
            email: Set(new_user.email),
            username: Set(new_user.username),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            password_hash: Set(new_user.password_hash),
            is_staff: Set(new_user.is_staff),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
    }
}
