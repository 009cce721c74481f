use std::collections::HashSet;

use chrono::Utc;
use sea_orm::*;

use crate::entities::{favorite_recipe, follow_user, shopping_recipe};
use crate::error::AppError;

/// A join table holding unique `(subject, object)` pairs that are only ever
/// inserted or deleted, never updated.
pub trait TogglePair: EntityTrait {
    /// Error code reported when the pair already exists.
    const ALREADY_EXISTS: &'static str;
    /// Error code reported when removing a pair that does not exist.
    const NOT_FOUND: &'static str;
    const ALREADY_EXISTS_MSG: &'static str;
    const NOT_FOUND_MSG: &'static str;

    fn subject_column() -> Self::Column;
    fn object_column() -> Self::Column;
    fn new_pair(subject_id: i64, object_id: i64) -> Self::ActiveModel;
}

impl TogglePair for favorite_recipe::Entity {
    const ALREADY_EXISTS: &'static str = "ALREADY_FAVORITED";
    const NOT_FOUND: &'static str = "NOT_FAVORITED";
    const ALREADY_EXISTS_MSG: &'static str = "Recipe is already in favorites";
    const NOT_FOUND_MSG: &'static str = "Recipe is not in favorites";

    fn subject_column() -> Self::Column {
        favorite_recipe::Column::UserId
    }
    fn object_column() -> Self::Column {
        favorite_recipe::Column::RecipeId
    }
    fn new_pair(subject_id: i64, object_id: i64) -> Self::ActiveModel {
        favorite_recipe::ActiveModel {
            user_id: Set(subject_id),
            recipe_id: Set(object_id),
            created_at: Set(Utc::now()),
        }
    }
}

impl TogglePair for shopping_recipe::Entity {
    const ALREADY_EXISTS: &'static str = "ALREADY_IN_CART";
    const NOT_FOUND: &'static str = "NOT_IN_CART";
    const ALREADY_EXISTS_MSG: &'static str = "Recipe is already in the shopping cart";
    const NOT_FOUND_MSG: &'static str = "Recipe is not in the shopping cart";

    fn subject_column() -> Self::Column {
        shopping_recipe::Column::UserId
    }
    fn object_column() -> Self::Column {
        shopping_recipe::Column::RecipeId
    }
    fn new_pair(subject_id: i64, object_id: i64) -> Self::ActiveModel {
        shopping_recipe::ActiveModel {
            user_id: Set(subject_id),
            recipe_id: Set(object_id),
            created_at: Set(Utc::now()),
        }
    }
}

impl TogglePair for follow_user::Entity {
    const ALREADY_EXISTS: &'static str = "ALREADY_SUBSCRIBED";
    const NOT_FOUND: &'static str = "NOT_SUBSCRIBED";
    const ALREADY_EXISTS_MSG: &'static str = "You are already subscribed to this author";
    const NOT_FOUND_MSG: &'static str = "You are not subscribed to this author";

    fn subject_column() -> Self::Column {
        follow_user::Column::UserId
    }
    fn object_column() -> Self::Column {
        follow_user::Column::AuthorId
    }
    fn new_pair(subject_id: i64, object_id: i64) -> Self::ActiveModel {
        follow_user::ActiveModel {
            user_id: Set(subject_id),
            author_id: Set(object_id),
            created_at: Set(Utc::now()),
        }
    }
}

pub struct RelationService;

impl RelationService {
    pub async fn exists<E, C>(db: &C, subject_id: i64, object_id: i64) -> Result<bool, DbErr>
    where
        E: TogglePair,
        C: ConnectionTrait,
    {
        let found = E::find()
            .filter(E::subject_column().eq(subject_id))
            .filter(E::object_column().eq(object_id))
            .one(db)
            .await?;
        Ok(found.is_some())
    }

    /// Inserts the pair, failing with a relation error if it is already there.
    pub async fn add<E>(db: &DatabaseConnection, subject_id: i64, object_id: i64) -> Result<(), AppError>
    where
        E: TogglePair,
        E::Model: IntoActiveModel<E::ActiveModel>,
    {
        let txn = db.begin().await?;

        if Self::exists::<E, _>(&txn, subject_id, object_id).await? {
            return Err(AppError::Relation(E::ALREADY_EXISTS, E::ALREADY_EXISTS_MSG.to_string()));
        }

        // A concurrent add that slipped past the check trips the primary key.
        E::insert(E::new_pair(subject_id, object_id))
            .exec_without_returning(&txn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Relation(E::ALREADY_EXISTS, E::ALREADY_EXISTS_MSG.to_string())
                }
                _ => AppError::Database(e),
            })?;

        txn.commit().await?;

        tracing::info!(
            "Relation {} added: {} -> {}",
            E::default().table_name(),
            subject_id,
            object_id
        );
        Ok(())
    }

    /// Deletes the pair, failing with a relation error if it does not exist.
    pub async fn remove<E>(db: &DatabaseConnection, subject_id: i64, object_id: i64) -> Result<(), AppError>
    where
        E: TogglePair,
    {
        let res = E::delete_many()
            .filter(E::subject_column().eq(subject_id))
            .filter(E::object_column().eq(object_id))
            .exec(db)
            .await?;

        if res.rows_affected == 0 {
            return Err(AppError::Relation(E::NOT_FOUND, E::NOT_FOUND_MSG.to_string()));
        }

        tracing::info!(
            "Relation {} removed: {} -> {}",
            E::default().table_name(),
            subject_id,
            object_id
        );
        Ok(())
    }

    /// Object ids paired with `subject_id`.
    pub async fn objects_of<E, C>(db: &C, subject_id: i64) -> Result<HashSet<i64>, DbErr>
    where
        E: TogglePair,
        C: ConnectionTrait,
    {
        let ids: Vec<i64> = E::find()
            .select_only()
            .column(E::object_column())
            .filter(E::subject_column().eq(subject_id))
            .into_tuple()
            .all(db)
            .await?;
        Ok(ids.into_iter().collect())
    }
}

/// Per-request lookup sets behind the `is_favorited`, `is_in_shopping_cart`
/// and `is_subscribed` flags.
#[derive(Debug, Clone, Default)]
pub struct ViewerContext {
    pub favorites: HashSet<i64>,
    pub shopping_cart: HashSet<i64>,
    pub following: HashSet<i64>,
}

impl ViewerContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub async fn load<C>(db: &C, viewer_id: Option<i64>) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let Some(uid) = viewer_id else {
            return Ok(Self::anonymous());
        };

        Ok(Self {
            favorites: RelationService::objects_of::<favorite_recipe::Entity, _>(db, uid).await?,
            shopping_cart: RelationService::objects_of::<shopping_recipe::Entity, _>(db, uid).await?,
            following: RelationService::objects_of::<follow_user::Entity, _>(db, uid).await?,
        })
    }

    pub fn is_favorited(&self, recipe_id: i64) -> bool {
        self.favorites.contains(&recipe_id)
    }

    pub fn is_in_shopping_cart(&self, recipe_id: i64) -> bool {
        self.shopping_cart.contains(&recipe_id)
    }

    pub fn is_subscribed(&self, author_id: i64) -> bool {
        self.following.contains(&author_id)
    }
}
