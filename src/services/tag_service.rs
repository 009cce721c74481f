use sea_orm::*;
use slug::slugify;

use crate::entities::tag;
use crate::error::AppError;
use crate::models::auth_model::CurrentUser;
use crate::models::catalog_model::{CreateTagRequest, TagResponse};

pub struct TagService;

impl TagService {
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<TagResponse>, AppError> {
        let tags = tag::Entity::find().order_by_asc(tag::Column::Id).all(db).await?;
        Ok(tags.into_iter().map(TagResponse::from).collect())
    }

    pub async fn get_by_slug(db: &DatabaseConnection, slug: &str) -> Result<TagResponse, AppError> {
        tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(db)
            .await?
            .map(TagResponse::from)
            .ok_or_else(|| AppError::NotFound("TAG_NOT_FOUND", "Tag not found".to_string()))
    }

    pub async fn create(
        db: &DatabaseConnection,
        actor: &CurrentUser,
        payload: CreateTagRequest,
    ) -> Result<TagResponse, AppError> {
        if !actor.is_staff {
            return Err(AppError::Forbidden("ACCESS_DENIED", "Only staff can manage tags".to_string()));
        }

        let slug = match payload.slug {
            Some(s) => slugify(s),
            None => slugify(&payload.name),
        };
        if slug.is_empty() {
            return Err(AppError::field("slug", "invalid", "Slug cannot be derived from the name"));
        }

        let taken = tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug.as_str()))
            .count(db)
            .await?;
        if taken > 0 {
            return Err(AppError::field("slug", "unique", "A tag with this slug already exists"));
        }

        let saved = tag::ActiveModel {
            id: NotSet,
            name: Set(payload.name.trim().to_string()),
            color: Set(payload.color.to_uppercase()),
            slug: Set(slug),
        }
        .insert(db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::field("slug", "unique", "A tag with this slug already exists")
            }
            _ => AppError::Database(e),
        })?;

        tracing::info!("Tag created: {} ({})", saved.slug, saved.id);
        Ok(saved.into())
    }
}
