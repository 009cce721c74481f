use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::*;

use crate::entities::ingredient;
use crate::error::AppError;
use crate::models::auth_model::CurrentUser;
use crate::models::catalog_model::{CreateIngredientRequest, IngredientResponse};

pub struct IngredientService;

impl IngredientService {
    /// Typeahead over ingredient names.
    ///
    /// Matches are case-insensitive substrings; earlier matches rank first,
    /// then name, then id. Without a term every ingredient is returned by name.
    pub async fn search(db: &DatabaseConnection, name: Option<&str>) -> Result<Vec<IngredientResponse>, AppError> {
        let term = name.map(str::trim).filter(|t| !t.is_empty()).map(str::to_lowercase);

        let Some(needle) = term else {
            let all = ingredient::Entity::find()
                .order_by_asc(ingredient::Column::Name)
                .order_by_asc(ingredient::Column::Id)
                .all(db)
                .await?;
            return Ok(all.into_iter().map(IngredientResponse::from).collect());
        };

        // SQLite's LOWER() folds ASCII only, so there the whole table is matched here.
        let mut query = ingredient::Entity::find();
        if db.get_database_backend() != DbBackend::Sqlite {
            let pattern = format!("%{}%", escape_like(&needle));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((ingredient::Entity, ingredient::Column::Name))))
                    .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
            );
        }
        let mut found = query.all(db).await?;

        found.retain(|i| i.name.to_lowercase().contains(&needle));
        found.sort_by_cached_key(|i| {
            let lower = i.name.to_lowercase();
            (match_position(&lower, &needle), lower, i.id)
        });

        Ok(found.into_iter().map(IngredientResponse::from).collect())
    }

    pub async fn get(db: &DatabaseConnection, id: i64) -> Result<IngredientResponse, AppError> {
        ingredient::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(IngredientResponse::from)
            .ok_or_else(|| AppError::NotFound("INGREDIENT_NOT_FOUND", "Ingredient not found".to_string()))
    }

    pub async fn create(
        db: &DatabaseConnection,
        actor: &CurrentUser,
        payload: CreateIngredientRequest,
    ) -> Result<IngredientResponse, AppError> {
        if !actor.is_staff {
            return Err(AppError::Forbidden(
                "ACCESS_DENIED",
                "Only staff can manage ingredients".to_string(),
            ));
        }

        let saved = ingredient::ActiveModel {
            id: NotSet,
            name: Set(payload.name.trim().to_string()),
            measurement_unit: Set(payload.measurement_unit.trim().to_string()),
        }
        .insert(db)
        .await?;

        tracing::info!("Ingredient created: {} ({})", saved.name, saved.id);
        Ok(saved.into())
    }
}

/// Character offset of the first occurrence of `needle` in `haystack`.
fn match_position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .map(|byte| haystack[..byte].chars().count())
        .unwrap_or(usize::MAX)
}

const LIKE_ESCAPE: char = '!';

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}
