use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::*;

use crate::config::Config;
use crate::entities::{ingredient, ingredient_amount, recipe, recipe_tag, tag, user};
use crate::error::AppError;
use crate::models::auth_model::CurrentUser;
use crate::models::catalog_model::TagResponse;
use crate::models::pagination_model::{Page, PaginationMeta};
use crate::models::recipe_model::*;
use crate::models::user_model::UserResponse;
use crate::services::recipe_filter::RecipeFilter;
use crate::services::relation_service::{RelationService, TogglePair, ViewerContext};

pub struct RecipeService;

impl RecipeService {
    pub async fn create(
        db: &DatabaseConnection,
        author: &CurrentUser,
        payload: RecipeRequest,
    ) -> Result<RecipeResponse, AppError> {
        let ingredients = merge_ingredients(&payload.ingredients);
        let tags = dedup_tags(&payload.tags);

        let txn = db.begin().await?;

        Self::ensure_components_exist(&txn, &ingredients, &tags).await?;

        let saved = recipe::ActiveModel {
            id: NotSet,
            author_id: Set(Some(author.id)),
            name: Set(payload.name.trim().to_string()),
            image: Set(payload.image),
            text: Set(payload.text),
            cooking_time: Set(payload.cooking_time),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        Self::write_components(&txn, saved.id, &ingredients, &tags).await?;

        txn.commit().await?;

        tracing::info!("Recipe created: {} by user {}", saved.id, author.id);
        Self::get(db, saved.id, Some(author.id)).await
    }

    /// Replaces the recipe fields and its full ingredient and tag sets.
    pub async fn update(
        db: &DatabaseConnection,
        actor: &CurrentUser,
        recipe_id: i64,
        payload: RecipeRequest,
    ) -> Result<RecipeResponse, AppError> {
        let existing = Self::find(db, recipe_id).await?;
        Self::ensure_can_modify(actor, &existing)?;

        let ingredients = merge_ingredients(&payload.ingredients);
        let tags = dedup_tags(&payload.tags);

        let txn = db.begin().await?;

        Self::ensure_components_exist(&txn, &ingredients, &tags).await?;

        let mut active: recipe::ActiveModel = existing.into();
        active.name = Set(payload.name.trim().to_string());
        active.image = Set(payload.image);
        active.text = Set(payload.text);
        active.cooking_time = Set(payload.cooking_time);
        active.update(&txn).await?;

        ingredient_amount::Entity::delete_many()
            .filter(ingredient_amount::Column::RecipeId.eq(recipe_id))
            .exec(&txn)
            .await?;
        recipe_tag::Entity::delete_many()
            .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
            .exec(&txn)
            .await?;

        Self::write_components(&txn, recipe_id, &ingredients, &tags).await?;

        txn.commit().await?;

        tracing::info!("Recipe updated: {} by user {}", recipe_id, actor.id);
        Self::get(db, recipe_id, Some(actor.id)).await
    }

    pub async fn delete(db: &DatabaseConnection, actor: &CurrentUser, recipe_id: i64) -> Result<(), AppError> {
        let existing = Self::find(db, recipe_id).await?;
        Self::ensure_can_modify(actor, &existing)?;

        // Ingredient amounts, tag links and relation rows cascade.
        recipe::Entity::delete_by_id(recipe_id).exec(db).await?;

        tracing::info!("Recipe deleted: {} by user {}", recipe_id, actor.id);
        Ok(())
    }

    pub async fn get(db: &DatabaseConnection, recipe_id: i64, viewer_id: Option<i64>) -> Result<RecipeResponse, AppError> {
        let found = Self::find(db, recipe_id).await?;
        let ctx = ViewerContext::load(db, viewer_id).await?;

        Self::to_responses(db, vec![found], &ctx)
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("RECIPE_MAPPING", format!("Recipe {} vanished while mapping", recipe_id)))
    }

    pub async fn list(
        db: &DatabaseConnection,
        cfg: &Config,
        filter: &RecipeFilter,
        viewer_id: Option<i64>,
    ) -> Result<Page<RecipeResponse>, AppError> {
        let (page, limit) = cfg.page_window(filter.page, filter.limit)?;

        let query = filter.apply(recipe::Entity::find(), viewer_id, cfg.anonymous_filter_policy)?;

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        let ctx = ViewerContext::load(db, viewer_id).await?;
        let data = Self::to_responses(db, rows, &ctx).await?;

        Ok(Page {
            data,
            meta: PaginationMeta::new(total, page, limit),
        })
    }

    /// Adds `(user, recipe)` to a recipe relation and returns the recipe's short form.
    pub async fn add_relation<E>(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<RecipeShortResponse, AppError>
    where
        E: TogglePair,
        E::Model: IntoActiveModel<E::ActiveModel>,
    {
        let found = Self::find(db, recipe_id).await?;
        RelationService::add::<E>(db, user_id, recipe_id).await?;
        Ok(found.into())
    }

    pub async fn remove_relation<E>(db: &DatabaseConnection, user_id: i64, recipe_id: i64) -> Result<(), AppError>
    where
        E: TogglePair,
    {
        Self::find(db, recipe_id).await?;
        RelationService::remove::<E>(db, user_id, recipe_id).await
    }

    async fn find(db: &DatabaseConnection, recipe_id: i64) -> Result<recipe::Model, AppError> {
        recipe::Entity::find_by_id(recipe_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("RECIPE_NOT_FOUND", "Recipe not found".to_string()))
    }

    fn ensure_can_modify(actor: &CurrentUser, target: &recipe::Model) -> Result<(), AppError> {
        if actor.can_modify(target.author_id) {
            return Ok(());
        }
        tracing::warn!("User {} denied write access to recipe {}", actor.id, target.id);
        Err(AppError::Forbidden(
            "ACCESS_DENIED",
            "You are not the author of this recipe".to_string(),
        ))
    }

    async fn ensure_components_exist<C>(conn: &C, ingredients: &[(i64, i32)], tags: &[i64]) -> Result<(), AppError>
    where
        C: ConnectionTrait,
    {
        let ingredient_ids: Vec<i64> = ingredients.iter().map(|(id, _)| *id).collect();
        let known: HashSet<i64> = ingredient::Entity::find()
            .select_only()
            .column(ingredient::Column::Id)
            .filter(ingredient::Column::Id.is_in(ingredient_ids.clone()))
            .into_tuple::<i64>()
            .all(conn)
            .await?
            .into_iter()
            .collect();
        if let Some(missing) = ingredient_ids.iter().find(|id| !known.contains(id)) {
            return Err(AppError::field(
                "ingredients",
                "not_found",
                format!("Ingredient {} does not exist", missing),
            ));
        }

        if tags.is_empty() {
            return Ok(());
        }
        let known: HashSet<i64> = tag::Entity::find()
            .select_only()
            .column(tag::Column::Id)
            .filter(tag::Column::Id.is_in(tags.to_vec()))
            .into_tuple::<i64>()
            .all(conn)
            .await?
            .into_iter()
            .collect();
        if let Some(missing) = tags.iter().find(|id| !known.contains(id)) {
            return Err(AppError::field("tags", "not_found", format!("Tag {} does not exist", missing)));
        }

        Ok(())
    }

    async fn write_components<C>(conn: &C, recipe_id: i64, ingredients: &[(i64, i32)], tags: &[i64]) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        if !ingredients.is_empty() {
            let rows = ingredients.iter().map(|(ingredient_id, amount)| ingredient_amount::ActiveModel {
                id: NotSet,
                recipe_id: Set(recipe_id),
                ingredient_id: Set(*ingredient_id),
                amount: Set(*amount),
            });
            ingredient_amount::Entity::insert_many(rows)
                .exec_without_returning(conn)
                .await?;
        }

        if !tags.is_empty() {
            let rows = tags.iter().map(|tag_id| recipe_tag::ActiveModel {
                recipe_id: Set(recipe_id),
                tag_id: Set(*tag_id),
            });
            recipe_tag::Entity::insert_many(rows).exec_without_returning(conn).await?;
        }

        Ok(())
    }

    /// Maps recipes to their full read shape with batched lookups for
    /// authors, tags and ingredients.
    pub async fn to_responses<C>(
        db: &C,
        recipes: Vec<recipe::Model>,
        ctx: &ViewerContext,
    ) -> Result<Vec<RecipeResponse>, DbErr>
    where
        C: ConnectionTrait,
    {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }

        let recipe_ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        let author_ids: Vec<i64> = recipes
            .iter()
            .filter_map(|r| r.author_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let authors: HashMap<i64, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut tags_by_recipe: HashMap<i64, Vec<TagResponse>> = HashMap::new();
        let tag_rows = recipe_tag::Entity::find()
            .filter(recipe_tag::Column::RecipeId.is_in(recipe_ids.clone()))
            .find_also_related(tag::Entity)
            .order_by_asc(tag::Column::Id)
            .all(db)
            .await?;
        for (link, t) in tag_rows {
            if let Some(t) = t {
                tags_by_recipe.entry(link.recipe_id).or_default().push(t.into());
            }
        }

        let mut ingredients_by_recipe: HashMap<i64, Vec<RecipeIngredientResponse>> = HashMap::new();
        let amount_rows = ingredient_amount::Entity::find()
            .filter(ingredient_amount::Column::RecipeId.is_in(recipe_ids))
            .find_also_related(ingredient::Entity)
            .order_by_asc(ingredient_amount::Column::Id)
            .all(db)
            .await?;
        for (row, ing) in amount_rows {
            if let Some(ing) = ing {
                ingredients_by_recipe
                    .entry(row.recipe_id)
                    .or_default()
                    .push(RecipeIngredientResponse {
                        id: ing.id,
                        name: ing.name,
                        measurement_unit: ing.measurement_unit,
                        amount: row.amount,
                    });
            }
        }

        Ok(recipes
            .into_iter()
            .map(|r| {
                let author = r
                    .author_id
                    .and_then(|id| authors.get(&id))
                    .map(|u| UserResponse::from_model(u.clone(), ctx.is_subscribed(u.id)));
                RecipeResponse {
                    id: r.id,
                    tags: tags_by_recipe.remove(&r.id).unwrap_or_default(),
                    author,
                    ingredients: ingredients_by_recipe.remove(&r.id).unwrap_or_default(),
                    is_favorited: ctx.is_favorited(r.id),
                    is_in_shopping_cart: ctx.is_in_shopping_cart(r.id),
                    name: r.name,
                    image: r.image,
                    text: r.text,
                    cooking_time: r.cooking_time,
                    created_at: r.created_at,
                }
            })
            .collect())
    }
}

/// Collapses repeated ingredient ids, keeping the first position and the last
/// amount.
fn merge_ingredients(items: &[IngredientAmountRequest]) -> Vec<(i64, i32)> {
    let mut merged: Vec<(i64, i32)> = Vec::with_capacity(items.len());
    let mut index: HashMap<i64, usize> = HashMap::new();
    for item in items {
        match index.get(&item.id) {
            Some(&i) => merged[i].1 = item.amount,
            None => {
                index.insert(item.id, merged.len());
                merged.push((item.id, item.amount));
            }
        }
    }
    merged
}

fn dedup_tags(tags: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    tags.iter().copied().filter(|id| seen.insert(*id)).collect()
}
