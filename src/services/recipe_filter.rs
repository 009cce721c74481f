use sea_orm::sea_query::{Expr, Query};
use sea_orm::*;

use crate::config::AnonymousFilterPolicy;
use crate::entities::{favorite_recipe, recipe, recipe_tag, shopping_recipe, tag};
use crate::error::AppError;

/// Criteria accepted by the recipe listing.
///
/// Criteria combine with AND; the tag slugs among themselves combine with OR.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub author_id: Option<i64>,
    pub tag_slugs: Vec<String>,
    pub favorited_only: bool,
    pub in_cart_only: bool,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl RecipeFilter {
    /// Builds the filter from raw query pairs; `tags` may repeat.
    pub fn from_query(pairs: &[(String, String)]) -> Result<Self, AppError> {
        let mut filter = RecipeFilter::default();

        for (key, value) in pairs {
            match key.as_str() {
                "author" => {
                    let id = value
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| AppError::field("author", "invalid", "Author must be a user id"))?;
                    filter.author_id = Some(id);
                }
                "tags" => {
                    let slug = value.trim();
                    if !slug.is_empty() && !filter.tag_slugs.iter().any(|s| s == slug) {
                        filter.tag_slugs.push(slug.to_string());
                    }
                }
                "is_favorited" => filter.favorited_only = is_flag_on(value),
                "is_in_shopping_cart" => filter.in_cart_only = is_flag_on(value),
                "page" => filter.page = Some(parse_positive("page", value)?),
                "limit" => filter.limit = Some(parse_positive("limit", value)?),
                _ => {}
            }
        }

        Ok(filter)
    }

    /// Narrows `query` to the recipes matching this filter, newest first.
    pub fn apply(
        &self,
        mut query: Select<recipe::Entity>,
        viewer_id: Option<i64>,
        policy: AnonymousFilterPolicy,
    ) -> Result<Select<recipe::Entity>, AppError> {
        if let Some(author_id) = self.author_id {
            query = query.filter(recipe::Column::AuthorId.eq(author_id));
        }

        if !self.tag_slugs.is_empty() {
            query = query.filter(
                recipe::Column::Id.in_subquery(
                    Query::select()
                        .column((recipe_tag::Entity, recipe_tag::Column::RecipeId))
                        .from(recipe_tag::Entity)
                        .inner_join(
                            tag::Entity,
                            Expr::col((tag::Entity, tag::Column::Id))
                                .equals((recipe_tag::Entity, recipe_tag::Column::TagId)),
                        )
                        .and_where(Expr::col((tag::Entity, tag::Column::Slug)).is_in(self.tag_slugs.clone()))
                        .to_owned(),
                ),
            );
        }

        if self.favorited_only {
            if let Some(uid) = Self::viewer_for_relation(viewer_id, policy)? {
                query = query.filter(
                    recipe::Column::Id.in_subquery(
                        Query::select()
                            .column(favorite_recipe::Column::RecipeId)
                            .from(favorite_recipe::Entity)
                            .and_where(favorite_recipe::Column::UserId.eq(uid))
                            .to_owned(),
                    ),
                );
            }
        }

        if self.in_cart_only {
            if let Some(uid) = Self::viewer_for_relation(viewer_id, policy)? {
                query = query.filter(
                    recipe::Column::Id.in_subquery(
                        Query::select()
                            .column(shopping_recipe::Column::RecipeId)
                            .from(shopping_recipe::Entity)
                            .and_where(shopping_recipe::Column::UserId.eq(uid))
                            .to_owned(),
                    ),
                );
            }
        }

        Ok(query
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id))
    }

    fn viewer_for_relation(viewer_id: Option<i64>, policy: AnonymousFilterPolicy) -> Result<Option<i64>, AppError> {
        match (viewer_id, policy) {
            (Some(uid), _) => Ok(Some(uid)),
            (None, AnonymousFilterPolicy::Ignore) => Ok(None),
            (None, AnonymousFilterPolicy::Reject) => Err(AppError::authentication_required()),
        }
    }
}

fn is_flag_on(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true")
}

fn parse_positive(field: &str, value: &str) -> Result<u64, AppError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| AppError::field(field, "invalid", format!("{} must be a positive integer", field)))
}
