use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::recipe;
use crate::models::catalog_model::TagResponse;
use crate::models::user_model::UserResponse;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngredientAmountRequest {
    pub id: i64,
    #[validate(range(min = 1, max = 32767, message = "Amount must be between 1 and 32767"))]
    pub amount: i32,
}

/// Body of `POST /recipes` and `PUT /recipes/{id}`. Ingredients and tags
/// replace the existing sets wholesale.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "At least one ingredient is required"), nested)]
    pub ingredients: Vec<IngredientAmountRequest>,

    #[serde(default)]
    pub tags: Vec<i64>, // Tag IDs

    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    pub image: String,

    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    #[validate(length(max = 200, message = "Name is limited to 200 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    #[validate(length(max = 1000, message = "Text is limited to 1000 characters"))]
    pub text: String,

    #[serde(default)]
    #[validate(range(min = 1, max = 32767, message = "Cooking time must be between 1 and 32767 minutes"))]
    pub cooking_time: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub tags: Vec<TagResponse>,
    pub author: Option<UserResponse>,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeShortResponse {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<recipe::Model> for RecipeShortResponse {
    fn from(r: recipe::Model) -> Self {
        RecipeShortResponse {
            id: r.id,
            name: r.name,
            image: r.image,
            cooking_time: r.cooking_time,
        }
    }
}
