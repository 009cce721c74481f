use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{ingredient, tag};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<tag::Model> for TagResponse {
    fn from(t: tag::Model) -> Self {
        TagResponse {
            id: t.id,
            name: t.name,
            color: t.color,
            slug: t.slug,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct CreateTagRequest {
    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    #[validate(length(max = 200, message = "Tag name is limited to 200 characters"))]
    pub name: String,

    #[serde(default = "default_color")]
    #[validate(custom(function = "crate::utils::validator_utils::validate_hex_color"))]
    pub color: String,

    #[validate(length(min = 1, max = 200, message = "Slug must be 1-200 characters"))]
    pub slug: Option<String>,
}

fn default_color() -> String {
    "#888888".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl From<ingredient::Model> for IngredientResponse {
    fn from(i: ingredient::Model) -> Self {
        IngredientResponse {
            id: i.id,
            name: i.name,
            measurement_unit: i.measurement_unit,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct CreateIngredientRequest {
    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    #[validate(length(max = 200, message = "Ingredient name is limited to 200 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "crate::utils::validator_utils::validate_required"))]
    #[validate(length(max = 200, message = "Measurement unit is limited to 200 characters"))]
    pub measurement_unit: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct IngredientSearchParams {
    pub name: Option<String>,
}
