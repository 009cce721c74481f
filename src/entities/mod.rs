pub mod favorite_recipe;
pub mod follow_user;
pub mod ingredient;
pub mod ingredient_amount;
pub mod recipe;
pub mod recipe_tag;
pub mod shopping_recipe;
pub mod tag;
pub mod user;
