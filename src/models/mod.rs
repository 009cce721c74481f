pub mod auth_model;
pub mod catalog_model;
pub mod pagination_model;
pub mod recipe_model;
pub mod user_model;
