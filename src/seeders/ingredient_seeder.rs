use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait};
use serde::Deserialize;

use crate::entities::ingredient;
use crate::seeders::SeedError;

#[derive(Debug, Deserialize)]
pub struct IngredientFixture {
    pub name: String,
    pub measurement_unit: String,
}

const BATCH: usize = 500;

pub async fn seed_ingredients_from_file(db: &DatabaseConnection, path: &str) -> Result<(), SeedError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SeedError::Fixture(path.to_string(), e))?;
    let fixtures: Vec<IngredientFixture> = serde_json::from_str(&raw)?;
    seed_ingredients(db, fixtures).await
}

/// Loads the catalog once; a non-empty ingredients table is left alone.
pub async fn seed_ingredients(db: &DatabaseConnection, fixtures: Vec<IngredientFixture>) -> Result<(), SeedError> {
    if ingredient::Entity::find().count(db).await? > 0 {
        tracing::info!("Ingredients already present, skipping fixture");
        return Ok(());
    }

    let total = fixtures.len();
    let mut rows = fixtures
        .into_iter()
        .filter(|f| !f.name.trim().is_empty())
        .map(|f| ingredient::ActiveModel {
            id: NotSet,
            name: Set(f.name.trim().to_string()),
            measurement_unit: Set(f.measurement_unit.trim().to_string()),
        })
        .peekable();

    while rows.peek().is_some() {
        let batch: Vec<_> = rows.by_ref().take(BATCH).collect();
        ingredient::Entity::insert_many(batch).exec_without_returning(db).await?;
    }

    tracing::info!("Seeded {} ingredients", total);
    Ok(())
}
