pub mod ingredient_seeder;
pub mod tag_seeder;
pub mod user_seeder;

use sea_orm::{DatabaseConnection, DbErr};

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("cannot read ingredient fixture {0}: {1}")]
    Fixture(String, std::io::Error),
    #[error("invalid ingredient fixture: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Account(String),
}

/// Idempotent startup seeding; each seeder skips rows that already exist.
pub async fn run_seeders(db: &DatabaseConnection, cfg: &Config) -> Result<(), SeedError> {
    tag_seeder::seed_tags(db).await?;

    if let Some(path) = &cfg.ingredients_fixture {
        ingredient_seeder::seed_ingredients_from_file(db, path).await?;
    }

    if let Some(admin) = &cfg.admin {
        user_seeder::seed_staff_user(db, admin).await?;
    }

    Ok(())
}
