use sea_orm::*;

use crate::config::AdminSeed;
use crate::repositories::user_repository::{NewUser, UserRepository};
use crate::seeders::SeedError;
use crate::services::user_service::UserService;

pub async fn seed_staff_user(db: &DatabaseConnection, admin: &AdminSeed) -> Result<(), SeedError> {
    let email = admin.email.trim().to_lowercase();

    let existing = UserRepository::find_duplicates(db, &admin.username, &email).await?;
    if !existing.is_empty() {
        return Ok(());
    }

    let password_hash = UserService::hash_password(&admin.password).map_err(|e| SeedError::Account(e.to_string()))?;

    let created = UserRepository::create(
        db,
        NewUser {
            email,
            username: admin.username.clone(),
            first_name: "Admin".to_string(),
            last_name: "Admin".to_string(),
            password_hash,
            is_staff: true,
        },
    )
    .await?;

    tracing::info!("Seeded staff user: {} ({})", created.username, created.id);
    Ok(())
}
