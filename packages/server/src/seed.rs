use common::user::{CreateUserRequest, Role};
use sea_orm::*;
use tracing::info;

use crate::config::AdminSeedConfig;
use crate::error::AppError;
use crate::handlers::user::insert_user;

/// Full-text indexes backing the actor and movie search endpoints.
///
/// Schema-sync has no notion of expression indexes, so they are created here on startup.
const SEARCH_INDEXES: &[(&str, &str)] = &[
    (
        "idx_actor_name_fts",
        r#"CREATE INDEX IF NOT EXISTS idx_actor_name_fts ON "actor" USING GIN (to_tsvector('simple', "name"))"#,
    ),
    (
        "idx_movie_title_fts",
        r#"CREATE INDEX IF NOT EXISTS idx_movie_title_fts ON "movie" USING GIN (to_tsvector('simple', "title"))"#,
    ),
];

/// Ensure required database indexes exist.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    for &(name, stmt) in SEARCH_INDEXES {
        match db.execute_unprepared(stmt).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
        }
    }
    Ok(())
}

/// Create the configured admin account unless its email is already registered.
pub async fn seed_admin<C: ConnectionTrait>(
    db: &C,
    admin: &AdminSeedConfig,
) -> Result<(), AppError> {
    let request = CreateUserRequest {
        name: admin.name.clone(),
        email: admin.email.clone(),
        password: admin.password.clone(),
    };

    match insert_user(db, &request, Role::Admin).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "Seeded admin account");
            Ok(())
        }
        Err(AppError::Conflict(_)) => {
            tracing::debug!(email = %admin.email, "Admin account already present");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
