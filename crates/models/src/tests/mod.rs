/// Entity CRUD against the migrated schema
pub mod crud_tests;


use crate::db::connect_in_memory;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Fresh in-memory database with every migration applied.
pub async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    let db = connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
