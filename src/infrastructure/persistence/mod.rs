mod postgres_storage_repository;

pub use postgres_storage_repository::PostgresStorageRepository;

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
