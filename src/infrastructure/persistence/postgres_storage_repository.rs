use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::application::ports::{NewVersion, RepositoryError, StorageRepository};
use crate::domain::entities::{Storage, StorageVersion};
use crate::domain::value_objects::{ContentHash, OwnerId, StorageName, StorageType};

pub struct PostgresStorageRepository {
    pool: PgPool,
}

impl PostgresStorageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageRepository for PostgresStorageRepository {
    async fn create(
        &self,
        owner_id: &OwnerId,
        name: &StorageName,
        storage_type: StorageType,
    ) -> Result<Storage, RepositoryError> {
        let storage = Storage::new(owner_id.clone(), name.clone(), storage_type);

        let result = sqlx::query(
            r#"
            INSERT INTO storages (
                id, owner_id, name, storage_type, head_version_id,
                size_bytes, file_count, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, NULL, 0, 0, $5, $6)
            "#,
        )
        .bind(storage.id())
        .bind(owner_id.to_string())
        .bind(name.to_string())
        .bind(storage_type.to_string())
        .bind(storage.created_at())
        .bind(storage.updated_at())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(storage),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                RepositoryError::Conflict(format!("{owner_id}/{storage_type}/{name}")),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_or_get(
        &self,
        owner_id: &OwnerId,
        name: &StorageName,
        storage_type: StorageType,
    ) -> Result<Storage, RepositoryError> {
        let storage = Storage::new(owner_id.clone(), name.clone(), storage_type);

        // No-op on conflict, then read back whichever row won
        sqlx::query(
            r#"
            INSERT INTO storages (
                id, owner_id, name, storage_type, head_version_id,
                size_bytes, file_count, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, NULL, 0, 0, $5, $6)
            ON CONFLICT (owner_id, name, storage_type) DO NOTHING
            "#,
        )
        .bind(storage.id())
        .bind(owner_id.to_string())
        .bind(name.to_string())
        .bind(storage_type.to_string())
        .bind(storage.created_at())
        .bind(storage.updated_at())
        .execute(&self.pool)
        .await?;

        self.find(owner_id, name, storage_type).await?.ok_or_else(|| {
            RepositoryError::Internal(format!(
                "storage {owner_id}/{storage_type}/{name} missing after upsert"
            ))
        })
    }

    async fn find(
        &self,
        owner_id: &OwnerId,
        name: &StorageName,
        storage_type: StorageType,
    ) -> Result<Option<Storage>, RepositoryError> {
        let row = sqlx::query_as::<_, StorageRow>(
            r#"
            SELECT id, owner_id, name, storage_type, head_version_id,
                   size_bytes, file_count, created_at, updated_at
            FROM storages
            WHERE owner_id = $1 AND name = $2 AND storage_type = $3
            "#,
        )
        .bind(owner_id.to_string())
        .bind(name.to_string())
        .bind(storage_type.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.into_domain()?)),
            None => Ok(None),
        }
    }

    async fn find_version(
        &self,
        storage_id: Uuid,
        version_id: &ContentHash,
    ) -> Result<Option<StorageVersion>, RepositoryError> {
        let row = sqlx::query_as::<_, VersionRow>(
            r#"
            SELECT id, storage_id, object_key_prefix, size_bytes, file_count,
                   message, created_by, created_at
            FROM storage_versions
            WHERE storage_id = $1 AND id = $2
            "#,
        )
        .bind(storage_id)
        .bind(version_id.as_hex())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.into_domain()?)),
            None => Ok(None),
        }
    }

    async fn find_versions_by_prefix(
        &self,
        storage_id: Uuid,
        prefix: &str,
    ) -> Result<Vec<StorageVersion>, RepositoryError> {
        // Callers validate, but a stray `%` or `_` would change LIKE semantics
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, VersionRow>(
            r#"
            SELECT id, storage_id, object_key_prefix, size_bytes, file_count,
                   message, created_by, created_at
            FROM storage_versions
            WHERE storage_id = $1 AND id LIKE $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(storage_id)
        .bind(format!("{}%", prefix.to_ascii_lowercase()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    async fn list_versions(
        &self,
        storage_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StorageVersion>, RepositoryError> {
        let rows = sqlx::query_as::<_, VersionRow>(
            r#"
            SELECT id, storage_id, object_key_prefix, size_bytes, file_count,
                   message, created_by, created_at
            FROM storage_versions
            WHERE storage_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(storage_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    async fn commit_version(
        &self,
        storage_id: Uuid,
        version: &NewVersion,
    ) -> Result<StorageVersion, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Insert is a no-op when the version already exists, so retried
        // and deduplicated commits converge on the stored row
        sqlx::query(
            r#"
            INSERT INTO storage_versions (
                id, storage_id, object_key_prefix, size_bytes, file_count,
                message, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            ON CONFLICT (storage_id, id) DO NOTHING
            "#,
        )
        .bind(version.id.as_hex())
        .bind(storage_id)
        .bind(&version.object_key_prefix)
        .bind(version.size_bytes as i64)
        .bind(version.file_count as i64)
        .bind(&version.message)
        .bind(&version.created_by)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, VersionRow>(
            r#"
            SELECT id, storage_id, object_key_prefix, size_bytes, file_count,
                   message, created_by, created_at
            FROM storage_versions
            WHERE storage_id = $1 AND id = $2
            "#,
        )
        .bind(storage_id)
        .bind(version.id.as_hex())
        .fetch_one(&mut *tx)
        .await?;

        let stored = row.into_domain()?;

        sqlx::query(
            r#"
            UPDATE storages
            SET head_version_id = $2, size_bytes = $3, file_count = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(storage_id)
        .bind(stored.id().as_hex())
        .bind(stored.size_bytes() as i64)
        .bind(stored.file_count() as i64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(stored)
    }

    async fn head(&self, storage_id: Uuid) -> Result<Option<StorageVersion>, RepositoryError> {
        let row = sqlx::query_as::<_, VersionRow>(
            r#"
            SELECT v.id, v.storage_id, v.object_key_prefix, v.size_bytes, v.file_count,
                   v.message, v.created_by, v.created_at
            FROM storage_versions v
            JOIN storages s ON s.id = v.storage_id AND s.head_version_id = v.id
            WHERE s.id = $1
            "#,
        )
        .bind(storage_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.into_domain()?)),
            None => Ok(None),
        }
    }
}

// Internal row mapping structs
#[derive(sqlx::FromRow)]
struct StorageRow {
    id: Uuid,
    owner_id: String,
    name: String,
    storage_type: String,
    head_version_id: Option<String>,
    size_bytes: i64,
    file_count: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl StorageRow {
    fn into_domain(self) -> Result<Storage, RepositoryError> {
        let owner_id = OwnerId::from_str(&self.owner_id)
            .map_err(|e| RepositoryError::Internal(e.to_string()))?;
        let name = StorageName::from_str(&self.name)
            .map_err(|e| RepositoryError::Internal(e.to_string()))?;
        let storage_type = StorageType::from_str(&self.storage_type)
            .map_err(|e| RepositoryError::Internal(e.to_string()))?;
        let head_version_id = match self.head_version_id {
            Some(h) => {
                Some(ContentHash::from_hex(h).map_err(|e| RepositoryError::Internal(e.to_string()))?)
            }
            None => None,
        };

        Ok(Storage::reconstruct(
            self.id,
            owner_id,
            name,
            storage_type,
            head_version_id,
            self.size_bytes as u64,
            self.file_count as u64,
            self.created_at,
            self.updated_at,
        ))
    }
}

#[derive(sqlx::FromRow)]
struct VersionRow {
    id: String,
    storage_id: Uuid,
    object_key_prefix: String,
    size_bytes: i64,
    file_count: i64,
    message: Option<String>,
    created_by: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl VersionRow {
    fn into_domain(self) -> Result<StorageVersion, RepositoryError> {
        let id =
            ContentHash::from_hex(self.id).map_err(|e| RepositoryError::Internal(e.to_string()))?;

        Ok(StorageVersion::reconstruct(
            id,
            self.storage_id,
            self.object_key_prefix,
            self.size_bytes as u64,
            self.file_count as u64,
            self.message,
            self.created_by,
            self.created_at,
        ))
    }
}
