//! Media registry
//!
//! Media items are created by the surrounding system; this engine only
//! needs to resolve an external media key (guid) to its internal row id,
//! plus an insert used by fixtures and by hosts embedding the engine.

use sqlx::SqlitePool;
use tagdex_common::time::now_ms;
use tagdex_common::Result;
use uuid::Uuid;

/// Resolve an external media key to the internal media id
pub async fn resolve_media_id(pool: &SqlitePool, key: &str) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM media WHERE guid = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

/// Insert a media item, returning its internal id
pub async fn insert_media(pool: &SqlitePool, guid: &Uuid, title: Option<&str>) -> Result<i64> {
    let result = sqlx::query("INSERT INTO media (guid, title, created_at) VALUES (?, ?, ?)")
        .bind(guid.to_string())
        .bind(title)
        .bind(now_ms())
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testutil::memory_pool;

    #[tokio::test]
    async fn test_resolve_round_trip() {
        let pool = memory_pool().await;
        let guid = Uuid::new_v4();
        let id = insert_media(&pool, &guid, Some("Sunset")).await.unwrap();

        let resolved = resolve_media_id(&pool, &guid.to_string()).await.unwrap();
        assert_eq!(resolved, Some(id));
    }

    #[tokio::test]
    async fn test_resolve_unknown_key() {
        let pool = memory_pool().await;
        let resolved = resolve_media_id(&pool, "no-such-guid").await.unwrap();
        assert_eq!(resolved, None);
    }
}
