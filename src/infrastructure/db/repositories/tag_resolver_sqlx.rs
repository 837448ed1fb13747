use sqlx::{Connection, PgConnection};

use crate::application::ports::facility_repository::RepositoryError;

async fn find_tag_id(conn: &mut PgConnection, name: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM tags WHERE name = $1 LIMIT 1")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
}

/// Resolves a tag name to its id, creating the row when it does not exist yet.
///
/// Runs on the caller's transaction. The insert is an upsert keyed on the
/// unique `tags.name`, wrapped in a savepoint so a failed insert can be
/// followed by one more lookup without aborting the outer transaction.
pub async fn resolve_tag_id(conn: &mut PgConnection, name: &str) -> Result<i64, RepositoryError> {
    if let Some(id) = find_tag_id(conn, name)
        .await
        .map_err(RepositoryError::write("failed to look up tag"))?
    {
        return Ok(id);
    }

    let mut savepoint = conn
        .begin()
        .await
        .map_err(RepositoryError::write("failed to open tag savepoint"))?;
    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO tags (name) VALUES ($1) ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id",
    )
    .bind(name)
    .fetch_one(&mut *savepoint)
    .await;

    match inserted {
        Ok(id) => {
            savepoint
                .commit()
                .await
                .map_err(RepositoryError::write("failed to release tag savepoint"))?;
            Ok(id)
        }
        Err(e) => {
            tracing::warn!(tag = name, error = %e, "tag_insert_failed_retrying_lookup");
            savepoint
                .rollback()
                .await
                .map_err(RepositoryError::write("failed to roll back tag savepoint"))?;
            find_tag_id(conn, name)
                .await
                .map_err(RepositoryError::write("failed to look up tag"))?
                .ok_or_else(|| RepositoryError::TagResolution {
                    name: name.to_string(),
                })
        }
    }
}
