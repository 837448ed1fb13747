use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

use crate::application::ports::facility_repository::{FacilityRepository, RepositoryError};
use crate::domain::facilities::facility::{
    FacilityChanges, FacilityRecord, NewFacility, SearchFilters, TagRef,
};
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::tag_resolver_sqlx::resolve_tag_id;

pub struct SqlxFacilityRepository {
    pub pool: PgPool,
}

impl SqlxFacilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_record(r: &PgRow) -> FacilityRecord {
    FacilityRecord {
        id: r.get("id"),
        name: r.get("name"),
        created_at: r.get("created_at"),
        location_id: r.get("location_id"),
        city: r.get("city"),
        address: r.get("address"),
        zip_code: r.get("zip_code"),
        country_code: r.get("country_code"),
        phone_number: r.get("phone_number"),
    }
}

fn like_pattern(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| format!("%{}%", v))
}

async fn link_tags(
    conn: &mut PgConnection,
    facility_id: i64,
    tags: &[String],
) -> Result<(), RepositoryError> {
    for name in tags {
        let tag_id = resolve_tag_id(&mut *conn, name).await?;
        sqlx::query("INSERT INTO facility_tag (facility_id, tag_id) VALUES ($1, $2)")
            .bind(facility_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await
            .map_err(RepositoryError::write("failed to link tag to facility"))?;
    }
    Ok(())
}

async fn clear_tags(conn: &mut PgConnection, facility_id: i64) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM facility_tag WHERE facility_id = $1")
        .bind(facility_id)
        .execute(&mut *conn)
        .await
        .map_err(RepositoryError::write("failed to clear facility tags"))?;
    Ok(())
}

async fn insert_facility(conn: &mut PgConnection, new: &NewFacility) -> Result<i64, RepositoryError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO facilities (name, location_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(&new.name)
    .bind(new.location_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(RepositoryError::write("failed to create facility"))?;
    link_tags(conn, id, &new.tags).await?;
    Ok(id)
}

async fn apply_changes(
    conn: &mut PgConnection,
    id: i64,
    changes: &FacilityChanges,
) -> Result<(), RepositoryError> {
    if let Some(name) = &changes.name {
        let res = sqlx::query("UPDATE facilities SET name = $1 WHERE id = $2")
            .bind(name)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(RepositoryError::write("failed to update name"))?;
        if res.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
    }
    if let Some(location_id) = changes.location_id {
        let res = sqlx::query("UPDATE facilities SET location_id = $1 WHERE id = $2")
            .bind(location_id)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(RepositoryError::write("failed to update location_id"))?;
        if res.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
    }
    if let Some(tags) = &changes.tags {
        clear_tags(conn, id).await?;
        link_tags(conn, id, tags).await?;
    }
    Ok(())
}

async fn remove_facility(conn: &mut PgConnection, id: i64) -> Result<(), RepositoryError> {
    clear_tags(conn, id).await?;
    let res = sqlx::query("DELETE FROM facilities WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(RepositoryError::write("failed to delete facility"))?;
    if res.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

#[async_trait]
impl FacilityRepository for SqlxFacilityRepository {
    async fn list_facilities(&self) -> Result<Vec<FacilityRecord>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT f.id, f.name, f.created_at,
                      l.id AS location_id, l.city, l.address, l.zip_code, l.country_code, l.phone_number
               FROM facilities f
               JOIN locations l ON l.id = f.location_id
               ORDER BY f.id ASC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::query("failed to fetch facilities"))?;
        Ok(rows.iter().map(map_record).collect())
    }

    async fn get_facility(&self, id: i64) -> Result<Option<FacilityRecord>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT f.id, f.name, f.created_at,
                      l.id AS location_id, l.city, l.address, l.zip_code, l.country_code, l.phone_number
               FROM facilities f
               JOIN locations l ON l.id = f.location_id
               WHERE f.id = $1
               LIMIT 1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::query("failed to fetch facility"))?;
        Ok(row.as_ref().map(map_record))
    }

    async fn facility_tags(&self, facility_id: i64) -> Result<Vec<TagRef>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT t.id, t.name
               FROM facility_tag ft
               JOIN tags t ON t.id = ft.tag_id
               WHERE ft.facility_id = $1
               ORDER BY t.name ASC"#,
        )
        .bind(facility_id)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::query("failed to fetch facility tags"))?;
        Ok(rows
            .into_iter()
            .map(|r| TagRef {
                id: r.get("id"),
                name: r.get("name"),
            })
            .collect())
    }

    async fn facility_exists(&self, id: i64) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM facilities WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::query("failed to check facility"))
    }

    async fn location_exists(&self, id: i64) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM locations WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::query("failed to check location"))
    }

    async fn create_facility(&self, new: &NewFacility) -> Result<i64, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::write("failed to begin transaction"))?;
        match insert_facility(&mut *tx, new).await {
            Ok(id) => {
                tx.commit()
                    .await
                    .map_err(RepositoryError::write("failed to commit facility"))?;
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(error = %e, name = %new.name, "facility_create_rolled_back");
                tx.rollback().await.ok();
                Err(e)
            }
        }
    }

    async fn update_facility(
        &self,
        id: i64,
        changes: &FacilityChanges,
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::write("failed to begin transaction"))?;
        match apply_changes(&mut *tx, id, changes).await {
            Ok(()) => {
                tx.commit()
                    .await
                    .map_err(RepositoryError::write("failed to commit facility update"))?;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(facility_id = id, error = %e, "facility_update_rolled_back");
                tx.rollback().await.ok();
                Err(e)
            }
        }
    }

    async fn delete_facility(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::write("failed to begin transaction"))?;
        match remove_facility(&mut *tx, id).await {
            Ok(()) => {
                tx.commit()
                    .await
                    .map_err(RepositoryError::write("failed to commit facility delete"))?;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(facility_id = id, error = %e, "facility_delete_rolled_back");
                tx.rollback().await.ok();
                Err(e)
            }
        }
    }

    async fn search_facilities(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<FacilityRecord>, RepositoryError> {
        // The tag filter matches through any linked tag; callers attach the full tag list.
        let rows = sqlx::query(
            r#"SELECT DISTINCT f.id, f.name, f.created_at,
                      l.id AS location_id, l.city, l.address, l.zip_code, l.country_code, l.phone_number
               FROM facilities f
               JOIN locations l ON l.id = f.location_id
               LEFT JOIN facility_tag ft ON ft.facility_id = f.id
               LEFT JOIN tags t ON t.id = ft.tag_id
               WHERE ($1::text IS NULL OR f.name ILIKE $1)
                 AND ($2::text IS NULL OR l.city ILIKE $2)
                 AND ($3::text IS NULL OR t.name ILIKE $3)
               ORDER BY f.id ASC"#,
        )
        .bind(like_pattern(&filters.name))
        .bind(like_pattern(&filters.city))
        .bind(like_pattern(&filters.tag))
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::query("search query failed"))?;
        Ok(rows.iter().map(map_record).collect())
    }
}
