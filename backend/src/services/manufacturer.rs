//! Manufacturer management service

use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::{Manufacturer, ManufacturerForm, PaginatedResponse, Pagination, PaginationMeta};

const DUPLICATE_NAME_MESSAGE: &str = "Manufacturer with this name already exists.";

/// Manufacturer service for vehicle makers
#[derive(Clone)]
pub struct ManufacturerService {
    db: PgPool,
}

impl ManufacturerService {
    /// Create a new ManufacturerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List manufacturers, optionally filtered by a case-insensitive name search
    pub async fn list(
        &self,
        search: Option<&str>,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<Manufacturer>> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM manufacturers
            WHERE ($1::TEXT IS NULL OR STRPOS(LOWER(name), LOWER($1)) > 0)
            "#,
        )
        .bind(search)
        .fetch_one(&self.db)
        .await?;

        let total = u64::try_from(total).unwrap_or(0);
        let pagination = pagination.clamp(total);

        let data = sqlx::query_as::<_, Manufacturer>(
            r#"
            SELECT id, name, country FROM manufacturers
            WHERE ($1::TEXT IS NULL OR STRPOS(LOWER(name), LOWER($1)) > 0)
            ORDER BY name ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(pagination, total),
        })
    }

    /// All manufacturers ordered by name, for select inputs
    pub async fn all(&self) -> AppResult<Vec<Manufacturer>> {
        let manufacturers = sqlx::query_as::<_, Manufacturer>(
            "SELECT id, name, country FROM manufacturers ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(manufacturers)
    }

    /// Get a manufacturer by ID
    pub async fn get(&self, id: i64) -> AppResult<Manufacturer> {
        sqlx::query_as::<_, Manufacturer>("SELECT id, name, country FROM manufacturers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Manufacturer".to_string()))
    }

    /// Create a new manufacturer
    pub async fn create(&self, input: &ManufacturerForm) -> AppResult<Manufacturer> {
        self.ensure_unique_name(&input.name, None).await?;

        let manufacturer = sqlx::query_as::<_, Manufacturer>(
            r#"
            INSERT INTO manufacturers (name, country)
            VALUES ($1, $2)
            RETURNING id, name, country
            "#,
        )
        .bind(input.name.trim())
        .bind(input.country.trim())
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "name", DUPLICATE_NAME_MESSAGE))?;

        tracing::info!(id = manufacturer.id, "Created manufacturer {}", manufacturer);
        Ok(manufacturer)
    }

    /// Update a manufacturer's name and country
    pub async fn update(&self, id: i64, input: &ManufacturerForm) -> AppResult<Manufacturer> {
        self.ensure_unique_name(&input.name, Some(id)).await?;

        let manufacturer = sqlx::query_as::<_, Manufacturer>(
            r#"
            UPDATE manufacturers SET name = $2, country = $3
            WHERE id = $1
            RETURNING id, name, country
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(input.country.trim())
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "name", DUPLICATE_NAME_MESSAGE))?
        .ok_or_else(|| AppError::NotFound("Manufacturer".to_string()))?;

        tracing::info!(id, "Updated manufacturer {}", manufacturer);
        Ok(manufacturer)
    }

    /// Delete a manufacturer; its cars are removed with it
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM manufacturers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Manufacturer".to_string()));
        }

        tracing::info!(id, "Deleted manufacturer");
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM manufacturers")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    /// Check for duplicate name, ignoring the manufacturer being updated
    async fn ensure_unique_name(&self, name: &str, exclude_id: Option<i64>) -> AppResult<()> {
        let existing = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM manufacturers
            WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            "#,
        )
        .bind(name.trim())
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::validation("name", DUPLICATE_NAME_MESSAGE));
        }
        Ok(())
    }
}
