//! Driver account management service

use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::{auth::hash_password, car::CarRow};
use shared::{
    validate_license_number, CarWithManufacturer, Driver, DriverCreationForm, PaginatedResponse,
    Pagination, PaginationMeta,
};

const DUPLICATE_USERNAME_MESSAGE: &str = "A user with that username already exists.";
const DUPLICATE_LICENSE_MESSAGE: &str = "Driver with this license number already exists.";

const DRIVER_COLUMNS: &str = "id, username, first_name, last_name, email, license_number, \
                              is_staff, is_active, date_joined, last_login";

/// Driver service for user accounts
#[derive(Clone)]
pub struct DriverService {
    db: PgPool,
}

/// Input for creating a driver account outside the sign-up form
#[derive(Debug, Clone, Default)]
pub struct NewDriver {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub license_number: Option<String>,
    pub is_staff: bool,
}

impl From<DriverCreationForm> for NewDriver {
    fn from(form: DriverCreationForm) -> Self {
        Self {
            username: form.username,
            password: form.password1,
            first_name: form.first_name,
            last_name: form.last_name,
            email: String::new(),
            license_number: Some(form.license_number),
            is_staff: false,
        }
    }
}

impl DriverService {
    /// Create a new DriverService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List drivers, optionally filtered by a case-insensitive username search
    pub async fn list(
        &self,
        search: Option<&str>,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<Driver>> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM drivers
            WHERE ($1::TEXT IS NULL OR STRPOS(LOWER(username), LOWER($1)) > 0)
            "#,
        )
        .bind(search)
        .fetch_one(&self.db)
        .await?;

        let total = u64::try_from(total).unwrap_or(0);
        let pagination = pagination.clamp(total);

        let data = sqlx::query_as::<_, Driver>(&format!(
            r#"
            SELECT {DRIVER_COLUMNS} FROM drivers
            WHERE ($1::TEXT IS NULL OR STRPOS(LOWER(username), LOWER($1)) > 0)
            ORDER BY username ASC
            LIMIT $2 OFFSET $3
            "#
        ))
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

    /// All drivers ordered by username, for checkbox inputs
    pub async fn all(&self) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {DRIVER_COLUMNS} FROM drivers ORDER BY username ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(drivers)
    }

    /// Get a driver by ID
    pub async fn get(&self, id: i64) -> AppResult<Driver> {
        sqlx::query_as::<_, Driver>(&format!(
            "SELECT {DRIVER_COLUMNS} FROM drivers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Driver".to_string()))
    }

    /// Cars the driver is assigned to, with their manufacturers
    pub async fn cars_of(&self, driver_id: i64) -> AppResult<Vec<CarWithManufacturer>> {
        let rows = sqlx::query_as::<_, CarRow>(
            r#"
            SELECT c.id, c.model, c.manufacturer_id,
                   m.name AS manufacturer_name, m.country AS manufacturer_country
            FROM cars_drivers cd
            JOIN cars c ON c.id = cd.car_id
            JOIN manufacturers m ON m.id = c.manufacturer_id
            WHERE cd.driver_id = $1
            ORDER BY c.model ASC, c.id ASC
            "#,
        )
        .bind(driver_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a driver account from a validated sign-up form
    pub async fn create(&self, form: DriverCreationForm) -> AppResult<Driver> {
        self.create_driver(form.into()).await
    }

    /// Create a driver account, hashing the password
    pub async fn create_driver(&self, input: NewDriver) -> AppResult<Driver> {
        if let Some(license_number) = &input.license_number {
            validate_license_number(license_number)
                .map_err(|msg| AppError::validation("license_number", msg))?;
        }

        self.ensure_unique_username(&input.username).await?;
        if let Some(license_number) = &input.license_number {
            self.ensure_unique_license(license_number, None).await?;
        }

        let password_hash = hash_password(&input.password)?;

        let driver = sqlx::query_as::<_, Driver>(&format!(
            r#"
            INSERT INTO drivers (username, password_hash, first_name, last_name, email,
                                 license_number, is_staff)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {DRIVER_COLUMNS}
            "#
        ))
        .bind(&input.username)
        .bind(&password_hash)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.license_number)
        .bind(input.is_staff)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "username", DUPLICATE_USERNAME_MESSAGE))?;

        tracing::info!(id = driver.id, "Created driver {}", driver.username);
        Ok(driver)
    }

    /// Replace a driver's license number
    pub async fn update_license(&self, id: i64, license_number: &str) -> AppResult<Driver> {
        validate_license_number(license_number)
            .map_err(|msg| AppError::validation("license_number", msg))?;
        self.ensure_unique_license(license_number, Some(id)).await?;

        let driver = sqlx::query_as::<_, Driver>(&format!(
            "UPDATE drivers SET license_number = $2 WHERE id = $1 RETURNING {DRIVER_COLUMNS}"
        ))
        .bind(id)
        .bind(license_number)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "license_number", DUPLICATE_LICENSE_MESSAGE))?
        .ok_or_else(|| AppError::NotFound("Driver".to_string()))?;

        tracing::info!(id, "Updated license number of {}", driver.username);
        Ok(driver)
    }

    /// Delete a driver; car assignments are removed with it
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Driver".to_string()));
        }

        tracing::info!(id, "Deleted driver");
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM drivers")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn ensure_unique_username(&self, username: &str) -> AppResult<()> {
        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM drivers WHERE username = $1")
                .bind(username)
                .fetch_one(&self.db)
                .await?;

        if existing > 0 {
            return Err(AppError::validation("username", DUPLICATE_USERNAME_MESSAGE));
        }
        Ok(())
    }

    /// Check for duplicate license, ignoring the driver being updated
    async fn ensure_unique_license(
        &self,
        license_number: &str,
        exclude_id: Option<i64>,
    ) -> AppResult<()> {
        let existing = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM drivers
            WHERE license_number = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            "#,
        )
        .bind(license_number)
        .bind(exclude_id)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::validation("license_number", DUPLICATE_LICENSE_MESSAGE));
        }
        Ok(())
    }
}
