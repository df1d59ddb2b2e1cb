//! Car management service, including driver assignments

use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{AppError, AppResult};
use shared::{
    Car, CarDetail, CarForm, CarWithManufacturer, Driver, Manufacturer, PaginatedResponse,
    Pagination, PaginationMeta,
};

/// Car service for vehicles and their drivers
#[derive(Clone)]
pub struct CarService {
    db: PgPool,
}

/// Car joined with its manufacturer
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CarRow {
    id: i64,
    model: String,
    manufacturer_id: i64,
    manufacturer_name: String,
    manufacturer_country: String,
}

impl From<CarRow> for CarWithManufacturer {
    fn from(row: CarRow) -> Self {
        Self {
            car: Car {
                id: row.id,
                model: row.model,
                manufacturer_id: row.manufacturer_id,
            },
            manufacturer: Manufacturer {
                id: row.manufacturer_id,
                name: row.manufacturer_name,
                country: row.manufacturer_country,
            },
        }
    }
}

/// Outcome of toggling a driver's assignment to a car
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Assigned,
    Removed,
}

/// Validated car input with the required manufacturer resolved
struct CarInput<'a> {
    model: &'a str,
    manufacturer_id: i64,
    drivers: &'a [i64],
}

impl<'a> CarInput<'a> {
    fn from_form(form: &'a CarForm) -> AppResult<Self> {
        let manufacturer_id = form
            .manufacturer
            .ok_or_else(|| AppError::validation("manufacturer", "This field is required."))?;
        Ok(Self {
            model: form.model.trim(),
            manufacturer_id,
            drivers: &form.drivers,
        })
    }
}

impl CarService {
    /// Create a new CarService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List cars with manufacturers, optionally filtered by a
    /// case-insensitive model search
    pub async fn list(
        &self,
        search: Option<&str>,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<CarWithManufacturer>> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM cars
            WHERE ($1::TEXT IS NULL OR STRPOS(LOWER(model), LOWER($1)) > 0)
            "#,
        )
        .bind(search)
        .fetch_one(&self.db)
        .await?;

        let total = u64::try_from(total).unwrap_or(0);
        let pagination = pagination.clamp(total);

        let rows = sqlx::query_as::<_, CarRow>(
            r#"
            SELECT c.id, c.model, c.manufacturer_id,
                   m.name AS manufacturer_name, m.country AS manufacturer_country
            FROM cars c
            JOIN manufacturers m ON m.id = c.manufacturer_id
            WHERE ($1::TEXT IS NULL OR STRPOS(LOWER(c.model), LOWER($1)) > 0)
            ORDER BY c.model ASC, c.id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(Into::into).collect(),
            pagination: PaginationMeta::new(pagination, total),
        })
    }

    /// Get a car with its manufacturer and drivers
    pub async fn get_detail(&self, id: i64) -> AppResult<CarDetail> {
        let row = sqlx::query_as::<_, CarRow>(
            r#"
            SELECT c.id, c.model, c.manufacturer_id,
                   m.name AS manufacturer_name, m.country AS manufacturer_country
            FROM cars c
            JOIN manufacturers m ON m.id = c.manufacturer_id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Car".to_string()))?;

        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT d.id, d.username, d.first_name, d.last_name, d.email, d.license_number,
                   d.is_staff, d.is_active, d.date_joined, d.last_login
            FROM cars_drivers cd
            JOIN drivers d ON d.id = cd.driver_id
            WHERE cd.car_id = $1
            ORDER BY d.username ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        let CarWithManufacturer { car, manufacturer } = row.into();
        Ok(CarDetail {
            car,
            manufacturer,
            drivers,
        })
    }

    /// Create a car and assign its drivers
    pub async fn create(&self, form: &CarForm) -> AppResult<Car> {
        let input = CarInput::from_form(form)?;

        let mut tx = self.db.begin().await?;
        Self::ensure_relations_exist(&mut tx, &input).await?;

        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (model, manufacturer_id)
            VALUES ($1, $2)
            RETURNING id, model, manufacturer_id
            "#,
        )
        .bind(input.model)
        .bind(input.manufacturer_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(relation_violation)?;

        Self::set_drivers(&mut tx, car.id, input.drivers).await?;

        tx.commit().await?;

        tracing::info!(id = car.id, drivers = input.drivers.len(), "Created car {}", car);
        Ok(car)
    }

    /// Update a car and replace its drivers
    pub async fn update(&self, id: i64, form: &CarForm) -> AppResult<Car> {
        let input = CarInput::from_form(form)?;

        let mut tx = self.db.begin().await?;
        Self::ensure_relations_exist(&mut tx, &input).await?;

        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars SET model = $2, manufacturer_id = $3
            WHERE id = $1
            RETURNING id, model, manufacturer_id
            "#,
        )
        .bind(id)
        .bind(input.model)
        .bind(input.manufacturer_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(relation_violation)?
        .ok_or_else(|| AppError::NotFound("Car".to_string()))?;

        sqlx::query("DELETE FROM cars_drivers WHERE car_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::set_drivers(&mut tx, id, input.drivers).await?;

        tx.commit().await?;

        tracing::info!(id, "Updated car {}", car);
        Ok(car)
    }

    /// Delete a car and its driver assignments
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Car".to_string()));
        }

        tracing::info!(id, "Deleted car");
        Ok(())
    }

    /// Assign the driver to the car, or remove them if already assigned
    pub async fn toggle_assign(&self, car_id: i64, driver_id: i64) -> AppResult<Assignment> {
        let mut tx = self.db.begin().await?;

        let car_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM cars WHERE id = $1)")
                .bind(car_id)
                .fetch_one(&mut *tx)
                .await?;
        if !car_exists {
            return Err(AppError::NotFound("Car".to_string()));
        }

        let removed = sqlx::query("DELETE FROM cars_drivers WHERE car_id = $1 AND driver_id = $2")
            .bind(car_id)
            .bind(driver_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let assignment = if removed > 0 {
            Assignment::Removed
        } else {
            sqlx::query("INSERT INTO cars_drivers (car_id, driver_id) VALUES ($1, $2)")
                .bind(car_id)
                .bind(driver_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| match &e {
                    sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                        AppError::NotFound("Driver".to_string())
                    }
                    _ => AppError::DatabaseError(e),
                })?;
            Assignment::Assigned
        };

        tx.commit().await?;

        tracing::info!(car_id, driver_id, ?assignment, "Toggled car assignment");
        Ok(assignment)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    /// Reject unknown manufacturer or driver IDs as field errors.
    ///
    /// The referenced rows stay locked until the transaction ends, so they
    /// cannot be deleted between the check and the insert.
    async fn ensure_relations_exist(
        tx: &mut Transaction<'_, Postgres>,
        input: &CarInput<'_>,
    ) -> AppResult<()> {
        let manufacturer = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM manufacturers WHERE id = $1 FOR KEY SHARE",
        )
        .bind(input.manufacturer_id)
        .fetch_optional(&mut **tx)
        .await?;

        if manufacturer.is_none() {
            return Err(unknown_manufacturer());
        }

        let known_drivers = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM drivers WHERE id = ANY($1) FOR KEY SHARE",
        )
        .bind(input.drivers)
        .fetch_all(&mut **tx)
        .await?;

        if known_drivers.len() != input.drivers.len() {
            return Err(unknown_driver());
        }

        Ok(())
    }

    async fn set_drivers(
        tx: &mut Transaction<'_, Postgres>,
        car_id: i64,
        drivers: &[i64],
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cars_drivers (car_id, driver_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(car_id)
        .bind(drivers)
        .execute(&mut **tx)
        .await
        .map_err(relation_violation)?;

        Ok(())
    }
}

fn unknown_manufacturer() -> AppError {
    AppError::validation(
        "manufacturer",
        "Select a valid choice. That choice is not one of the available choices.",
    )
}

fn unknown_driver() -> AppError {
    AppError::validation(
        "drivers",
        "Select a valid choice. One of the selected drivers is not available.",
    )
}

/// Report a foreign key violation on a car or its driver links as the
/// matching form field error
fn relation_violation(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            if db.constraint().is_some_and(|c| c.contains("driver_id")) {
                unknown_driver()
            } else {
                unknown_manufacturer()
            }
        }
        _ => AppError::DatabaseError(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn violation(db: &PgPool, sql: &str) -> AppError {
        let err = sqlx::query(sql).execute(db).await.unwrap_err();
        relation_violation(err)
    }

    fn field_of(err: AppError) -> String {
        match err {
            AppError::Validation { field, .. } => field,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[sqlx::test]
    #[ignore] // Requires database connection
    async fn test_foreign_key_violations_become_field_errors(db: PgPool) {
        let missing_manufacturer = violation(
            &db,
            "INSERT INTO cars (model, manufacturer_id) VALUES ('Camry', 999)",
        )
        .await;
        assert_eq!(field_of(missing_manufacturer), "manufacturer");

        let manufacturer_id: i64 = sqlx::query_scalar(
            "INSERT INTO manufacturers (name, country) VALUES ('Toyota', 'Japan') RETURNING id",
        )
        .fetch_one(&db)
        .await
        .unwrap();
        let car_id: i64 = sqlx::query_scalar(
            "INSERT INTO cars (model, manufacturer_id) VALUES ('Camry', $1) RETURNING id",
        )
        .bind(manufacturer_id)
        .fetch_one(&db)
        .await
        .unwrap();

        let missing_driver = violation(
            &db,
            &format!("INSERT INTO cars_drivers (car_id, driver_id) VALUES ({}, 999)", car_id),
        )
        .await;
        assert_eq!(field_of(missing_driver), "drivers");
    }

    #[sqlx::test]
    #[ignore] // Requires database connection
    async fn test_other_database_errors_are_kept(db: PgPool) {
        let err = violation(&db, "SELECT * FROM no_such_table").await;
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
