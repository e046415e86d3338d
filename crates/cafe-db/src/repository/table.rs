//! # Table Repository
//!
//! CRUD for the physical seating units.
//!
//! Occupancy transitions driven by the order lifecycle live in
//! [`super::order`]; this module only covers table administration and the
//! manual status override (reservations, cleaning).

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use cafe_core::{validation, DiningTable, TableStatus};

/// Repository for dining tables.
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    /// Creates a new TableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    /// Creates a table with the given display number and seat count.
    ///
    /// New tables start `available`.
    ///
    /// ## Errors
    /// - [`DbError::Validation`] if number or capacity is not positive
    /// - [`DbError::UniqueViolation`] if the number is already taken
    pub async fn create(&self, number: i64, capacity: i64) -> DbResult<DiningTable> {
        validation::validate_positive("number", number)?;
        validation::validate_positive("capacity", capacity)?;

        let result = sqlx::query(
            r#"
            INSERT INTO tables (number, capacity, status)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(number)
        .bind(capacity)
        .bind(TableStatus::Available)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("table number", number.to_string()),
            other => other,
        })?;

        info!(number, capacity, "Table created");

        Ok(DiningTable {
            id: result.last_insert_rowid(),
            number,
            capacity,
            status: TableStatus::Available,
        })
    }

    /// Gets a table by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<DiningTable>> {
        let table = sqlx::query_as::<_, DiningTable>(
            "SELECT id, number, capacity, status FROM tables WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(table)
    }

    /// Lists all tables ordered by display number.
    pub async fn list(&self) -> DbResult<Vec<DiningTable>> {
        let tables = sqlx::query_as::<_, DiningTable>(
            "SELECT id, number, capacity, status FROM tables ORDER BY number",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Lists tables a new order can be seated at.
    pub async fn list_available(&self) -> DbResult<Vec<DiningTable>> {
        let tables = sqlx::query_as::<_, DiningTable>(
            r#"
            SELECT id, number, capacity, status
            FROM tables
            WHERE status = 'available'
            ORDER BY number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Manually overrides a table's status (reserve, release after cleaning).
    ///
    /// ## Errors
    /// - [`DbError::NotFound`] if the table does not exist
    pub async fn set_status(&self, id: i64, status: TableStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE tables SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id));
        }

        debug!(id, ?status, "Table status set");
        Ok(())
    }

    /// Updates a table's display number and capacity.
    pub async fn update(&self, id: i64, number: i64, capacity: i64) -> DbResult<()> {
        validation::validate_positive("number", number)?;
        validation::validate_positive("capacity", capacity)?;

        let result = sqlx::query("UPDATE tables SET number = ?2, capacity = ?3 WHERE id = ?1")
            .bind(id)
            .bind(number)
            .bind(capacity)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => {
                    DbError::duplicate("table number", number.to_string())
                }
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id));
        }

        Ok(())
    }

    /// Deletes a table.
    ///
    /// Refused while any non-terminal order still references it. Closed
    /// orders keep their history but have their table reference cleared in
    /// the same transaction, since `orders.table_id` would otherwise block
    /// the delete.
    ///
    /// ## Errors
    /// - [`DbError::TableInUse`] if the table has open orders
    /// - [`DbError::NotFound`] if the table does not exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let open: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM orders
            WHERE table_id = ?1 AND status NOT IN ('completed', 'cancelled')
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if open > 0 {
            return Err(DbError::TableInUse { id });
        }

        sqlx::query("UPDATE orders SET table_id = NULL WHERE table_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tables WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id));
        }

        tx.commit().await?;

        info!(id, "Table deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
