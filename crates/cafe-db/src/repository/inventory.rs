//! # Inventory Repository
//!
//! Stock levels plus an append-only movement ledger.
//!
//! ## Ledger Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  import_stock (one transaction)                                     │
//! │     ├── UPDATE inventory SET quantity = quantity + n                │
//! │     └── INSERT inventory_history  { type: import, n, price, ... }   │
//! │                                                                     │
//! │  Every quantity change has exactly one matching ledger row, so the  │
//! │  ledger always replays to the current on-hand quantity.             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting an item removes its ledger rows first (the schema has no
//! cascade on inventory_history), inside the same transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use cafe_core::{validation, InventoryItem, InventoryMovement, MovementType, ValidationError};

/// A ledger row joined with its item's name, for the history screen.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct MovementRecord {
    pub id: i64,
    pub inventory_id: i64,
    pub item_name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub movement: MovementType,
    pub quantity: i64,
    pub price: Option<i64>,
    pub supplier: Option<String>,
    pub note: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Repository for inventory items and their movement history.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Creates a stock item.
    ///
    /// A non-zero `initial_quantity` is recorded as an opening `import`
    /// movement in the same transaction, so the ledger covers the very first
    /// unit on the shelf.
    ///
    /// ## Errors
    /// - [`DbError::Validation`] for an empty name, negative quantity or
    ///   negative threshold
    /// - [`DbError::UniqueViolation`] if the name is taken
    pub async fn create(
        &self,
        name: &str,
        initial_quantity: i64,
        unit: &str,
        threshold: i64,
    ) -> DbResult<InventoryItem> {
        validation::validate_name("inventory name", name)?;
        validation::validate_name("unit", unit)?;
        validation::validate_threshold(threshold)?;
        if initial_quantity < 0 {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO inventory (name, quantity, unit, threshold) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(name)
        .bind(initial_quantity)
        .bind(unit)
        .bind(threshold)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("inventory name", name),
            other => other,
        })?;

        let id = result.last_insert_rowid();

        if initial_quantity > 0 {
            sqlx::query(
                r#"
                INSERT INTO inventory_history (inventory_id, type, quantity, note, timestamp)
                VALUES (?1, ?2, ?3, 'opening stock', ?4)
                "#,
            )
            .bind(id)
            .bind(MovementType::Import)
            .bind(initial_quantity)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(name, unit, initial_quantity, "Inventory item created");

        Ok(InventoryItem {
            id,
            name: name.to_string(),
            quantity: initial_quantity,
            unit: unit.to_string(),
            threshold,
        })
    }

    /// Gets an item by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(
            "SELECT id, name, quantity, unit, threshold FROM inventory WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets an item by its unique name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(
            "SELECT id, name, quantity, unit, threshold FROM inventory WHERE name = ?1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists all items by name.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            "SELECT id, name, quantity, unit, threshold FROM inventory ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists items at or below their low-stock threshold, emptiest first.
    pub async fn list_low_stock(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, name, quantity, unit, threshold
            FROM inventory
            WHERE quantity <= threshold
            ORDER BY quantity, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Records a stock delivery: increments the on-hand quantity and appends
    /// the matching ledger row, atomically.
    ///
    /// ## Errors
    /// - [`DbError::Validation`] if `quantity` is not positive (zero writes)
    /// - [`DbError::NotFound`] if the item does not exist
    pub async fn import_stock(
        &self,
        item_id: i64,
        quantity: i64,
        price: Option<i64>,
        supplier: Option<&str>,
        note: Option<&str>,
    ) -> DbResult<()> {
        validation::validate_import_quantity(quantity)?;
        if let Some(p) = price {
            validation::validate_price(p)?;
        }

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE inventory SET quantity = quantity + ?2 WHERE id = ?1")
            .bind(item_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", item_id));
        }

        sqlx::query(
            r#"
            INSERT INTO inventory_history (inventory_id, type, quantity, price, supplier, note, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(item_id)
        .bind(MovementType::Import)
        .bind(quantity)
        .bind(price)
        .bind(supplier)
        .bind(note)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(item_id, quantity, supplier, "Stock imported");
        Ok(())
    }

    /// Updates an item's name, unit and threshold. On-hand quantity is only
    /// ever changed through movements.
    pub async fn update(&self, id: i64, name: &str, unit: &str, threshold: i64) -> DbResult<()> {
        validation::validate_name("inventory name", name)?;
        validation::validate_name("unit", unit)?;

        let result = sqlx::query(
            "UPDATE inventory SET name = ?2, unit = ?3, threshold = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(name)
        .bind(unit)
        .bind(threshold)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("inventory name", name),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        Ok(())
    }

    /// Deletes an item and its entire movement history.
    ///
    /// History rows go first; both deletes commit together or not at all.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM inventory_history WHERE inventory_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        tx.commit().await?;

        info!(id, "Inventory item deleted");
        Ok(())
    }

    /// Lists an item's movements, newest first.
    pub async fn history(&self, item_id: i64) -> DbResult<Vec<InventoryMovement>> {
        let movements = sqlx::query_as::<_, InventoryMovement>(
            r#"
            SELECT id, inventory_id, type, quantity, price, supplier, note, timestamp
            FROM inventory_history
            WHERE inventory_id = ?1
            ORDER BY timestamp DESC, id DESC
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(item_id, count = movements.len(), "Fetched movement history");
        Ok(movements)
    }

    /// The whole ledger across all items, joined with item names, newest
    /// first. Backs the inventory history screen.
    pub async fn full_history(&self) -> DbResult<Vec<MovementRecord>> {
        let movements = sqlx::query_as::<_, MovementRecord>(
            r#"
            SELECT h.id, h.inventory_id, i.name AS item_name, h.type,
                   h.quantity, h.price, h.supplier, h.note, h.timestamp
            FROM inventory_history h
            JOIN inventory i ON h.inventory_id = i.id
            ORDER BY h.timestamp DESC, h.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testutil::seeded_db;
    use cafe_core::StockStatus;

    #[tokio::test]
    async fn test_import_increments_and_writes_one_ledger_row() {
        let (db, _fx) = seeded_db().await;

        let milk = db.inventory().create("Milk", 0, "liter", 10).await.unwrap();
        assert_eq!(milk.quantity, 0);

        db.inventory()
            .import_stock(milk.id, 20, Some(15_000), Some("DairyCo"), None)
            .await
            .unwrap();

        let milk = db.inventory().get_by_id(milk.id).await.unwrap().unwrap();
        assert_eq!(milk.quantity, 20);
        assert_eq!(milk.stock_status(), StockStatus::Ok);

        let history = db.inventory().history(milk.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].movement, MovementType::Import);
        assert_eq!(history[0].quantity, 20);
        assert_eq!(history[0].supplier.as_deref(), Some("DairyCo"));
    }

    #[tokio::test]
    async fn test_ledger_replays_to_on_hand_quantity() {
        let (db, _fx) = seeded_db().await;

        let beans = db.inventory().create("Coffee beans", 0, "kg", 5).await.unwrap();
        db.inventory()
            .import_stock(beans.id, 8, None, None, None)
            .await
            .unwrap();
        db.inventory()
            .import_stock(beans.id, 4, Some(200_000), Some("Roaster"), Some("arabica"))
            .await
            .unwrap();

        let beans = db.inventory().get_by_id(beans.id).await.unwrap().unwrap();
        let ledger_sum: i64 = db
            .inventory()
            .history(beans.id)
            .await
            .unwrap()
            .iter()
            .map(|m| m.quantity)
            .sum();
        assert_eq!(beans.quantity, 12);
        assert_eq!(ledger_sum, beans.quantity);
    }

    #[tokio::test]
    async fn test_invalid_import_quantity_leaves_no_trace() {
        let (db, _fx) = seeded_db().await;

        let sugar = db.inventory().create("Sugar", 0, "kg", 2).await.unwrap();

        let err = db
            .inventory()
            .import_stock(sugar.id, 0, None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let sugar = db.inventory().get_by_id(sugar.id).await.unwrap().unwrap();
        assert_eq!(sugar.quantity, 0);
        assert!(db.inventory().history(sugar.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_unknown_item_rolls_back_ledger() {
        let (db, _fx) = seeded_db().await;

        let err = db
            .inventory()
            .import_stock(9999, 5, None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_opening_stock_is_on_the_ledger() {
        let (db, _fx) = seeded_db().await;

        let ice = db.inventory().create("Ice", 30, "kg", 5).await.unwrap();
        assert_eq!(ice.quantity, 30);

        let history = db.inventory().history(ice.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].quantity, 30);
        assert_eq!(history[0].note.as_deref(), Some("opening stock"));
    }

    #[tokio::test]
    async fn test_full_history_joins_item_names() {
        let (db, _fx) = seeded_db().await;

        let milk = db.inventory().create("Milk", 0, "liter", 10).await.unwrap();
        let beans = db.inventory().create("Beans", 0, "kg", 5).await.unwrap();
        db.inventory()
            .import_stock(milk.id, 20, None, None, None)
            .await
            .unwrap();
        db.inventory()
            .import_stock(beans.id, 8, None, None, None)
            .await
            .unwrap();

        let ledger = db.inventory().full_history().await.unwrap();
        assert_eq!(ledger.len(), 2);
        // Newest first
        assert_eq!(ledger[0].item_name, "Beans");
        assert_eq!(ledger[1].item_name, "Milk");
    }

    #[tokio::test]
    async fn test_negative_initial_quantity_rejected() {
        let (db, _fx) = seeded_db().await;

        let err = db.inventory().create("Salt", -1, "kg", 2).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let (db, _fx) = seeded_db().await;

        db.inventory().create("Milk", 0, "liter", 10).await.unwrap();
        let err = db.inventory().create("Milk", 0, "carton", 3).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_low_stock_listing() {
        let (db, _fx) = seeded_db().await;

        let milk = db.inventory().create("Milk", 0, "liter", 10).await.unwrap();
        let beans = db.inventory().create("Beans", 0, "kg", 5).await.unwrap();
        db.inventory()
            .import_stock(milk.id, 10, None, None, None) // exactly at threshold
            .await
            .unwrap();
        db.inventory()
            .import_stock(beans.id, 50, None, None, None)
            .await
            .unwrap();

        let low = db.inventory().list_low_stock().await.unwrap();
        assert!(low.iter().any(|i| i.id == milk.id));
        assert!(low.iter().all(|i| i.id != beans.id));
    }

    #[tokio::test]
    async fn test_delete_removes_history_atomically() {
        let (db, _fx) = seeded_db().await;

        let milk = db.inventory().create("Milk", 0, "liter", 10).await.unwrap();
        db.inventory()
            .import_stock(milk.id, 20, None, None, None)
            .await
            .unwrap();

        db.inventory().delete(milk.id).await.unwrap();

        assert!(db.inventory().get_by_id(milk.id).await.unwrap().is_none());
        assert!(db.inventory().history(milk.id).await.unwrap().is_empty());
    }

    /// The milk-delivery scenario: create, receive 20 liters, verify both
    /// sides of the ledger.
    #[tokio::test]
    async fn test_milk_import_end_to_end() {
        let (db, _fx) = seeded_db().await;

        let milk = db.inventory().create("Fresh milk", 0, "liter", 10).await.unwrap();
        db.inventory()
            .import_stock(milk.id, 20, Some(12_000), Some("Vinamilk"), Some("morning run"))
            .await
            .unwrap();

        let milk = db.inventory().get_by_id(milk.id).await.unwrap().unwrap();
        assert_eq!(milk.quantity, 20);

        let history = db.inventory().history(milk.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, Some(12_000));
        assert_eq!(history[0].note.as_deref(), Some("morning run"));
    }
}
