//! # Menu Repository
//!
//! Categories and sellable menu items.
//!
//! The order form reads `list_orderable()`; everything else here is
//! admin-side catalog maintenance. Item prices are whole VND and changing
//! them never touches already-placed orders (line prices are frozen at
//! checkout).

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use cafe_core::{validation, Category, MenuItem, MenuItemStatus};

/// Repository for menu categories and items.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Creates a category.
    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> DbResult<Category> {
        validation::validate_name("category name", name)?;

        let result = sqlx::query("INSERT INTO categories (name, description) VALUES (?1, ?2)")
            .bind(name)
            .bind(description)
            .execute(&self.pool)
            .await?;

        info!(name, "Category created");

        Ok(Category {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            description: description.map(String::from),
        })
    }

    /// Lists all categories by name.
    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Deletes a category. Items in it keep existing with no category.
    pub async fn delete_category(&self, id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE menu_items SET category_id = NULL WHERE category_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        tx.commit().await?;

        info!(id, "Category deleted");
        Ok(())
    }

    // =========================================================================
    // Menu Items
    // =========================================================================

    /// Creates a menu item, initially `available`.
    ///
    /// ## Errors
    /// - [`DbError::Validation`] for an empty name or negative price
    /// - [`DbError::ForeignKeyViolation`] for an unknown category
    pub async fn create_item(
        &self,
        category_id: Option<i64>,
        name: &str,
        description: Option<&str>,
        price: i64,
    ) -> DbResult<MenuItem> {
        validation::validate_name("item name", name)?;
        validation::validate_price(price)?;

        let result = sqlx::query(
            r#"
            INSERT INTO menu_items (category_id, name, description, price, status)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(MenuItemStatus::Available)
        .execute(&self.pool)
        .await?;

        info!(name, price, "Menu item created");

        Ok(MenuItem {
            id: result.last_insert_rowid(),
            category_id,
            name: name.to_string(),
            description: description.map(String::from),
            price,
            status: MenuItemStatus::Available,
        })
    }

    /// Gets a menu item by id.
    pub async fn get_item(&self, id: i64) -> DbResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, category_id, name, description, price, status
            FROM menu_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists all items, optionally restricted to one category.
    pub async fn list_items(&self, category_id: Option<i64>) -> DbResult<Vec<MenuItem>> {
        let items = match category_id {
            Some(cat) => {
                sqlx::query_as::<_, MenuItem>(
                    r#"
                    SELECT id, category_id, name, description, price, status
                    FROM menu_items
                    WHERE category_id = ?1
                    ORDER BY name
                    "#,
                )
                .bind(cat)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MenuItem>(
                    r#"
                    SELECT id, category_id, name, description, price, status
                    FROM menu_items
                    ORDER BY name
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(items)
    }

    /// Lists items the order form may sell right now.
    pub async fn list_orderable(&self) -> DbResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, category_id, name, description, price, status
            FROM menu_items
            WHERE status = 'available'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Updates an item's catalog fields. Existing order lines keep the price
    /// they were sold at.
    pub async fn update_item(
        &self,
        id: i64,
        category_id: Option<i64>,
        name: &str,
        description: Option<&str>,
        price: i64,
    ) -> DbResult<()> {
        validation::validate_name("item name", name)?;
        validation::validate_price(price)?;

        let result = sqlx::query(
            r#"
            UPDATE menu_items
            SET category_id = ?2, name = ?3, description = ?4, price = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", id));
        }

        Ok(())
    }

    /// Sets an item's availability (sold out for the day, discontinued).
    pub async fn set_item_status(&self, id: i64, status: MenuItemStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE menu_items SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", id));
        }

        info!(id, ?status, "Menu item status set");
        Ok(())
    }

    /// Deletes a menu item.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] while any order line still
    /// references it; discontinue instead of deleting for items that have
    /// been sold.
    pub async fn delete_item(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", id));
        }

        info!(id, "Menu item deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
