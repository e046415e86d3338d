//! # Order Repository
//!
//! Cart-to-order conversion and the order status machine, keeping table
//! occupancy consistent.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  1. CHECKOUT (one transaction)                                      │
//! │     ├── INSERT orders        { status: pending, total: Σ lines }    │
//! │     ├── INSERT order_items   one row per cart line                  │
//! │     └── UPDATE tables        status = occupied                      │
//! │                                                                     │
//! │  2. KITCHEN / SERVICE                                               │
//! │     └── set_status() → preparing → served                           │
//! │                                                                     │
//! │  3. CLOSE (one transaction)                                         │
//! │     ├── set_status() → completed | cancelled                        │
//! │     └── UPDATE tables        status = available                     │
//! │                                                                     │
//! │  completed and cancelled are terminal: set_status refuses to move   │
//! │  an order out of them.                                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The terminal transition releases the order's table unconditionally,
//! without checking for other open orders on the same table. That matches
//! the shop's one-order-per-table usage; see DESIGN.md before "fixing" it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use cafe_core::{Cart, Order, OrderItem, OrderStatus, TableStatus, ValidationError};

/// A row of the order board: order plus joined table number and customer
/// name for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: i64,
    pub table_number: Option<i64>,
    pub customer: Option<String>,
    pub status: OrderStatus,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
}

/// A freshly placed order, surfaced by the staff board's advisory poll.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PendingOrderNotice {
    pub id: i64,
    pub table_number: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Repository for the order lifecycle.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Converts a cart into a persisted order.
    ///
    /// ## What This Does (atomically)
    /// 1. Inserts one order row with status `pending` and
    ///    `total_amount = Σ quantity × unit_price` over the cart lines
    /// 2. Inserts one order_items row per cart line, freezing each line's
    ///    unit price
    /// 3. Sets the referenced table's status to `occupied`
    ///
    /// All three writes commit as a single unit; any failure rolls the whole
    /// checkout back and no partial order is ever visible.
    ///
    /// ## Errors
    /// - [`DbError::Validation`] if the cart is empty or no table is chosen
    ///   (zero writes issued)
    /// - [`DbError::NotFound`] if the table does not exist
    ///
    /// On success the cart is cleared and the new order id returned.
    pub async fn checkout(
        &self,
        cart: &mut Cart,
        table_id: Option<i64>,
        user_id: i64,
    ) -> DbResult<i64> {
        if cart.is_empty() {
            return Err(ValidationError::required("cart").into());
        }
        let table_id = table_id.ok_or_else(|| ValidationError::required("table"))?;

        let total = cart.total();
        let now = Utc::now();

        debug!(table_id, user_id, total, lines = cart.line_count(), "Checking out cart");

        let mut tx = self.pool.begin().await?;

        // Checked here rather than left to the foreign key so an unknown
        // table surfaces as NotFound, not a constraint failure
        let table: Option<i64> = sqlx::query_scalar("SELECT id FROM tables WHERE id = ?1")
            .bind(table_id)
            .fetch_optional(&mut *tx)
            .await?;

        if table.is_none() {
            return Err(DbError::not_found("Table", table_id));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO orders (user_id, table_id, status, total_amount, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(user_id)
        .bind(table_id)
        .bind(OrderStatus::Pending)
        .bind(total)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let order_id = result.last_insert_rowid();

        for line in cart.lines() {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, menu_item_id, quantity, price)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(order_id)
            .bind(line.menu_item_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE tables SET status = ?2 WHERE id = ?1")
            .bind(table_id)
            .bind(TableStatus::Occupied)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        cart.clear();

        info!(order_id, table_id, total, "Order placed");
        Ok(order_id)
    }

    /// Moves an order to `new_status`, synchronizing table occupancy.
    ///
    /// ## Side Effect
    /// If `new_status` is terminal (`Completed` or `Cancelled`), the order's
    /// table is released back to `available` in the same transaction.
    ///
    /// ## Errors
    /// - [`DbError::NotFound`] if the order does not exist
    /// - [`DbError::InvalidTransition`] if the order is already terminal
    pub async fn set_status(&self, order_id: i64, new_status: OrderStatus) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Option<i64>, OrderStatus)> =
            sqlx::query_as("SELECT table_id, status FROM orders WHERE id = ?1")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (table_id, current) = row.ok_or_else(|| DbError::not_found("Order", order_id))?;

        if current.is_terminal() {
            return Err(DbError::InvalidTransition {
                order_id,
                from: current,
            });
        }

        sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(order_id)
            .bind(new_status)
            .execute(&mut *tx)
            .await?;

        if new_status.is_terminal() {
            if let Some(table_id) = table_id {
                sqlx::query("UPDATE tables SET status = ?2 WHERE id = ?1")
                    .bind(table_id)
                    .bind(TableStatus::Available)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        info!(order_id, ?new_status, "Order status updated");
        Ok(())
    }

    /// Gets an order by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, table_id, status, total_amount, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets the line items of an order, in insertion order.
    pub async fn items(&self, order_id: i64) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, menu_item_id, quantity, price
            FROM order_items
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists every order for the staff board.
    ///
    /// Sorted by status priority (pending, preparing, served, completed,
    /// cancelled) and newest-first within each group.
    pub async fn list_for_staff(&self) -> DbResult<Vec<OrderSummary>> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id, t.number AS table_number, u.username AS customer,
                   o.status, o.total_amount, o.created_at
            FROM orders o
            LEFT JOIN tables t ON o.table_id = t.id
            LEFT JOIN users u ON o.user_id = u.id
            ORDER BY
                CASE o.status
                    WHEN 'pending' THEN 1
                    WHEN 'preparing' THEN 2
                    WHEN 'served' THEN 3
                    WHEN 'completed' THEN 4
                    WHEN 'cancelled' THEN 5
                END,
                o.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists a customer's own orders, newest-first.
    pub async fn list_for_customer(&self, user_id: i64) -> DbResult<Vec<OrderSummary>> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id, t.number AS table_number, u.username AS customer,
                   o.status, o.total_amount, o.created_at
            FROM orders o
            LEFT JOIN tables t ON o.table_id = t.id
            LEFT JOIN users u ON o.user_id = u.id
            WHERE o.user_id = ?1
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Returns the newest pending order placed after `last_order_id`, if any.
    ///
    /// Advisory read-only poll for the staff board's new-order notification.
    /// Tolerant of missed or duplicate notifications; not part of the
    /// transactional core.
    pub async fn latest_pending_since(
        &self,
        last_order_id: i64,
    ) -> DbResult<Option<PendingOrderNotice>> {
        let notice = sqlx::query_as::<_, PendingOrderNotice>(
            r#"
            SELECT o.id, t.number AS table_number, o.created_at
            FROM orders o
            LEFT JOIN tables t ON o.table_id = t.id
            WHERE o.id > ?1 AND o.status = 'pending'
            ORDER BY o.id DESC
            LIMIT 1
            "#,
        )
        .bind(last_order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notice)
    }

    /// Counts orders (for the empty-cart zero-write checks in tests and
    /// diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testutil::{seeded_db, Fixtures};
    use cafe_core::TableStatus;

    #[tokio::test]
    async fn test_checkout_creates_order_items_and_occupies_table() {
        let (db, fx) = seeded_db().await;

        let mut cart = Cart::new();
        cart.add_line(&fx.latte, 2).unwrap();
        cart.add_line(&fx.espresso, 1).unwrap();

        let order_id = db
            .orders()
            .checkout(&mut cart, Some(fx.table.id), fx.customer.id)
            .await
            .unwrap();

        // Cart is cleared on success
        assert!(cart.is_empty());

        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, 2 * 35_000 + 25_000);

        let items = db.orders().items(order_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            order.total_amount,
            items.iter().map(|i| i.line_total()).sum::<i64>()
        );
        // Unit price is frozen at order time
        assert_eq!(items[0].price, 35_000);

        let table = db.tables().get_by_id(fx.table.id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_rejected_with_zero_writes() {
        let (db, fx) = seeded_db().await;

        let before = db.orders().count().await.unwrap();

        let mut cart = Cart::new();
        let err = db
            .orders()
            .checkout(&mut cart, Some(fx.table.id), fx.customer.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        assert_eq!(db.orders().count().await.unwrap(), before);
        let table = db.tables().get_by_id(fx.table.id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Available);
    }

    #[tokio::test]
    async fn test_checkout_without_table_is_rejected() {
        let (db, fx) = seeded_db().await;

        let mut cart = Cart::new();
        cart.add_line(&fx.latte, 1).unwrap();

        let err = db
            .orders()
            .checkout(&mut cart, None, fx.customer.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        // Cart survives a failed checkout
        assert_eq!(cart.line_count(), 1);
    }

    #[tokio::test]
    async fn test_checkout_unknown_table_is_not_found_with_zero_writes() {
        let (db, fx) = seeded_db().await;

        let mut cart = Cart::new();
        cart.add_line(&fx.latte, 1).unwrap();

        // NotFound, not a raw constraint failure
        let err = db
            .orders()
            .checkout(&mut cart, Some(9999), fx.customer.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        assert_eq!(db.orders().count().await.unwrap(), 0);
        // Cart survives the failed checkout
        assert_eq!(cart.line_count(), 1);
    }

    #[tokio::test]
    async fn test_terminal_transition_releases_table() {
        let (db, fx) = seeded_db().await;

        let mut cart = Cart::new();
        cart.add_line(&fx.latte, 2).unwrap();
        let order_id = db
            .orders()
            .checkout(&mut cart, Some(fx.table.id), fx.customer.id)
            .await
            .unwrap();

        db.orders()
            .set_status(order_id, OrderStatus::Preparing)
            .await
            .unwrap();
        let table = db.tables().get_by_id(fx.table.id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Occupied);

        db.orders()
            .set_status(order_id, OrderStatus::Completed)
            .await
            .unwrap();
        let table = db.tables().get_by_id(fx.table.id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Available);
    }

    #[tokio::test]
    async fn test_cancel_releases_table() {
        let (db, fx) = seeded_db().await;

        let mut cart = Cart::new();
        cart.add_line(&fx.espresso, 1).unwrap();
        let order_id = db
            .orders()
            .checkout(&mut cart, Some(fx.table.id), fx.customer.id)
            .await
            .unwrap();

        db.orders()
            .set_status(order_id, OrderStatus::Cancelled)
            .await
            .unwrap();

        let table = db.tables().get_by_id(fx.table.id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Available);
        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_no_transition_out_of_terminal_status() {
        let (db, fx) = seeded_db().await;

        let mut cart = Cart::new();
        cart.add_line(&fx.latte, 1).unwrap();
        let order_id = db
            .orders()
            .checkout(&mut cart, Some(fx.table.id), fx.customer.id)
            .await
            .unwrap();

        db.orders()
            .set_status(order_id, OrderStatus::Completed)
            .await
            .unwrap();

        let err = db
            .orders()
            .set_status(order_id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::InvalidTransition {
                from: OrderStatus::Completed,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_set_status_unknown_order() {
        let (db, _fx) = seeded_db().await;

        let err = db
            .orders()
            .set_status(424242, OrderStatus::Preparing)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_staff_list_orders_by_status_priority() {
        let (db, fx) = seeded_db().await;
        let Fixtures { table2, .. } = &fx;

        // Order A on table 1, left pending
        let mut cart = Cart::new();
        cart.add_line(&fx.latte, 1).unwrap();
        let pending_id = db
            .orders()
            .checkout(&mut cart, Some(fx.table.id), fx.customer.id)
            .await
            .unwrap();

        // Order B on table 2, completed
        cart.add_line(&fx.espresso, 1).unwrap();
        let completed_id = db
            .orders()
            .checkout(&mut cart, Some(table2.id), fx.customer.id)
            .await
            .unwrap();
        db.orders()
            .set_status(completed_id, OrderStatus::Completed)
            .await
            .unwrap();

        let board = db.orders().list_for_staff().await.unwrap();
        assert_eq!(board.len(), 2);
        // Pending sorts before completed even though it is older
        assert_eq!(board[0].id, pending_id);
        assert_eq!(board[1].id, completed_id);
    }

    #[tokio::test]
    async fn test_customers_see_only_their_own_orders() {
        let (db, fx) = seeded_db().await;

        let mut cart = Cart::new();
        cart.add_line(&fx.latte, 1).unwrap();
        db.orders()
            .checkout(&mut cart, Some(fx.table.id), fx.customer.id)
            .await
            .unwrap();

        let own = db.orders().list_for_customer(fx.customer.id).await.unwrap();
        assert_eq!(own.len(), 1);

        let other = db.orders().list_for_customer(fx.staff.id).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_latest_pending_since_poll() {
        let (db, fx) = seeded_db().await;

        assert!(db
            .orders()
            .latest_pending_since(0)
            .await
            .unwrap()
            .is_none());

        let mut cart = Cart::new();
        cart.add_line(&fx.latte, 1).unwrap();
        let order_id = db
            .orders()
            .checkout(&mut cart, Some(fx.table.id), fx.customer.id)
            .await
            .unwrap();

        let notice = db
            .orders()
            .latest_pending_since(0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(notice.id, order_id);
        assert_eq!(notice.table_number, Some(fx.table.number));

        // Already seen: no further notice
        assert!(db
            .orders()
            .latest_pending_since(order_id)
            .await
            .unwrap()
            .is_none());
    }

    /// The end-to-end scenario from the shop floor: table 3, two lattes.
    #[tokio::test]
    async fn test_latte_on_table_three_end_to_end() {
        let (db, fx) = seeded_db().await;

        let table3 = db.tables().create(3, 4).await.unwrap();
        assert_eq!(table3.status, TableStatus::Available);

        let mut cart = Cart::new();
        cart.add_line(&fx.latte, 2).unwrap();

        let order_id = db
            .orders()
            .checkout(&mut cart, Some(table3.id), fx.customer.id)
            .await
            .unwrap();

        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.total_amount, 70_000);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(
            db.tables().get_by_id(table3.id).await.unwrap().unwrap().status,
            TableStatus::Occupied
        );

        db.orders()
            .set_status(order_id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(
            db.tables().get_by_id(table3.id).await.unwrap().unwrap().status,
            TableStatus::Available
        );
    }
}
