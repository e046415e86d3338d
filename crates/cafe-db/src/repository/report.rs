//! # Report Repository
//!
//! Read-only revenue and sales aggregation for the admin dashboard.
//!
//! Revenue counts `completed` orders only: pending and in-progress orders
//! are not money yet, and cancelled ones never were. All queries aggregate
//! in SQL; nothing here writes. Date ranges are inclusive `[from, to]` in
//! UTC, with `None` meaning unbounded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::DbResult;
use cafe_core::OrderStatus;

/// Revenue figures over a date range.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RevenueSummary {
    /// Number of completed orders.
    pub orders_completed: i64,
    /// Sum of their totals, whole VND.
    pub revenue: i64,
    /// Whole-VND average per completed order, 0 when there are none.
    pub average_order: i64,
}

/// Revenue for one calendar day (UTC).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyRevenue {
    /// `YYYY-MM-DD`.
    pub day: String,
    pub orders: i64,
    pub revenue: i64,
}

/// Sales figures for one menu item, across completed orders.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemSales {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: i64,
}

/// Revenue per menu category, across completed orders.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategorySales {
    /// `None` groups items with no category.
    pub category: Option<String>,
    pub quantity_sold: i64,
    pub revenue: i64,
}

/// Stock purchase spending over a date range.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImportCostSummary {
    /// Number of priced import movements.
    pub movements: i64,
    /// Units received across them.
    pub quantity: i64,
    /// Σ quantity × unit price, whole VND.
    pub cost: i64,
}

/// Order count per status, for the dashboard tiles.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Read-only repository over orders, order_items and the inventory ledger.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Completed-order revenue over `[from, to]`.
    pub async fn summary(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DbResult<RevenueSummary> {
        let summary = sqlx::query_as::<_, RevenueSummary>(
            r#"
            SELECT COUNT(*) AS orders_completed,
                   COALESCE(SUM(total_amount), 0) AS revenue,
                   COALESCE(SUM(total_amount) / COUNT(*), 0) AS average_order
            FROM orders
            WHERE status = 'completed'
              AND (?1 IS NULL OR created_at >= ?1)
              AND (?2 IS NULL OR created_at <= ?2)
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// Completed-order revenue per UTC day over the last `days` days,
    /// newest day first. Days with no completed orders are omitted.
    pub async fn revenue_by_day(&self, days: i64) -> DbResult<Vec<DailyRevenue>> {
        let rows = sqlx::query_as::<_, DailyRevenue>(
            r#"
            SELECT date(created_at) AS day,
                   COUNT(*) AS orders,
                   SUM(total_amount) AS revenue
            FROM orders
            WHERE status = 'completed'
              AND date(created_at) >= date('now', '-' || ?1 || ' days')
            GROUP BY date(created_at)
            ORDER BY day DESC
            "#,
        )
        .bind(days)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Best-selling items by quantity across completed orders.
    pub async fn top_items(&self, limit: i64) -> DbResult<Vec<ItemSales>> {
        let rows = sqlx::query_as::<_, ItemSales>(
            r#"
            SELECT oi.menu_item_id,
                   mi.name,
                   SUM(oi.quantity) AS quantity_sold,
                   SUM(oi.quantity * oi.price) AS revenue
            FROM order_items oi
            JOIN orders o ON oi.order_id = o.id
            JOIN menu_items mi ON oi.menu_item_id = mi.id
            WHERE o.status = 'completed'
            GROUP BY oi.menu_item_id, mi.name
            ORDER BY quantity_sold DESC, revenue DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Revenue per menu category across completed orders, biggest first.
    /// Items with no category group under `None`.
    pub async fn revenue_by_category(&self) -> DbResult<Vec<CategorySales>> {
        let rows = sqlx::query_as::<_, CategorySales>(
            r#"
            SELECT c.name AS category,
                   SUM(oi.quantity) AS quantity_sold,
                   SUM(oi.quantity * oi.price) AS revenue
            FROM order_items oi
            JOIN orders o ON oi.order_id = o.id
            JOIN menu_items mi ON oi.menu_item_id = mi.id
            LEFT JOIN categories c ON mi.category_id = c.id
            WHERE o.status = 'completed'
            GROUP BY c.name
            ORDER BY revenue DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Spending on priced stock imports over `[from, to]`. Movements without
    /// a recorded unit price are excluded from the cost sum.
    pub async fn import_costs(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DbResult<ImportCostSummary> {
        let summary = sqlx::query_as::<_, ImportCostSummary>(
            r#"
            SELECT COUNT(*) AS movements,
                   COALESCE(SUM(quantity), 0) AS quantity,
                   COALESCE(SUM(quantity * price), 0) AS cost
            FROM inventory_history
            WHERE type = 'import'
              AND price IS NOT NULL
              AND (?1 IS NULL OR timestamp >= ?1)
              AND (?2 IS NULL OR timestamp <= ?2)
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// Order count per status.
    pub async fn status_counts(&self) -> DbResult<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM orders GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
