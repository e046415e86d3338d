//! # Domain Types
//!
//! Entity records and status enums shared by the store and its collaborators.
//!
//! ## Status Machines
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Order:   pending ──► preparing ──► served ──► completed            │
//! │               │            │           │                            │
//! │               └────────────┴───────────┴──────► cancelled           │
//! │           (completed and cancelled are terminal)                    │
//! │                                                                     │
//! │  Table:   available ◄──► occupied        reserved (manual only)     │
//! │           occupied iff the table has a non-terminal order           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stored status values are the fixed English tokens; display-language
//! labels (the shop runs a Vietnamese UI) are a presentation-layer lookup
//! keyed by these enums and never appear in stored data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// Advances monotonically through the forward states, or jumps to
/// `Cancelled` from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Just placed, not yet picked up by the kitchen.
    Pending,
    /// Being prepared.
    Preparing,
    /// Delivered to the table, not yet paid.
    Served,
    /// Paid and closed. Terminal.
    Completed,
    /// Cancelled. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses permit no further transition.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Display priority used by the staff order board: actionable work
    /// first, closed orders last.
    #[inline]
    pub const fn sort_priority(&self) -> u8 {
        match self {
            OrderStatus::Pending => 1,
            OrderStatus::Preparing => 2,
            OrderStatus::Served => 3,
            OrderStatus::Completed => 4,
            OrderStatus::Cancelled => 5,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Table Status
// =============================================================================

/// Occupancy state of a physical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
}

impl Default for TableStatus {
    fn default() -> Self {
        TableStatus::Available
    }
}

// =============================================================================
// Menu Item Status
// =============================================================================

/// Availability of a menu item. Only `Available` items are orderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum MenuItemStatus {
    Available,
    SoldOut,
    Discontinued,
}

// =============================================================================
// Stock Movement Type
// =============================================================================

/// Direction of an inventory movement. Only `Import` is exercised by the
/// interactive flows; `Export` is reserved in the ledger schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Import,
    Export,
}

// =============================================================================
// User Role
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Role {
    /// Staff and admins see every order; customers only their own.
    #[inline]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Staff)
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Derived stock classification for display. Never stored: recomputed from
/// (quantity, threshold) on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    Ok,
}

impl StockStatus {
    /// Classifies an on-hand quantity against its low-stock threshold.
    ///
    /// Boundary: quantity exactly at the threshold is `Low`.
    pub const fn classify(quantity: i64, threshold: i64) -> Self {
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity <= threshold {
            StockStatus::Low
        } else {
            StockStatus::Ok
        }
    }
}

// =============================================================================
// Entity Records
// =============================================================================

/// An account: staff terminal or registered customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    /// sha256 hex digest, never the plaintext.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A menu category (e.g. coffee, tea, pastry).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A sellable menu item. `price` is whole VND.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub status: MenuItemStatus,
}

/// A physical seating unit.
///
/// `status` is mutated by the order lifecycle (checkout occupies, terminal
/// transitions release) or manually for reservations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub number: i64,
    pub capacity: i64,
    pub status: TableStatus,
}

/// A placed order. `total_amount` is fixed at checkout (sum of line items)
/// and never recomputed from current menu prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    /// Cleared when the table is deleted; closed orders outlive their table.
    pub table_id: Option<i64>,
    pub status: OrderStatus,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
}

/// A persisted order line. Immutable once created; removed only by cascading
/// order deletion. `price` is the unit price captured at order time,
/// decoupled from later menu price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i64,
    pub price: i64,
}

impl OrderItem {
    /// Line total (quantity × captured unit price).
    #[inline]
    pub fn line_total(&self) -> i64 {
        self.quantity * self.price
    }
}

/// A stock item tracked by the inventory ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    /// Low-stock warning level.
    pub threshold: i64,
}

impl InventoryItem {
    /// Derived stock classification. Recomputed on every read.
    #[inline]
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.quantity, self.threshold)
    }
}

/// One recorded stock movement. Append-only: never mutated or deleted except
/// via item deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryMovement {
    pub id: i64,
    pub inventory_id: i64,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    #[serde(rename = "type")]
    pub movement: MovementType,
    pub quantity: i64,
    pub price: Option<i64>,
    pub supplier: Option<String>,
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_terminal() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Preparing.is_terminal());
        assert!(!OrderStatus::Served.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_order_status_sort_priority() {
        // The staff board sorts actionable work first
        assert!(OrderStatus::Pending.sort_priority() < OrderStatus::Preparing.sort_priority());
        assert!(OrderStatus::Served.sort_priority() < OrderStatus::Completed.sort_priority());
        assert!(OrderStatus::Completed.sort_priority() < OrderStatus::Cancelled.sort_priority());
    }

    #[test]
    fn test_stock_status_boundaries() {
        assert_eq!(StockStatus::classify(0, 10), StockStatus::OutOfStock);
        assert_eq!(StockStatus::classify(-1, 10), StockStatus::OutOfStock);
        assert_eq!(StockStatus::classify(1, 10), StockStatus::Low);
        // Exactly at the threshold is still low
        assert_eq!(StockStatus::classify(10, 10), StockStatus::Low);
        assert_eq!(StockStatus::classify(11, 10), StockStatus::Ok);
        // Zero threshold: anything positive is ok
        assert_eq!(StockStatus::classify(1, 0), StockStatus::Ok);
    }

    #[test]
    fn test_role_is_staff() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Staff.is_staff());
        assert!(!Role::Customer.is_staff());
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
