//! # cafe-db: Database Layer for Cafe POS
//!
//! SQLite persistence for the order lifecycle and inventory ledger, using
//! sqlx for async operations.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (order, inventory, ...)
//!
//! ## Transaction Boundaries
//!
//! Every multi-statement mutation (checkout, status change with table
//! release, stock import, item deletion with history) runs inside a single
//! `pool.begin()` transaction: partial writes are impossible even if the
//! process crashes mid-operation. An uncommitted transaction rolls back when
//! dropped.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cafe_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/cafe.db")).await?;
//!
//! let mut cart = Cart::new();
//! cart.add_line(&latte, 2)?;
//! let order_id = db.orders().checkout(&mut cart, Some(table.id), user.id).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::inventory::InventoryRepository;
pub use repository::menu::MenuRepository;
pub use repository::order::OrderRepository;
pub use repository::report::ReportRepository;
pub use repository::table::TableRepository;
pub use repository::user::UserRepository;

// Read-model records handed to the presentation layer
pub use repository::inventory::MovementRecord;
pub use repository::order::{OrderSummary, PendingOrderNotice};
pub use repository::report::{
    CategorySales, DailyRevenue, ImportCostSummary, ItemSales, RevenueSummary, StatusCount,
};
