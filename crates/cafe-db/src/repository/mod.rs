//! # Repository Module
//!
//! Database repository implementations for Cafe POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  GUI event handler                                          │
//! │       │  db.orders().checkout(&mut cart, table, user)       │
//! │       ▼                                                     │
//! │  OrderRepository                                            │
//! │  ├── checkout(&self, cart, table_id, user_id)               │
//! │  ├── set_status(&self, order_id, new_status)                │
//! │  └── list_for_staff(&self)                                  │
//! │       │  SQL inside one transaction                         │
//! │       ▼                                                     │
//! │  SQLite database                                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The repositories are stateless: each method takes explicit parameters and
//! borrows a pooled connection, so the core is testable without a GUI.
//!
//! ## Available Repositories
//!
//! - [`order::OrderRepository`] - cart-to-order conversion and status machine
//! - [`table::TableRepository`] - seating units and occupancy
//! - [`menu::MenuRepository`] - categories and menu items
//! - [`inventory::InventoryRepository`] - stock levels and movement ledger
//! - [`user::UserRepository`] - accounts and authentication
//! - [`report::ReportRepository`] - read-only revenue aggregation

pub mod inventory;
pub mod menu;
pub mod order;
pub mod report;
pub mod table;
pub mod user;

#[cfg(test)]
pub(crate) mod testutil;
