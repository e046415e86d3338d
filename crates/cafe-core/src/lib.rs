//! # cafe-core: Pure Domain Logic for Cafe POS
//!
//! This crate contains the order-lifecycle and inventory domain logic as pure
//! types and functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Cafe POS Architecture                         │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  GUI shell (external)                       │   │
//! │  │    order form ──► staff board ──► inventory ──► reports     │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                    │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │               ★ cafe-core (THIS CRATE) ★                    │   │
//! │  │                                                             │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌────────────┐               │   │
//! │  │   │  types   │  │   cart   │  │ validation │               │   │
//! │  │   │ statuses │  │ CartLine │  │   rules    │               │   │
//! │  │   └──────────┘  └──────────┘  └────────────┘               │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                    │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                  cafe-db (Database Layer)                   │   │
//! │  │          SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, DiningTable, InventoryItem, statuses)
//! - [`cart`] - Transient cart assembled before checkout
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output; stock status is derived,
//!    never cached
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all amounts are whole VND (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

pub mod cart;
pub mod error;
pub mod types;
pub mod validation;

// Re-exports so users can do `use cafe_core::Cart` instead of
// `use cafe_core::cart::Cart`
pub use cart::{Cart, CartLine};
pub use error::ValidationError;
pub use types::*;

/// Maximum quantity of a single line added to a cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10).
/// Matches the quantity selector range offered by the order form.
pub const MAX_LINE_QUANTITY: i64 = 100;
