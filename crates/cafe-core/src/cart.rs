//! # Cart
//!
//! The transient, unpersisted list of line items assembled before checkout.
//!
//! ## Cart Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  pick item + quantity ──► add_line() ──► lines.push(line)   │
//! │                                              │              │
//! │  "Hoàn tất đơn hàng" ──► checkout(cart, …) ──┘              │
//! │       (cafe-db)          one transaction, then clear()      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here touches storage: the cart only becomes durable when
//! `OrderRepository::checkout` commits it.

use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::types::MenuItem;
use crate::validation::validate_quantity;

/// A (menu item, quantity, unit price) tuple inside a cart.
///
/// `unit_price` is frozen at the moment the line is added: a later menu
/// price change does not affect a cart already being assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub menu_item_id: i64,
    /// Item name at the time of adding, for display and receipts.
    pub name: String,
    pub quantity: i64,
    pub unit_price: i64,
}

impl CartLine {
    /// Line total (quantity × frozen unit price).
    #[inline]
    pub fn line_total(&self) -> i64 {
        self.quantity * self.unit_price
    }
}

/// The in-memory cart.
///
/// Lines are appended in the order they were added; adding the same item
/// twice produces two lines, exactly as the order form does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Appends a line for `item` with the given quantity.
    ///
    /// The item's current price is captured into the line. Quantity must be
    /// a positive integer within the order form's 1-100 range.
    pub fn add_line(&mut self, item: &MenuItem, quantity: i64) -> ValidationResult<()> {
        validate_quantity(quantity)?;

        self.lines.push(CartLine {
            menu_item_id: item.id,
            name: item.name.clone(),
            quantity,
            unit_price: item.price,
        });

        Ok(())
    }

    /// Removes the line at `index`, if it exists.
    pub fn remove_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// The lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of line totals. This becomes the order's fixed `total_amount`
    /// at checkout.
    pub fn total(&self) -> i64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Empties the cart. Called after a successful checkout.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MenuItemStatus;

    fn latte() -> MenuItem {
        MenuItem {
            id: 1,
            category_id: Some(1),
            name: "Latte".to_string(),
            description: None,
            price: 35_000,
            status: MenuItemStatus::Available,
        }
    }

    #[test]
    fn test_add_line_and_total() {
        let mut cart = Cart::new();
        cart.add_line(&latte(), 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total(), 70_000);
        assert_eq!(cart.lines()[0].name, "Latte");
    }

    #[test]
    fn test_same_item_appends_new_line() {
        let mut cart = Cart::new();
        cart.add_line(&latte(), 1).unwrap();
        cart.add_line(&latte(), 2).unwrap();

        // The order form appends, it does not merge
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total(), 105_000);
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut item = latte();
        cart.add_line(&item, 1).unwrap();

        item.price = 40_000;
        cart.add_line(&item, 1).unwrap();

        assert_eq!(cart.lines()[0].unit_price, 35_000);
        assert_eq!(cart.lines()[1].unit_price, 40_000);
        assert_eq!(cart.total(), 75_000);
    }

    #[test]
    fn test_invalid_quantity_rejected() {
        let mut cart = Cart::new();
        assert!(cart.add_line(&latte(), 0).is_err());
        assert!(cart.add_line(&latte(), -3).is_err());
        assert!(cart.add_line(&latte(), 101).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_line_and_clear() {
        let mut cart = Cart::new();
        cart.add_line(&latte(), 1).unwrap();
        cart.add_line(&latte(), 2).unwrap();

        cart.remove_line(0);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);

        // Out-of-range removal is a no-op
        cart.remove_line(5);
        assert_eq!(cart.line_count(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0);
    }
}
