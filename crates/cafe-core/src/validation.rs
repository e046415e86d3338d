//! # Validation Module
//!
//! Input validation applied before any write is issued.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Layer 1: GUI form widgets (spin boxes, combo boxes)        │
//! │           │                                                 │
//! │           ▼                                                 │
//! │  Layer 2: THIS MODULE - business rule validation            │
//! │           │                                                 │
//! │           ▼                                                 │
//! │  Layer 3: SQLite - NOT NULL, UNIQUE, CHECK, foreign keys    │
//! │                                                             │
//! │  Bulk loading goes through the same layer 2 checks as the   │
//! │  interactive create paths.                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::MAX_LINE_QUANTITY;

/// Validates an order line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_LINE_QUANTITY`] (the order form offers 1-100)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock import quantity. Imports have no upper bound but must
/// move at least one unit.
pub fn validate_import_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (menu item, category, inventory item).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 100 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates that a numeric field is strictly positive (table number,
/// capacity, thresholds).
pub fn validate_positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a low-stock threshold. Zero means "never warn".
pub fn validate_threshold(threshold: i64) -> ValidationResult<()> {
    if threshold < 0 {
        return Err(ValidationError::OutOfRange {
            field: "threshold".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a price in whole VND. Zero is allowed (promotional items).
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a username.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::required("username"));
    }

    if username.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    Ok(())
}
