//! # Validation Module
//!
//! Field-level invoice validation for QuickInvoice.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Input sanitization (presentation layer)                      │
//! │  ├── Character filtering, length caps on keystrokes                    │
//! │  └── Immediate feedback                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - gates the "generate" step                      │
//! │  ├── Returns a field-path → message map, never throws                  │
//! │  └── Empty map ⇔ invoice is valid                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database constraints (NOT NULL, UNIQUE number)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field paths use dotted/indexed names (`items.2.qty`) so the editor can
//! attach each error to the exact control that produced it. The map is
//! rebuilt from scratch on every call: keys are positional, and an item
//! removed or reordered since the last call must not leave a stale key.

use std::collections::BTreeMap;

use crate::types::{Invoice, TaxMode};
use crate::{
    MAX_INVOICE_ITEMS, MAX_ITEM_NAME_LEN, MAX_ITEM_QTY, MAX_PARTY_NAME_LEN, MAX_TAX_ID_LEN,
    MAX_UNIT_PRICE_CENTS,
};

/// Field path → human-readable message.
///
/// `BTreeMap` keeps iteration deterministic, which keeps error rendering
/// and test assertions stable.
pub type ValidationErrors = BTreeMap<String, String>;

/// Validates an invoice snapshot.
///
/// Advisory and non-mutating: the invoice is only inspected. Returns an
/// empty map when fully valid.
///
/// ## Rules
/// - `seller.name` - required, non-blank, at most [`MAX_PARTY_NAME_LEN`] chars
/// - `seller.address` - required, non-blank
/// - `items` - at least one, at most [`MAX_INVOICE_ITEMS`]
/// - `items.<i>.name` - required, at most [`MAX_ITEM_NAME_LEN`] chars
/// - `items.<i>.qty` - 1 ..= [`MAX_ITEM_QTY`]
/// - `items.<i>.price` - 0 ..= [`MAX_UNIT_PRICE_CENTS`]
/// - `seller.taxId` - checked only when tax mode ≠ NONE and an id was
///   entered: 1 ..= [`MAX_TAX_ID_LEN`] uppercase alphanumeric chars
pub fn validate(invoice: &Invoice) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    // Seller
    if invoice.seller.name.trim().is_empty() {
        errors.insert(
            "seller.name".to_string(),
            "Seller name is required".to_string(),
        );
    } else if invoice.seller.name.chars().count() > MAX_PARTY_NAME_LEN {
        errors.insert(
            "seller.name".to_string(),
            format!("Seller name must be at most {} characters", MAX_PARTY_NAME_LEN),
        );
    }
    if invoice.seller.address.trim().is_empty() {
        errors.insert(
            "seller.address".to_string(),
            "Seller address is required".to_string(),
        );
    }

    // Tax id only matters when a tax line exists
    if invoice.tax.mode != TaxMode::None {
        if let Some(tax_id) = &invoice.seller.tax_id {
            let tax_id = tax_id.trim();
            if !tax_id.is_empty() && !is_valid_tax_id(tax_id) {
                errors.insert(
                    "seller.taxId".to_string(),
                    format!(
                        "{} ID must be 1-{} uppercase letters or digits",
                        display_tax_label(invoice),
                        MAX_TAX_ID_LEN
                    ),
                );
            }
        }
    }

    // Items
    if invoice.items.is_empty() {
        errors.insert(
            "items".to_string(),
            "Add at least one item".to_string(),
        );
    } else if invoice.items.len() > MAX_INVOICE_ITEMS {
        errors.insert(
            "items".to_string(),
            format!("An invoice cannot have more than {} items", MAX_INVOICE_ITEMS),
        );
    }

    for (index, item) in invoice.items.iter().enumerate() {
        if item.name.trim().is_empty() {
            errors.insert(
                format!("items.{index}.name"),
                "Item name is required".to_string(),
            );
        } else if item.name.chars().count() > MAX_ITEM_NAME_LEN {
            errors.insert(
                format!("items.{index}.name"),
                format!("Item name must be at most {} characters", MAX_ITEM_NAME_LEN),
            );
        }

        if item.qty < 1 {
            errors.insert(
                format!("items.{index}.qty"),
                "Quantity must be at least 1".to_string(),
            );
        } else if item.qty > MAX_ITEM_QTY {
            errors.insert(
                format!("items.{index}.qty"),
                format!("Quantity cannot exceed {}", MAX_ITEM_QTY),
            );
        }

        if item.unit_price_cents < 0 {
            errors.insert(
                format!("items.{index}.price"),
                "Price cannot be negative".to_string(),
            );
        } else if item.unit_price_cents > MAX_UNIT_PRICE_CENTS {
            errors.insert(
                format!("items.{index}.price"),
                "Price is too large".to_string(),
            );
        }
    }

    errors
}

fn is_valid_tax_id(tax_id: &str) -> bool {
    !tax_id.is_empty()
        && tax_id.len() <= MAX_TAX_ID_LEN
        && tax_id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

fn display_tax_label(invoice: &Invoice) -> &str {
    if invoice.tax.label.is_empty() {
        "Tax"
    } else {
        &invoice.tax.label
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
