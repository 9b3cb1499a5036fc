//! # quickinvoice-core: Pure Business Logic for QuickInvoice
//!
//! This crate is the **heart** of QuickInvoice. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      QuickInvoice Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Presentation Layer                           │   │
//! │  │    Editor UI ──► Preset picker ──► Item rows ──► Totals panel  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ quickinvoice-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │   │  types  │ │  money  │ │ totals  │ │validation│ │ number │ │   │
//! │  │   │ Invoice │ │  Money  │ │ compute │ │  rules   │ │ format │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO RENDERING • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        quickinvoice-db (SQLite)   quickinvoice-pdf (export)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - The invoice aggregate and its parts
//! - [`money`] - Integer minor-unit amounts, no floating point anywhere
//! - [`catalog`] - Supported currencies and jurisdiction tax presets
//! - [`totals`] - The totals engine: subtotal, tax, grand total
//! - [`update`] - Pure copy-with-override invoice updates
//! - [`validation`] - Field-level invoice validation
//! - [`number`] - Invoice number formatting and share summaries
//! - [`error`] - Domain error types
//!
//! ## Ground Rules
//!
//! 1. Everything here is deterministic: same input, same output
//! 2. No I/O of any kind; persistence and rendering live in sibling crates
//! 3. Amounts are i64 minor units ([`money::Money`]), summed exactly
//! 4. `Invoice.totals` is derived state; [`update::update`] re-computes it
//!    on every mutation and nothing else may author it
//!
//! ## Example Usage
//!
//! ```rust
//! use quickinvoice_core::catalog;
//! use quickinvoice_core::types::{Invoice, InvoiceItem};
//!
//! let preset = catalog::preset("INDIA_GST").unwrap();
//! let invoice = Invoice::from_preset(preset);
//!
//! assert!(invoice.invoice_number.is_empty());
//! assert_eq!(invoice.totals.total_cents, 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod number;
pub mod totals;
pub mod types;
pub mod update;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use quickinvoice_core::Money` instead of
// `use quickinvoice_core::money::Money`

pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use types::*;
pub use update::{update, InvoicePatch};
pub use validation::{validate, ValidationErrors};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum items allowed on a single invoice
///
/// ## Business Reason
/// Keeps invoices renderable on a single-page document and guards
/// against runaway item lists from a misbehaving caller.
pub const MAX_INVOICE_ITEMS: usize = 100;

/// Maximum quantity for a single line item
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 100000 instead of 10).
pub const MAX_ITEM_QTY: i64 = 10_000;

/// Maximum unit price in minor units (10,000,000.00 in any currency)
pub const MAX_UNIT_PRICE_CENTS: i64 = 1_000_000_000;

/// Maximum length of a line item name
pub const MAX_ITEM_NAME_LEN: usize = 60;

/// Maximum length of a seller/customer name
pub const MAX_PARTY_NAME_LEN: usize = 50;

/// Maximum length of a tax identifier
pub const MAX_TAX_ID_LEN: usize = 15;
