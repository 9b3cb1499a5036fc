//! # Domain Types
//!
//! Core domain types used throughout QuickInvoice.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Invoice      │   │  InvoiceItem    │   │     Party       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  name           │       │
//! │  │  invoice_number │   │  name           │   │  address        │       │
//! │  │  seller/customer│   │  qty            │   │  tax_id?        │       │
//! │  │  items, totals  │   │  unit_price     │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxMode      │   │  TaxTreatment   │   │     Totals      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  None           │   │  mode           │   │  subtotal       │       │
//! │  │  FixedRate      │   │  label          │   │  tax            │       │
//! │  └─────────────────┘   │  rate_bps       │   │  total          │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! An invoice has:
//! - `id`: UUID v4 - immutable, the repository's primary key
//! - `invoice_number`: human-readable business ID, empty until finalized,
//!   immutable and unique once assigned

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::TaxPresetDef;
use crate::money::Money;
use crate::totals;

// =============================================================================
// Party
// =============================================================================

/// One side of the billing relationship (seller or customer).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Display name (company or person).
    pub name: String,

    /// Postal address, free text.
    pub address: String,

    /// Jurisdiction tax identifier (GSTIN, VAT number, ...).
    /// Only meaningful when the invoice's tax mode is not NONE.
    pub tax_id: Option<String>,
}

// =============================================================================
// Currency
// =============================================================================

/// The currency an invoice is denominated in.
///
/// Denormalized from the catalog onto each invoice so historical records
/// keep their symbol even if the catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code ("INR", "USD", ...).
    pub code: String,

    /// Display symbol ("₹", "$", ...).
    pub symbol: String,
}

impl Currency {
    /// Formats an amount with this currency's symbol: `₹250.00`.
    pub fn format(&self, amount: Money) -> String {
        format!("{}{}", self.symbol, amount)
    }
}

// =============================================================================
// Tax Treatment
// =============================================================================

/// How tax is applied to an invoice's subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxMode {
    /// No tax line at all; total equals subtotal.
    None,
    /// A single fixed rate applied to the whole subtotal.
    FixedRate,
}

impl Default for TaxMode {
    fn default() -> Self {
        TaxMode::None
    }
}

/// The tax configuration applied uniformly to an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTreatment {
    pub mode: TaxMode,

    /// Label shown on the totals panel and the document ("GST", "VAT").
    pub label: String,

    /// Rate in basis points (1800 = 18%). Ignored when mode is NONE.
    pub rate_bps: u32,

    /// Prefix for generated invoice numbers ("GST" → GST-2026-0001).
    /// Populated from the jurisdiction preset; records that predate the
    /// field deserialize empty and fall back to a label-derived prefix
    /// in [`crate::number::number_prefix`].
    #[serde(default)]
    pub number_prefix: String,
}

impl TaxTreatment {
    /// A no-tax treatment.
    pub fn none() -> Self {
        TaxTreatment {
            mode: TaxMode::None,
            label: String::new(),
            rate_bps: 0,
            number_prefix: "INV".to_string(),
        }
    }

    /// Rate as a display percentage (18.0 for 1800 bps).
    #[inline]
    pub fn rate_percentage(&self) -> f64 {
        self.rate_bps as f64 / 100.0
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A single line item on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Unique within the invoice, assigned at creation.
    pub id: String,

    /// Item description, bounded length.
    pub name: String,

    /// Quantity, non-negative integer.
    pub qty: i64,

    /// Unit price in minor units.
    pub unit_price_cents: i64,
}

impl InvoiceItem {
    /// Creates a blank item the way the editor adds a new row.
    pub fn new() -> Self {
        InvoiceItem {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            qty: 1,
            unit_price_cents: 0,
        }
    }

    /// Creates an item with the given fields and a fresh id.
    pub fn with(name: impl Into<String>, qty: i64, unit_price: Money) -> Self {
        InvoiceItem {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            qty,
            unit_price_cents: unit_price.cents(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line amount = qty × unit price, always derived, never stored.
    ///
    /// Negative quantities or prices are clamped to zero so a bad row can
    /// never drag a total negative.
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents.max(0)).times(self.qty.max(0))
    }
}

impl Default for InvoiceItem {
    fn default() -> Self {
        InvoiceItem::new()
    }
}

// =============================================================================
// Totals
// =============================================================================

/// The derived `{subtotal, tax, total}` snapshot.
///
/// Always a pure function of `{items, tax}` via [`crate::totals::compute`];
/// no code path may persist an invoice whose totals are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl Totals {
    /// All-zero totals (empty invoice).
    pub const fn zero() -> Self {
        Totals {
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
        }
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// The aggregate billing document.
///
/// ## Lifecycle
/// ```text
/// Invoice::from_preset ──► update() edits ──► validate ──► finalize/save
///       (in memory)         (totals re-derived)            (durable, numbered)
/// ```
///
/// `id` is assigned once at creation and immutable. `invoice_number` stays
/// empty until the generate step completes, then never changes for this id.
/// `created_at` is `None` until the repository's first save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub created_at: Option<DateTime<Utc>>,
    pub seller: Party,
    pub customer: Party,
    pub currency: Currency,
    pub tax: TaxTreatment,
    pub items: Vec<InvoiceItem>,
    pub totals: Totals,
    /// Presentation flag consumed by the PDF boundary.
    pub qr_enabled: bool,
}

impl Invoice {
    /// Creates an empty invoice from a jurisdiction preset.
    ///
    /// All fields at defaults, fresh id, zero totals, no number.
    pub fn from_preset(preset: &TaxPresetDef) -> Self {
        Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_number: String::new(),
            created_at: None,
            seller: Party::default(),
            customer: Party::default(),
            currency: preset.currency(),
            tax: preset.tax(),
            items: Vec::new(),
            totals: Totals::zero(),
            qr_enabled: false,
        }
    }

    /// Structural copy with a fresh id and a cleared invoice number.
    ///
    /// The duplicate is a brand-new draft: it has never been saved
    /// (`created_at` unset) and never finalized (number empty).
    pub fn duplicate(&self) -> Self {
        Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_number: String::new(),
            created_at: None,
            ..self.clone()
        }
    }

    /// Recomputes the derived totals snapshot in place.
    ///
    /// Prefer [`crate::update::update`]; this exists for callers that have
    /// just deserialized an invoice and need to re-establish the invariant.
    pub fn refresh_totals(&mut self) {
        self.totals = totals::compute(&self.items, &self.tax);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_from_preset_starts_empty() {
        let preset = catalog::preset("INDIA_GST").unwrap();
        let invoice = Invoice::from_preset(preset);

        assert!(!invoice.id.is_empty());
        assert!(invoice.invoice_number.is_empty());
        assert!(invoice.created_at.is_none());
        assert!(invoice.items.is_empty());
        assert_eq!(invoice.totals, Totals::zero());
        assert_eq!(invoice.currency.code, "INR");
        assert_eq!(invoice.tax.mode, TaxMode::FixedRate);
    }

    #[test]
    fn test_duplicate_clears_identity() {
        let preset = catalog::preset("INDIA_GST").unwrap();
        let mut original = Invoice::from_preset(preset);
        original.invoice_number = "GST-2026-0001".to_string();
        original.created_at = Some(Utc::now());
        original.seller.name = "Acme".to_string();

        let copy = original.duplicate();
        assert_ne!(copy.id, original.id);
        assert!(copy.invoice_number.is_empty());
        assert!(copy.created_at.is_none());
        assert_eq!(copy.seller.name, "Acme");
    }

    #[test]
    fn test_line_total_clamps_negatives() {
        let mut item = InvoiceItem::with("Widget", 2, Money::from_cents(100));
        assert_eq!(item.line_total().cents(), 200);

        item.qty = -2;
        assert_eq!(item.line_total().cents(), 0);

        item.qty = 2;
        item.unit_price_cents = -100;
        assert_eq!(item.line_total().cents(), 0);
    }

    #[test]
    fn test_currency_format() {
        let currency = Currency {
            code: "INR".to_string(),
            symbol: "₹".to_string(),
        };
        assert_eq!(currency.format(Money::from_cents(25_000)), "₹250.00");
    }

    #[test]
    fn test_tax_mode_serde_names() {
        assert_eq!(serde_json::to_string(&TaxMode::None).unwrap(), "\"NONE\"");
        assert_eq!(
            serde_json::to_string(&TaxMode::FixedRate).unwrap(),
            "\"FIXED_RATE\""
        );
    }
}
