//! # Totals Engine
//!
//! The pure function at the center of the system: items + tax in, the
//! derived `{subtotal, tax, total}` snapshot out.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  compute(items, tax)                                                    │
//! │                                                                         │
//! │  subtotal = Σ qty_i × price_i      (exact integer minor units)         │
//! │  tax      = 0                       when mode is NONE                   │
//! │           = round_half_up(subtotal × rate)   otherwise                  │
//! │  total    = subtotal + tax                                              │
//! │                                                                         │
//! │  Pure. Deterministic. No I/O. Re-invoked after every mutation -        │
//! │  update() is the only mutation path and it always calls compute().     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Negative quantities and prices are rejected upstream by validation; if
//! one slips through anyway, each line clamps to zero so the engine never
//! produces a negative total.

use crate::money::Money;
use crate::types::{InvoiceItem, TaxMode, TaxTreatment, Totals};

/// Computes the derived totals snapshot for a set of items under a tax
/// treatment.
///
/// ## Example
/// ```rust
/// use quickinvoice_core::catalog;
/// use quickinvoice_core::money::Money;
/// use quickinvoice_core::totals::compute;
/// use quickinvoice_core::types::InvoiceItem;
///
/// let items = vec![
///     InvoiceItem::with("Design work", 2, Money::from_cents(10_000)),
///     InvoiceItem::with("Hosting", 1, Money::from_cents(5_000)),
/// ];
/// let tax = catalog::preset("INDIA_GST").unwrap().tax(); // GST 18%
///
/// let totals = compute(&items, &tax);
/// assert_eq!(totals.subtotal_cents, 25_000); // 250.00
/// assert_eq!(totals.tax_cents, 4_500);       //  45.00
/// assert_eq!(totals.total_cents, 29_500);    // 295.00
/// ```
pub fn compute(items: &[InvoiceItem], tax: &TaxTreatment) -> Totals {
    // Accumulate in i128: 100 items × 10,000 qty × 10^9 cents stays exact.
    let subtotal_wide: i128 = items
        .iter()
        .map(|item| item.line_total().cents() as i128)
        .sum();
    let subtotal = Money::from_cents(subtotal_wide as i64);

    let tax_amount = match tax.mode {
        TaxMode::None => Money::zero(),
        TaxMode::FixedRate => subtotal.tax_at(tax.rate_bps),
    };

    Totals {
        subtotal_cents: subtotal.cents(),
        tax_cents: tax_amount.cents(),
        total_cents: (subtotal + tax_amount).cents(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
