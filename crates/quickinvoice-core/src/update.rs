//! # Invoice Updates
//!
//! The single mutation path for in-memory invoices: a pure
//! `update(invoice, patch) → invoice'` that structurally copies the old
//! invoice, overrides the patched fields, and **always** re-derives the
//! totals snapshot. No caller ever writes `invoice.totals` by hand.
//!
//! Identity fields (`id`, `invoice_number`, `created_at`) are deliberately
//! absent from the patch; they are owned by creation and the repository.

use serde::{Deserialize, Serialize};

use crate::totals;
use crate::types::{Currency, Invoice, InvoiceItem, Party, TaxTreatment};

/// A partial overlay of editable invoice fields.
///
/// `None` leaves the field untouched; `Some` replaces it wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoicePatch {
    pub seller: Option<Party>,
    pub customer: Option<Party>,
    pub currency: Option<Currency>,
    pub tax: Option<TaxTreatment>,
    pub items: Option<Vec<InvoiceItem>>,
    pub qr_enabled: Option<bool>,
}

/// Applies a patch to an invoice, returning the new version.
///
/// The input is untouched; old and new versions share no mutable state.
/// Totals are recomputed unconditionally, so they can never go stale
/// relative to items or tax.
pub fn update(invoice: &Invoice, patch: InvoicePatch) -> Invoice {
    let mut next = invoice.clone();

    if let Some(seller) = patch.seller {
        next.seller = seller;
    }
    if let Some(customer) = patch.customer {
        next.customer = customer;
    }
    if let Some(currency) = patch.currency {
        next.currency = currency;
    }
    if let Some(tax) = patch.tax {
        next.tax = tax;
    }
    if let Some(items) = patch.items {
        next.items = items;
    }
    if let Some(qr_enabled) = patch.qr_enabled {
        next.qr_enabled = qr_enabled;
    }

    next.totals = totals::compute(&next.items, &next.tax);
    next
}

impl Invoice {
    /// Returns a copy with `item` appended (insertion order preserved).
    pub fn with_item_added(&self, item: InvoiceItem) -> Invoice {
        let mut items = self.items.clone();
        items.push(item);
        update(
            self,
            InvoicePatch {
                items: Some(items),
                ..Default::default()
            },
        )
    }

    /// Returns a copy with the item at `index` removed.
    /// Out-of-range indices are a no-op (totals still re-derived).
    pub fn with_item_removed(&self, index: usize) -> Invoice {
        let mut items = self.items.clone();
        if index < items.len() {
            items.remove(index);
        }
        update(
            self,
            InvoicePatch {
                items: Some(items),
                ..Default::default()
            },
        )
    }

    /// Returns a copy with the item at `index` replaced.
    /// The replacement keeps the existing item id.
    pub fn with_item_replaced(&self, index: usize, item: InvoiceItem) -> Invoice {
        let mut items = self.items.clone();
        if let Some(slot) = items.get_mut(index) {
            let id = slot.id.clone();
            *slot = InvoiceItem { id, ..item };
        }
        update(
            self,
            InvoicePatch {
                items: Some(items),
                ..Default::default()
            },
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::money::Money;
    use crate::types::Totals;

    fn draft() -> Invoice {
        Invoice::from_preset(catalog::preset("INDIA_GST").unwrap())
    }

    #[test]
    fn test_update_re_derives_totals() {
        let invoice = draft();
        let updated = update(
            &invoice,
            InvoicePatch {
                items: Some(vec![
                    InvoiceItem::with("Design", 2, Money::from_cents(10_000)),
                    InvoiceItem::with("Hosting", 1, Money::from_cents(5_000)),
                ]),
                ..Default::default()
            },
        );

        assert_eq!(updated.totals.subtotal_cents, 25_000);
        assert_eq!(updated.totals.tax_cents, 4_500);
        assert_eq!(updated.totals.total_cents, 29_500);

        // The old version is untouched
        assert_eq!(invoice.totals, Totals::zero());
        assert!(invoice.items.is_empty());
    }

    #[test]
    fn test_tax_change_recomputes() {
        let invoice = draft().with_item_added(InvoiceItem::with("A", 1, Money::from_cents(10_000)));
        assert_eq!(invoice.totals.tax_cents, 1_800);

        let no_tax = update(
            &invoice,
            InvoicePatch {
                tax: Some(TaxTreatment::none()),
                ..Default::default()
            },
        );
        assert_eq!(no_tax.totals.tax_cents, 0);
        assert_eq!(no_tax.totals.total_cents, no_tax.totals.subtotal_cents);
    }

    #[test]
    fn test_identity_fields_survive_update() {
        let invoice = draft();
        let updated = update(
            &invoice,
            InvoicePatch {
                qr_enabled: Some(true),
                ..Default::default()
            },
        );

        assert_eq!(updated.id, invoice.id);
        assert_eq!(updated.invoice_number, invoice.invoice_number);
        assert_eq!(updated.created_at, invoice.created_at);
        assert!(updated.qr_enabled);
    }

    #[test]
    fn test_item_helpers() {
        let invoice = draft()
            .with_item_added(InvoiceItem::with("A", 1, Money::from_cents(100)))
            .with_item_added(InvoiceItem::with("B", 1, Money::from_cents(200)));
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.totals.subtotal_cents, 300);

        let removed = invoice.with_item_removed(0);
        assert_eq!(removed.items.len(), 1);
        assert_eq!(removed.items[0].name, "B");
        assert_eq!(removed.totals.subtotal_cents, 200);

        // Out of range: no-op
        let same = removed.with_item_removed(9);
        assert_eq!(same.items.len(), 1);

        let replaced =
            removed.with_item_replaced(0, InvoiceItem::with("B2", 2, Money::from_cents(150)));
        assert_eq!(replaced.items[0].name, "B2");
        assert_eq!(replaced.items[0].id, removed.items[0].id);
        assert_eq!(replaced.totals.subtotal_cents, 300);
    }
}
