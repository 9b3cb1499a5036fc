//! # Invoice Number Formatting
//!
//! The pure half of invoice-number generation: deterministic formatting of
//! a reserved sequence, plus the share-summary string handed to external
//! share targets.
//!
//! Reserving the sequence itself is a persistence concern: the repository
//! increments a counter row in the same transaction as the save, so two
//! racing finalizations can never format the same sequence.

use crate::types::Invoice;

/// Formats an invoice number from a jurisdiction prefix, a period (year),
/// and a reserved sequence: `GST-2026-0007`.
///
/// Sequences are zero-padded to four digits but not capped; 10000 keeps
/// going as `GST-2026-10000`.
pub fn format_invoice_number(prefix: &str, year: i32, seq: i64) -> String {
    format!("{}-{}-{:04}", prefix, year, seq)
}

/// The counter row key for a prefix + period. Each jurisdiction restarts
/// its sequence every year.
pub fn counter_key(prefix: &str, year: i32) -> String {
    format!("{}-{}", prefix, year)
}

/// The number prefix for an invoice: the jurisdiction prefix carried on
/// its tax treatment ("GST", "VAT"). Treatments built without one (old
/// records, hand-rolled configs) fall back to a prefix derived from the
/// tax label, and finally to `INV`.
///
/// Whichever source wins is stripped to uppercase alphanumerics so the
/// prefix is always filename- and transport-safe.
pub fn number_prefix(invoice: &Invoice) -> String {
    let declared = sanitize_prefix(&invoice.tax.number_prefix);
    if !declared.is_empty() {
        return declared;
    }

    let from_label = sanitize_prefix(&invoice.tax.label);
    if from_label.is_empty() {
        "INV".to_string()
    } else {
        from_label
    }
}

fn sanitize_prefix(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Builds the pre-formatted share text for an invoice:
/// `Invoice GST-2026-0007\nAmount: 295.00 INR`.
///
/// The output is injected into share URLs (WhatsApp, mailto) by the
/// presentation layer, so the invoice number is stripped to characters
/// that survive any transport's escaping.
pub fn share_summary(invoice: &Invoice) -> String {
    let number: String = invoice
        .invoice_number
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();

    format!(
        "Invoice {}\nAmount: {} {}",
        number,
        invoice.totals.total(),
        invoice.currency.code
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
