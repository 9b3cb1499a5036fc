//! # Invoice Rendering
//!
//! `render(invoice) → bytes`: an A4 Helvetica layout produced with
//! printpdf's builtin fonts. The function is pure with respect to the
//! invoice (it only reads it) and the document content is a
//! deterministic function of the invoice fields.
//!
//! Amounts on the document use the ISO currency code ("250.00 INR")
//! rather than the symbol: builtin PDF fonts cover Windows-1252 only, and
//! ₹ or € would not survive the trip.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::io::BufWriter;

use crate::error::{ExportError, ExportResult};
use quickinvoice_core::money::Money;
use quickinvoice_core::types::{Invoice, TaxMode};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const TOP_Y: f32 = 285.0;
const BOTTOM_MARGIN: f32 = 30.0;

// Items table column positions (mm from the left edge)
const X_NAME: f32 = 15.0;
const X_QTY: f32 = 120.0;
const X_PRICE: f32 = 140.0;
const X_AMOUNT: f32 = 172.0;

fn push_line(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    font_size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(text, font_size, Mm(x), Mm(y), font);
}

fn draw_rule(layer: &PdfLayerReference, y: f32) {
    layer.add_line(printpdf::Line {
        points: vec![
            (printpdf::Point::new(Mm(15.0), Mm(y)), false),
            (printpdf::Point::new(Mm(195.0), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn money_with_code(amount: Money, code: &str) -> String {
    format!("{} {}", amount, code)
}

/// Renders an invoice into PDF bytes.
///
/// Invoked on a fully computed (ideally validated) invoice; never mutates
/// it. An unfinalized draft renders with "DRAFT" in place of the number.
/// Long item lists flow onto additional pages.
pub fn render(invoice: &Invoice) -> ExportResult<Vec<u8>> {
    let (doc, page1, layer1) = PdfDocument::new(
        "Invoice",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let mut layer = doc.get_page(page1).get_layer(layer1);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Render(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Render(e.to_string()))?;

    let code = invoice.currency.code.as_str();
    let mut y: f32 = TOP_Y;

    // Header: seller (left)
    push_line(&layer, &font_bold, &invoice.seller.name, 16.0, 15.0, y);
    y -= 7.0;
    for line in invoice.seller.address.lines().take(3) {
        push_line(&layer, &font, line, 10.0, 15.0, y);
        y -= 5.0;
    }
    if let Some(tax_id) = invoice.seller.tax_id.as_deref().filter(|s| !s.is_empty()) {
        let label = if invoice.tax.label.is_empty() {
            "Tax"
        } else {
            &invoice.tax.label
        };
        push_line(&layer, &font, &format!("{} ID: {}", label, tax_id), 10.0, 15.0, y);
        y -= 5.0;
    }

    // Header: title (right)
    push_line(&layer, &font_bold, "INVOICE", 24.0, 145.0, TOP_Y);
    let number = if invoice.invoice_number.is_empty() {
        "DRAFT"
    } else {
        &invoice.invoice_number
    };
    push_line(&layer, &font_bold, number, 12.0, 145.0, TOP_Y - 8.0);

    y = y.min(263.0);
    draw_rule(&layer, y);
    y -= 10.0;

    // Customer + invoice details
    push_line(&layer, &font_bold, "Bill To:", 12.0, 15.0, y);
    push_line(&layer, &font_bold, "Details:", 12.0, 120.0, y);
    y -= 7.0;

    push_line(&layer, &font, &invoice.customer.name, 10.0, 15.0, y);
    let issue_date = invoice
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    push_line(&layer, &font, &format!("Date: {}", issue_date), 10.0, 120.0, y);
    y -= 5.0;

    let mut customer_lines = invoice.customer.address.lines().take(3);
    if let Some(line) = customer_lines.next() {
        push_line(&layer, &font, line, 10.0, 15.0, y);
    }
    push_line(&layer, &font, &format!("Currency: {}", code), 10.0, 120.0, y);
    y -= 5.0;
    for line in customer_lines {
        push_line(&layer, &font, line, 10.0, 15.0, y);
        y -= 5.0;
    }

    y -= 8.0;

    // Items table
    let table_header = |layer: &PdfLayerReference, y: f32| {
        push_line(layer, &font_bold, "Item", 10.0, X_NAME, y);
        push_line(layer, &font_bold, "Qty", 10.0, X_QTY, y);
        push_line(layer, &font_bold, "Price", 10.0, X_PRICE, y);
        push_line(layer, &font_bold, "Amount", 10.0, X_AMOUNT, y);
        draw_rule(layer, y - 3.5);
    };

    table_header(&layer, y);
    y -= 10.0;

    for item in &invoice.items {
        if y < BOTTOM_MARGIN {
            let (page, inner_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(inner_layer);
            y = TOP_Y;
            table_header(&layer, y);
            y -= 10.0;
        }

        push_line(&layer, &font, &item.name, 10.0, X_NAME, y);
        push_line(&layer, &font, &item.qty.to_string(), 10.0, X_QTY, y);
        push_line(&layer, &font, &item.unit_price().to_string(), 10.0, X_PRICE, y);
        push_line(&layer, &font_bold, &item.line_total().to_string(), 10.0, X_AMOUNT, y);
        y -= 6.0;
    }

    y -= 4.0;
    if y < BOTTOM_MARGIN {
        let (page, inner_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        layer = doc.get_page(page).get_layer(inner_layer);
        y = TOP_Y;
    }
    draw_rule(&layer, y);
    y -= 10.0;

    // Totals block
    push_line(&layer, &font, "Subtotal:", 11.0, 140.0, y);
    push_line(
        &layer,
        &font,
        &invoice.totals.subtotal().to_string(),
        11.0,
        X_AMOUNT,
        y,
    );
    y -= 7.0;

    if invoice.tax.mode != TaxMode::None {
        let tax_line = format!(
            "{} ({}%):",
            invoice.tax.label,
            invoice.tax.rate_percentage()
        );
        push_line(&layer, &font, &tax_line, 11.0, 140.0, y);
        push_line(
            &layer,
            &font,
            &invoice.totals.tax().to_string(),
            11.0,
            X_AMOUNT,
            y,
        );
        y -= 7.0;
    }

    push_line(&layer, &font_bold, "TOTAL:", 13.0, 140.0, y);
    push_line(
        &layer,
        &font_bold,
        &money_with_code(invoice.totals.total(), code),
        13.0,
        165.0,
        y,
    );

    // Verification line when the QR option is on
    if invoice.qr_enabled {
        push_line(
            &layer,
            &font,
            &format!(
                "Verification: Invoice {} / {}",
                number,
                money_with_code(invoice.totals.total(), code)
            ),
            9.0,
            15.0,
            18.0,
        );
    }

    push_line(&layer, &font, "Generated with QuickInvoice.", 9.0, 15.0, 12.0);

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| ExportError::Render(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Render(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quickinvoice_core::catalog;
    use quickinvoice_core::types::InvoiceItem;

    fn sample_invoice() -> Invoice {
        let mut invoice = Invoice::from_preset(catalog::preset("INDIA_GST").unwrap())
            .with_item_added(InvoiceItem::with("Design work", 2, Money::from_cents(10_000)))
            .with_item_added(InvoiceItem::with("Hosting", 1, Money::from_cents(5_000)));
        invoice.seller.name = "Lotus Web Services".to_string();
        invoice.seller.address = "12 Hill Road\nMumbai 400050".to_string();
        invoice.customer.name = "Sagar Textiles".to_string();
        invoice.customer.address = "7 MG Road, Pune".to_string();
        invoice.invoice_number = "GST-2026-0001".to_string();
        invoice
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render(&sample_invoice()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_does_not_mutate() {
        let invoice = sample_invoice();
        let before = invoice.clone();
        let _ = render(&invoice).unwrap();
        assert_eq!(invoice, before);
    }

    #[test]
    fn test_render_draft_without_number() {
        let mut invoice = sample_invoice();
        invoice.invoice_number = String::new();
        let bytes = render(&invoice).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_flows_long_item_lists() {
        let mut invoice = sample_invoice();
        for n in 0..80 {
            invoice =
                invoice.with_item_added(InvoiceItem::with(format!("Line {n}"), 1, Money::from_cents(100)));
        }
        let bytes = render(&invoice).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_with_qr_flag() {
        let mut invoice = sample_invoice();
        invoice.qr_enabled = true;
        let bytes = render(&invoice).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
