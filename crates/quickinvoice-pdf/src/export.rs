//! # Document Delivery
//!
//! The save-to-disk half of the export boundary: deterministic file
//! naming from the invoice number, and render + write in one step.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ExportResult;
use crate::render::render;
use quickinvoice_core::types::Invoice;

/// Builds the deterministic document name for an invoice number:
/// `Invoice_GST-2026-0001.pdf`. Drafts (empty number) become
/// `Invoice_draft.pdf`.
pub fn document_file_name(invoice_number: &str) -> String {
    format!("Invoice_{}.pdf", sanitize_file_stem(invoice_number))
}

/// Renders the invoice and writes it under its deterministic name in
/// `dir`. Returns the full path of the written file.
pub fn save_to_dir(invoice: &Invoice, dir: &Path) -> ExportResult<PathBuf> {
    let bytes = render(invoice)?;
    let path = dir.join(document_file_name(&invoice.invoice_number));
    fs::write(&path, bytes)?;
    debug!(path = %path.display(), "Invoice document written");
    Ok(path)
}

/// Strips characters that are hostile in file names. Empty input falls
/// back to "draft".
fn sanitize_file_stem(input: &str) -> String {
    let stem: String = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = stem.trim_matches('_').to_string();
    if trimmed.is_empty() {
        "draft".to_string()
    } else {
        trimmed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
