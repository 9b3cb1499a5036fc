//! # Export Error Types
//!
//! Errors for the PDF export boundary. Kept separate from the store's
//! error taxonomy on purpose: when export fails after a successful save,
//! the user must learn "the invoice was saved but not exported", not a
//! muddled generic failure.

use thiserror::Error;

/// Export operation errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The rendering backend failed to produce a document.
    #[error("PDF rendering failed: {0}")]
    Render(String),

    /// Writing the rendered document to disk failed.
    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),

    /// The preview handle was revoked or outlived its TTL.
    #[error("preview is no longer available")]
    PreviewExpired,
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
