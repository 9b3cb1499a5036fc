//! # Error Types
//!
//! Domain-specific error types for quickinvoice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quickinvoice-core errors (this file)                                  │
//! │  └── CoreError        - Parse and catalog lookup failures              │
//! │                                                                         │
//! │  quickinvoice-db errors (separate crate)                               │
//! │  └── StoreError       - Persistence operation failures                 │
//! │                                                                         │
//! │  quickinvoice-pdf errors (separate crate)                              │
//! │  └── ExportError      - Rendering and delivery failures                │
//! │                                                                         │
//! │  Validation is NOT an error type: `validation::validate` returns a     │
//! │  field→message map as plain data, never an Err.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error is a typed `thiserror` variant carrying its context (the
//! offending input, the unknown key); no stringly-typed failures.

use thiserror::Error;

/// Core business logic errors: malformed inputs and unknown catalog
/// keys. The presentation layer turns these into field hints.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A monetary amount string could not be parsed.
    ///
    /// ## When This Occurs
    /// - Input contains characters other than digits and one decimal point
    /// - More than two decimal places
    /// - The amount overflows the supported range
    #[error("invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// No tax preset exists for the given key.
    #[error("unknown tax preset: {0}")]
    UnknownPreset(String),

    /// No currency exists for the given code.
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
