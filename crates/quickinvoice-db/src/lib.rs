//! # quickinvoice-db: Persistence Layer for QuickInvoice
//!
//! This crate provides durable local storage for the invoice collection.
//! It uses SQLite via sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     QuickInvoice Data Flow                              │
//! │                                                                         │
//! │  Editor action (generate, duplicate, delete)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  quickinvoice-db (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │   Database    │   │   Repository   │   │  Migrations   │  │   │
//! │  │   │   (pool.rs)   │◄──│  (invoice.rs)  │   │  (embedded)   │  │   │
//! │  │   │   SqlitePool  │   │  save/finalize │   │  001_init.sql │  │   │
//! │  │   │   EventBus    │   │  get/list/del  │   │               │  │   │
//! │  │   └───────────────┘   └────────────────┘   └───────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (one per user, WAL mode)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, shared handle, configuration
//! - [`migrations`] - Embedded database migrations
//! - [`events`] - Post-commit change notifications
//! - [`error`] - Store error types
//! - [`repository`] - The invoice repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quickinvoice_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/quickinvoice.db")).await?;
//! let mut changes = db.subscribe();
//!
//! let saved = db.invoices().finalize(&invoice).await?;
//! let recent = db.invoices().list_recent(5).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod events;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use events::StoreEvent;
pub use pool::{Database, DbConfig};

// Repository re-export for convenience
pub use repository::invoice::InvoiceRepository;
