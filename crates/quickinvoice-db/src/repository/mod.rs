//! # Repository Module
//!
//! Database repository implementation for QuickInvoice.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │                                                                 │
//! │       │  db.invoices().list_recent(5)                                   │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                      │
//! │  ├── save(&self, invoice)                                               │
//! │  ├── finalize(&self, invoice)                                           │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── list_recent(&self, limit)                                          │
//! │  └── delete(&self, id)                                                  │
//! │       │                                                                 │
//! │       │  SQL (one transaction per mutation)                             │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • SQL is isolated in one place                                        │
//! │  • The invariants (immutable number, fresh totals) live at the         │
//! │    persistence boundary where every caller passes through              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod invoice;
