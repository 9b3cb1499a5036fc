//! # Database Migrations
//!
//! Embedded schema migrations for the QuickInvoice store.
//!
//! The record shape will grow (due dates, payment status, notes are all
//! plausible futures), and an invoice database is exactly the kind of
//! file a user keeps for years. The contract is therefore: a version
//! bump migrates existing records forward, it never discards them.
//!
//! ## Versioning Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SQL files under migrations/sqlite/ are embedded at compile time.      │
//! │                                                                         │
//! │  On store open:                                                        │
//! │    applied  = rows of _sqlx_migrations (created on first open)         │
//! │    pending  = embedded files not yet recorded there                    │
//! │    each pending file runs, in filename order, inside a transaction     │
//! │                                                                         │
//! │  A store created by an older build simply has more pending files;     │
//! │  its invoices come through untouched.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding a Migration
//!
//! 1. Add `migrations/sqlite/NNN_description.sql` with the next number
//! 2. Additive SQL only (`ALTER TABLE ... ADD COLUMN` with a default);
//!    rewriting or dropping columns would orphan older stores
//! 3. Applied files are checksummed; never edit one after it has shipped

use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;

/// All migrations under `migrations/sqlite`, embedded into the binary by
/// `sqlx::migrate!`; nothing is read from disk at runtime.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Brings the store's schema up to date. Idempotent; called on every
/// connect unless the config disables it.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied");
    Ok(())
}

/// Returns `(embedded, applied)` migration counts, for diagnostics.
pub async fn migration_status(pool: &SqlitePool) -> StoreResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((embedded, applied as usize))
}
