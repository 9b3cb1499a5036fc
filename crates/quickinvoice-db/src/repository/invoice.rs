//! # Invoice Repository
//!
//! Database operations for the invoice collection.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Invoice Lifecycle                                  │
//! │                                                                         │
//! │  1. DRAFT SAVE (also duplicates)                                       │
//! │     └── save() → upsert, created_at assigned on first save             │
//! │                                                                         │
//! │  2. FINALIZE (the "generate" step)                                     │
//! │     └── finalize() → reserves a sequence from invoice_counters and     │
//! │         assigns the invoice number in the SAME transaction as the      │
//! │         upsert; an already-numbered invoice keeps its number           │
//! │                                                                         │
//! │  3. (OPTIONAL) DELETE                                                  │
//! │     └── delete() → idempotent, silent on missing id                    │
//! │                                                                         │
//! │  Every mutation commits atomically (invoice row + item rows + counter) │
//! │  and broadcasts StoreEvent::InvoicesChanged only after commit.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutability at the boundary
//! `id` is the primary key. `created_at` and a non-empty `invoice_number`
//! are pinned by the repository itself: whatever a caller passes in, the
//! stored values win on re-save. Totals are re-derived before every write,
//! so a stale snapshot can never reach disk.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::events::{EventBus, StoreEvent};
use quickinvoice_core::number::{counter_key, format_invoice_number, number_prefix};
use quickinvoice_core::types::{Currency, Invoice, InvoiceItem, Party, TaxMode, TaxTreatment, Totals};

/// Bounded retry budget for invoice-number collisions.
const MAX_NUMBER_ATTEMPTS: u32 = 3;

type SqliteTx<'a> = Transaction<'a, Sqlite>;

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
    events: EventBus,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub(crate) fn new(pool: SqlitePool, events: EventBus) -> Self {
        InvoiceRepository { pool, events }
    }

    /// Idempotent upsert keyed by `id`.
    ///
    /// ## What This Does
    /// 1. Re-derives the totals snapshot (the stale-totals backstop)
    /// 2. Assigns `created_at` on first save; keeps the stored value after
    /// 3. Keeps a stored non-empty `invoice_number` (never overwritten)
    /// 4. Replaces the invoice row and its item rows in one transaction
    /// 5. Broadcasts the change event after commit
    ///
    /// Returns the persisted snapshot, which is what a subsequent
    /// `get_by_id` will observe.
    pub async fn save(&self, invoice: &Invoice) -> StoreResult<Invoice> {
        let mut tx = self.pool.begin().await?;
        let persisted = normalize(&mut tx, invoice).await?;
        persist_rows(&mut tx, &persisted).await?;
        tx.commit()
            .await
            .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;

        debug!(id = %persisted.id, "Invoice saved");
        self.events.notify(StoreEvent::InvoicesChanged);
        Ok(persisted)
    }

    /// Saves the invoice, assigning an invoice number if it has none yet.
    ///
    /// ## Number reservation
    /// The sequence comes from a dedicated counter row incremented inside
    /// the same transaction as the upsert, so two racing finalizations
    /// cannot allocate the same sequence. The unique index on
    /// `invoice_number` is the backstop: a collision (e.g. a manually
    /// imported number) abandons the transaction, which also rolls the
    /// reservation back, so before retrying the colliding sequence is
    /// burned in its own committed transaction and the next attempt
    /// formats a genuinely fresh one. Retries are bounded at
    /// [`MAX_NUMBER_ATTEMPTS`], then [`StoreError::NumberCollision`]
    /// surfaces.
    ///
    /// An invoice that already carries a number (in memory or in the
    /// store) is saved unchanged; a number is never overwritten.
    pub async fn finalize(&self, invoice: &Invoice) -> StoreResult<Invoice> {
        let prefix = number_prefix(invoice);

        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let year = Utc::now().year();
            match self.try_finalize(invoice, &prefix, year).await {
                Ok(persisted) => {
                    debug!(
                        id = %persisted.id,
                        invoice_number = %persisted.invoice_number,
                        "Invoice finalized"
                    );
                    self.events.notify(StoreEvent::InvoicesChanged);
                    return Ok(persisted);
                }
                Err(err) if err.is_retryable_collision() => {
                    warn!(attempt, error = %err, "Invoice number collision, retrying");
                    // The rollback un-reserved the sequence; consume it for
                    // real so the retry advances past the taken number.
                    if matches!(err, StoreError::UniqueViolation { .. }) {
                        self.burn_sequence(&counter_key(&prefix, year)).await?;
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Err(StoreError::NumberCollision {
            attempts: MAX_NUMBER_ATTEMPTS,
        })
    }

    async fn try_finalize(
        &self,
        invoice: &Invoice,
        prefix: &str,
        year: i32,
    ) -> StoreResult<Invoice> {
        let mut tx = self.pool.begin().await?;
        let mut persisted = normalize(&mut tx, invoice).await?;

        if persisted.invoice_number.is_empty() {
            let seq = reserve_sequence(&mut tx, &counter_key(prefix, year)).await?;
            persisted.invoice_number = format_invoice_number(prefix, year, seq);
        }

        persist_rows(&mut tx, &persisted).await?;
        tx.commit()
            .await
            .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;
        Ok(persisted)
    }

    /// Advances a counter past a sequence whose number turned out to be
    /// taken. Commits on its own, outside any finalize transaction.
    async fn burn_sequence(&self, key: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        reserve_sequence(&mut tx, key).await?;
        tx.commit()
            .await
            .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    /// Gets an invoice by id. A missing id is `Ok(None)`, never an error.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Invoice>> {
        let row: Option<InvoiceRow> = sqlx::query_as(
            r#"
            SELECT
                id, invoice_number, created_at_ms,
                seller_name, seller_address, seller_tax_id,
                customer_name, customer_address, customer_tax_id,
                currency_code, currency_symbol,
                tax_mode, tax_label, tax_rate_bps, tax_number_prefix,
                subtotal_cents, tax_cents, total_cents,
                qr_enabled
            FROM invoices
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.load_items(&row.id).await?;
                Ok(Some(row.into_invoice(items)))
            }
            None => Ok(None),
        }
    }

    /// Returns up to `limit` invoices, most recently created first.
    ///
    /// A bounded top-K read over the `created_at_ms` index: the LIMIT is
    /// pushed into the query, not applied after a full scan. Ties break by
    /// `id` descending, so the order is deterministic for one store state.
    pub async fn list_recent(&self, limit: u32) -> StoreResult<Vec<Invoice>> {
        let rows: Vec<InvoiceRow> = sqlx::query_as(
            r#"
            SELECT
                id, invoice_number, created_at_ms,
                seller_name, seller_address, seller_tax_id,
                customer_name, customer_address, customer_tax_id,
                currency_code, currency_symbol,
                tax_mode, tax_label, tax_rate_bps, tax_number_prefix,
                subtotal_cents, tax_cents, total_cents,
                qr_enabled
            FROM invoices
            ORDER BY created_at_ms DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut invoices = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.load_items(&row.id).await?;
            invoices.push(row.into_invoice(items));
        }
        Ok(invoices)
    }

    /// Deletes an invoice and its items. Idempotent: deleting a missing id
    /// succeeds silently.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        // Item rows cascade with the invoice row.
        sqlx::query("DELETE FROM invoices WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit()
            .await
            .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;

        debug!(id = %id, "Invoice deleted");
        self.events.notify(StoreEvent::InvoicesChanged);
        Ok(())
    }

    /// Counts stored invoices (seed/diagnostics support).
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Loads the item rows for an invoice, in insertion order.
    async fn load_items(&self, invoice_id: &str) -> StoreResult<Vec<InvoiceItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT id, name, qty, unit_price_cents
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY position
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ItemRow::into_item).collect())
    }
}

// =============================================================================
// Write Helpers
// =============================================================================

/// Produces the snapshot that will actually be persisted: totals
/// re-derived, `created_at` pinned to the stored value (or assigned now,
/// at millisecond precision, on first save), and a stored non-empty
/// invoice number restored over whatever the caller passed.
async fn normalize(tx: &mut SqliteTx<'_>, invoice: &Invoice) -> StoreResult<Invoice> {
    let mut inv = invoice.clone();
    inv.refresh_totals();

    let existing: Option<(String, i64)> =
        sqlx::query_as("SELECT invoice_number, created_at_ms FROM invoices WHERE id = ?1")
            .bind(&inv.id)
            .fetch_optional(&mut **tx)
            .await?;

    match existing {
        Some((number, created_ms)) => {
            if !number.is_empty() {
                inv.invoice_number = number;
            }
            inv.created_at = Some(from_millis(created_ms));
        }
        None => {
            // Truncate to millisecond precision so the in-memory snapshot
            // matches what a later read reassembles.
            let at = inv.created_at.unwrap_or_else(Utc::now);
            inv.created_at = Some(from_millis(to_millis(at)));
        }
    }

    Ok(inv)
}

/// Upserts the invoice row and replaces its item rows. Runs entirely
/// inside the caller's transaction.
async fn persist_rows(tx: &mut SqliteTx<'_>, inv: &Invoice) -> StoreResult<()> {
    let created_ms = inv.created_at.map(to_millis).unwrap_or_default();

    sqlx::query(
        r#"
        INSERT INTO invoices (
            id, invoice_number, created_at_ms,
            seller_name, seller_address, seller_tax_id,
            customer_name, customer_address, customer_tax_id,
            currency_code, currency_symbol,
            tax_mode, tax_label, tax_rate_bps, tax_number_prefix,
            subtotal_cents, tax_cents, total_cents,
            qr_enabled
        ) VALUES (
            ?1, ?2, ?3,
            ?4, ?5, ?6,
            ?7, ?8, ?9,
            ?10, ?11,
            ?12, ?13, ?14, ?15,
            ?16, ?17, ?18,
            ?19
        )
        ON CONFLICT(id) DO UPDATE SET
            invoice_number = excluded.invoice_number,
            created_at_ms = excluded.created_at_ms,
            seller_name = excluded.seller_name,
            seller_address = excluded.seller_address,
            seller_tax_id = excluded.seller_tax_id,
            customer_name = excluded.customer_name,
            customer_address = excluded.customer_address,
            customer_tax_id = excluded.customer_tax_id,
            currency_code = excluded.currency_code,
            currency_symbol = excluded.currency_symbol,
            tax_mode = excluded.tax_mode,
            tax_label = excluded.tax_label,
            tax_rate_bps = excluded.tax_rate_bps,
            tax_number_prefix = excluded.tax_number_prefix,
            subtotal_cents = excluded.subtotal_cents,
            tax_cents = excluded.tax_cents,
            total_cents = excluded.total_cents,
            qr_enabled = excluded.qr_enabled
        "#,
    )
    .bind(&inv.id)
    .bind(&inv.invoice_number)
    .bind(created_ms)
    .bind(&inv.seller.name)
    .bind(&inv.seller.address)
    .bind(&inv.seller.tax_id)
    .bind(&inv.customer.name)
    .bind(&inv.customer.address)
    .bind(&inv.customer.tax_id)
    .bind(&inv.currency.code)
    .bind(&inv.currency.symbol)
    .bind(inv.tax.mode)
    .bind(&inv.tax.label)
    .bind(inv.tax.rate_bps as i64)
    .bind(&inv.tax.number_prefix)
    .bind(inv.totals.subtotal_cents)
    .bind(inv.totals.tax_cents)
    .bind(inv.totals.total_cents)
    .bind(inv.qr_enabled)
    .execute(&mut **tx)
    .await?;

    sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
        .bind(&inv.id)
        .execute(&mut **tx)
        .await?;

    for (position, item) in inv.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO invoice_items (invoice_id, id, position, name, qty, unit_price_cents)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&inv.id)
        .bind(&item.id)
        .bind(position as i64)
        .bind(&item.name)
        .bind(item.qty)
        .bind(item.unit_price_cents)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Atomically allocates the next sequence for a counter key.
///
/// A single upsert-returning statement: it takes SQLite's write lock up
/// front (serializing concurrent reservations) and hands back the stored
/// next value; the allocated sequence is one less.
async fn reserve_sequence(tx: &mut SqliteTx<'_>, key: &str) -> StoreResult<i64> {
    let next: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO invoice_counters (counter_key, next_seq)
        VALUES (?1, 2)
        ON CONFLICT(counter_key) DO UPDATE SET next_seq = next_seq + 1
        RETURNING next_seq
        "#,
    )
    .bind(key)
    .fetch_one(&mut **tx)
    .await?;

    Ok(next - 1)
}

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: String,
    invoice_number: String,
    created_at_ms: i64,
    seller_name: String,
    seller_address: String,
    seller_tax_id: Option<String>,
    customer_name: String,
    customer_address: String,
    customer_tax_id: Option<String>,
    currency_code: String,
    currency_symbol: String,
    tax_mode: TaxMode,
    tax_label: String,
    tax_rate_bps: i64,
    tax_number_prefix: String,
    subtotal_cents: i64,
    tax_cents: i64,
    total_cents: i64,
    qr_enabled: bool,
}

impl InvoiceRow {
    fn into_invoice(self, items: Vec<InvoiceItem>) -> Invoice {
        Invoice {
            id: self.id,
            invoice_number: self.invoice_number,
            created_at: Some(from_millis(self.created_at_ms)),
            seller: Party {
                name: self.seller_name,
                address: self.seller_address,
                tax_id: self.seller_tax_id,
            },
            customer: Party {
                name: self.customer_name,
                address: self.customer_address,
                tax_id: self.customer_tax_id,
            },
            currency: Currency {
                code: self.currency_code,
                symbol: self.currency_symbol,
            },
            tax: TaxTreatment {
                mode: self.tax_mode,
                label: self.tax_label,
                rate_bps: self.tax_rate_bps as u32,
                number_prefix: self.tax_number_prefix,
            },
            items,
            totals: Totals {
                subtotal_cents: self.subtotal_cents,
                tax_cents: self.tax_cents,
                total_cents: self.total_cents,
            },
            qr_enabled: self.qr_enabled,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: String,
    name: String,
    qty: i64,
    unit_price_cents: i64,
}

impl ItemRow {
    fn into_item(self) -> InvoiceItem {
        InvoiceItem {
            id: self.id,
            name: self.name,
            qty: self.qty,
            unit_price_cents: self.unit_price_cents,
        }
    }
}

// =============================================================================
// Time Mapping
// =============================================================================
// created_at is persisted as integer Unix milliseconds, which round-trips
// exactly; chrono's sub-millisecond precision would not.

fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use quickinvoice_core::catalog;
    use quickinvoice_core::money::Money;
    use quickinvoice_core::update::{update, InvoicePatch};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// A saveable invoice: named seller, one or more priced items.
    fn draft(seller: &str, amounts: &[(i64, i64)]) -> Invoice {
        let invoice = Invoice::from_preset(catalog::preset("INDIA_GST").unwrap());
        update(
            &invoice,
            InvoicePatch {
                seller: Some(Party {
                    name: seller.to_string(),
                    address: "12 Hill Road, Mumbai".to_string(),
                    tax_id: None,
                }),
                items: Some(
                    amounts
                        .iter()
                        .map(|(qty, cents)| {
                            InvoiceItem::with("Item", *qty, Money::from_cents(*cents))
                        })
                        .collect(),
                ),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_round_trip() {
        let db = test_db().await;
        let repo = db.invoices();

        let saved = repo.save(&draft("Acme", &[(2, 10_000), (1, 5_000)])).await.unwrap();
        let loaded = repo.get_by_id(&saved.id).await.unwrap().unwrap();

        assert_eq!(loaded, saved);
        assert_eq!(loaded.totals.total_cents, 29_500);
        assert!(loaded.created_at.is_some());
    }

    #[tokio::test]
    async fn test_get_missing_id_is_none() {
        let db = test_db().await;
        let found = db.invoices().get_by_id("no-such-id").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_save_assigns_created_at_once() {
        let db = test_db().await;
        let repo = db.invoices();

        let first = repo.save(&draft("Acme", &[(1, 100)])).await.unwrap();
        let created = first.created_at.unwrap();

        // A later save with a different timestamp keeps the stored one
        let mut tampered = first.clone();
        tampered.created_at = Some(created + Duration::days(30));
        let second = repo.save(&tampered).await.unwrap();

        assert_eq!(second.created_at, Some(created));
        let loaded = repo.get_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(loaded.created_at, Some(created));
    }

    #[tokio::test]
    async fn test_save_recomputes_stale_totals() {
        let db = test_db().await;
        let repo = db.invoices();

        let mut invoice = draft("Acme", &[(2, 10_000)]);
        invoice.totals.total_cents = 1; // stale by construction

        let saved = repo.save(&invoice).await.unwrap();
        assert_eq!(saved.totals.subtotal_cents, 20_000);
        assert_eq!(saved.totals.total_cents, 23_600);
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let db = test_db().await;
        let repo = db.invoices();

        let saved = repo.save(&draft("Acme", &[(1, 100)])).await.unwrap();
        let mut edited = saved.clone();
        edited.seller.name = "Acme Renamed".to_string();
        repo.save(&edited).await.unwrap();

        let loaded = repo.get_by_id(&saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.seller.name, "Acme Renamed");
    }

    #[tokio::test]
    async fn test_item_order_round_trips() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = Invoice::from_preset(catalog::preset("NO_TAX").unwrap())
            .with_item_added(InvoiceItem::with("First", 1, Money::from_cents(100)))
            .with_item_added(InvoiceItem::with("Second", 1, Money::from_cents(200)))
            .with_item_added(InvoiceItem::with("Third", 1, Money::from_cents(300)));

        let saved = repo.save(&invoice).await.unwrap();
        let loaded = repo.get_by_id(&saved.id).await.unwrap().unwrap();
        let names: Vec<&str> = loaded.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["First", "Second", "Third"]);

        // Removing the head re-saves with the tail intact, in order
        let shorter = repo.save(&loaded.with_item_removed(0)).await.unwrap();
        let loaded = repo.get_by_id(&shorter.id).await.unwrap().unwrap();
        let names: Vec<&str> = loaded.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Second", "Third"]);
    }

    #[tokio::test]
    async fn test_list_recent_orders_and_limits() {
        let db = test_db().await;
        let repo = db.invoices();

        let base = Utc::now();
        for (offset, name) in [(0, "Oldest"), (1, "Middle"), (2, "Newest")] {
            let mut invoice = draft(name, &[(1, 100)]);
            invoice.created_at = Some(base + Duration::minutes(offset));
            repo.save(&invoice).await.unwrap();
        }

        let recent = repo.list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].seller.name, "Newest");
        assert_eq!(recent[1].seller.name, "Middle");

        // A fresh save lands first
        let mut latest = draft("Latest", &[(1, 100)]);
        latest.created_at = Some(base + Duration::minutes(10));
        repo.save(&latest).await.unwrap();

        let recent = repo.list_recent(5).await.unwrap();
        assert_eq!(recent[0].seller.name, "Latest");
        assert_eq!(recent.len(), 4);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let db = test_db().await;
        let repo = db.invoices();

        let saved = repo.save(&draft("Acme", &[(1, 100)])).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.delete(&saved.id).await.unwrap();
        assert!(repo.get_by_id(&saved.id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);

        // Deleting again (and deleting garbage) succeeds silently
        repo.delete(&saved.id).await.unwrap();
        repo.delete("never-existed").await.unwrap();
        assert!(repo.list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_change_events_fire_after_commit() {
        let db = test_db().await;
        let repo = db.invoices();
        let mut rx = db.subscribe();

        let saved = repo.save(&draft("Acme", &[(1, 100)])).await.unwrap();
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::InvoicesChanged);

        repo.delete(&saved.id).await.unwrap();
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::InvoicesChanged);
    }

    #[tokio::test]
    async fn test_finalize_assigns_number_once() {
        let db = test_db().await;
        let repo = db.invoices();

        let finalized = repo.finalize(&draft("Acme", &[(1, 100)])).await.unwrap();
        let year = Utc::now().year();
        assert_eq!(finalized.invoice_number, format!("GST-{}-0001", year));

        // Finalizing again keeps the number
        let again = repo.finalize(&finalized).await.unwrap();
        assert_eq!(again.invoice_number, finalized.invoice_number);

        // A plain save with the number blanked out cannot clear it
        let mut blanked = finalized.clone();
        blanked.invoice_number = String::new();
        let saved = repo.save(&blanked).await.unwrap();
        assert_eq!(saved.invoice_number, finalized.invoice_number);
    }

    #[tokio::test]
    async fn test_finalize_prefix_follows_preset() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = Invoice::from_preset(catalog::preset("NO_TAX").unwrap())
            .with_item_added(InvoiceItem::with("Item", 1, Money::from_cents(100)));
        let finalized = repo.finalize(&invoice).await.unwrap();
        assert!(finalized.invoice_number.starts_with("INV-"));

        // A declared prefix wins over the label, which would derive to
        // SALESTAX
        let mut taxed = draft("Acme", &[(1, 100)]);
        taxed.tax.label = "Sales Tax".to_string();
        taxed.tax.number_prefix = "ST".to_string();
        let finalized = repo.finalize(&taxed).await.unwrap();
        assert!(finalized.invoice_number.starts_with("ST-"));
    }

    #[tokio::test]
    async fn test_number_generation_never_repeats() {
        let db = test_db().await;
        let repo = db.invoices();

        let mut numbers = std::collections::HashSet::new();
        for i in 0..100 {
            let finalized = repo
                .finalize(&draft(&format!("Seller {i}"), &[(1, 100)]))
                .await
                .unwrap();
            assert!(
                numbers.insert(finalized.invoice_number.clone()),
                "duplicate number {}",
                finalized.invoice_number
            );
        }
        assert_eq!(numbers.len(), 100);

        let year = Utc::now().year();
        assert!(numbers.contains(&format!("GST-{}-0001", year)));
        assert!(numbers.contains(&format!("GST-{}-0100", year)));
    }

    #[tokio::test]
    async fn test_finalize_retries_past_imported_numbers() {
        let db = test_db().await;
        let repo = db.invoices();
        let year = Utc::now().year();

        // An imported invoice already occupies GST-<year>-0001
        let mut imported = draft("Imported", &[(1, 100)]);
        imported.invoice_number = format_invoice_number("GST", year, 1);
        repo.save(&imported).await.unwrap();

        // Finalize collides once, retries, and lands on 0002
        let finalized = repo.finalize(&draft("Fresh", &[(1, 100)])).await.unwrap();
        assert_eq!(finalized.invoice_number, format_invoice_number("GST", year, 2));
    }

    #[tokio::test]
    async fn test_finalize_surfaces_exhausted_collisions() {
        let db = test_db().await;
        let repo = db.invoices();
        let year = Utc::now().year();

        // Imported invoices occupy every sequence the retry budget can reach
        for seq in 1..=3 {
            let mut imported = draft(&format!("Imported {seq}"), &[(1, 100)]);
            imported.invoice_number = format_invoice_number("GST", year, seq);
            repo.save(&imported).await.unwrap();
        }

        let err = repo.finalize(&draft("Fresh", &[(1, 100)])).await.unwrap_err();
        assert!(matches!(err, StoreError::NumberCollision { attempts: 3 }));

        // The colliding draft was never persisted
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
