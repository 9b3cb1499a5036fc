//! # Preview Store
//!
//! Transient, revocable handles to rendered documents, for "open in
//! preview" flows.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  open(bytes) ──► PreviewHandle                                          │
//! │       │                                                                 │
//! │       ├── fetch(handle) ──► Arc<[u8]>     (while live)                 │
//! │       ├── revoke(handle)                  (explicit release)           │
//! │       └── TTL elapses                     (implicit release)           │
//! │                                                                         │
//! │  Every open/fetch purges entries past the TTL, so handles a caller     │
//! │  abandoned never accumulate across a long session.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

use crate::error::{ExportError, ExportResult};
use crate::render::render;
use quickinvoice_core::types::Invoice;

/// How long an unreleased preview stays fetchable.
pub const DEFAULT_PREVIEW_TTL: Duration = Duration::from_secs(60);

/// An opaque reference to a rendered preview document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(Uuid);

impl std::fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

struct PreviewEntry {
    bytes: Arc<[u8]>,
    opened_at: Instant,
}

/// In-process registry of rendered documents with bounded lifetimes.
pub struct PreviewStore {
    ttl: Duration,
    entries: Mutex<HashMap<Uuid, PreviewEntry>>,
}

impl PreviewStore {
    /// Creates a store with the default 60-second TTL.
    pub fn new() -> Self {
        PreviewStore::with_ttl(DEFAULT_PREVIEW_TTL)
    }

    /// Creates a store with a custom TTL (mainly for tests).
    pub fn with_ttl(ttl: Duration) -> Self {
        PreviewStore {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Registers rendered bytes and returns a handle for them.
    pub fn open(&self, bytes: Vec<u8>) -> PreviewHandle {
        let handle = PreviewHandle(Uuid::new_v4());
        let mut entries = self.lock();
        Self::purge_expired(&mut entries, self.ttl);
        entries.insert(
            handle.0,
            PreviewEntry {
                bytes: bytes.into(),
                opened_at: Instant::now(),
            },
        );
        debug!(handle = %handle, live = entries.len(), "Preview opened");
        handle
    }

    /// Renders an invoice and registers the result in one step.
    pub fn open_invoice(&self, invoice: &Invoice) -> ExportResult<PreviewHandle> {
        let bytes = render(invoice)?;
        Ok(self.open(bytes))
    }

    /// Returns the bytes behind a handle, if it is still live.
    pub fn fetch(&self, handle: &PreviewHandle) -> ExportResult<Arc<[u8]>> {
        let mut entries = self.lock();
        Self::purge_expired(&mut entries, self.ttl);
        entries
            .get(&handle.0)
            .map(|entry| Arc::clone(&entry.bytes))
            .ok_or(ExportError::PreviewExpired)
    }

    /// Explicitly releases a handle. Revoking twice is a no-op.
    pub fn revoke(&self, handle: &PreviewHandle) {
        self.lock().remove(&handle.0);
    }

    /// Number of live previews (after purging expired ones).
    pub fn live_count(&self) -> usize {
        let mut entries = self.lock();
        Self::purge_expired(&mut entries, self.ttl);
        entries.len()
    }

    fn purge_expired(entries: &mut HashMap<Uuid, PreviewEntry>, ttl: Duration) {
        entries.retain(|_, entry| entry.opened_at.elapsed() < ttl);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, PreviewEntry>> {
        // A poisoned lock only means a panicking thread held it; the map
        // itself is still usable.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for PreviewStore {
    fn default() -> Self {
        PreviewStore::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_then_fetch() {
        let store = PreviewStore::new();
        let handle = store.open(vec![1, 2, 3]);

        let bytes = store.fetch(&handle).unwrap();
        assert_eq!(&bytes[..], &[1, 2, 3]);
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_revoke_releases() {
        let store = PreviewStore::new();
        let handle = store.open(vec![1]);

        store.revoke(&handle);
        assert!(matches!(
            store.fetch(&handle),
            Err(ExportError::PreviewExpired)
        ));

        // Revoking again is a no-op
        store.revoke(&handle);
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_ttl_expires_abandoned_handles() {
        let store = PreviewStore::with_ttl(Duration::ZERO);
        let handle = store.open(vec![1]);

        assert!(matches!(
            store.fetch(&handle),
            Err(ExportError::PreviewExpired)
        ));
    }

    #[test]
    fn test_expired_entries_do_not_accumulate() {
        let store = PreviewStore::with_ttl(Duration::ZERO);
        for _ in 0..10 {
            let _ = store.open(vec![0; 64]);
        }
        // Each open purged the previous, already-expired entries
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_unknown_handle_is_expired() {
        let store = PreviewStore::new();
        let stranger = PreviewHandle(Uuid::new_v4());
        assert!(matches!(
            store.fetch(&stranger),
            Err(ExportError::PreviewExpired)
        ));
    }
}
