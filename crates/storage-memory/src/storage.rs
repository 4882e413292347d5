//! # Simulated Storage

use hyperscale_storage::{StateStore, StoreError, StoreRead};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Inner state shared between clones of a [`MemoryStateStore`].
#[derive(Default)]
struct Inner {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    fail_writes: AtomicBool,
    closed: AtomicBool,
    put_count: AtomicU64,
}

/// In-memory state store.
///
/// Cloning yields another handle onto the same data. Closing one handle marks
/// the shared store closed for every handle, matching a single database
/// instance being shut down.
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<Inner>,
}

impl MemoryStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `put` calls fail with a database error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw bytes currently stored at `key`, bypassing the closed check.
    pub fn raw(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.inner.data.read().unwrap().get(key).cloned()
    }

    /// Seed `key` with raw bytes, bypassing failure injection.
    pub fn insert_raw(&self, key: &[u8], value: Vec<u8>) {
        self.inner.data.write().unwrap().insert(key.to_vec(), value);
    }

    /// Number of successful `put` calls across all handles.
    pub fn put_count(&self) -> u64 {
        self.inner.put_count.load(Ordering::SeqCst)
    }

    /// Whether the store has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Reopen a closed store, keeping its data (simulates a process restart).
    pub fn reopen(&self) -> Self {
        self.inner.closed.store(false, Ordering::SeqCst);
        self.clone()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &[u8]) -> Result<StoreRead, StoreError> {
        self.ensure_open()?;
        let data = self.inner.data.read().unwrap();
        Ok(match data.get(key) {
            Some(value) => StoreRead::Found(value.clone()),
            None => StoreRead::NotFound,
        })
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.ensure_open()?;
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            tracing::debug!(key = ?String::from_utf8_lossy(key), "Injected write failure");
            return Err(StoreError::Database("injected write failure".to_string()));
        }
        self.inner
            .data
            .write()
            .unwrap()
            .insert(key.to_vec(), value.to_vec());
        self.inner.put_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(self) -> Result<(), StoreError> {
        self.inner.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
