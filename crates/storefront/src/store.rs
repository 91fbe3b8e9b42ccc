//! Origin-scoped key-value session storage.
//!
//! State that must survive a page load lives in named slots: short strings
//! of serialized JSON keyed by a stable name. [`RedbStore`] keeps slots in a
//! single redb file on disk; [`MemoryStore`] backs tests and dry runs.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use thiserror::Error;

/// Well-known slot names.
pub mod slots {
    /// The live cart collection.
    pub const CART: &str = "cart";
    /// One-shot snapshot handed to the checkout page.
    pub const CHECKOUT_PENDING: &str = "checkout-pending";
}

const SLOTS: TableDefinition<&str, &str> = TableDefinition::new("slots");

/// Errors from the session storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Named-slot persistence.
///
/// A deliberately small surface: callers read a whole slot, replace a whole
/// slot, or drop it. Values are opaque strings; serialization happens above
/// this trait.
pub trait SlotStore {
    /// Read a slot, `None` when it was never written or was removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the backend cannot be read.
    fn get(&self, slot: &str) -> Result<Option<String>, StoreError>;

    /// Replace the contents of a slot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the write does not land.
    fn put(&mut self, slot: &str, value: &str) -> Result<(), StoreError>;

    /// Drop a slot. Removing an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the backend cannot be written.
    fn remove(&mut self, slot: &str) -> Result<(), StoreError>;
}

impl<S: SlotStore + ?Sized> SlotStore for &mut S {
    fn get(&self, slot: &str) -> Result<Option<String>, StoreError> {
        (**self).get(slot)
    }

    fn put(&mut self, slot: &str, value: &str) -> Result<(), StoreError> {
        (**self).put(slot, value)
    }

    fn remove(&mut self, slot: &str) -> Result<(), StoreError> {
        (**self).remove(slot)
    }
}

/// Durable slot store backed by a single redb file.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the store file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the file cannot be created or the slots
    /// table cannot be initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(|e| StoreError::Backend(e.to_string()))?;

        // Create the table up front so first reads see it
        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(SLOTS)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { db })
    }
}

impl fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl SlotStore for RedbStore {
    fn get(&self, slot: &str) -> Result<Option<String>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let table = read_txn
            .open_table(SLOTS)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let value = table
            .get(slot)
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn put(&mut self, slot: &str, value: &str) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SLOTS)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            table
                .insert(slot, value)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SLOTS)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            table
                .remove(slot)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

/// In-memory slot store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemoryStore {
    fn get(&self, slot: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn put(&mut self, slot: &str, value: &str) -> Result<(), StoreError> {
        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<(), StoreError> {
        self.slots.remove(slot);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("cart").unwrap(), None);

        store.put("cart", "[]").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));

        store.remove("cart").unwrap();
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_memory_store_remove_absent_slot_is_ok() {
        let mut store = MemoryStore::new();
        store.remove("never-written").unwrap();
    }

    #[test]
    fn test_redb_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.redb");

        let mut store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get(slots::CART).unwrap(), None);

        store.put(slots::CART, r#"[{"id":"x"}]"#).unwrap();
        assert_eq!(
            store.get(slots::CART).unwrap().as_deref(),
            Some(r#"[{"id":"x"}]"#)
        );

        store.remove(slots::CART).unwrap();
        assert_eq!(store.get(slots::CART).unwrap(), None);
    }

    #[test]
    fn test_redb_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.redb");

        {
            let mut store = RedbStore::open(&path).unwrap();
            store.put(slots::CHECKOUT_PENDING, "pending").unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(
            store.get(slots::CHECKOUT_PENDING).unwrap().as_deref(),
            Some("pending")
        );
    }

    #[test]
    fn test_slot_names_are_distinct() {
        assert_ne!(slots::CART, slots::CHECKOUT_PENDING);
    }
}
