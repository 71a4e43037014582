//! Snapshot store contract.
//!
//! A snapshot store keeps the latest full record per ticket id for one
//! partition (last write wins, no history). Durable implementations live in
//! `ticketwatch-store`; [`MemorySnapshotStore`] backs tests and dry runs.

use crate::errors::ExError;
use crate::record::Record;
use std::collections::BTreeMap;

/// Latest-record-per-id storage.
///
/// `put` and `delete_all` must be durable before returning `Ok`. A failed
/// `put` must leave the previous record for that id visible to `get`.
pub trait SnapshotStore {
    /// Stored record for `id`, or `None` if the id was never seen.
    fn get(&self, id: &str) -> Option<&Record>;

    /// Create or overwrite the record for `id`.
    ///
    /// # Errors
    ///
    /// Returns an `Io`/`Serialization` error if the record could not be made
    /// durable; the store then still holds the previous record.
    fn put(&mut self, id: &str, record: Record) -> Result<(), ExError>;

    /// Snapshot of every stored record keyed by id.
    fn list(&self) -> BTreeMap<String, Record>;

    /// Remove every record in the partition.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if durable state could not be removed.
    fn delete_all(&mut self) -> Result<(), ExError>;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Non-durable store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    records: BTreeMap<String, Record>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    fn put(&mut self, id: &str, record: Record) -> Result<(), ExError> {
        self.records.insert(id.to_string(), record);
        Ok(())
    }

    fn list(&self) -> BTreeMap<String, Record> {
        self.records.clone()
    }

    fn delete_all(&mut self) -> Result<(), ExError> {
        self.records.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: serde_json::Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = MemorySnapshotStore::new();
        assert!(store.get("T1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = MemorySnapshotStore::new();
        store.put("T1", record(json!({"id": "T1", "v": 1}))).unwrap();
        store.put("T1", record(json!({"id": "T1", "v": 2}))).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("T1").unwrap()["v"], json!(2));
    }

    #[test]
    fn test_delete_all() {
        let mut store = MemorySnapshotStore::new();
        store.put("T1", record(json!({"id": "T1"}))).unwrap();
        store.put("T2", record(json!({"id": "T2"}))).unwrap();
        store.delete_all().unwrap();
        assert!(store.get("T1").is_none());
        assert!(store.list().is_empty());
    }
}
