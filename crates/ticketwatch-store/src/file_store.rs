//! File-backed snapshot store
//!
//! One JSON object per partition file, id → latest full record, written
//! with two-space indentation after every mutation.

use crate::atomic::{atomic_write, remove_if_exists};
use crate::errors::{serialization_error, Result};
use crate::partition::partition_path;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use ticketwatch_core::errors::ExError;
use ticketwatch_core::record::Record;
use ticketwatch_core::snapshot_store::SnapshotStore;

/// Durable snapshot store for one partition
///
/// The full partition is held in memory and rewritten atomically on every
/// `put`. Not synchronized: callers serialize access (the tracker holds it
/// behind a mutex).
#[derive(Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
    partition: String,
    records: BTreeMap<String, Record>,
}

impl FileSnapshotStore {
    /// Open the store for `partition` under `root`
    ///
    /// Loads `<root>/<partition>.json` if it exists. A corrupt or unreadable
    /// file is logged and treated as empty; it is overwritten by the next
    /// successful `put`.
    ///
    /// # Errors
    ///
    /// `InvalidPartition` if the partition name is unsafe.
    pub fn open(root: impl AsRef<Path>, partition: &str) -> Result<Self> {
        let path = partition_path(root.as_ref(), partition)?;
        Ok(Self::open_path(path, partition))
    }

    /// Open a store at an explicit file path
    pub fn open_path(path: impl Into<PathBuf>, partition: impl Into<String>) -> Self {
        let path = path.into();
        let partition = partition.into();
        let records = load_partition(&path, &partition);
        tracing::debug!(
            component = module_path!(),
            op = "open_partition",
            partition = %partition,
            ticket_count = records.len(),
            path = %path.display(),
        );
        Self {
            path,
            partition,
            records,
        }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    fn flush(&self) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.records)
            .map_err(|e| serialization_error("save_partition", e))?;
        atomic_write(&self.path, &bytes)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    fn put(&mut self, id: &str, record: Record) -> std::result::Result<(), ExError> {
        let previous = self.records.insert(id.to_string(), record);

        if let Err(err) = self.flush() {
            match previous {
                Some(previous) => {
                    self.records.insert(id.to_string(), previous);
                }
                None => {
                    self.records.remove(id);
                }
            }
            return Err(err.with_ticket_id(id).with_partition(self.partition.clone()));
        }
        Ok(())
    }

    fn list(&self) -> BTreeMap<String, Record> {
        self.records.clone()
    }

    fn delete_all(&mut self) -> std::result::Result<(), ExError> {
        remove_if_exists(&self.path).map_err(|e| e.with_partition(self.partition.clone()))?;
        self.records.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Read a partition file, failing open to an empty map.
fn load_partition(path: &Path, partition: &str) -> BTreeMap<String, Record> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(
                component = module_path!(),
                op = "load_partition",
                partition = %partition,
                path = %path.display(),
                error = %e,
                "could not read partition file, starting empty"
            );
            return BTreeMap::new();
        }
    };

    match serde_json::from_str::<BTreeMap<String, Record>>(&text) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(
                component = module_path!(),
                op = "load_partition",
                partition = %partition,
                path = %path.display(),
                error = %e,
                "partition file is corrupt, starting empty"
            );
            BTreeMap::new()
        }
    }
}
