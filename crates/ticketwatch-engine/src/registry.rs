//! Per-partition tracker registry.
//!
//! Replaces a process-wide store with explicit trackers keyed by partition
//! name. Each partition file is loaded once, on first use, and the same
//! tracker (and therefore the same lock) serves every later request.

use crate::config::TrackerConfig;
use crate::tracker::TicketTracker;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use ticketwatch_core::errors::{ExError, ExErrorKind};
use ticketwatch_store::FileSnapshotStore;

pub type FileTracker = TicketTracker<FileSnapshotStore>;

#[derive(Debug)]
pub struct TrackerRegistry {
    config: TrackerConfig,
    trackers: Mutex<HashMap<String, Arc<FileTracker>>>,
}

impl TrackerRegistry {
    pub fn open(config: TrackerConfig) -> Self {
        tracing::debug!(
            component = module_path!(),
            op = "open_registry",
            data_dir = %config.data_dir.display(),
            default_partition = %config.default_partition,
        );
        Self {
            config,
            trackers: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Tracker for `partition`, opening its store on first use.
    ///
    /// # Errors
    ///
    /// `InvalidPartition` for an unsafe partition name, `Concurrency` if the
    /// registry lock is poisoned.
    pub fn tracker(&self, partition: &str) -> Result<Arc<FileTracker>, ExError> {
        let mut trackers = self.trackers.lock().map_err(|_| {
            ExError::new(ExErrorKind::Concurrency)
                .with_op("open_partition")
                .with_partition(partition)
                .with_message("registry lock poisoned")
        })?;

        if let Some(tracker) = trackers.get(partition) {
            return Ok(Arc::clone(tracker));
        }

        let store = FileSnapshotStore::open(&self.config.data_dir, partition)?;
        let tracker = Arc::new(TicketTracker::new(partition, store, &self.config));
        trackers.insert(partition.to_string(), Arc::clone(&tracker));
        Ok(tracker)
    }

    /// Tracker for the configured default partition.
    ///
    /// # Errors
    ///
    /// As [`Self::tracker`].
    pub fn default_tracker(&self) -> Result<Arc<FileTracker>, ExError> {
        self.tracker(&self.config.default_partition)
    }

    /// Names of the partitions opened so far, sorted.
    pub fn open_partitions(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.trackers.lock() {
            Ok(trackers) => trackers.keys().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().keys().cloned().collect(),
        };
        names.sort();
        names
    }
}
