//! Partition naming.
//!
//! Each partition (one user or tenant) maps to `<root>/<partition>.json`.
//! Names are restricted so they can never escape the root directory.

use crate::errors::{invalid_partition, Result};
use std::path::{Path, PathBuf};

const PARTITION_FILE_EXTENSION: &str = "json";

/// Check that a partition name is safe to use as a file stem.
///
/// # Errors
///
/// `InvalidPartition` if the name is empty, starts with `.`, or holds
/// anything other than ASCII letters, digits, `-`, `_` and `.`.
pub fn validate_partition(partition: &str) -> Result<()> {
    if partition.is_empty() {
        return Err(invalid_partition(partition, "must not be empty"));
    }
    if partition.starts_with('.') {
        return Err(invalid_partition(partition, "must not start with '.'"));
    }
    if let Some(bad) = partition
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid_partition(
            partition,
            &format!("contains disallowed character {:?}", bad),
        ));
    }
    Ok(())
}

/// File holding a partition's snapshots.
///
/// # Errors
///
/// `InvalidPartition` if the name fails [`validate_partition`].
pub fn partition_path(root: &Path, partition: &str) -> Result<PathBuf> {
    validate_partition(partition)?;
    Ok(root.join(format!("{}.{}", partition, PARTITION_FILE_EXTENSION)))
}
