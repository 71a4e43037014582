//! Atomic write primitives
//!
//! Uses temp→fsync→rename so a crash never leaves a half-written file

use crate::errors::{io_error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically replace the contents of a file
///
/// The bytes are synced to disk before the rename and, on Unix, the parent
/// directory is synced after it, so a successful return means the new
/// contents are durable.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error("create_data_dir", e))?;
        }
    }

    let temp_path = temp_path_for(target_path);

    let written = File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(content)?;
            file.sync_all()
        })
        .map_err(|e| io_error("write_partition_temp", e));
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::rename(&temp_path, target_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        io_error("rename_partition_temp", e)
    })?;

    sync_parent_dir(target_path)
}

/// Flush the directory entry written by the rename.
#[cfg(unix)]
fn sync_parent_dir(target_path: &Path) -> Result<()> {
    let parent = match target_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(parent)
        .and_then(|dir| dir.sync_all())
        .map_err(|e| io_error("sync_data_dir", e))
}

// Directories cannot be opened as files here; the rename is as durable as
// the platform allows.
#[cfg(not(unix))]
fn sync_parent_dir(_target_path: &Path) -> Result<()> {
    Ok(())
}

/// Remove a file, treating "already gone" as success
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error("remove_partition", e)),
    }
}

fn temp_path_for(target_path: &Path) -> PathBuf {
    let mut name = target_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target_path.with_file_name(name)
}
