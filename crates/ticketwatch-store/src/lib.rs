//! Ticketwatch Store - durable snapshot storage
//!
//! Provides:
//! - One pretty-printed JSON file per partition holding the latest record
//!   per ticket id
//! - Atomic, synced writes (temp file → fsync → rename)
//! - Fail-open loading: a corrupt or unreadable file loads as empty
//! - Partition name validation

pub mod atomic;
pub mod errors;
pub mod file_store;
pub mod partition;

// Re-export key types
pub use errors::Result;
pub use file_store::FileSnapshotStore;
pub use partition::{partition_path, validate_partition};
