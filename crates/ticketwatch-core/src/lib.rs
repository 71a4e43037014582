//! Ticketwatch Core - change detection for webhook-delivered tickets
//!
//! This crate provides the pure, storage-agnostic parts of Ticketwatch:
//! - Schema-less ticket records and entity id resolution
//! - The change detector (blank-tolerant, order-insensitive field diff)
//! - The snapshot store contract and an in-memory implementation
//! - The error facility and the structured logging facility

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod record;
pub mod snapshot_store;

// Re-export commonly used types
pub use diff::{ChangeDetector, ChangeEntry, ChangeSet, Comparison};
pub use errors::{ExError, ExErrorKind, Result, TrackerError};
pub use record::{resolve_ticket_id, Record};
pub use snapshot_store::{MemorySnapshotStore, SnapshotStore};
