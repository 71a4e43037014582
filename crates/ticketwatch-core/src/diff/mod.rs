//! Ticket change detection.
//!
//! Compares the stored snapshot of a ticket with a freshly delivered payload
//! and reports the fields that meaningfully changed.
//!
//! ## Entry point
//!
//! ```
//! use ticketwatch_core::diff::ChangeDetector;
//! use serde_json::json;
//!
//! let old = json!({"id": "T1", "tags": ["a", "b"]});
//! let new = json!({"id": "T1", "tags": ["b", "a"]});
//! let outcome = ChangeDetector::default()
//!     .compare(old.as_object(), new.as_object().unwrap());
//! assert!(!outcome.changed);
//! ```
//!
//! ## Guarantees
//!
//! - **Noise suppression**: reordered sequences and null/empty-string toggles
//!   are never reported.
//! - **Partial updates**: only fields present in the new payload are
//!   examined; omitted fields are not reported as removed.
//! - **Purity**: the detector holds no state beyond its ignored-field set
//!   and never fails.

pub mod canonical;
pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compare, values_equal, ChangeDetector};
pub use human_summary::render_change_summary;
pub use model::{ChangeEntry, ChangeSet, Comparison};
