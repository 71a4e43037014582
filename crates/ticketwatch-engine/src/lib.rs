//! Ticketwatch Engine - Orchestration layer
//!
//! Ties the change detector to durable snapshot stores:
//! - [`TicketTracker`] runs one receive (resolve id, stamp, get, compare, put)
//!   under a per-partition lock
//! - [`TrackerRegistry`] opens one tracker per partition on first use
//! - [`TrackerConfig`] holds the tunables, loadable from TOML

pub mod config;
pub mod filter;
pub mod registry;
pub mod tracker;

pub use config::TrackerConfig;
pub use filter::TicketFilter;
pub use registry::TrackerRegistry;
pub use tracker::{ReceiveOutcome, TicketTracker};
