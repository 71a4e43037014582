//! Ticket receive orchestration.
//!
//! ## Receive pipeline (in order):
//! 1. Reject payloads whose root is not a JSON object
//! 2. Resolve the ticket id from the configured id fields
//! 3. Stamp `received_at` (UTC, RFC 3339, microseconds)
//! 4. Under the partition lock: get previous snapshot, compare, put
//!
//! Steps 1-2 fail without touching the store. A failed put leaves the
//! previous snapshot in place.

use crate::config::TrackerConfig;
use crate::filter::TicketFilter;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use ticketwatch_core::errors::{ExError, ExErrorKind};
use ticketwatch_core::record::into_record;
use ticketwatch_core::{
    log_op_end, log_op_error, log_op_start, resolve_ticket_id, ChangeDetector, Comparison, Record,
    SnapshotStore,
};
use ticketwatch_core_types::schema::RECORD_RECEIVED_AT;
use ticketwatch_core_types::RequestContext;

/// Result of one successful receive.
///
/// Serializes as
/// `{"ticket_id": .., "changed": .., "changes": .., "received_at": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiveOutcome {
    pub ticket_id: String,
    #[serde(flatten)]
    pub comparison: Comparison,
    pub received_at: String,
}

impl ReceiveOutcome {
    pub fn changed(&self) -> bool {
        self.comparison.changed
    }
}

/// Change tracker for one partition.
///
/// The store sits behind a mutex held across get, compare and put, so two
/// concurrent receives of the same ticket always see each other's writes.
#[derive(Debug)]
pub struct TicketTracker<S> {
    partition: String,
    store: Mutex<S>,
    detector: ChangeDetector,
    id_fields: Vec<String>,
}

impl<S: SnapshotStore> TicketTracker<S> {
    pub fn new(partition: impl Into<String>, store: S, config: &TrackerConfig) -> Self {
        Self {
            partition: partition.into(),
            store: Mutex::new(store),
            detector: config.detector(),
            id_fields: config.id_fields.clone(),
        }
    }

    /// Tracker using the default id fields and ignored fields
    pub fn with_defaults(partition: impl Into<String>, store: S) -> Self {
        Self::new(partition, store, &TrackerConfig::default())
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Receive one ticket payload stamped with the current time.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the payload is not a JSON object
    /// - `MissingId` if no id field holds a usable value
    /// - `Io`/`Serialization` if the snapshot could not be persisted
    /// - `Concurrency` if a previous holder of the partition lock panicked
    pub fn receive(&self, payload: Value) -> Result<ReceiveOutcome, ExError> {
        self.receive_at(payload, Utc::now())
    }

    /// Receive one ticket payload stamped with `received_at`.
    ///
    /// # Errors
    ///
    /// As [`Self::receive`].
    pub fn receive_at(
        &self,
        payload: Value,
        received_at: DateTime<Utc>,
    ) -> Result<ReceiveOutcome, ExError> {
        let ctx = RequestContext::new(self.partition.clone());
        let start = Instant::now();
        log_op_start!(
            "receive_ticket",
            partition = %ctx.partition,
            request_id = %ctx.request_id
        );

        let result = self.receive_inner(payload, received_at).map_err(|err| {
            err.with_partition(ctx.partition.clone())
                .with_request_id(ctx.request_id.clone())
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => {
                log_op_end!(
                    "receive_ticket",
                    duration_ms = duration_ms,
                    partition = %ctx.partition,
                    request_id = %ctx.request_id,
                    ticket_id = %outcome.ticket_id,
                    changed = outcome.comparison.changed,
                    change_count = outcome.comparison.changes.len()
                );
            }
            Err(err) => {
                log_op_error!(
                    "receive_ticket",
                    err.clone(),
                    duration_ms = duration_ms,
                    partition = %ctx.partition,
                    request_id = %ctx.request_id,
                    ticket_id = err.ticket_id().unwrap_or_default(),
                    error = %err
                );
            }
        }
        result
    }

    fn receive_inner(
        &self,
        payload: Value,
        received_at: DateTime<Utc>,
    ) -> Result<ReceiveOutcome, ExError> {
        let mut record = into_record(payload)?;
        let ticket_id = resolve_ticket_id(&record, self.id_fields.as_slice())?;

        let received_at = received_at.to_rfc3339_opts(SecondsFormat::Micros, true);
        record.insert(
            RECORD_RECEIVED_AT.to_string(),
            Value::String(received_at.clone()),
        );

        let mut store = self.lock_store("receive_ticket")?;
        let comparison = self.detector.compare(store.get(&ticket_id), &record);
        store.put(&ticket_id, record)?;

        Ok(ReceiveOutcome {
            ticket_id,
            comparison,
            received_at,
        })
    }

    /// Latest stored snapshot of one ticket.
    ///
    /// # Errors
    ///
    /// `Concurrency` if the partition lock is poisoned.
    pub fn get_ticket(&self, ticket_id: &str) -> Result<Option<Record>, ExError> {
        let store = self.lock_store("get_ticket")?;
        Ok(store.get(ticket_id).cloned())
    }

    /// Every stored ticket, optionally narrowed by a filter.
    ///
    /// # Errors
    ///
    /// `Concurrency` if the partition lock is poisoned.
    pub fn list_tickets(
        &self,
        filter: Option<&TicketFilter>,
    ) -> Result<BTreeMap<String, Record>, ExError> {
        let store = self.lock_store("list_tickets")?;
        let mut tickets = store.list();
        if let Some(filter) = filter {
            tickets.retain(|_, record| filter.matches(record));
        }
        Ok(tickets)
    }

    /// Remove every ticket in the partition.
    ///
    /// # Errors
    ///
    /// `Io` if the partition file could not be removed, `Concurrency` if the
    /// partition lock is poisoned.
    pub fn clear_all(&self) -> Result<(), ExError> {
        let start = Instant::now();
        log_op_start!("clear_tickets", partition = %self.partition);

        let result = self
            .lock_store("clear_tickets")
            .and_then(|mut store| store.delete_all());

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => {
                log_op_end!(
                    "clear_tickets",
                    duration_ms = duration_ms,
                    partition = %self.partition
                );
            }
            Err(err) => {
                log_op_error!(
                    "clear_tickets",
                    err.clone(),
                    duration_ms = duration_ms,
                    partition = %self.partition
                );
            }
        }
        result
    }

    /// Number of stored tickets.
    ///
    /// # Errors
    ///
    /// `Concurrency` if the partition lock is poisoned.
    pub fn ticket_count(&self) -> Result<usize, ExError> {
        Ok(self.lock_store("ticket_count")?.len())
    }

    fn lock_store(&self, op: &str) -> Result<MutexGuard<'_, S>, ExError> {
        self.store.lock().map_err(|_| {
            ExError::new(ExErrorKind::Concurrency)
                .with_op(op)
                .with_partition(self.partition.clone())
                .with_message("partition lock poisoned by a panicked receive")
        })
    }
}
