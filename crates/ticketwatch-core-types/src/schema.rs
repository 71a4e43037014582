//! Canonical schema constants for structured logging and ticket records
//!
//! These constants ensure consistency across all logging and error reporting.

// Field keys every log_op event carries
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Reserved record fields

/// Bookkeeping field stamped on every stored ticket; never diffed.
pub const RECORD_RECEIVED_AT: &str = "received_at";

/// Key of the single entry in a first-observation change set.
pub const CHANGE_FIRST_RECEIVED: &str = "first_received";

/// Marker text carried by a first-observation change set.
pub const FIRST_RECEIVED_MESSAGE: &str = "This is the first time this ticket has been received";

/// Payload keys checked, in order, when resolving a ticket id.
pub const DEFAULT_ID_FIELDS: &[&str] = &["id", "ticket_id"];
