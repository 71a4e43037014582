use ticketwatch_core_types::RequestId;
use thiserror::Error;

/// Result type alias using TrackerError
pub type Result<T> = std::result::Result<T, TrackerError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the CLI, an HTTP
/// front end) can use to pick a user-visible response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Client errors
    InvalidInput,
    MissingId,
    InvalidPartition,
    NotFound,

    // Storage
    Io,
    Serialization,

    // Runtime
    Config,
    Concurrency,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::MissingId => "ERR_MISSING_ID",
            ExErrorKind::InvalidPartition => "ERR_INVALID_PARTITION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
        }
    }

    /// True for kinds caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput
                | ExErrorKind::MissingId
                | ExErrorKind::InvalidPartition
                | ExErrorKind::NotFound
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus optional
/// context (operation, ticket, partition, request) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    ticket_id: Option<String>,
    partition: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            ticket_id: None,
            partition: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add ticket ID context
    pub fn with_ticket_id(mut self, id: impl Into<String>) -> Self {
        self.ticket_id = Some(id.into());
        self
    }

    /// Add partition context
    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = Some(partition.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the ticket ID context, if any
    pub fn ticket_id(&self) -> Option<&str> {
        self.ticket_id.as_deref()
    }

    /// Get the partition context, if any
    pub fn partition(&self) -> Option<&str> {
        self.partition.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(ticket_id) = &self.ticket_id {
            write!(f, " (ticket_id: {})", ticket_id)?;
        }
        if let Some(partition) = &self.partition {
            write!(f, " (partition: {})", partition)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised while handling a ticket payload
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// Payload JSON root is not an object
    #[error("Ticket payload must be a JSON object, got {found}")]
    PayloadNotObject { found: String },

    /// None of the recognised id fields holds a usable value
    #[error("Ticket must have one of: {}", candidates.join(", "))]
    MissingTicketId { candidates: Vec<String> },

    /// Partition name would escape the data directory or is empty
    #[error("Invalid partition name '{partition}': {reason}")]
    InvalidPartition { partition: String, reason: String },

    /// No snapshot stored under the ticket id
    #[error("Ticket not found: {ticket_id}")]
    TicketNotFound { ticket_id: String },

    /// List filter is not of the form FIELD=VALUE
    #[error("Invalid filter '{filter}': expected FIELD=VALUE")]
    InvalidFilter { filter: String },
}

impl From<TrackerError> for ExError {
    fn from(err: TrackerError) -> Self {
        let message = err.to_string();
        match err {
            TrackerError::PayloadNotObject { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("receive_ticket")
                .with_message(message),

            TrackerError::MissingTicketId { .. } => ExError::new(ExErrorKind::MissingId)
                .with_op("resolve_ticket_id")
                .with_message(message),

            TrackerError::InvalidPartition { partition, .. } => {
                ExError::new(ExErrorKind::InvalidPartition)
                    .with_partition(partition)
                    .with_message(message)
            }

            TrackerError::TicketNotFound { ticket_id } => ExError::new(ExErrorKind::NotFound)
                .with_ticket_id(ticket_id)
                .with_message("Ticket not found"),

            TrackerError::InvalidFilter { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("list_tickets")
                .with_message(message),
        }
    }
}
