use ticketwatch_core::errors::{ExError, ExErrorKind, TrackerError};

#[test]
fn test_missing_id_is_client_error() {
    let err = TrackerError::MissingTicketId {
        candidates: vec!["id".to_string(), "ticket_id".to_string()],
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MissingId);
    assert_eq!(ex_err.code(), "ERR_MISSING_ID");
    assert!(ex_err.kind().is_client_error());
    assert!(ex_err.message().contains("id, ticket_id"));
}

#[test]
fn test_not_found_carries_ticket_id() {
    let err = TrackerError::TicketNotFound {
        ticket_id: "T404".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.ticket_id(), Some("T404"));
}

#[test]
fn test_invalid_partition_carries_partition() {
    let err = TrackerError::InvalidPartition {
        partition: "../etc".to_string(),
        reason: "must not start with '.'".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidPartition);
    assert_eq!(ex_err.partition(), Some("../etc"));
}

#[test]
fn test_storage_kinds_are_not_client_errors() {
    for kind in [
        ExErrorKind::Io,
        ExErrorKind::Serialization,
        ExErrorKind::Config,
        ExErrorKind::Concurrency,
    ] {
        assert!(!kind.is_client_error(), "{:?}", kind);
    }
}

#[test]
fn test_error_kind_codes_are_unique() {
    let kinds = [
        ExErrorKind::InvalidInput,
        ExErrorKind::MissingId,
        ExErrorKind::InvalidPartition,
        ExErrorKind::NotFound,
        ExErrorKind::Io,
        ExErrorKind::Serialization,
        ExErrorKind::Config,
        ExErrorKind::Concurrency,
    ];
    let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), kinds.len());
    assert!(codes.iter().all(|c| c.starts_with("ERR_")));
}
