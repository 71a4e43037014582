//! Show command

use clap::Args;
use ticketwatch_core::errors::{ExError, TrackerError};
use ticketwatch_engine::registry::FileTracker;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Ticket id
    pub id: String,
}

pub fn execute(args: ShowArgs, tracker: &FileTracker) -> Result<(), Box<dyn std::error::Error>> {
    let ticket = tracker.get_ticket(&args.id)?.ok_or_else(|| {
        ExError::from(TrackerError::TicketNotFound {
            ticket_id: args.id.clone(),
        })
        .with_op("show_ticket")
        .with_partition(tracker.partition())
    })?;

    println!("{}", serde_json::to_string_pretty(&ticket)?);
    Ok(())
}
