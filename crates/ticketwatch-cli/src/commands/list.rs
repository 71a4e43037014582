//! List command

use clap::Args;
use ticketwatch_engine::registry::FileTracker;
use ticketwatch_engine::TicketFilter;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Keep only tickets whose FIELD equals VALUE, e.g. `step=done`
    #[arg(long, value_name = "FIELD=VALUE")]
    pub filter: Option<String>,
}

pub fn execute(args: ListArgs, tracker: &FileTracker) -> Result<(), Box<dyn std::error::Error>> {
    let filter = args
        .filter
        .as_deref()
        .map(str::parse::<TicketFilter>)
        .transpose()?;

    let tickets = tracker.list_tickets(filter.as_ref())?;
    println!("{}", serde_json::to_string_pretty(&tickets)?);
    Ok(())
}
