//! Count command

use ticketwatch_engine::registry::FileTracker;

pub fn execute(tracker: &FileTracker) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", tracker.ticket_count()?);
    Ok(())
}
