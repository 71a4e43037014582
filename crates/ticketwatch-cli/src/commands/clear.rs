//! Clear command

use ticketwatch_engine::registry::FileTracker;

pub fn execute(tracker: &FileTracker) -> Result<(), Box<dyn std::error::Error>> {
    let removed = tracker.ticket_count()?;
    tracker.clear_all()?;
    println!(
        "Cleared {} ticket(s) from partition '{}'",
        removed,
        tracker.partition()
    );
    Ok(())
}
