//! Receive command

use clap::Args;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use ticketwatch_core::diff::render_change_summary;
use ticketwatch_engine::registry::FileTracker;

#[derive(Debug, Args)]
pub struct ReceiveArgs {
    /// JSON payload file (reads stdin when omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn execute(args: ReceiveArgs, tracker: &FileTracker) -> Result<(), Box<dyn std::error::Error>> {
    let text = match &args.file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let payload: Value =
        serde_json::from_str(&text).map_err(|e| format!("Invalid JSON payload: {}", e))?;

    let outcome = tracker.receive(payload)?;

    print!(
        "{}",
        render_change_summary(&outcome.ticket_id, &outcome.comparison)
    );
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
