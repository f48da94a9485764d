//! # Issue Lookup Example
//!
//! Checks that an issue exists and prints its `State` field.
//!
//! ## Usage
//!
//! ```bash
//! export YOUTRACK_URL="https://tracker.example.com/youtrack/"
//! cargo run --example issue_lookup -- PROJ-1
//! ```

use youtrack_rest::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let issue_id = std::env::args().nth(1).unwrap_or_else(|| "PROJ-1".to_string());
    let youtrack = TrackerConfig::from_env()?.connect()?;

    if !youtrack.issue_exists(&issue_id).await? {
        println!("{} does not exist", issue_id);
        return Ok(());
    }

    let issue = youtrack.issue(&issue_id).await?;
    println!("{}: {}", issue.id, issue.summary.as_deref().unwrap_or(""));
    match issue.custom_field("State") {
        Some(state) => println!("State: {}", state),
        None => println!("State: <no such field>"),
    }

    Ok(())
}
