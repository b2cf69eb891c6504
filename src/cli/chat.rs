use crate::core::Snapshot;
use crate::core::config::AppConfig;
use crate::core::mentor::{self, MentorContext};
use anyhow::{Context, Result};
use tracing::info;

/// Answers a plain chat message as the configured user.
pub fn run(config: &AppConfig, snapshot: &Snapshot, message: &str) -> Result<()> {
    info!("Asking the mentor...");
    let context = MentorContext::from_snapshot(&config.profile, snapshot);
    println!("{}", mentor::reply(message, &context));
    Ok(())
}

/// Runs a raw JSON request through the chat handler and prints its JSON answer.
pub fn run_request(config: &AppConfig, snapshot: &Snapshot, body: &str) -> Result<()> {
    info!("Handling mentor chat request...");
    let response = mentor::handle_request(body, &config.profile, snapshot);
    let rendered = serde_json::to_string_pretty(&response)
        .context("Failed to serialize chat response")?;
    println!("{rendered}");
    Ok(())
}
