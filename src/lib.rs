pub mod cli;
pub mod core;

use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::debug;

pub enum AppCommand {
    Summary,
    Progress,
    History,
    Credit,
    Challenges,
    Chat { message: String, json: bool },
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let snapshot = config.snapshot()?;

    match command {
        AppCommand::Summary => cli::summary::run(&config, &snapshot),
        AppCommand::Progress => cli::progress::run(&config, &snapshot),
        AppCommand::History => cli::history::run(&config, &snapshot),
        AppCommand::Credit => cli::credit::run(&config, &snapshot),
        AppCommand::Challenges => cli::challenges::run(&config, &snapshot),
        AppCommand::Chat { message, json } => {
            if json {
                cli::chat::run_request(&config, &snapshot, &message)
            } else {
                cli::chat::run(&config, &snapshot, &message)
            }
        }
    }
}
