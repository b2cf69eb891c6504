use anyhow::Result;
use bizmentor::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for bizmentor::AppCommand {
    fn from(cmd: Commands) -> bizmentor::AppCommand {
        match cmd {
            Commands::Summary => bizmentor::AppCommand::Summary,
            Commands::Progress => bizmentor::AppCommand::Progress,
            Commands::History => bizmentor::AppCommand::History,
            Commands::Credit => bizmentor::AppCommand::Credit,
            Commands::Challenges => bizmentor::AppCommand::Challenges,
            Commands::Chat { message, json } => bizmentor::AppCommand::Chat { message, json },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the dashboard summary
    Summary,
    /// Display the growth series and learning impact per module
    Progress,
    /// Display period-over-period history
    History,
    /// Display credit eligibility and offers
    Credit,
    /// Display challenges, badges and rank
    Challenges,
    /// Ask the mentor a question
    Chat {
        /// The question, or a JSON request body with --json
        message: String,

        /// Treat the message as a JSON chat request and print a JSON response
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => bizmentor::cli::setup::setup(),
        Some(cmd) => bizmentor::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
