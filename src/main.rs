mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use eventhub_core::config::HubConfig;
use eventhub_core::EventHub;

#[derive(Parser)]
#[command(name = "eventhub")]
#[command(about = "Browse community events by date, and add new ones as an admin")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print the view as JSON instead of colored text
    #[arg(long, global = true)]
    json: bool,

    /// Timezone whose calendar days are used for date filtering (e.g. "Europe/Berlin")
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Start without the sample events
    #[arg(long, global = true)]
    no_seed: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session reading commands from stdin (default)
    Shell,
    /// Log in, switch to admin mode, add an event and show it
    Demo,
    /// Show the effective configuration
    Config {
        /// Write the effective configuration (flags included) to the config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level);

    let mut config = HubConfig::load()?;
    if let Some(tz) = cli.timezone {
        config.timezone = tz;
    }
    if cli.no_seed {
        config.seed_sample_events = false;
    }

    tracing::debug!(?config, "configuration loaded");

    let output = render::Output { json: cli.json };

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => commands::shell::run(&EventHub::from_config(&config)?, output).await,
        Commands::Demo => commands::demo::run(&EventHub::from_config(&config)?, output).await,
        Commands::Config { save } => commands::config::run(&config, save, output),
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
