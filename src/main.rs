use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "logsalvage")]
#[command(about = "Recover invoice records from log lines and report on them", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send the rejected-records report
    Report {
        /// Print the report instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Answer a question about all recovered records
    Ask { question: String },
    /// Recover records from a file (or stdin) without any config
    Extract {
        input: Option<PathBuf>,
        /// Keep only records with this status
        #[arg(long)]
        status: Option<String>,
        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Serve the question API
    Serve,
    /// Interactive chat against a running question service
    Chat {
        /// Question endpoint; defaults to the configured web.listen address
        #[arg(long)]
        url: Option<String>,
        /// Seconds to wait for each answer
        #[arg(long, default_value_t = 300)]
        timeout_secs: u64,
    },
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Init {
        #[arg(long)]
        stdout: bool,
    },
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logsalvage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config_path = logsalvage::config::resolve_config_path(cli.config.as_deref());

    match cli.command {
        Commands::Report { dry_run } => logsalvage::cli::run::report(config_path, dry_run).await?,
        Commands::Ask { question } => logsalvage::cli::run::ask(config_path, &question).await?,
        Commands::Extract { input, status, json } => {
            logsalvage::cli::run::extract(input.as_deref(), status.as_deref(), json)?
        }
        Commands::Serve => logsalvage::cli::run::serve(config_path).await?,
        Commands::Chat { url, timeout_secs } => {
            let url = match url {
                Some(url) => url,
                None => match &config_path {
                    Some(path) => logsalvage::config::load_config(path)?.web.ask_url(),
                    None => logsalvage::config::WebConfig::default().ask_url(),
                },
            };
            logsalvage::cli::chat::run(url, Duration::from_secs(timeout_secs)).await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { stdout } => logsalvage::cli::config::init(stdout)?,
            ConfigAction::Validate => logsalvage::cli::config::validate(config_path)?,
        },
    }

    Ok(())
}
