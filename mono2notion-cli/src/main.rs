use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mono2notion_ingest::local_statement;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

mod config;
mod handler;
mod logging;
mod pipeline;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("MONO2NOTION_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "mono2notion",
    version = VERSION,
    about = "Send Monobank statement rows to a Notion database"
)]
struct Cli {
    /// Config file (TOML). A missing file means defaults plus environment.
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a local statement CSV and deliver every row
    Run {
        /// Path to the statement CSV (defaults to ./report.csv)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Handle an S3 upload notification; prints the invocation response
    HandleEvent {
        /// Notification JSON file, or `-` for stdin
        #[arg(long, default_value = "-")]
        event: String,
    },

    /// Parse and normalize a statement without sending anything
    Preview {
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a config file with default values
    Init,
    /// Print the effective configuration (API key redacted)
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    logging::init_logging(cli.log_json);

    match cli.command {
        Command::Run { csv } => {
            let cfg = config::load_config(&cli.config)?;
            cfg.validate()?;
            let path = local_statement(csv.unwrap_or_else(default_statement_csv))?;
            let engine = pipeline::notion_engine(&cfg)?;

            info!(version = VERSION, path = %path.display(), "processing local statement");
            let report = pipeline::process_csv(&path, &cfg, &engine).await?;

            println!(
                "Delivered {}/{} rows ({} permanently failed, {} fatal)",
                report.delivered,
                report.total(),
                report.permanently_failed,
                report.fatal
            );
        }

        Command::HandleEvent { event } => {
            let event_json = read_event(&event)?;

            let response = match config::load_config(&cli.config) {
                Ok(cfg) => handler::invoke(&event_json, &cfg).await,
                Err(err) => handler::respond(Err(err)),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.is_success() {
                std::process::exit(1);
            }
        }

        Command::Preview { csv } => {
            let cfg = config::load_config(&cli.config)?;
            let path = local_statement(csv.unwrap_or_else(default_statement_csv))?;
            let records = pipeline::load_records(&path, &cfg)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&cli.config)?,
            ConfigCommand::Show => {
                let cfg = config::load_config(&cli.config)?;
                let s = toml::to_string_pretty(&config::redacted(&cfg))
                    .context("serialize config")?;
                println!("{s}");
            }
        },
    }

    Ok(())
}

fn default_statement_csv() -> PathBuf {
    PathBuf::from("report.csv")
}

fn read_event(source: &str) -> Result<String> {
    if source == "-" {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("reading event from stdin")?;
        return Ok(s);
    }
    std::fs::read_to_string(source).with_context(|| format!("read {source}"))
}
