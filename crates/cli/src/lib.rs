pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use recommender_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

use crate::commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "recommender",
    about = "Product recommendation CLI",
    long_about = "Match preference and feature selections against a product catalog, inspect the catalog, and check configuration.",
    after_help = "Examples:\n  recommender recommend -p \"Integração com chatbots\" -f \"Chat ao vivo\"\n  recommender recommend --type MultipleProducts -p marketing --json\n  recommender catalog list\n  recommender doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Score the catalog against selections and print ranked recommendations")]
    Recommend(RecommendArgs),
    #[command(subcommand, about = "Inspect the product catalog")]
    Catalog(CatalogCommand),
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Validate config, catalog loading, and catalog matchability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogCommand {
    #[command(about = "List every product")]
    List {
        #[arg(long, help = "JSON product catalog to use instead of the configured one")]
        catalog: Option<PathBuf>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Show one product by id")]
    Show {
        id: u64,
        #[arg(long, help = "JSON product catalog to use instead of the configured one")]
        catalog: Option<PathBuf>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(&args),
        Command::Catalog(CatalogCommand::List { catalog, json }) => {
            commands::catalog::list(catalog, json)
        }
        Command::Catalog(CatalogCommand::Show { id, catalog, json }) => {
            commands::catalog::show(catalog, id, json)
        }
        Command::Config => commands::CommandResult::text(commands::config::run()),
        Command::Doctor { json } => commands::CommandResult::text(commands::doctor::run(json)),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Installs the global subscriber. Logs go to stderr; `RUST_LOG` wins over
/// the configured level.
pub fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(logging.level.trim().to_ascii_lowercase()))?;
    let builder =
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(anyhow::Error::msg)
}
