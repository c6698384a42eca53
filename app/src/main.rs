#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    CommandStrategy, InfoInput, InfoStrategy, InitStrategy, ParseInput, ParseStrategy,
    VersionStrategy,
};

#[derive(Parser)]
#[command(name = "ingrs")]
#[command(about = "Ingredient phrase tagger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse ingredient phrases into structured records
    Parse {
        /// Phrases to parse; when empty, a {"ingredients": [...]} request is
        /// read from --input or stdin
        ingredients: Vec<String>,

        /// JSON request file
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Tagger model, overrides tagger.model_path
        #[arg(short = 'm', long)]
        model: Option<PathBuf>,

        /// Config file to use instead of ~/ingrs/config.json
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON response
        #[arg(long)]
        pretty: bool,
    },
    /// Initialize configuration
    Init,
    /// Show configuration and model summary
    Info {
        /// Config file to use instead of ~/ingrs/config.json
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            ingredients,
            input,
            model,
            config,
            pretty,
        } => {
            ParseStrategy
                .execute(ParseInput {
                    ingredients,
                    input,
                    model,
                    config,
                    pretty,
                })
                .await
        }
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info { config } => InfoStrategy.execute(InfoInput { config }).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
