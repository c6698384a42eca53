//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input type, so
//! dispatch is resolved at compile time.

use std::path::{Path, PathBuf};

use ingrs_config::Config;
use ingrs_core::IngredientParser;
use ingrs_crf::CrfTagger;
use tracing::info;

mod info;
mod init;
mod parse;
mod version;

pub use info::{InfoInput, InfoStrategy};
pub use init::InitStrategy;
pub use parse::{ParseInput, ParseStrategy};
pub use version::VersionStrategy;

/// Load the config from an explicit file, or from `~/ingrs/config.json`.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    path.map_or_else(Config::load, Config::load_from)
}

/// Build a parser around the CRF model named on the command line or in the
/// config.
fn build_parser(
    config: &Config,
    model_override: Option<PathBuf>,
) -> anyhow::Result<IngredientParser<CrfTagger>> {
    let model_path = model_override.unwrap_or_else(|| config.model_path());
    info!("Loading tagger model from {}", model_path.display());

    let tagger = CrfTagger::from_path(&model_path).map_err(|e| {
        anyhow::anyhow!("Failed to load tagger model {}: {e}", model_path.display())
    })?;

    Ok(IngredientParser::new(tagger)
        .with_parallelism(config.parser.parallel, config.parser.min_parallel_batch))
}

/// Core trait defining the contract for all command strategies.
///
/// # Design Principles
/// - **Static dispatch**: All calls are monomorphized at compile time
/// - **Type safety**: Each strategy defines its own input type via associated type
/// - **Extensibility**: Adding new commands requires only implementing this trait
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
