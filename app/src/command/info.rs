use std::path::PathBuf;

use ingrs_crf::CrfModel;
use tracing::info;

/// Input parameters for the Info command strategy.
#[derive(Debug, Clone)]
pub struct InfoInput {
    /// Config file override
    pub config: Option<PathBuf>,
}

/// Strategy for displaying configuration information.
///
/// This strategy outputs:
/// - Tagger model path and a summary of the loaded model
/// - Batch parallelism settings
///
/// # Design
/// - Static dispatch: All method calls are monomorphized
/// - Stateless: No internal state
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = InfoInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input.config.as_deref())?;

        println!("=== ingrs Configuration ===\n");

        println!("Tagger:");
        let model_path = config.model_path();
        println!("  Model Path: {}", model_path.display());

        info!("Loading model for summary");
        match CrfModel::from_path(&model_path) {
            Ok(model) => {
                println!("  Status: Loaded");
                println!("  Labels: {}", format_labels(&model.labels));
                println!("  Attributes: {}", model.state_features.len());
                println!("  Features: {}", model.feature_count());
            }
            Err(e) => {
                println!("  Status: Load failed");
                println!("  Error: {e}");
            }
        }
        println!();

        println!("Parser:");
        println!("  Parallel: {}", config.parser.parallel);
        println!("  Min Parallel Batch: {}", config.parser.min_parallel_batch);

        Ok(())
    }
}

fn format_labels(labels: &[String]) -> String {
    if labels.is_empty() {
        "(none)".to_string()
    } else {
        format!("{} ({})", labels.len(), labels.join(", "))
    }
}
