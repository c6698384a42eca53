use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use ingrs_core::pipeline::DEFAULT_MIN_PARALLEL_BATCH;

const CONFIG_DIR_NAME: &str = "ingrs";
const CONFIG_FILE_NAME: &str = "config.json";

const CONFIG_TEMPLATE: &str = r#"{
  "tagger": {
    "model_path": "~/ingrs/model.crfsuite"
  },
  "parser": {
    "parallel": true,
    "min_parallel_batch": 8
  }
}
"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub tagger: TaggerConfig,
    #[serde(default)]
    pub parser: ParserConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TaggerConfig {
    /// CRF weights: a trained crfsuite model, its `crfsuite dump` text or a
    /// `.json` model. `~/` expands to the home directory.
    #[serde(default = "TaggerConfig::default_model_path")]
    pub model_path: String,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            model_path: Self::default_model_path(),
        }
    }
}

impl TaggerConfig {
    fn default_model_path() -> String {
        "~/ingrs/model.crfsuite".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    #[serde(default = "ParserConfig::default_parallel")]
    pub parallel: bool,
    #[serde(default = "ParserConfig::default_min_parallel_batch")]
    pub min_parallel_batch: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            parallel: Self::default_parallel(),
            min_parallel_batch: Self::default_min_parallel_batch(),
        }
    }
}

impl ParserConfig {
    const fn default_parallel() -> bool {
        true
    }

    const fn default_min_parallel_batch() -> usize {
        DEFAULT_MIN_PARALLEL_BATCH
    }
}

/// Expand a leading `~/` to the home directory. Other paths are returned
/// unchanged, as is `~/...` when no home directory is known.
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR_NAME))
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load `~/ingrs/config.json`, falling back to defaults when the file
    /// does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::default_path()?;

        if !config_path.exists() {
            info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'ingrs init' to create config.",
                path.display()
            );
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config at {}: {e}", path.display()))?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolved location of the tagger model.
    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        expand_home(&self.tagger.model_path)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Write the config template to `path`, refusing to overwrite.
    pub fn write_template(path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }
        std::fs::write(path, CONFIG_TEMPLATE)?;
        Ok(())
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_path = Self::ensure_config_dir()?.join(CONFIG_FILE_NAME);
        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Copy the trained crfsuite tagger model to ~/ingrs/model.crfsuite");
        println!("   2. Or point tagger.model_path at a dump or JSON export of it");
        println!("   3. Run 'ingrs parse \"2 1/2 cups flour, sifted\"'");
        println!();
        println!("🔧 Configuration options:");
        println!("   - tagger.model_path: crfsuite model, crfsuite dump text or .json weights");
        println!("   - parser.parallel: spread large batches across threads");
        println!("   - parser.min_parallel_batch: smallest batch that goes parallel");
        println!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_template_matches_defaults() {
        let config: Config = serde_json::from_str(CONFIG_TEMPLATE).expect("template is valid");
        assert_eq!(config, Config::default());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"parser": {"parallel": false}}"#)
            .expect("partial config is valid");
        assert!(!config.parser.parallel);
        assert_eq!(config.parser.min_parallel_batch, DEFAULT_MIN_PARALLEL_BATCH);
        assert_eq!(config.tagger, TaggerConfig::default());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home("/opt/model.json"),
            PathBuf::from("/opt/model.json")
        );
        assert_eq!(expand_home("model.json"), PathBuf::from("model.json"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_home("~/ingrs/model.json"),
                home.join("ingrs/model.json")
            );
        }
    }
}
