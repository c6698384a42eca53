use std::path::{Path, PathBuf};

use ingrs_core::ParseRequest;
use tokio::io::AsyncReadExt;
use tracing::info;

/// Input parameters for the Parse command strategy.
#[derive(Debug, Clone)]
pub struct ParseInput {
    /// Phrases given on the command line
    pub ingredients: Vec<String>,
    /// JSON request file, used when no phrases are given
    pub input: Option<PathBuf>,
    /// Model override
    pub model: Option<PathBuf>,
    /// Config file override
    pub config: Option<PathBuf>,
    /// Pretty-print the response
    pub pretty: bool,
}

/// Strategy for executing the Parse command.
///
/// Reads a batch of phrases, tags them with the configured CRF model and
/// writes a `{"ingredients": [...]}` response to stdout. Parsing runs on the
/// blocking pool since it is CPU-bound.
#[derive(Debug, Clone, Copy)]
pub struct ParseStrategy;

impl super::CommandStrategy for ParseStrategy {
    type Input = ParseInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = super::load_config(input.config.as_deref())?;
        let request = read_request(input.ingredients, input.input.as_deref()).await?;
        info!("Parsing {} ingredient phrases", request.ingredients.len());

        let parser = super::build_parser(&config, input.model)?;
        let response = tokio::task::spawn_blocking(move || parser.handle(&request)).await??;

        let json = if input.pretty {
            serde_json::to_string_pretty(&response)?
        } else {
            serde_json::to_string(&response)?
        };
        println!("{json}");

        Ok(())
    }
}

/// Phrases from the command line, else a JSON request from `path`, else a
/// JSON request from stdin.
async fn read_request(
    ingredients: Vec<String>,
    path: Option<&Path>,
) -> anyhow::Result<ParseRequest> {
    if !ingredients.is_empty() {
        return Ok(ParseRequest { ingredients });
    }

    let content = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    serde_json::from_str(&content).map_err(|e| {
        anyhow::anyhow!("Expected a JSON object with an \"ingredients\" array: {e}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_request_path(stem: &str) -> PathBuf {
        let file = format!("{stem}-{}.json", std::process::id());
        std::env::temp_dir().join(file)
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_arguments_take_precedence() {
        let request = read_request(
            vec!["1 cup sugar".to_string()],
            Some(Path::new("/nonexistent/request.json")),
        )
        .await
        .expect("arguments need no file");
        assert_eq!(request.ingredients, vec!["1 cup sugar"]);
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_request_file() {
        let path = temp_request_path("ingrs-request");
        tokio::fs::write(&path, r#"{"ingredients": ["2 eggs", "salt"]}"#)
            .await
            .expect("temp file should be writable");

        let request = read_request(Vec::new(), Some(path.as_path())).await;
        tokio::fs::remove_file(&path)
            .await
            .expect("temp file should be removable");

        assert_eq!(
            request.expect("request file is valid").ingredients,
            vec!["2 eggs", "salt"]
        );
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_request_file_with_wrong_shape() {
        let path = temp_request_path("ingrs-bad-request");
        tokio::fs::write(&path, r#"["2 eggs"]"#)
            .await
            .expect("temp file should be writable");

        let result = read_request(Vec::new(), Some(path.as_path())).await;
        tokio::fs::remove_file(&path)
            .await
            .expect("temp file should be removable");

        let message = result.expect_err("bare array").to_string();
        assert!(message.contains("\"ingredients\" array"), "{message}");
    }
}
