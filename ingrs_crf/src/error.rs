use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed dump line {line}: {content}")]
    Dump { line: usize, content: String },

    #[error("Invalid crfsuite model at byte {offset}: {reason}")]
    Binary { offset: usize, reason: &'static str },

    #[error("Model declares no labels")]
    NoLabels,

    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("Unknown label referenced by model: {0}")]
    UnknownLabel(String),
}
