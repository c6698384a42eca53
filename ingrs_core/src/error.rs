use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Tagger error: {0}")]
    Tagger(anyhow::Error),

    #[error("Tagger returned {tags} tags for {tokens} tokens")]
    TagCountMismatch { tokens: usize, tags: usize },
}
