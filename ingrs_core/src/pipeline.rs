//! End-to-end parsing of ingredient phrases.
//!
//! normalize -> tokenize -> features -> tagger -> assemble, once per phrase.
//! Phrases share no state, so batches may be spread over a rayon pool; the
//! output keeps input order either way.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::assemble::{IngredientRecord, TaggedToken, assemble};
use crate::error::{Error, Result};
use crate::features::sentence_features;
use crate::tagger::{Tagger, TaggerItem};
use crate::text::normalize::normalize;
use crate::text::tokenize::tokenize;
use crate::{ParseRequest, ParseResponse};

/// Smallest batch handed to the rayon pool by default.
pub const DEFAULT_MIN_PARALLEL_BATCH: usize = 8;

/// Tokens of a phrase paired with their features, ready for a tagger.
#[must_use]
pub fn tagger_items(sentence: &str) -> Vec<TaggerItem> {
    let tokens = tokenize(&normalize(sentence));
    let features = sentence_features(&tokens);
    tokens
        .into_iter()
        .zip(features)
        .map(|(token, features)| TaggerItem::new(token, features))
        .collect()
}

/// Parse one phrase with the given tagger.
///
/// A phrase without tokens yields no records and never reaches the tagger.
///
/// # Errors
/// Fails when the tagger fails or returns a different number of labels
/// than there are tokens.
pub fn parse_ingredient<T: Tagger + ?Sized>(
    sentence: &str,
    tagger: &T,
) -> Result<Vec<IngredientRecord>> {
    let items = tagger_items(sentence);
    if items.is_empty() {
        debug!("No tokens in {sentence:?}, skipping tagger");
        return Ok(Vec::new());
    }

    let tags = tagger.tag(&items).map_err(Error::Tagger)?;
    if tags.len() != items.len() {
        return Err(Error::TagCountMismatch {
            tokens: items.len(),
            tags: tags.len(),
        });
    }
    debug!("Tagged {} tokens", items.len());

    let tagged: Vec<TaggedToken> = items
        .into_iter()
        .zip(tags)
        .map(|(item, tag)| TaggedToken::new(item.token, tag))
        .collect();

    Ok(assemble(&tagged))
}

/// Parser bound to one tagger instance.
pub struct IngredientParser<T> {
    tagger: T,
    parallel: bool,
    min_parallel_batch: usize,
}

impl<T: Tagger> IngredientParser<T> {
    #[must_use]
    pub const fn new(tagger: T) -> Self {
        Self {
            tagger,
            parallel: true,
            min_parallel_batch: DEFAULT_MIN_PARALLEL_BATCH,
        }
    }

    /// Spread batches of at least `min_batch` phrases across threads.
    #[must_use]
    pub const fn with_parallelism(mut self, enabled: bool, min_batch: usize) -> Self {
        self.parallel = enabled;
        self.min_parallel_batch = min_batch;
        self
    }

    pub fn parse(&self, sentence: &str) -> Result<Vec<IngredientRecord>> {
        parse_ingredient(sentence, &self.tagger)
    }

    /// Parse every phrase and flatten the records, phrase order preserved.
    ///
    /// Any failing phrase fails the whole batch. When several fail in
    /// parallel mode, which error is returned is unspecified.
    pub fn parse_batch<S: AsRef<str> + Sync>(
        &self,
        sentences: &[S],
    ) -> Result<Vec<IngredientRecord>> {
        let parallel = self.parallel && sentences.len() >= self.min_parallel_batch.max(2);

        let per_sentence: Vec<Vec<IngredientRecord>> = if parallel {
            sentences
                .par_iter()
                .map(|s| self.parse(s.as_ref()))
                .collect::<Result<_>>()?
        } else {
            sentences
                .iter()
                .map(|s| self.parse(s.as_ref()))
                .collect::<Result<_>>()?
        };

        let records: Vec<IngredientRecord> = per_sentence.into_iter().flatten().collect();
        info!(
            "Parsed {} phrases into {} records ({})",
            sentences.len(),
            records.len(),
            if parallel { "parallel" } else { "sequential" }
        );
        Ok(records)
    }

    pub fn handle(&self, request: &ParseRequest) -> Result<ParseResponse> {
        Ok(ParseResponse {
            ingredients: self.parse_batch(&request.ingredients)?,
        })
    }
}
