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

use serde::{Deserialize, Serialize};

pub mod assemble;
mod error;
pub mod features;
pub mod pipeline;
pub mod tagger;
pub mod text;

pub use assemble::{IngredientRecord, TaggedToken, assemble, smart_join};
pub use error::{Error, Result};
pub use features::{FeatureVector, length_group, sentence_features};
pub use pipeline::IngredientParser;
pub use tagger::{Tagger, TaggerItem};
pub use text::normalize::normalize;
pub use text::tokenize::{clump_fractions, tokenize, unclump};

/// Batch of ingredient phrases, as accepted by the parse endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseRequest {
    pub ingredients: Vec<String>,
}

/// Flattened records for every phrase of a [`ParseRequest`], in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseResponse {
    pub ingredients: Vec<IngredientRecord>,
}
