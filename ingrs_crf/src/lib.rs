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

//! Linear-chain CRF tagger for ingredient phrases.
//!
//! Weights come from the binary model file crfsuite training writes, from
//! the text `crfsuite dump` prints for it, or from a JSON file; decoding is
//! plain Viterbi.

mod binary;
mod dump;
mod error;
pub mod model;
pub mod tagger;

pub use error::{ModelError, Result};
pub use model::CrfModel;
pub use tagger::CrfTagger;
