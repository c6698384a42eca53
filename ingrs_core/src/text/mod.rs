//! Text preparation for ingredient phrases.
//!
//! Raw phrases are first rewritten into a canonical ASCII form (unicode
//! vulgar fractions become `n/d`), then split into the atomic tokens the
//! feature extractor and tagger operate on.

pub mod normalize;
pub mod tokenize;
