//! Boundary to the sequence labeler.
//!
//! The parser never looks inside the model that assigns labels. Anything
//! that maps an ordered sequence of items to one label per item can stand
//! behind [`Tagger`]: a CRF, an HMM, a neural tagger or a rule table.

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;

/// One token as presented to the tagger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggerItem {
    pub token: String,
    pub features: FeatureVector,
}

impl TaggerItem {
    #[must_use]
    pub const fn new(token: String, features: FeatureVector) -> Self {
        Self { token, features }
    }

    /// Attribute strings in the order the tagger consumes them: the token
    /// text, then the feature markers.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.token.as_str())
            .chain(self.features.as_slice().iter().map(String::as_str))
    }
}

/// Assigns one label to every item of a sentence.
///
/// Implementations must return exactly `items.len()` labels, in item order.
/// Labels may carry a `B-`/`I-` prefix. Implementations are shared across
/// worker threads when batches are parsed in parallel.
pub trait Tagger: Send + Sync {
    fn tag(&self, items: &[TaggerItem]) -> anyhow::Result<Vec<String>>;
}

impl<T: Tagger + ?Sized> Tagger for std::sync::Arc<T> {
    fn tag(&self, items: &[TaggerItem]) -> anyhow::Result<Vec<String>> {
        (**self).tag(items)
    }
}
