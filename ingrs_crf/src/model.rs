use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// Weights of a trained linear-chain CRF.
///
/// Every attribute of an item fires with value 1.0, so a state feature is
/// just a weight per (attribute, label) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrfModel {
    /// Output labels, e.g. `B-QTY`, `I-NAME`.
    pub labels: Vec<String>,

    /// `from label -> to label -> weight`.
    #[serde(default)]
    pub transitions: BTreeMap<String, BTreeMap<String, f64>>,

    /// `attribute -> label -> weight`.
    #[serde(default)]
    pub state_features: BTreeMap<String, BTreeMap<String, f64>>,
}

impl CrfModel {
    /// Load a model file.
    ///
    /// Binary crfsuite models are recognized by their magic bytes. Otherwise
    /// `.json` files hold the serialized [`CrfModel`] and anything else is
    /// read as `crfsuite dump` output.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;

        let model = if bytes.starts_with(crate::binary::MAGIC) {
            Self::from_crfsuite(&bytes)?
        } else {
            let content = String::from_utf8(bytes)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json {
                Self::from_json(&content)?
            } else {
                Self::from_dump(&content)?
            }
        };

        info!(
            "Loaded CRF model from {}: {} labels, {} attributes, {} features",
            path.display(),
            model.labels.len(),
            model.state_features.len(),
            model.feature_count()
        );
        Ok(model)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse the text form written by `crfsuite dump`.
    pub fn from_dump(content: &str) -> Result<Self> {
        crate::dump::parse(content)
    }

    /// Parse a binary model as written by crfsuite training.
    pub fn from_crfsuite(bytes: &[u8]) -> Result<Self> {
        crate::binary::parse(bytes)
    }

    /// Number of transition and state weights.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        let transitions: usize = self.transitions.values().map(BTreeMap::len).sum();
        let states: usize = self.state_features.values().map(BTreeMap::len).sum();
        transitions + states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_json_defaults_missing_weights() {
        let model = CrfModel::from_json(r#"{"labels": ["B-NAME"]}"#)
            .expect("valid model JSON");
        assert_eq!(model.labels, vec!["B-NAME"]);
        assert!(model.transitions.is_empty());
        assert_eq!(model.feature_count(), 0);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_feature_count() {
        let model = CrfModel::from_json(
            r#"{
                "labels": ["B-QTY", "B-NAME"],
                "transitions": {"B-QTY": {"B-NAME": 1.5, "B-QTY": -0.5}},
                "state_features": {"I1": {"B-QTY": 2.0}}
            }"#,
        )
        .expect("valid model JSON");
        assert_eq!(model.feature_count(), 3);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(CrfModel::from_json("{labels: }").is_err());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_from_path_detects_binary_model() {
        // The extension is ignored once the magic bytes match.
        let bytes = crate::binary::encode(&["B-NAME"], &["salt"], &[(0, 0, 0, 1.5)]);
        let file = format!("ingrs-model-{}.json", std::process::id());
        let path = std::env::temp_dir().join(file);
        std::fs::write(&path, &bytes).expect("temp file should be writable");

        let model = CrfModel::from_path(&path);
        std::fs::remove_file(&path).expect("temp file should be removable");

        let model = model.expect("binary model should load");
        assert_eq!(model.labels, vec!["B-NAME"]);
        assert_eq!(model.feature_count(), 1);
    }
}
