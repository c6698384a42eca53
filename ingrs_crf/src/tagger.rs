use std::collections::HashMap;
use std::path::Path;

use ingrs_core::{Tagger, TaggerItem};

use crate::error::{ModelError, Result};
use crate::model::CrfModel;

/// Viterbi decoder over a compiled [`CrfModel`].
///
/// Immutable after construction, so a single instance can serve every
/// worker thread.
#[derive(Debug, Clone)]
pub struct CrfTagger {
    labels: Vec<String>,
    /// Row-major `from * labels.len() + to`.
    transitions: Vec<f64>,
    state: HashMap<String, Vec<(usize, f64)>>,
}

impl CrfTagger {
    /// Compile a model, resolving every label reference to an index.
    pub fn new(model: CrfModel) -> Result<Self> {
        if model.labels.is_empty() {
            return Err(ModelError::NoLabels);
        }

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(model.labels.len());
        for (i, label) in model.labels.iter().enumerate() {
            if index.insert(label.as_str(), i).is_some() {
                return Err(ModelError::DuplicateLabel(label.clone()));
            }
        }
        let resolve = |label: &str| {
            index
                .get(label)
                .copied()
                .ok_or_else(|| ModelError::UnknownLabel(label.to_string()))
        };

        let n = model.labels.len();
        let mut transitions = vec![0.0; n * n];
        for (from, targets) in &model.transitions {
            let from = resolve(from.as_str())?;
            for (to, weight) in targets {
                transitions[from * n + resolve(to.as_str())?] = *weight;
            }
        }

        let mut state = HashMap::with_capacity(model.state_features.len());
        for (attribute, weights) in &model.state_features {
            let resolved = weights
                .iter()
                .map(|(label, weight)| resolve(label.as_str()).map(|i| (i, *weight)))
                .collect::<Result<Vec<_>>>()?;
            state.insert(attribute.clone(), resolved);
        }

        Ok(Self {
            labels: model.labels,
            transitions,
            state,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(CrfModel::from_path(path)?)
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.state.len()
    }

    fn transition(&self, from: usize, to: usize) -> f64 {
        self.transitions[from * self.labels.len() + to]
    }

    /// Sum of state weights per label for every attribute of the item.
    fn state_scores(&self, item: &TaggerItem) -> Vec<f64> {
        let mut scores = vec![0.0; self.labels.len()];
        for attribute in item.attributes() {
            if let Some(weights) = self.state.get(attribute) {
                for (label, weight) in weights {
                    scores[*label] += weight;
                }
            }
        }
        scores
    }

    /// Label indices of the best-scoring path. Ties go to the lower index.
    #[must_use]
    pub fn decode(&self, items: &[TaggerItem]) -> Vec<usize> {
        let Some((first, rest)) = items.split_first() else {
            return Vec::new();
        };

        let mut scores = self.state_scores(first);
        let mut backpointers: Vec<Vec<usize>> = Vec::with_capacity(rest.len());

        for item in rest {
            let emit = self.state_scores(item);
            let mut next = Vec::with_capacity(emit.len());
            let mut pointers = Vec::with_capacity(emit.len());

            for (to, emission) in emit.iter().enumerate() {
                let (from, best) = argmax(
                    scores
                        .iter()
                        .enumerate()
                        .map(|(from, score)| score + self.transition(from, to)),
                );
                next.push(best + emission);
                pointers.push(from);
            }

            backpointers.push(pointers);
            scores = next;
        }

        let (mut best, _) = argmax(scores.iter().copied());
        let mut path = Vec::with_capacity(items.len());
        path.push(best);
        for pointers in backpointers.iter().rev() {
            best = pointers[best];
            path.push(best);
        }
        path.reverse();
        path
    }
}

/// Index and value of the first maximum.
fn argmax(values: impl Iterator<Item = f64>) -> (usize, f64) {
    values.enumerate().fold((0, f64::NEG_INFINITY), |(best_i, best), (i, value)| {
        if value > best { (i, value) } else { (best_i, best) }
    })
}

impl Tagger for CrfTagger {
    fn tag(&self, items: &[TaggerItem]) -> anyhow::Result<Vec<String>> {
        Ok(self
            .decode(items)
            .into_iter()
            .map(|label| self.labels[label].clone())
            .collect())
    }
}
