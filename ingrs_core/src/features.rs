//! Per-token feature derivation.
//!
//! Every token is described to the tagger by four positional markers:
//! its 1-based index, a coarse bucket of the sentence length, whether it is
//! capitalized and whether it sits inside parentheses.

use serde::{Deserialize, Serialize};

/// Number of markers in every [`FeatureVector`].
pub const FEATURE_COUNT: usize = 4;

/// Upper bounds of the sentence-length buckets, ascending.
const LENGTH_BUCKETS: [usize; 5] = [4, 8, 12, 16, 20];

/// Ordered feature markers for one token. The order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureVector([String; FEATURE_COUNT]);

impl FeatureVector {
    /// Build the markers for the token at 1-based `index` of a sentence of
    /// `sentence_len` tokens.
    #[must_use]
    pub fn new(index: usize, sentence_len: usize, token: &str, inside_paren: bool) -> Self {
        Self([
            format!("I{index}"),
            format!("L{}", length_group(sentence_len)),
            format!("{}CAP", yes_no(is_capitalized(token))),
            format!("{}PAREN", yes_no(inside_paren)),
        ])
    }

    /// Features of the token at 1-based `index` within `tokens`.
    ///
    /// Scans the whole sentence; prefer [`sentence_features`] when every
    /// token is needed.
    #[must_use]
    pub fn for_token<S: AsRef<str>>(index: usize, tokens: &[S]) -> Self {
        let position = index.saturating_sub(1);
        let inside = inside_parenthesis(tokens)
            .get(position)
            .copied()
            .unwrap_or(false);
        let token = tokens.get(position).map_or("", AsRef::as_ref);
        Self::new(index, tokens.len(), token, inside)
    }

    #[must_use]
    pub const fn as_slice(&self) -> &[String] {
        &self.0
    }
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Bucket a sentence length: the first bound strictly greater than
/// `length`, or `X` once the sentence has 20 tokens or more.
#[must_use]
pub fn length_group(length: usize) -> String {
    LENGTH_BUCKETS
        .iter()
        .find(|bound| length < **bound)
        .map_or_else(|| "X".to_string(), ToString::to_string)
}

fn is_capitalized(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Parenthesis membership for every token of a sentence, in one pass.
///
/// Parentheses themselves are members. Any other token is a member when an
/// unclosed `(` precedes it and a `)` follows it later in the sentence.
#[must_use]
pub fn inside_parenthesis<S: AsRef<str>>(tokens: &[S]) -> Vec<bool> {
    let mut close_ahead = vec![false; tokens.len()];
    let mut seen_close = false;
    for (i, token) in tokens.iter().enumerate().rev() {
        close_ahead[i] = seen_close;
        if token.as_ref() == ")" {
            seen_close = true;
        }
    }

    let mut depth = 0usize;
    tokens
        .iter()
        .zip(close_ahead)
        .map(|(token, close)| match token.as_ref() {
            "(" => {
                depth += 1;
                true
            }
            ")" => {
                depth = depth.saturating_sub(1);
                true
            }
            _ => depth > 0 && close,
        })
        .collect()
}

/// Feature vectors for a whole token sequence, indexed from 1.
#[must_use]
pub fn sentence_features<S: AsRef<str>>(tokens: &[S]) -> Vec<FeatureVector> {
    let length = tokens.len();
    tokens
        .iter()
        .zip(inside_parenthesis(tokens))
        .enumerate()
        .map(|(i, (token, inside))| FeatureVector::new(i + 1, length, token.as_ref(), inside))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_group_buckets() {
        for n in 0..4 {
            assert_eq!(length_group(n), "4");
        }
        for n in 4..8 {
            assert_eq!(length_group(n), "8");
        }
        assert_eq!(length_group(11), "12");
        assert_eq!(length_group(12), "16");
        assert_eq!(length_group(19), "20");
        assert_eq!(length_group(20), "X");
        assert_eq!(length_group(250), "X");
    }

    #[test]
    fn test_feature_vector_layout() {
        let tokens = ["Salt", "(", "kosher", ")"];
        let features = sentence_features(&tokens);

        assert_eq!(features.len(), tokens.len());
        assert_eq!(features[0].as_slice(), ["I1", "L8", "YesCAP", "NoPAREN"]);
        assert_eq!(features[2].as_slice(), ["I3", "L8", "NoCAP", "YesPAREN"]);
    }

    #[test]
    fn test_index_marker_increases_by_one() {
        let tokens: Vec<String> = (0..25).map(|i| format!("t{i}")).collect();
        let features = sentence_features(&tokens);

        for (i, fv) in features.iter().enumerate() {
            assert_eq!(fv.as_slice().len(), FEATURE_COUNT);
            assert_eq!(fv.as_slice()[0], format!("I{}", i + 1));
            assert_eq!(fv.as_slice()[1], "LX");
        }
    }

    #[test]
    fn test_capitalization_is_ascii_only() {
        let features = sentence_features(&["Élan", "Zest", "1cup", ""]);
        assert_eq!(features[0].as_slice()[2], "NoCAP");
        assert_eq!(features[1].as_slice()[2], "YesCAP");
        assert_eq!(features[2].as_slice()[2], "NoCAP");
        assert_eq!(features[3].as_slice()[2], "NoCAP");
    }

    #[test]
    fn test_parenthesis_spans() {
        let tokens = ["1", "can", "(", "14", "ounces", ")", "tomatoes"];
        assert_eq!(
            inside_parenthesis(&tokens),
            vec![false, false, true, true, true, true, false]
        );
    }

    #[test]
    fn test_parenthesis_between_separate_groups_is_outside() {
        let tokens = ["(", "a", ")", "b", "(", "c", ")"];
        assert_eq!(
            inside_parenthesis(&tokens),
            vec![true, true, true, false, true, true, true]
        );
    }

    #[test]
    fn test_parenthesis_after_closed_group_is_outside() {
        // `b` follows a closed group; a stray `)` later does not pull it in.
        let tokens = ["(", "a", ")", "b", ")"];
        assert_eq!(
            inside_parenthesis(&tokens),
            vec![true, true, true, false, true]
        );
    }

    #[test]
    fn test_parenthesis_unclosed_is_outside() {
        let tokens = ["salt", "(", "to", "taste"];
        assert_eq!(
            inside_parenthesis(&tokens),
            vec![false, true, false, false]
        );
    }

    #[test]
    fn test_parenthesis_repeated_token() {
        // The same text can be inside one span and outside elsewhere.
        let tokens = ["2", "(", "2", ")", "2"];
        assert_eq!(
            inside_parenthesis(&tokens),
            vec![false, true, true, true, false]
        );
    }

    #[test]
    fn test_nested_parenthesis() {
        let tokens = ["(", "a", "(", "b", ")", "c", ")"];
        assert!(inside_parenthesis(&tokens).iter().all(|inside| *inside));
    }

    #[test]
    fn test_for_token_matches_sentence_features() {
        let tokens = ["1", "can", "(", "14", "ounces", ")", "tomatoes"];
        let all = sentence_features(&tokens);
        for index in 1..=tokens.len() {
            assert_eq!(FeatureVector::for_token(index, &tokens), all[index - 1]);
        }
    }
}
