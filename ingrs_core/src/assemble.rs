//! Reassembly of tagged tokens into ingredient records.
//!
//! Two views are built while walking the tagged tokens. The data view maps
//! each category to every token tagged with it, wherever it occurs in the
//! sentence. The display view keeps consecutive runs of the same category in
//! their original order and spelling, and is used to rebuild the `input`
//! field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::text::tokenize::unclump;

/// Key holding the reconstructed phrase in every record.
pub const INPUT_KEY: &str = "input";

const UNIT_CATEGORY: &str = "unit";
const NAME_CATEGORY: &str = "name";

/// Plural unit names and their singular form.
const UNIT_SINGULARS: &[(&str, &str)] = &[
    ("cups", "cup"),
    ("tablespoons", "tablespoon"),
    ("teaspoons", "teaspoon"),
    ("pounds", "pound"),
    ("ounces", "ounce"),
    ("cloves", "clove"),
    ("sprigs", "sprig"),
    ("pinches", "pinch"),
    ("bunches", "bunch"),
    ("slices", "slice"),
    ("grams", "gram"),
    ("heads", "head"),
    ("quarts", "quart"),
    ("stalks", "stalk"),
    ("pints", "pint"),
    ("pieces", "piece"),
    ("sticks", "stick"),
    ("dashes", "dash"),
    ("fillets", "fillet"),
    ("cans", "can"),
    ("ears", "ear"),
    ("packages", "package"),
    ("strips", "strip"),
    ("bulbs", "bulb"),
    ("bottles", "bottle"),
];

/// A token paired with the label the tagger assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: String,
    pub tag: String,
}

impl TaggedToken {
    #[must_use]
    pub fn new(token: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            tag: tag.into(),
        }
    }
}

/// Structured fields of one ingredient phrase, keyed by category.
///
/// Serializes as a flat JSON object with sorted keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientRecord(BTreeMap<String, String>);

impl IngredientRecord {
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&str> {
        self.0.get(category).map(String::as_str)
    }

    /// The reconstructed original phrase.
    #[must_use]
    pub fn input(&self) -> &str {
        self.get(INPUT_KEY).unwrap_or_default()
    }

    pub fn insert(&mut self, category: impl Into<String>, value: impl Into<String>) {
        self.0.insert(category.into(), value.into());
    }

    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

/// Category of a tag: BIO prefix removed, lowercased.
fn category(tag: &str) -> String {
    tag.strip_prefix("B-")
        .or_else(|| tag.strip_prefix("I-"))
        .unwrap_or(tag)
        .to_lowercase()
}

/// Singular form of a plural unit name; other words pass through.
#[must_use]
pub fn singularize(word: &str) -> &str {
    UNIT_SINGULARS
        .iter()
        .find(|(plural, _)| *plural == word)
        .map_or(word, |(_, singular)| *singular)
}

/// Join words with spaces, without spaces before commas, after an opening
/// parenthesis or before a closing one.
#[must_use]
pub fn smart_join<S: AsRef<str>>(words: &[S]) -> String {
    let joined = words
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");

    joined
        .replace(" , ", ", ")
        .replace("( ", "(")
        .replace(" )", ")")
}

/// Turn a tagged sentence into records.
///
/// A sentence yields one record, or none when it has no tokens. Unit tokens
/// are singularized, all tokens are unclumped, and a `name` field loses any
/// leading or trailing periods.
#[must_use]
pub fn assemble(tagged: &[TaggedToken]) -> Vec<IngredientRecord> {
    let mut data: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut display: Vec<(String, Vec<&str>)> = Vec::new();

    for TaggedToken { token, tag } in tagged {
        let category = category(tag);

        match display.last_mut() {
            Some((previous, run)) if *previous == category => run.push(token),
            _ => display.push((category.clone(), vec![token.as_str()])),
        }

        let value: &str = if category == UNIT_CATEGORY {
            singularize(token)
        } else {
            token
        };
        data.entry(category).or_default().push(unclump(value));
    }

    if data.is_empty() {
        return Vec::new();
    }

    let mut record = IngredientRecord::default();
    for (category, tokens) in &data {
        record.insert(category, smart_join(tokens));
    }

    let runs: Vec<String> = display.iter().map(|(_, run)| run.join(" ")).collect();
    record.insert(INPUT_KEY, unclump(&smart_join(&runs)));

    let mut records = vec![record];
    trim_name(&mut records);
    records
}

/// Strip sentence-final punctuation left on the name of the first record.
fn trim_name(records: &mut [IngredientRecord]) {
    let Some(first) = records.first_mut() else {
        return;
    };
    if let Some(name) = first.0.get_mut(NAME_CATEGORY) {
        let trimmed = name.trim_matches('.');
        if trimmed.len() != name.len() {
            *name = trimmed.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(pairs: &[(&str, &str)]) -> Vec<TaggedToken> {
        pairs
            .iter()
            .map(|(token, tag)| TaggedToken::new(*token, *tag))
            .collect()
    }

    #[test]
    fn test_smart_join_punctuation() {
        assert_eq!(smart_join(&["(", "2", "cups", ")"]), "(2 cups)");
        assert_eq!(smart_join(&["flour", ",", "sifted"]), "flour, sifted");
        assert_eq!(smart_join(&[",", "sifted"]), ", sifted");
        assert_eq!(smart_join::<&str>(&[]), "");
    }

    #[test]
    fn test_singularize_table() {
        assert_eq!(singularize("cups"), "cup");
        assert_eq!(singularize("cloves"), "clove");
        assert_eq!(singularize("bottles"), "bottle");
        assert_eq!(singularize("cup"), "cup");
        assert_eq!(singularize("Cups"), "Cups");
        assert_eq!(singularize("leaves"), "leaves");
    }

    #[test]
    fn test_category_strips_bio_prefix() {
        assert_eq!(category("B-QTY"), "qty");
        assert_eq!(category("I-NAME"), "name");
        assert_eq!(category("COMMENT"), "comment");
        assert_eq!(category("X-UNIT"), "x-unit");
    }

    #[test]
    fn test_assemble_mixed_number() {
        let records = assemble(&tagged(&[
            ("2$1/2", "B-QUANTITY"),
            ("cups", "B-UNIT"),
            ("flour", "B-NAME"),
            (",", "B-COMMENT"),
            ("sifted", "I-COMMENT"),
        ]));

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.get("quantity"), Some("2 1/2"));
        assert_eq!(record.get("unit"), Some("cup"));
        assert_eq!(record.get("name"), Some("flour"));
        assert_eq!(record.get("comment"), Some(", sifted"));
        assert_eq!(record.input(), "2 1/2 cups flour, sifted");
        assert_eq!(record.fields().len(), 5);
    }

    #[test]
    fn test_assemble_singularizes_units_only() {
        let records = assemble(&tagged(&[
            ("3", "B-QTY"),
            ("cloves", "B-UNIT"),
            ("garlic", "B-NAME"),
        ]));
        assert_eq!(records[0].get("unit"), Some("clove"));
        assert_eq!(records[0].input(), "3 cloves garlic");

        let records = assemble(&tagged(&[("cloves", "B-NAME")]));
        assert_eq!(records[0].get("name"), Some("cloves"));
    }

    #[test]
    fn test_assemble_trims_name_periods() {
        let records = assemble(&tagged(&[
            ("1", "B-QTY"),
            ("cup", "B-UNIT"),
            ("flour", "B-NAME"),
            (".", "I-NAME"),
        ]));
        assert_eq!(records[0].get("name"), Some("flour "));
        assert_eq!(records[0].input(), "1 cup flour .");

        let records = assemble(&tagged(&[("..salt.", "B-NAME")]));
        assert_eq!(records[0].get("name"), Some("salt"));
    }

    #[test]
    fn test_assemble_merges_disjoint_spans() {
        let records = assemble(&tagged(&[
            ("chopped", "B-COMMENT"),
            ("onion", "B-NAME"),
            (",", "B-COMMENT"),
            ("divided", "I-COMMENT"),
        ]));
        assert_eq!(records[0].get("comment"), Some("chopped, divided"));
        assert_eq!(records[0].input(), "chopped onion, divided");
    }

    #[test]
    fn test_assemble_parenthesized_input() {
        let records = assemble(&tagged(&[
            ("1", "B-QTY"),
            ("can", "B-UNIT"),
            ("(", "B-COMMENT"),
            ("14", "I-COMMENT"),
            ("ounces", "I-COMMENT"),
            (")", "I-COMMENT"),
            ("tomatoes", "B-NAME"),
        ]));
        assert_eq!(records[0].get("comment"), Some("(14 ounces)"));
        assert_eq!(records[0].input(), "1 can (14 ounces) tomatoes");
    }

    #[test]
    fn test_assemble_passes_unknown_categories() {
        let records = assemble(&tagged(&[("fresh", "B-FRESHNESS"), ("basil", "B-NAME")]));
        assert_eq!(records[0].get("freshness"), Some("fresh"));
        assert_eq!(records[0].get("name"), Some("basil"));
    }

    #[test]
    fn test_assemble_without_name_adds_none() {
        let records = assemble(&tagged(&[("pinch", "B-UNIT")]));
        assert_eq!(records[0].get("name"), None);
        assert_eq!(records[0].get("unit"), Some("pinch"));
    }

    #[test]
    fn test_assemble_empty() {
        assert!(assemble(&[]).is_empty());
    }
}
