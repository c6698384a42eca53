use std::sync::OnceLock;

use regex::Regex;

/// Joins the integer and fractional part of a mixed number into one token.
/// Never expected in recipe text.
pub const CLUMP_SENTINEL: char = '$';

/// Units that are sometimes written with a trailing slash (`cup/2`).
const AMERICAN_UNITS: &[&str] = &[
    "cup",
    "tablespoon",
    "teaspoon",
    "pound",
    "ounce",
    "quart",
    "pint",
];

static MIXED_NUMBER: OnceLock<Regex> = OnceLock::new();

static TOKEN: OnceLock<Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn mixed_number() -> &'static Regex {
    MIXED_NUMBER.get_or_init(|| {
        Regex::new(r"(\d+)\s+(\d)/(\d)")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// A token is a lone comma or parenthesis, or a run of anything else up to
/// the next whitespace or delimiter.
#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn token_pattern() -> &'static Regex {
    TOKEN.get_or_init(|| {
        Regex::new(r"[,()]|[^\s,()]+")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Replace the whitespace between the integer and fractional part of a
/// quantity with [`CLUMP_SENTINEL`]; the rest of the string is left alone.
///
/// `"aaa 1 2/3 bbb"` becomes `"aaa 1$2/3 bbb"`.
#[must_use]
pub fn clump_fractions(text: &str) -> String {
    // `$$` is a literal `$` in the replacement syntax.
    mixed_number()
        .replace_all(text, "${1}$$${2}/${3}")
        .into_owned()
}

/// Turn sentinels back into spaces. The reverse of [`clump_fractions`].
#[must_use]
pub fn unclump(text: &str) -> String {
    text.replace(CLUMP_SENTINEL, " ")
}

fn split_unit_slashes(text: &str) -> String {
    let mut s = text.to_string();
    for unit in AMERICAN_UNITS {
        s = s.replace(&format!("{unit}/"), &format!("{unit} "));
        s = s.replace(&format!("{unit}s/"), &format!("{unit}s "));
    }
    s
}

/// Split a normalized phrase into tokens.
///
/// Commas and parentheses become tokens of their own, mixed numbers stay
/// clumped as a single token, whitespace separates everything else. Empty
/// pieces are never emitted.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let clumped = clump_fractions(&split_unit_slashes(text));
    token_pattern()
        .find_iter(&clumped)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clump_fractions() {
        assert_eq!(clump_fractions("aaa 1 2/3 bbb"), "aaa 1$2/3 bbb");
        assert_eq!(clump_fractions("10  1/2 cups"), "10$1/2 cups");
        assert_eq!(clump_fractions("1/2 cup"), "1/2 cup");
    }

    #[test]
    fn test_unclump_reverses_clump() {
        for s in ["2 1/2 cups flour", "add 1 3/4 teaspoon", "12 1/8"] {
            assert_eq!(unclump(&clump_fractions(s)), s);
        }
    }

    #[test]
    fn test_tokenize_splits_punctuation() {
        assert_eq!(
            tokenize("2 1/2 cups flour, sifted"),
            vec!["2$1/2", "cups", "flour", ",", "sifted"]
        );
        assert_eq!(
            tokenize("1 can (14 ounces) tomatoes"),
            vec!["1", "can", "(", "14", "ounces", ")", "tomatoes"]
        );
    }

    #[test]
    fn test_tokenize_unit_slash() {
        assert_eq!(
            tokenize("1 cup/2 tablespoons"),
            vec!["1", "cup", "2", "tablespoons"]
        );
        assert_eq!(
            tokenize("2 cups/500ml milk"),
            vec!["2", "cups", "500ml", "milk"]
        );
    }

    #[test]
    fn test_tokenize_drops_empty_pieces() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert_eq!(tokenize(" 1/4 teaspoon"), vec!["1/4", "teaspoon"]);
        assert_eq!(tokenize("salt,,pepper"), vec!["salt", ",", ",", "pepper"]);
    }

    #[test]
    fn test_tokenize_keeps_trailing_period() {
        assert_eq!(tokenize("3 eggs."), vec!["3", "eggs."]);
    }
}
