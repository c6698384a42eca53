/// Unicode vulgar fractions and their ASCII spelling.
const VULGAR_FRACTIONS: &[(char, &str)] = &[
    ('\u{215b}', "1/8"),
    ('\u{215c}', "3/8"),
    ('\u{215d}', "5/8"),
    ('\u{215e}', "7/8"),
    ('\u{2159}', "1/6"),
    ('\u{215a}', "5/6"),
    ('\u{2155}', "1/5"),
    ('\u{2156}', "2/5"),
    ('\u{2157}', "3/5"),
    ('\u{2158}', "4/5"),
    ('\u{bc}', "1/4"),
    ('\u{be}', "3/4"),
    ('\u{2153}', "1/3"),
    ('\u{2154}', "2/3"),
    ('\u{bd}', "1/2"),
];

fn ascii_fraction(c: char) -> Option<&'static str> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(glyph, _)| *glyph == c)
        .map(|(_, ascii)| *ascii)
}

/// Replace unicode vulgar fractions with their ASCII form, each preceded by
/// a space so that `1½` reads as `1 1/2`.
///
/// The inserted space may leave a leading or doubled space; tokenization
/// splits on whitespace so this is harmless.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match ascii_fraction(c) {
            Some(ascii) => {
                out.push(' ');
                out.push_str(ascii);
            }
            None => out.push(c),
        }
    }
    out
}
