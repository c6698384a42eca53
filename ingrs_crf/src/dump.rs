//! Reader for the text written by `crfsuite dump`.
//!
//! The dump is a series of `NAME = { ... }` blocks. Only `LABELS`,
//! `TRANSITIONS` and `STATE_FEATURES` matter here:
//!
//! ```text
//! LABELS = {
//!       0: B-QTY
//! }
//!
//! TRANSITIONS = {
//!   (1) B-QTY --> I-QTY: 1.250000
//! }
//!
//! STATE_FEATURES = {
//!   (0) I1 --> B-QTY: 2.500000
//! }
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ModelError, Result};
use crate::model::CrfModel;

static SECTION: OnceLock<Regex> = OnceLock::new();
static LABEL: OnceLock<Regex> = OnceLock::new();
static WEIGHT: OnceLock<Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// `NAME = {` opening a block.
fn section_pattern() -> &'static Regex {
    compiled(&SECTION, r"^([A-Z_]+) = \{\s*$")
}

/// `  3: B-NAME` inside `LABELS`.
fn label_pattern() -> &'static Regex {
    compiled(&LABEL, r"^\s*\d+: (.+?)\s*$")
}

/// `  (1) lhs --> label: weight` inside `TRANSITIONS` or `STATE_FEATURES`.
fn weight_pattern() -> &'static Regex {
    compiled(&WEIGHT, r"^\s*\(\d+\) (.+) --> (.+): (\S+)\s*$")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Labels,
    Transitions,
    StateFeatures,
    Other,
}

impl Section {
    fn from_name(name: &str) -> Self {
        match name {
            "LABELS" => Self::Labels,
            "TRANSITIONS" => Self::Transitions,
            "STATE_FEATURES" => Self::StateFeatures,
            _ => Self::Other,
        }
    }
}

fn malformed(line: usize, content: &str) -> ModelError {
    ModelError::Dump {
        line,
        content: content.to_string(),
    }
}

pub fn parse(content: &str) -> Result<CrfModel> {
    let mut model = CrfModel::default();
    let mut section: Option<Section> = None;

    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim_end();

        if line.trim().is_empty() {
            continue;
        }
        if line.trim() == "}" {
            section = None;
            continue;
        }

        let Some(current) = section else {
            let caps = section_pattern()
                .captures(line)
                .ok_or_else(|| malformed(line_no, line))?;
            section = Some(Section::from_name(&caps[1]));
            continue;
        };

        match current {
            Section::Other => {}
            Section::Labels => {
                let caps = label_pattern()
                    .captures(line)
                    .ok_or_else(|| malformed(line_no, line))?;
                model.labels.push(caps[1].to_string());
            }
            Section::Transitions | Section::StateFeatures => {
                let caps = weight_pattern()
                    .captures(line)
                    .ok_or_else(|| malformed(line_no, line))?;
                let weight: f64 = caps[3].parse().map_err(|_| malformed(line_no, line))?;
                let table = if current == Section::Transitions {
                    &mut model.transitions
                } else {
                    &mut model.state_features
                };
                table
                    .entry(caps[1].to_string())
                    .or_default()
                    .insert(caps[2].to_string(), weight);
            }
        }
    }

    Ok(model)
}
