//! Reader for the binary model file produced by crfsuite training, the same
//! file `pycrfsuite.Tagger.open` loads.
//!
//! Integers are little-endian. A fixed header points at the chunks:
//!
//! ```text
//!  0  "lCRF"  magic
//!  4  u32     file size
//!  8  "FOMC"  model type
//! 12  u32     version
//! 16  u32     feature count
//! 20  u32     label count
//! 24  u32     attribute count
//! 28  u32     offset of the FEAT chunk
//! 32  u32     offset of the label string table
//! 36  u32     offset of the attribute string table
//! 40  u32     offset of label references
//! 44  u32     offset of attribute references
//! ```
//!
//! String tables are CQDB chunks. Their backward array maps an id to the
//! offset of an `(id, size, key\0)` record. The FEAT chunk holds fixed-size
//! `(type, src, dst, weight)` rows: type 0 is a state feature from an
//! attribute to a label, type 1 a transition between labels. The reference
//! chunks only speed up lookups in crfsuite and are not needed here.

use std::collections::BTreeMap;

use crate::error::{ModelError, Result};
use crate::model::CrfModel;

pub const MAGIC: &[u8; 4] = b"lCRF";
const MODEL_TYPE: &[u8; 4] = b"FOMC";
const FEATURE_CHUNK: &[u8; 4] = b"FEAT";
const STRING_CHUNK: &[u8; 4] = b"CQDB";

const FEATURE_HEADER_SIZE: usize = 12;
const FEATURE_SIZE: usize = 20;
const FEATURE_STATE: u32 = 0;
const FEATURE_TRANSITION: u32 = 1;

type Weights = BTreeMap<String, BTreeMap<String, f64>>;

const fn invalid(offset: usize, reason: &'static str) -> ModelError {
    ModelError::Binary { offset, reason }
}

/// Bounds-checked little-endian reads over the whole file.
struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or_else(|| invalid(offset, "unexpected end of file"))
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        <[u8; N]>::try_from(self.slice(offset, N)?)
            .map_err(|_| invalid(offset, "unexpected end of file"))
    }

    fn u32_at(&self, offset: usize) -> Result<u32> {
        self.array(offset).map(u32::from_le_bytes)
    }

    fn usize_at(&self, offset: usize) -> Result<usize> {
        usize::try_from(self.u32_at(offset)?)
            .map_err(|_| invalid(offset, "value out of range"))
    }

    fn f64_at(&self, offset: usize) -> Result<f64> {
        self.array(offset).map(f64::from_le_bytes)
    }

    fn expect_tag(&self, offset: usize, tag: &[u8; 4], reason: &'static str) -> Result<()> {
        if self.slice(offset, tag.len())? == tag {
            Ok(())
        } else {
            Err(invalid(offset, reason))
        }
    }
}

/// First `count` strings of the CQDB chunk at `offset`, in id order.
fn strings(reader: &Reader<'_>, offset: usize, count: usize) -> Result<Vec<String>> {
    reader.expect_tag(offset, STRING_CHUNK, "expected a CQDB string table")?;
    let backward_size = reader.usize_at(offset + 16)?;
    let backward = offset + reader.usize_at(offset + 20)?;
    if backward_size < count {
        return Err(invalid(offset, "string table has fewer entries than declared"));
    }

    (0..count)
        .map(|id| {
            let slot = backward + id * 4;
            let relative = reader.usize_at(slot)?;
            if relative == 0 {
                return Err(invalid(slot, "string id has no entry"));
            }
            let record = offset + relative;
            let size = reader.usize_at(record + 4)?;
            let key = reader.slice(record + 8, size)?;
            let key = key.strip_suffix(&[0]).unwrap_or(key);
            String::from_utf8(key.to_vec())
                .map_err(|_| invalid(record + 8, "string is not UTF-8"))
        })
        .collect()
}

fn lookup(names: &[String], id: usize, offset: usize) -> Result<&str> {
    names
        .get(id)
        .map(String::as_str)
        .ok_or_else(|| invalid(offset, "id out of range"))
}

pub fn parse(bytes: &[u8]) -> Result<CrfModel> {
    let reader = Reader { bytes };
    reader.expect_tag(0, MAGIC, "not a crfsuite model")?;
    reader.expect_tag(8, MODEL_TYPE, "unsupported model type")?;

    let label_count = reader.usize_at(20)?;
    let attribute_count = reader.usize_at(24)?;
    let features = reader.usize_at(28)?;
    let labels = strings(&reader, reader.usize_at(32)?, label_count)?;
    let attributes = strings(&reader, reader.usize_at(36)?, attribute_count)?;

    reader.expect_tag(features, FEATURE_CHUNK, "expected the FEAT chunk")?;
    let feature_count = reader.usize_at(features + 8)?;

    let mut transitions = Weights::new();
    let mut state_features = Weights::new();
    for i in 0..feature_count {
        let row = features + FEATURE_HEADER_SIZE + i * FEATURE_SIZE;
        let kind = reader.u32_at(row)?;
        let src = reader.usize_at(row + 4)?;
        let dst = reader.usize_at(row + 8)?;
        let weight = reader.f64_at(row + 12)?;

        let (table, from) = match kind {
            FEATURE_STATE => (&mut state_features, lookup(&attributes, src, row + 4)?),
            FEATURE_TRANSITION => (&mut transitions, lookup(&labels, src, row + 4)?),
            _ => return Err(invalid(row, "unknown feature type")),
        };
        let to = lookup(&labels, dst, row + 8)?;
        table
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), weight);
    }

    Ok(CrfModel {
        labels,
        transitions,
        state_features,
    })
}

/// Encode a model the way crfsuite lays it out on disk.
#[cfg(test)]
#[must_use]
pub(crate) fn encode(
    labels: &[&str],
    attributes: &[&str],
    features: &[(u32, u32, u32, f64)],
) -> Vec<u8> {
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn word(value: usize) -> [u8; 4] {
        u32::try_from(value)
            .expect("test model fits in u32 offsets")
            .to_le_bytes()
    }

    fn string_table(keys: &[&str]) -> Vec<u8> {
        // Header plus 256 hash table slots that this reader never consults.
        let records_start = 24 + 256 * 8;
        let mut records = Vec::new();
        let mut backward = Vec::new();
        for (id, key) in keys.iter().enumerate() {
            backward.push(records_start + records.len());
            records.extend(word(id));
            records.extend(word(key.len() + 1));
            records.extend(key.as_bytes());
            records.push(0);
        }
        let backward_offset = records_start + records.len();
        let size = backward_offset + backward.len() * 4;

        let mut chunk = Vec::with_capacity(size);
        chunk.extend(STRING_CHUNK);
        chunk.extend(word(size));
        chunk.extend(word(0));
        chunk.extend(word(0x6244_5371));
        chunk.extend(word(keys.len()));
        chunk.extend(word(backward_offset));
        chunk.resize(records_start, 0);
        chunk.extend(records);
        for offset in backward {
            chunk.extend(word(offset));
        }
        chunk
    }

    let mut feature_chunk = Vec::new();
    feature_chunk.extend(FEATURE_CHUNK);
    feature_chunk.extend(word(FEATURE_HEADER_SIZE + features.len() * FEATURE_SIZE));
    feature_chunk.extend(word(features.len()));
    for &(kind, src, dst, weight) in features {
        feature_chunk.extend(kind.to_le_bytes());
        feature_chunk.extend(src.to_le_bytes());
        feature_chunk.extend(dst.to_le_bytes());
        feature_chunk.extend(weight.to_le_bytes());
    }

    let label_table = string_table(labels);
    let attribute_table = string_table(attributes);
    let features_at = 48;
    let labels_at = features_at + feature_chunk.len();
    let attributes_at = labels_at + label_table.len();
    let end = attributes_at + attribute_table.len();

    let mut bytes = Vec::with_capacity(end);
    bytes.extend(MAGIC);
    bytes.extend(word(end));
    bytes.extend(MODEL_TYPE);
    bytes.extend(word(100));
    bytes.extend(word(features.len()));
    bytes.extend(word(labels.len()));
    bytes.extend(word(attributes.len()));
    bytes.extend(word(features_at));
    bytes.extend(word(labels_at));
    bytes.extend(word(attributes_at));
    bytes.extend(word(end));
    bytes.extend(word(end));
    bytes.extend(feature_chunk);
    bytes.extend(label_table);
    bytes.extend(attribute_table);
    bytes
}
