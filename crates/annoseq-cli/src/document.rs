//! JSON annotation documents.
//!
//! A document holds one entry or an array of entries. Each entry is either a
//! flat sequence dictionary or an object with a `segments` list:
//!
//! ```json
//! {"file": "bird0.wav", "labels": "ab", "onsets_seconds": [0.1, 0.4], "offsets_seconds": [0.2, 0.5]}
//! {"segments": [{"label": "a", "file": "bird0.wav", "onset_sample": 10, "offset_sample": 20}]}
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

use annoseq_core::{Sequence, SequenceDict, segments_from_values};

/// One sequence as written in a document.
#[derive(Debug, Clone)]
pub enum Entry {
    /// Segment records, built with [`Sequence::from_segments`].
    Segments(Vec<Value>),
    /// Flat dictionary, built with [`Sequence::from_dict`].
    Dict(SequenceDict),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SegmentList {
    segments: Vec<Value>,
}

impl Entry {
    /// Decodes one document entry.
    ///
    /// An object with a `segments` key is a segment list and may not carry any
    /// other key. Every other entry is decoded as a flat dictionary.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if value.get("segments").is_some() {
            let list = SegmentList::deserialize(value)?;
            Ok(Self::Segments(list.segments))
        } else {
            SequenceDict::deserialize(value).map(Self::Dict)
        }
    }

    /// Validates the entry into a sequence.
    pub fn into_sequence(self) -> annoseq_core::Result<Sequence> {
        match self {
            Self::Segments(segments) => Sequence::from_segments(segments_from_values(&segments)?),
            Self::Dict(dict) => Sequence::from_dict(dict),
        }
    }
}

/// Decodes and validates one raw entry.
pub fn decode_sequence(value: Value) -> Result<Sequence> {
    let entry = Entry::from_value(value).context("malformed entry")?;
    Ok(entry.into_sequence()?)
}

/// Splits document text into its raw entries.
///
/// A document is one entry object or an array of them. Entries are decoded
/// separately so that one malformed entry does not hide its siblings.
pub fn parse_entries(text: &str) -> Result<Vec<Value>> {
    let document: Value = serde_json::from_str(text).context("document is not valid JSON")?;
    match document {
        Value::Array(entries) => Ok(entries),
        entry @ Value::Object(_) => Ok(vec![entry]),
        _ => bail!("document is not a sequence entry or a list of them"),
    }
}

/// Reads a document from disk and splits it into raw entries.
pub fn load_entries(path: &Path) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let entries =
        parse_entries(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "loaded document");
    Ok(entries)
}

/// Reads a document and validates every entry, failing on the first invalid one.
pub fn load_sequences(path: &Path) -> Result<Vec<Sequence>> {
    load_entries(path)?
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            decode_sequence(entry)
                .with_context(|| format!("invalid sequence {index} in {}", path.display()))
        })
        .collect()
}
