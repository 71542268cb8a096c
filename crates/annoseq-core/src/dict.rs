//! Flat dictionary form of a sequence.

use serde::{Deserialize, Serialize};

use crate::input::{ArrayInput, Labels};

/// A sequence flattened into parallel arrays.
///
/// This is the mapping accepted by [`Sequence::from_dict`](crate::Sequence::from_dict)
/// and produced by [`Sequence::to_dict`](crate::Sequence::to_dict). A unit system
/// that a sequence does not carry is `None` and is omitted when serialized; a
/// `null` or missing entry on input means the same.
///
/// ```
/// use annoseq_core::{Sequence, SequenceDict};
///
/// let dict: SequenceDict = serde_json::from_str(
///     r#"{
///         "file": "bird0.wav",
///         "labels": "abc",
///         "onsets_samples": [16005, 17925, 19837],
///         "offsets_samples": [17602, 19520, 21435]
///     }"#,
/// )
/// .unwrap();
/// let seq = Sequence::from_dict(dict).unwrap();
/// assert_eq!(seq.labels(), ["a", "b", "c"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceDict {
    /// Source recording shared by every segment.
    pub file: String,
    pub labels: Labels,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onsets_samples: Option<ArrayInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offsets_samples: Option<ArrayInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onsets_seconds: Option<ArrayInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offsets_seconds: Option<ArrayInput>,
}

impl SequenceDict {
    /// Starts a dictionary with labels and a file but no unit arrays.
    pub fn new(file: impl Into<String>, labels: impl Into<Labels>) -> Self {
        Self {
            file: file.into(),
            labels: labels.into(),
            onsets_samples: None,
            offsets_samples: None,
            onsets_seconds: None,
            offsets_seconds: None,
        }
    }

    /// Sets the sample-index arrays.
    #[must_use]
    pub fn with_samples(mut self, onsets: impl Into<ArrayInput>, offsets: impl Into<ArrayInput>) -> Self {
        self.onsets_samples = Some(onsets.into());
        self.offsets_samples = Some(offsets.into());
        self
    }

    /// Sets the seconds arrays.
    #[must_use]
    pub fn with_seconds(mut self, onsets: impl Into<ArrayInput>, offsets: impl Into<ArrayInput>) -> Self {
        self.onsets_seconds = Some(onsets.into());
        self.offsets_seconds = Some(offsets.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_and_missing_units_deserialize_as_absent() {
        let dict: SequenceDict = serde_json::from_value(json!({
            "file": "a.wav",
            "labels": ["x"],
            "onsets_seconds": [0.0],
            "offsets_seconds": [1.0],
            "onsets_samples": null,
        }))
        .unwrap();

        assert_eq!(dict.onsets_samples, None);
        assert_eq!(dict.offsets_samples, None);
        assert_eq!(dict.onsets_seconds, Some(ArrayInput::from(vec![0.0])));
    }

    #[test]
    fn absent_units_are_omitted_when_serialized() {
        let dict = SequenceDict::new("a.wav", "ab").with_samples(vec![1_u64, 5], vec![3_u64, 8]);
        insta::assert_snapshot!(
            serde_json::to_string(&dict).unwrap(),
            @r#"{"file":"a.wav","labels":"ab","onsets_samples":[1,5],"offsets_samples":[3,8]}"#
        );
    }
}
