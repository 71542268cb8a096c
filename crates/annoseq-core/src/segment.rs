//! A single labeled interval of a recording.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SequenceError};
use crate::input::{Number, value_kind};

/// An onset and its matching offset, in one unit system.
///
/// Holding both halves in one value means a half-specified pair cannot exist
/// once input has been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPair<T> {
    pub onset: T,
    pub offset: T,
}

impl<T> UnitPair<T> {
    pub const fn new(onset: T, offset: T) -> Self {
        Self { onset, offset }
    }
}

/// One annotated interval: a label, the file it came from, and its onset and
/// offset in sample indices, seconds, or both.
///
/// Segments are immutable. `onset <= offset` is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SegmentRecord", into = "SegmentRecord")]
pub struct Segment {
    label: String,
    file: String,
    samples: Option<UnitPair<u64>>,
    seconds: Option<UnitPair<f64>>,
}

impl Segment {
    /// Builds a segment from typed unit pairs.
    ///
    /// Fails when neither pair is given or when a second value is negative
    /// or not finite.
    pub fn new(
        label: impl Into<String>,
        file: impl Into<String>,
        samples: Option<UnitPair<u64>>,
        seconds: Option<UnitPair<f64>>,
    ) -> Result<Self> {
        if samples.is_none() && seconds.is_none() {
            return Err(SequenceError::NoUnitsSpecified);
        }
        if let Some(pair) = seconds {
            check_seconds("onset_seconds", pair.onset)?;
            check_seconds("offset_seconds", pair.offset)?;
        }
        Ok(Self {
            label: label.into(),
            file: file.into(),
            samples,
            seconds,
        })
    }

    /// Builds a segment measured in sample indices.
    pub fn from_samples(
        label: impl Into<String>,
        file: impl Into<String>,
        onset: u64,
        offset: u64,
    ) -> Self {
        Self {
            label: label.into(),
            file: file.into(),
            samples: Some(UnitPair::new(onset, offset)),
            seconds: None,
        }
    }

    /// Builds a segment measured in seconds.
    pub fn from_seconds(
        label: impl Into<String>,
        file: impl Into<String>,
        onset: f64,
        offset: f64,
    ) -> Result<Self> {
        Self::new(label, file, None, Some(UnitPair::new(onset, offset)))
    }

    /// Builds a segment from loosely-typed optional values.
    ///
    /// Each unit pair must be given in full or not at all, and at least one
    /// pair must be given. Sample values must be integers and second values
    /// must be floating-point.
    pub fn from_keyword(
        label: impl Into<String>,
        file: impl Into<String>,
        onset_sample: Option<Number>,
        offset_sample: Option<Number>,
        onset_seconds: Option<Number>,
        offset_seconds: Option<Number>,
    ) -> Result<Self> {
        if onset_sample.is_none()
            && offset_sample.is_none()
            && onset_seconds.is_none()
            && offset_seconds.is_none()
        {
            return Err(SequenceError::NoUnitsSpecified);
        }

        let samples = pair_of(
            ("onset_sample", onset_sample),
            ("offset_sample", offset_sample),
        )?
        .map(|(onset, offset)| -> Result<_> {
            Ok(UnitPair::new(
                sample_value("onset_sample", onset)?,
                sample_value("offset_sample", offset)?,
            ))
        })
        .transpose()?;

        let seconds = pair_of(
            ("onset_seconds", onset_seconds),
            ("offset_seconds", offset_seconds),
        )?
        .map(|(onset, offset)| -> Result<_> {
            Ok(UnitPair::new(
                seconds_value("onset_seconds", onset)?,
                seconds_value("offset_seconds", offset)?,
            ))
        })
        .transpose()?;

        Self::new(label, file, samples, seconds)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Onset and offset in sample indices, if present.
    pub const fn samples(&self) -> Option<UnitPair<u64>> {
        self.samples
    }

    /// Onset and offset in seconds, if present.
    pub const fn seconds(&self) -> Option<UnitPair<f64>> {
        self.seconds
    }

    pub fn onset_sample(&self) -> Option<u64> {
        self.samples.map(|p| p.onset)
    }

    pub fn offset_sample(&self) -> Option<u64> {
        self.samples.map(|p| p.offset)
    }

    pub fn onset_seconds(&self) -> Option<f64> {
        self.seconds.map(|p| p.onset)
    }

    pub fn offset_seconds(&self) -> Option<f64> {
        self.seconds.map(|p| p.offset)
    }
}

/// Resolves an optional onset/offset pair, rejecting a lone half.
fn pair_of(
    (onset_name, onset): (&'static str, Option<Number>),
    (offset_name, offset): (&'static str, Option<Number>),
) -> Result<Option<(Number, Number)>> {
    match (onset, offset) {
        (Some(onset), Some(offset)) => Ok(Some((onset, offset))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(SequenceError::InvalidUnitPair {
            present: onset_name,
            missing: offset_name,
        }),
        (None, Some(_)) => Err(SequenceError::InvalidUnitPair {
            present: offset_name,
            missing: onset_name,
        }),
    }
}

fn sample_value(field: &'static str, value: Number) -> Result<u64> {
    match value {
        Number::Int(v) => u64::try_from(v).map_err(|_| SequenceError::OutOfRange {
            field,
            index: None,
            value: v.to_string(),
        }),
        Number::UInt(v) => Ok(v),
        Number::Float(_) => Err(SequenceError::TypeMismatch {
            field,
            expected: "integer",
            found: value.kind().to_string(),
        }),
    }
}

fn seconds_value(field: &'static str, value: Number) -> Result<f64> {
    match value {
        Number::Float(v) => Ok(v),
        Number::Int(_) | Number::UInt(_) => Err(SequenceError::TypeMismatch {
            field,
            expected: "floating-point",
            found: value.kind().to_string(),
        }),
    }
}

fn check_seconds(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SequenceError::OutOfRange {
            field,
            index: None,
            value: value.to_string(),
        })
    }
}

/// Flat, serializable form of a [`Segment`].
///
/// Deserializing a [`Segment`] goes through this record and
/// [`Segment::from_keyword`], so serialized segments are validated on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub label: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset_sample: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_sample: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset_seconds: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_seconds: Option<Number>,
}

impl TryFrom<SegmentRecord> for Segment {
    type Error = SequenceError;

    fn try_from(record: SegmentRecord) -> Result<Self> {
        Self::from_keyword(
            record.label,
            record.file,
            record.onset_sample,
            record.offset_sample,
            record.onset_seconds,
            record.offset_seconds,
        )
    }
}

impl From<Segment> for SegmentRecord {
    fn from(segment: Segment) -> Self {
        Self {
            onset_sample: segment.samples.map(|p| Number::UInt(p.onset)),
            offset_sample: segment.samples.map(|p| Number::UInt(p.offset)),
            onset_seconds: segment.seconds.map(|p| Number::Float(p.onset)),
            offset_seconds: segment.seconds.map(|p| Number::Float(p.offset)),
            label: segment.label,
            file: segment.file,
        }
    }
}

/// Decodes a list of JSON values into segments.
///
/// Every element must be a segment record; anything else fails with
/// [`SequenceError::SegmentType`] naming the offending index.
pub fn segments_from_values(values: &[Value]) -> Result<Vec<Segment>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            if !value.is_object() {
                return Err(SequenceError::SegmentType {
                    index,
                    found: value_kind(value).to_string(),
                });
            }
            let record = SegmentRecord::deserialize(value).map_err(|e| {
                SequenceError::SegmentType {
                    index,
                    found: format!("malformed segment record ({e})"),
                }
            })?;
            Segment::try_from(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_keyword_builds_both_units() {
        let segment = Segment::from_keyword(
            "a",
            "bird0.wav",
            Some(16005.into()),
            Some(17602.into()),
            Some(0.5.into()),
            Some(0.55.into()),
        )
        .unwrap();

        assert_eq!(segment.label(), "a");
        assert_eq!(segment.file(), "bird0.wav");
        assert_eq!(segment.samples(), Some(UnitPair::new(16005, 17602)));
        assert_eq!(segment.onset_seconds(), Some(0.5));
        assert_eq!(segment.offset_seconds(), Some(0.55));
    }

    #[test]
    fn from_keyword_requires_some_unit() {
        let err = Segment::from_keyword("a", "f.wav", None, None, None, None).unwrap_err();
        assert_eq!(err, SequenceError::NoUnitsSpecified);
    }

    #[test]
    fn from_keyword_rejects_half_pairs() {
        let err =
            Segment::from_keyword("a", "f.wav", Some(1.into()), None, None, None).unwrap_err();
        assert_eq!(
            err,
            SequenceError::InvalidUnitPair {
                present: "onset_sample",
                missing: "offset_sample",
            }
        );

        let err = Segment::from_keyword(
            "a",
            "f.wav",
            Some(1.into()),
            Some(2.into()),
            None,
            Some(0.5.into()),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "offset_seconds specified but onset_seconds is missing"
        );
    }

    #[test]
    fn from_keyword_checks_numeric_kinds() {
        let err = Segment::from_keyword(
            "a",
            "f.wav",
            Some(1.5.into()),
            Some(2.into()),
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "onset_sample must contain integer values, found floating-point"
        );

        let err = Segment::from_keyword("a", "f.wav", None, None, Some(0.into()), Some(1.into()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "onset_seconds must contain floating-point values, found integer"
        );
    }

    #[test]
    fn negative_values_are_out_of_range() {
        let err = Segment::from_keyword("a", "f.wav", Some((-1).into()), Some(2.into()), None, None)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "onset_sample must be a finite non-negative number, got -1"
        );

        assert!(Segment::from_seconds("a", "f.wav", 0.0, f64::NAN).is_err());
    }

    #[test]
    fn serde_roundtrip_omits_absent_units() {
        let segment = Segment::from_samples("b", "bird0.wav", 10, 20);
        let json = serde_json::to_string(&segment).unwrap();
        assert_eq!(
            json,
            r#"{"label":"b","file":"bird0.wav","onset_sample":10,"offset_sample":20}"#
        );
        let parsed: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, segment);
    }

    #[test]
    fn serde_roundtrip_keeps_large_sample_indices() {
        let segment = Segment::from_samples("a", "f.wav", u64::MAX - 1, u64::MAX);
        let json = serde_json::to_string(&segment).unwrap();
        assert_eq!(
            json,
            r#"{"label":"a","file":"f.wav","onset_sample":18446744073709551614,"offset_sample":18446744073709551615}"#
        );
        let parsed: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, segment);

        let record = SegmentRecord::from(segment);
        assert_eq!(record.onset_sample, Some(Number::UInt(u64::MAX - 1)));
    }

    #[test]
    fn large_integer_seconds_are_reported_as_integers() {
        let err: serde_json::Error = serde_json::from_str::<Segment>(
            r#"{"label":"a","file":"f.wav","onset_seconds":18446744073709551615,"offset_seconds":1.0}"#,
        )
        .unwrap_err();
        assert!(
            err.to_string()
                .starts_with("onset_seconds must contain floating-point values, found integer")
        );
    }

    #[test]
    fn deserialize_validates_pairs() {
        let result: Result<Segment, _> =
            serde_json::from_str(r#"{"label":"a","file":"f.wav","onset_seconds":0.5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn segments_from_values_rejects_non_segments() {
        let values = vec![
            json!({"label": "a", "file": "f.wav", "onset_seconds": 0.0, "offset_seconds": 0.5}),
            json!("b"),
        ];
        let err = segments_from_values(&values).unwrap_err();
        assert_eq!(
            err,
            SequenceError::SegmentType {
                index: 1,
                found: "string".to_string(),
            }
        );

        let values = vec![json!({"label": "a"})];
        let err = segments_from_values(&values).unwrap_err();
        assert!(err.to_string().starts_with(
            "expected a segment at index 0, found malformed segment record (missing field `file`"
        ));
    }

    #[test]
    fn segments_from_values_surfaces_validation_errors() {
        let values = vec![json!({"label": "a", "file": "f.wav"})];
        let err = segments_from_values(&values).unwrap_err();
        assert_eq!(err, SequenceError::NoUnitsSpecified);
    }
}
