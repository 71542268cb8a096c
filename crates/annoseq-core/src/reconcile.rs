//! Reconciliation of raw labels and onset/offset arrays.
//!
//! Every construction path of [`Sequence`](crate::Sequence) funnels through
//! [`reconcile`], which turns adapter input into typed, length-checked columns.
//!
//! # Order of checks
//!
//! 1. Labels are normalized (one string per segment).
//! 2. At least one unit system must be supplied.
//! 3. Each unit system must be supplied as a full onset/offset pair.
//! 4. Sample arrays, then second arrays, are collapsed to one dimension,
//!    checked for numeric kind, and checked for length (onsets against
//!    offsets, then labels against onsets).
//!
//! The first failing check is reported.

use crate::error::{Result, SequenceError};
use crate::input::{ArrayInput, Labels};
use crate::segment::UnitPair;

/// Raw onset/offset arrays for one unit system, with their dictionary names.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawUnit<'a> {
    pub onsets: Option<&'a ArrayInput>,
    pub offsets: Option<&'a ArrayInput>,
    pub onsets_name: &'static str,
    pub offsets_name: &'static str,
}

impl<'a> RawUnit<'a> {
    pub const fn samples(onsets: Option<&'a ArrayInput>, offsets: Option<&'a ArrayInput>) -> Self {
        Self {
            onsets,
            offsets,
            onsets_name: "onsets_samples",
            offsets_name: "offsets_samples",
        }
    }

    pub const fn seconds(onsets: Option<&'a ArrayInput>, offsets: Option<&'a ArrayInput>) -> Self {
        Self {
            onsets,
            offsets,
            onsets_name: "onsets_seconds",
            offsets_name: "offsets_seconds",
        }
    }

    const fn is_absent(&self) -> bool {
        self.onsets.is_none() && self.offsets.is_none()
    }

    fn pair(&self) -> Result<Option<UnitPair<&'a ArrayInput>>> {
        match (self.onsets, self.offsets) {
            (Some(onsets), Some(offsets)) => Ok(Some(UnitPair::new(onsets, offsets))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(SequenceError::InvalidUnitPair {
                present: self.onsets_name,
                missing: self.offsets_name,
            }),
            (None, Some(_)) => Err(SequenceError::InvalidUnitPair {
                present: self.offsets_name,
                missing: self.onsets_name,
            }),
        }
    }
}

/// Labels and typed columns that satisfy every sequence invariant.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reconciled {
    pub labels: Vec<String>,
    pub samples: Option<UnitPair<Vec<u64>>>,
    pub seconds: Option<UnitPair<Vec<f64>>>,
}

/// Validates and normalizes labels plus both unit systems.
pub(crate) fn reconcile(
    labels: &Labels,
    raw_samples: RawUnit<'_>,
    raw_seconds: RawUnit<'_>,
) -> Result<Reconciled> {
    let labels = labels.normalize()?;

    if raw_samples.is_absent() && raw_seconds.is_absent() {
        return Err(SequenceError::NoUnitsSpecified);
    }
    let sample_pair = raw_samples.pair()?;
    let seconds_pair = raw_seconds.pair()?;

    let samples = sample_pair
        .map(|pair| {
            let onsets = pair.onset.to_samples(raw_samples.onsets_name)?;
            let offsets = pair.offset.to_samples(raw_samples.offsets_name)?;
            check_lengths(&labels, &raw_samples, &onsets, &offsets)?;
            Ok::<_, SequenceError>(UnitPair::new(onsets, offsets))
        })
        .transpose()?;

    let seconds = seconds_pair
        .map(|pair| {
            let onsets = pair.onset.to_seconds(raw_seconds.onsets_name)?;
            let offsets = pair.offset.to_seconds(raw_seconds.offsets_name)?;
            check_lengths(&labels, &raw_seconds, &onsets, &offsets)?;
            Ok::<_, SequenceError>(UnitPair::new(onsets, offsets))
        })
        .transpose()?;

    tracing::trace!(
        labels = labels.len(),
        samples = samples.is_some(),
        seconds = seconds.is_some(),
        "reconciled annotation arrays"
    );

    Ok(Reconciled {
        labels,
        samples,
        seconds,
    })
}

/// Reports the first pair of arrays that disagree in length.
///
/// Once onsets match offsets, comparing labels against onsets covers offsets too.
fn check_lengths<T>(
    labels: &[String],
    unit: &RawUnit<'_>,
    onsets: &[T],
    offsets: &[T],
) -> Result<()> {
    let pairs = [
        (unit.onsets_name, onsets.len(), unit.offsets_name, offsets.len()),
        ("labels", labels.len(), unit.onsets_name, onsets.len()),
    ];
    match pairs.into_iter().find(|(_, a, _, b)| a != b) {
        Some((left, left_len, right, right_len)) => Err(SequenceError::LengthMismatch {
            left,
            left_len,
            right,
            right_len,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn arrays(
        onsets: Option<serde_json::Value>,
        offsets: Option<serde_json::Value>,
    ) -> (Option<ArrayInput>, Option<ArrayInput>) {
        (onsets.map(ArrayInput::from), offsets.map(ArrayInput::from))
    }

    #[test]
    fn reconciles_seconds_only() {
        let (on, off) = arrays(Some(json!([0.0, 1.0])), Some(json!([0.5, 1.5])));
        let result = reconcile(
            &Labels::from("ab"),
            RawUnit::samples(None, None),
            RawUnit::seconds(on.as_ref(), off.as_ref()),
        )
        .unwrap();

        assert_eq!(result.labels, vec!["a", "b"]);
        assert_eq!(result.samples, None);
        assert_eq!(
            result.seconds,
            Some(UnitPair::new(vec![0.0, 1.0], vec![0.5, 1.5]))
        );
    }

    #[test]
    fn rejects_missing_units() {
        let err = reconcile(
            &Labels::from("ab"),
            RawUnit::samples(None, None),
            RawUnit::seconds(None, None),
        )
        .unwrap_err();
        assert_eq!(err, SequenceError::NoUnitsSpecified);
    }

    #[test]
    fn rejects_half_pairs_per_unit() {
        let (on, _) = arrays(Some(json!([0.0])), None);
        let err = reconcile(
            &Labels::from("a"),
            RawUnit::samples(None, None),
            RawUnit::seconds(on.as_ref(), None),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SequenceError::InvalidUnitPair {
                present: "onsets_seconds",
                missing: "offsets_seconds",
            }
        );

        let (_, off) = arrays(None, Some(json!([10])));
        let (s_on, s_off) = arrays(Some(json!([0.0])), Some(json!([0.5])));
        let err = reconcile(
            &Labels::from("a"),
            RawUnit::samples(None, off.as_ref()),
            RawUnit::seconds(s_on.as_ref(), s_off.as_ref()),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "offsets_samples specified but onsets_samples is missing"
        );
    }

    #[test]
    fn length_mismatch_names_labels_and_onsets() {
        let (on, off) = arrays(Some(json!([0.0])), Some(json!([0.5])));
        let err = reconcile(
            &Labels::from(vec!["a", "b"]),
            RawUnit::samples(None, None),
            RawUnit::seconds(on.as_ref(), off.as_ref()),
        )
        .unwrap_err();
        insta::assert_snapshot!(
            err,
            @"labels and onsets_seconds have different lengths: labels: 2, onsets_seconds: 1"
        );
    }

    #[test]
    fn length_mismatch_checks_onsets_against_offsets_first() {
        let (on, off) = arrays(Some(json!([1, 2, 3])), Some(json!([2, 3])));
        let err = reconcile(
            &Labels::from("a"),
            RawUnit::samples(on.as_ref(), off.as_ref()),
            RawUnit::seconds(None, None),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SequenceError::LengthMismatch {
                left: "onsets_samples",
                left_len: 3,
                right: "offsets_samples",
                right_len: 2,
            }
        );
    }

    #[test]
    fn length_mismatch_reports_labels_once_onsets_match_offsets() {
        let (on, off) = arrays(Some(json!([0.0, 1.0])), Some(json!([0.5, 1.5])));
        // onsets and offsets agree, so the labels pair is reported
        let err = reconcile(
            &Labels::from("abc"),
            RawUnit::samples(None, None),
            RawUnit::seconds(on.as_ref(), off.as_ref()),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "labels and onsets_seconds have different lengths: labels: 3, onsets_seconds: 2"
        );
    }

    #[test]
    fn seconds_lengths_are_checked_even_when_samples_are_absent() {
        let (on, off) = arrays(Some(json!([0.0, 1.0])), Some(json!([0.5])));
        let err = reconcile(
            &Labels::from("ab"),
            RawUnit::samples(None, None),
            RawUnit::seconds(on.as_ref(), off.as_ref()),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SequenceError::LengthMismatch {
                left: "onsets_seconds",
                right: "offsets_seconds",
                ..
            }
        ));
    }

    #[test]
    fn both_units_are_validated_independently() {
        let (on, off) = arrays(Some(json!([16005, 17925])), Some(json!([17602, 19520])));
        let (s_on, s_off) = arrays(Some(json!([0.5, 0.56])), Some(json!([0.55])));
        let err = reconcile(
            &Labels::from("ab"),
            RawUnit::samples(on.as_ref(), off.as_ref()),
            RawUnit::seconds(s_on.as_ref(), s_off.as_ref()),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "onsets_seconds and offsets_seconds have different lengths: \
             onsets_seconds: 2, offsets_seconds: 1"
        );
    }

    #[test]
    fn label_errors_come_before_unit_errors() {
        let err = reconcile(
            &Labels::from(vec![json!({"name": "a"})]),
            RawUnit::samples(None, None),
            RawUnit::seconds(None, None),
        )
        .unwrap_err();
        assert!(matches!(err, SequenceError::LabelConversion { index: 0, .. }));
    }
}
