//! Ordered sequences of segments from one recording.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use crate::dict::SequenceDict;
use crate::error::{Result, SequenceError};
use crate::input::{ArrayInput, Labels};
use crate::reconcile::{RawUnit, Reconciled, reconcile};
use crate::segment::{Segment, UnitPair};

/// An ordered collection of segments from a single file.
///
/// Alongside the segments, a sequence keeps parallel arrays (labels and the
/// onsets/offsets of each unit system it carries) that agree index-for-index
/// with the segment list. A unit system is either carried for every segment
/// or absent for all of them.
///
/// Sequences are immutable; build a new one to change anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    segments: Vec<Segment>,
    labels: Vec<String>,
    samples: Option<UnitPair<Vec<u64>>>,
    seconds: Option<UnitPair<Vec<f64>>>,
    file: String,
}

impl Sequence {
    /// Builds a sequence from segments, keeping their order.
    ///
    /// All segments must share one file. The parallel arrays are projected
    /// from the segments and reconciled like keyword input.
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(SequenceError::NoSegments);
        }
        let file = unique_file(&segments)?.to_string();

        let labels = Labels::Items(
            segments
                .iter()
                .map(|s| Value::from(s.label()))
                .collect(),
        );
        let samples = project_unit(&segments, "onsets_samples", "integer", Segment::samples)?;
        let seconds = project_unit(
            &segments,
            "onsets_seconds",
            "floating-point",
            Segment::seconds,
        )?;

        let reconciled = reconcile(
            &labels,
            RawUnit::samples(
                samples.as_ref().map(|p| &p.onset),
                samples.as_ref().map(|p| &p.offset),
            ),
            RawUnit::seconds(
                seconds.as_ref().map(|p| &p.onset),
                seconds.as_ref().map(|p| &p.offset),
            ),
        )?;

        tracing::debug!(segments = segments.len(), file = %file, "built sequence from segments");
        Ok(Self::assemble(segments, reconciled, file))
    }

    /// Builds a sequence from labels and onset/offset arrays.
    ///
    /// At least one unit system must be given, each as a full onset/offset
    /// pair. One segment is created per label.
    pub fn from_keyword(
        file: impl Into<String>,
        labels: impl Into<Labels>,
        onsets_samples: Option<ArrayInput>,
        offsets_samples: Option<ArrayInput>,
        onsets_seconds: Option<ArrayInput>,
        offsets_seconds: Option<ArrayInput>,
    ) -> Result<Self> {
        let file = file.into();
        let reconciled = reconcile(
            &labels.into(),
            RawUnit::samples(onsets_samples.as_ref(), offsets_samples.as_ref()),
            RawUnit::seconds(onsets_seconds.as_ref(), offsets_seconds.as_ref()),
        )?;

        let segments = (0..reconciled.labels.len())
            .map(|i| {
                Segment::new(
                    reconciled.labels[i].clone(),
                    file.clone(),
                    reconciled
                        .samples
                        .as_ref()
                        .map(|p| UnitPair::new(p.onset[i], p.offset[i])),
                    reconciled
                        .seconds
                        .as_ref()
                        .map(|p| UnitPair::new(p.onset[i], p.offset[i])),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(segments = segments.len(), file = %file, "built sequence from arrays");
        Ok(Self::assemble(segments, reconciled, file))
    }

    /// Builds a sequence from its flat dictionary form.
    pub fn from_dict(dict: SequenceDict) -> Result<Self> {
        Self::from_keyword(
            dict.file,
            dict.labels,
            dict.onsets_samples,
            dict.offsets_samples,
            dict.onsets_seconds,
            dict.offsets_seconds,
        )
    }

    /// Flattens the sequence into parallel arrays.
    ///
    /// Arrays are projected from the segments; a unit system the sequence
    /// does not carry is reported as `None`.
    pub fn to_dict(&self) -> Result<SequenceDict> {
        let file = if self.segments.is_empty() {
            self.file.clone()
        } else {
            unique_file(&self.segments)?.to_string()
        };

        let mut dict = SequenceDict::new(
            file,
            self.segments
                .iter()
                .map(|s| s.label().to_string())
                .collect::<Vec<_>>(),
        );
        if self.samples.is_some() {
            let (onsets, offsets): (Vec<u64>, Vec<u64>) = self
                .segments
                .iter()
                .filter_map(Segment::samples)
                .map(|p| (p.onset, p.offset))
                .unzip();
            dict = dict.with_samples(onsets, offsets);
        }
        if self.seconds.is_some() {
            let (onsets, offsets): (Vec<f64>, Vec<f64>) = self
                .segments
                .iter()
                .filter_map(Segment::seconds)
                .map(|p| (p.onset, p.offset))
                .unzip();
            dict = dict.with_seconds(onsets, offsets);
        }
        Ok(dict)
    }

    fn assemble(segments: Vec<Segment>, reconciled: Reconciled, file: String) -> Self {
        Self {
            segments,
            labels: reconciled.labels,
            samples: reconciled.samples,
            seconds: reconciled.seconds,
            file,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Consumes the sequence, returning its segments.
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Onset and offset arrays in sample indices, if carried.
    pub const fn samples(&self) -> Option<&UnitPair<Vec<u64>>> {
        self.samples.as_ref()
    }

    /// Onset and offset arrays in seconds, if carried.
    pub const fn seconds(&self) -> Option<&UnitPair<Vec<f64>>> {
        self.seconds.as_ref()
    }

    pub fn onsets_samples(&self) -> Option<&[u64]> {
        self.samples.as_ref().map(|p| p.onset.as_slice())
    }

    pub fn offsets_samples(&self) -> Option<&[u64]> {
        self.samples.as_ref().map(|p| p.offset.as_slice())
    }

    pub fn onsets_seconds(&self) -> Option<&[f64]> {
        self.seconds.as_ref().map(|p| p.onset.as_slice())
    }

    pub fn offsets_seconds(&self) -> Option<&[f64]> {
        self.seconds.as_ref().map(|p| p.offset.as_slice())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sequence with {} segments from {}",
            self.segments.len(),
            self.file
        )
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl TryFrom<SequenceDict> for Sequence {
    type Error = SequenceError;

    fn try_from(dict: SequenceDict) -> Result<Self> {
        Self::from_dict(dict)
    }
}

/// Returns the single file shared by all segments.
fn unique_file(segments: &[Segment]) -> Result<&str> {
    let files: BTreeSet<&str> = segments.iter().map(Segment::file).collect();
    if files.len() > 1 {
        return Err(SequenceError::MultipleFiles {
            files: files.into_iter().map(String::from).collect(),
        });
    }
    files.into_iter().next().ok_or(SequenceError::NoSegments)
}

/// Projects one unit system out of the segments as raw arrays.
///
/// Returns `None` when no segment carries the unit. When only some segments
/// carry it, the projected array has holes and is rejected.
fn project_unit<T>(
    segments: &[Segment],
    field: &'static str,
    expected: &'static str,
    unit_of: impl Fn(&Segment) -> Option<UnitPair<T>>,
) -> Result<Option<UnitPair<ArrayInput>>>
where
    T: Into<Value>,
{
    let pairs: Vec<Option<UnitPair<T>>> = segments.iter().map(unit_of).collect();
    if pairs.iter().all(Option::is_none) {
        return Ok(None);
    }
    let Some(pairs) = pairs.into_iter().collect::<Option<Vec<_>>>() else {
        return Err(SequenceError::TypeMismatch {
            field,
            expected,
            found: "missing values".to_string(),
        });
    };

    let (onsets, offsets): (Vec<T>, Vec<T>) =
        pairs.into_iter().map(|p| (p.onset, p.offset)).unzip();
    Ok(Some(UnitPair::new(
        ArrayInput::from(onsets),
        ArrayInput::from(offsets),
    )))
}
