//! Validation errors for segments and sequences.

use thiserror::Error;

/// Errors raised while building a [`Segment`](crate::Segment) or
/// [`Sequence`](crate::Sequence) from adapter input.
///
/// Field names are reported exactly as they appear in the flat dictionary
/// (`onsets_seconds`, `onset_sample`, ...) so that messages stand alone.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SequenceError {
    /// Neither sample nor second onsets/offsets were supplied.
    #[error(
        "must provide either onsets_samples and offsets_samples, \
         or onsets_seconds and offsets_seconds"
    )]
    NoUnitsSpecified,

    /// One half of an onset/offset pair was supplied without its partner.
    #[error("{present} specified but {missing} is missing")]
    InvalidUnitPair {
        present: &'static str,
        missing: &'static str,
    },

    /// A value has the wrong numeric kind for its unit system.
    #[error("{field} must contain {expected} values, found {found}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    /// A value is negative or not finite.
    #[error(
        "{field}{} must be a finite non-negative number, got {value}",
        .index.map_or_else(String::new, |i| format!("[{i}]"))
    )]
    OutOfRange {
        field: &'static str,
        index: Option<usize>,
        value: String,
    },

    /// An array cannot be reduced to one dimension.
    #[error("{field} must be one-dimensional, a single row, or a single column; got shape {shape}")]
    Shape { field: &'static str, shape: String },

    /// Two parallel arrays disagree in length.
    #[error("{left} and {right} have different lengths: {left}: {left_len}, {right}: {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    /// A label has no string form.
    #[error("unable to convert label at index {index} to a string: found {found}")]
    LabelConversion { index: usize, found: &'static str },

    /// Segments reference more than one source file.
    #[error(
        "segments for a sequence must all come from the same file, \
         but found more than one file: {}",
        .files.join(", ")
    )]
    MultipleFiles { files: Vec<String> },

    /// A value that is not a segment was found where a segment was required.
    #[error("expected a segment at index {index}, found {found}")]
    SegmentType { index: usize, found: String },

    /// A sequence cannot take its file from an empty list of segments.
    #[error("cannot build a sequence from an empty list of segments")]
    NoSegments,
}

/// Result alias for annotation validation.
pub type Result<T, E = SequenceError> = std::result::Result<T, E>;
