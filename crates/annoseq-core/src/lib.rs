//! Core model for time-annotated sequences.
//!
//! This crate contains the types and validation logic for:
//! - Segments: one labeled interval of a recording, in sample indices and/or seconds
//! - Sequences: ordered segments from one file, with parallel label and onset/offset arrays
//! - Reconciliation: turning loosely-typed adapter input into a consistent sequence
//!
//! Format adapters either build [`Segment`]s and call [`Sequence::from_segments`],
//! or hand raw arrays to [`Sequence::from_keyword`] / [`Sequence::from_dict`].
//! [`Sequence::to_dict`] flattens a sequence back for serialization.

mod dict;
pub mod error;
pub mod input;
mod reconcile;
pub mod segment;
mod sequence;

pub use dict::SequenceDict;
pub use error::{Result, SequenceError};
pub use input::{ArrayInput, Labels, Number};
pub use segment::{Segment, SegmentRecord, UnitPair, segments_from_values};
pub use sequence::Sequence;
