//! CLI subcommand implementations.

pub mod check;
pub mod normalize;
pub mod segments;
