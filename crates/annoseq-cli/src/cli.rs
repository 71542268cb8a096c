//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{check, normalize, segments};

/// Validator for time-annotated sequence documents.
///
/// Reads JSON sequence dictionaries (or segment lists), checks every
/// invariant, and re-emits them in canonical form.
#[derive(Debug, Parser)]
#[command(name = "annoseq", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate documents and report each sequence.
    Check(check::CheckArgs),

    /// Print sequences in canonical flat-dictionary form.
    Normalize(normalize::NormalizeArgs),

    /// Print every segment as one JSON record per line.
    Segments(segments::SegmentsArgs),
}
