//! Normalize command for re-emitting sequences in canonical form.
//!
//! Canonical form is the flat dictionary produced by `Sequence::to_dict`:
//! labels are one string per segment and absent unit systems are omitted.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use annoseq_core::Sequence;

use crate::Config;
use crate::document;

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// JSON document to normalize.
    pub file: PathBuf,
}

pub fn run<W: Write>(writer: &mut W, args: &NormalizeArgs, config: &Config) -> Result<()> {
    let sequences = document::load_sequences(&args.file)?;
    let dicts = sequences
        .iter()
        .map(Sequence::to_dict)
        .collect::<Result<Vec<_>, _>>()
        .context("failed to flatten sequences")?;

    if config.pretty {
        serde_json::to_writer_pretty(&mut *writer, &dicts)?;
    } else {
        serde_json::to_writer(&mut *writer, &dicts)?;
    }
    writeln!(writer)?;
    Ok(())
}
