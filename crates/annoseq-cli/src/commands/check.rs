//! Check command for validating annotation documents.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use rayon::prelude::*;

use crate::Config;
use crate::document;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// JSON documents to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Number of sequences that passed and failed validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub valid: usize,
    pub invalid: usize,
}

/// One reported line of a check run.
#[derive(Debug)]
struct Report {
    text: String,
    valid: bool,
}

/// Validates every file, in parallel, and reports in argument order.
pub fn run<W: Write>(writer: &mut W, args: &CheckArgs, config: &Config) -> Result<CheckSummary> {
    let reports: Vec<Vec<Report>> = args.files.par_iter().map(|path| check_file(path)).collect();

    let mut summary = CheckSummary::default();
    for report in reports.into_iter().flatten() {
        writeln!(writer, "{}", report.text)?;
        if report.valid {
            summary.valid += 1;
        } else {
            summary.invalid += 1;
            if config.fail_fast {
                break;
            }
        }
    }

    writeln!(
        writer,
        "{} valid, {} invalid",
        summary.valid, summary.invalid
    )?;
    Ok(summary)
}

fn check_file(path: &Path) -> Vec<Report> {
    let entries = match document::load_entries(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to load document");
            return vec![Report {
                text: format!("{}: {e:#}", path.display()),
                valid: false,
            }];
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match document::decode_sequence(entry) {
            Ok(sequence) => Report {
                text: format!(
                    "{}[{index}]: ok ({} segments, {})",
                    path.display(),
                    sequence.len(),
                    sequence.file()
                ),
                valid: true,
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), index, error = %e, "invalid sequence");
                Report {
                    text: format!("{}[{index}]: {e:#}", path.display()),
                    valid: false,
                }
            }
        })
        .collect()
}
