//! Segments command for listing segments as JSONL.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::document;

#[derive(Debug, Args)]
pub struct SegmentsArgs {
    /// JSON document to read.
    pub file: PathBuf,
}

/// Writes one segment record per line, in sequence order.
pub fn run<W: Write>(writer: &mut W, args: &SegmentsArgs) -> Result<usize> {
    let sequences = document::load_sequences(&args.file)?;

    let mut written = 0;
    for sequence in &sequences {
        for segment in sequence {
            let json = serde_json::to_string(segment)?;
            writeln!(writer, "{json}")?;
            written += 1;
        }
    }

    tracing::debug!(sequences = sequences.len(), segments = written, "listed segments");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn segments_lists_each_segment_as_jsonl() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("input.json");
        std::fs::write(
            &path,
            r#"{"file": "bird0.wav", "labels": ["iy", "eh"],
                "onsets_samples": [16005, 17925], "offsets_samples": [17602, 19520],
                "onsets_seconds": [0.5, 0.56], "offsets_seconds": [0.55, 0.61]}"#,
        )
        .unwrap();

        let mut output = Vec::new();
        let written = run(&mut output, &SegmentsArgs { file: path }).unwrap();

        assert_eq!(written, 2);
        assert_snapshot!(String::from_utf8(output).unwrap(), @r#"
        {"label":"iy","file":"bird0.wav","onset_sample":16005,"offset_sample":17602,"onset_seconds":0.5,"offset_seconds":0.55}
        {"label":"eh","file":"bird0.wav","onset_sample":17925,"offset_sample":19520,"onset_seconds":0.56,"offset_seconds":0.61}
        "#);
    }
}
