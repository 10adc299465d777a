//! Machine-readable export of match reports.

use crate::core::pipeline::MatchReport;
use std::io::{self, Write};

/// Pretty-printed JSON of the whole report
pub fn export_json<W: Write>(report: &MatchReport, mut writer: W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, report).map_err(io::Error::other)?;
    writeln!(writer)
}

/// One row per match.
///
/// CSV columns: Source, Candidate, Similarity (%)
pub fn export_csv<W: Write>(report: &MatchReport, mut writer: W) -> io::Result<()> {
    writeln!(writer, "Source,Candidate,Similarity (%)")?;

    for record in &report.records {
        writeln!(
            writer,
            "{},{},{:.2}",
            csv_field(&record.source.display().to_string()),
            csv_field(&record.candidate.display().to_string()),
            record.score_percent
        )?;
    }

    Ok(())
}

/// Quote fields that contain separators or quotes
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
