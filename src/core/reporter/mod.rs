//! # Reporter Module
//!
//! Turns scores and match reports into text.
//!
//! ## Console Format
//! Every compared candidate gets a streaming line:
//! ```text
//! [87.5%] /pool/holiday/beach.jpg
//! ```
//! and the run ends with the grouped matches:
//! ```text
//! ===== Matches =====
//! Source: /refs/beach.jpg
//!   [99.87%] /pool/holiday/beach.jpg
//! ```
//!
//! Writers take any `std::io::Write`, so tests can capture output in a
//! `Vec<u8>` instead of going through the terminal.

mod export;

pub use export::{export_csv, export_json};

use crate::core::pipeline::MatchReport;
use console::style;
use std::io::{self, Write};
use std::path::Path;

/// Header line that opens the final block
pub const MATCHES_HEADER: &str = "===== Matches =====";

/// Percentage with at most two decimals and no trailing zeros
pub fn format_percent(percent: f64) -> String {
    let fixed = format!("{:.2}", percent);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `[{percent}%] {path}` for a compared candidate
pub fn score_line(candidate: &Path, score_percent: f64) -> String {
    format!("[{}%] {}", format_percent(score_percent), candidate.display())
}

/// Writes console-format lines to a sink
pub struct ReportWriter<W: Write> {
    out: W,
    styled: bool,
}

impl<W: Write> ReportWriter<W> {
    /// Plain text writer
    pub fn new(out: W) -> Self {
        Self { out, styled: false }
    }

    /// Colour headers and percentages
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn write_score_line(&mut self, candidate: &Path, score_percent: f64) -> io::Result<()> {
        if self.styled {
            writeln!(
                self.out,
                "{} {}",
                style(format!("[{}%]", format_percent(score_percent))).dim(),
                candidate.display()
            )
        } else {
            writeln!(self.out, "{}", score_line(candidate, score_percent))
        }
    }

    /// The closing block, one header per source followed by its matches
    pub fn write_matches(&mut self, report: &MatchReport) -> io::Result<()> {
        if self.styled {
            writeln!(self.out, "{}", style(MATCHES_HEADER).bold())?;
        } else {
            writeln!(self.out, "{}", MATCHES_HEADER)?;
        }

        for group in report.by_source() {
            if self.styled {
                let label = style("Source:").cyan().bold();
                writeln!(self.out, "{} {}", label, group.source.display())?;
            } else {
                writeln!(self.out, "Source: {}", group.source.display())?;
            }

            for record in group.matches {
                let percent = format!("[{:.2}%]", record.score_percent);
                if self.styled {
                    let percent = style(percent).green();
                    writeln!(self.out, "  {} {}", percent, record.candidate.display())?;
                } else {
                    writeln!(self.out, "  {} {}", percent, record.candidate.display())?;
                }
            }
        }

        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
