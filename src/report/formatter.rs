use crate::mapreduce::aggregation::ShardStats;
use crate::mapreduce::reducer::{CellReport, Report};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format type for report presentation
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed-width, tab-delimited table
    #[default]
    Text,
    /// Pretty-printed JSON with line statistics
    Json,
}

pub const CELL_HEADER: &str = "Cell";
pub const TOTAL_HEADER: &str = "#Total Tweets";
pub const LANGUAGES_HEADER: &str = "#Number of Languages Used";

/// Header of the ranking column for a given cut
pub fn ranking_header(top_n: usize) -> String {
    format!("#Top {} Languages & #Tweets", top_n)
}

/// `(English-10, French-5)` for the first `top_n` languages
pub fn ranking_cell(cell: &CellReport, top_n: usize) -> String {
    let entries: Vec<String> = cell
        .top(top_n)
        .iter()
        .map(|l| format!("{}-{}", l.language, l.count))
        .collect();
    format!("({})", entries.join(", "))
}

/// Text table view of a report
pub struct TextTable<'a> {
    report: &'a Report,
    top_n: usize,
}

impl<'a> TextTable<'a> {
    pub fn new(report: &'a Report, top_n: usize) -> Self {
        Self { report, top_n }
    }
}

impl fmt::Display for TextTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<6}\t{:<14}\t{:<26}\t{}",
            CELL_HEADER,
            TOTAL_HEADER,
            LANGUAGES_HEADER,
            ranking_header(self.top_n)
        )?;
        for cell in &self.report.cells {
            writeln!(
                f,
                "{:<6}\t{:<14}\t{:<26}\t{}",
                cell.cell,
                cell.total,
                cell.languages,
                ranking_cell(cell, self.top_n)
            )?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    cells: &'a [CellReport],
    total_events: u64,
    stats: &'a ShardStats,
}

/// Output formatter for the final report
pub struct ReportFormatter {
    format: OutputFormat,
    top_n: usize,
}

impl ReportFormatter {
    pub fn new(format: OutputFormat, top_n: usize) -> Self {
        Self { format, top_n }
    }

    pub fn format(&self, report: &Report, stats: &ShardStats) -> String {
        match self.format {
            OutputFormat::Text => TextTable::new(report, self.top_n).to_string(),
            OutputFormat::Json => self.format_json(report, stats),
        }
    }

    /// JSON keeps the full ranking; `top_n` only cuts the text table
    fn format_json(&self, report: &Report, stats: &ShardStats) -> String {
        let output = JsonReport {
            cells: &report.cells,
            total_events: report.total_events(),
            stats,
        };
        serde_json::to_string_pretty(&output)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}
